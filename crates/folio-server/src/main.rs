use std::sync::Arc;

use folio_server::api;
use folio_server::api::state::AppContext;
use folio_server::config::ServerConfig;
use folio_server::llm::OpenAIClient;
use folio_server::persona::Persona;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing logger
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,folio_server=debug".into()),
        )
        .with_target(false)
        .init();

    tracing::info!("Starting folio server");

    let config = ServerConfig::load()?;
    let persona = Persona::load(config.resume_path.as_deref())?;
    let llm = OpenAIClient::new(&config.openai_api_key).with_model(config.model.clone());

    let state = Arc::new(AppContext {
        llm: Arc::new(llm),
        persona,
    });

    let app = api::router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(model = %config.model, "folio running on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}
