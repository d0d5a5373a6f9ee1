//! Streaming chat endpoint
//!
//! Re-frames the provider's incremental output as a `text/event-stream`
//! body: one `data: {"content": ...}` event per fragment, then the
//! `data: [DONE]` sentinel. A provider failure before streaming begins maps
//! to a structured JSON 500; a failure mid-stream aborts the event stream.

use axum::Json;
use axum::body::Body;
use axum::extract::State;
use axum::http::{Response, header};
use bytes::Bytes;
use folio_relay::{ChatMessage, ChatRequest, ChatRole, Frame};
use futures::StreamExt;

use crate::api::state::AppState;
use crate::error::ApiError;

// POST /api/chat
pub async fn chat(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Response<Body>, ApiError> {
    let mut outbound = Vec::with_capacity(request.messages.len() + 1);
    outbound.push(ChatMessage::system(
        state.persona.system_prompt(request.context.as_deref()),
    ));

    let mut dropped = 0usize;
    for message in request.messages {
        match message.role {
            ChatRole::User | ChatRole::Assistant | ChatRole::System => outbound.push(message),
            ChatRole::Unknown => dropped += 1,
        }
    }
    if dropped > 0 {
        tracing::debug!(dropped, "dropped messages with unrecognized roles");
    }

    tracing::debug!(
        provider = state.llm.provider(),
        model = state.llm.model(),
        messages = outbound.len(),
        "relaying chat request"
    );

    let mut deltas = state.llm.complete_stream(outbound).await?;

    let stream = async_stream::stream! {
        while let Some(delta) = deltas.next().await {
            match delta {
                Ok(delta) => {
                    if !delta.content.is_empty() {
                        yield Ok(Bytes::from(Frame::content(delta.content).encode()));
                    }
                }
                Err(err) => {
                    tracing::error!(error = %err, "provider stream failed");
                    yield Err(err);
                    return;
                }
            }
        }
        yield Ok(Bytes::from(Frame::Done.encode()));
    };

    let response = Response::builder()
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .body(Body::from_stream(stream))
        .expect("static headers are valid");
    Ok(response)
}
