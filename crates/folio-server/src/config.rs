use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub openai_api_key: String,
    pub model: String,
    pub resume_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Default)]
struct FileConfig {
    #[serde(default)]
    server: ServerSection,
    #[serde(default)]
    openai: OpenAiSection,
    #[serde(default)]
    persona: PersonaSection,
}

#[derive(Debug, Deserialize)]
struct ServerSection {
    #[serde(default = "default_host")]
    host: String,
    #[serde(default = "default_port")]
    port: u16,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiSection {
    #[serde(default)]
    api_key: Option<String>,
    #[serde(default = "default_model")]
    model: String,
}

impl Default for OpenAiSection {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
struct PersonaSection {
    #[serde(default)]
    resume_path: Option<PathBuf>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl ServerConfig {
    pub fn load() -> anyhow::Result<Self> {
        let file_config = load_from_file()?.unwrap_or_default();

        let host = env::var("FOLIO_SERVER_HOST").unwrap_or(file_config.server.host);
        let port = env::var("FOLIO_SERVER_PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(file_config.server.port);
        let model = env::var("FOLIO_MODEL").unwrap_or(file_config.openai.model);
        let resume_path = env::var("FOLIO_RESUME_PATH")
            .ok()
            .map(PathBuf::from)
            .or(file_config.persona.resume_path);

        let openai_api_key = env::var("OPENAI_API_KEY")
            .ok()
            .or(file_config.openai.api_key)
            .ok_or_else(|| anyhow::anyhow!("OPENAI_API_KEY is not set"))?;

        Ok(Self {
            host,
            port,
            openai_api_key,
            model,
            resume_path,
        })
    }
}

fn load_from_file() -> anyhow::Result<Option<FileConfig>> {
    let config_path = env::var("FOLIO_SERVER_CONFIG").ok();
    let path = if let Some(path) = config_path {
        Some(path)
    } else if Path::new("server.toml").exists() {
        Some("server.toml".to_string())
    } else {
        None
    };

    let Some(path) = path else {
        return Ok(None);
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| anyhow::anyhow!("Failed to read config {}: {}", path, err))?;
    let parsed: FileConfig = toml::from_str(&contents)
        .map_err(|err| anyhow::anyhow!("Failed to parse config {}: {}", path, err))?;
    Ok(Some(parsed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_config_fills_in_defaults() {
        let parsed: FileConfig = toml::from_str("").unwrap();
        assert_eq!(parsed.server.host, "0.0.0.0");
        assert_eq!(parsed.server.port, 3000);
        assert_eq!(parsed.openai.model, "gpt-4o-mini");
        assert!(parsed.openai.api_key.is_none());
        assert!(parsed.persona.resume_path.is_none());
    }

    #[test]
    fn file_config_parses_all_sections() {
        let parsed: FileConfig = toml::from_str(
            r#"
            [server]
            host = "127.0.0.1"
            port = 8080

            [openai]
            api_key = "sk-test"
            model = "gpt-4o"

            [persona]
            resume_path = "custom/resume.md"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.server.host, "127.0.0.1");
        assert_eq!(parsed.server.port, 8080);
        assert_eq!(parsed.openai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(parsed.openai.model, "gpt-4o");
        assert_eq!(
            parsed.persona.resume_path,
            Some(PathBuf::from("custom/resume.md"))
        );
    }
}
