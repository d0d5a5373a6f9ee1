//! LLM client trait and types

use std::pin::Pin;

use async_trait::async_trait;
use folio_relay::ChatMessage;
use futures::Stream;
use thiserror::Error;

/// One incremental piece of generated text.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatDelta {
    pub content: String,
}

impl ChatDelta {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Boxed stream of incremental deltas.
pub type DeltaStream = Pin<Box<dyn Stream<Item = Result<ChatDelta, ProviderError>> + Send>>;

/// Provider boundary error types
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("provider stream error: {0}")]
    Stream(String),
}

/// Hosted chat-completion provider configured for incremental delivery.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Get provider name
    fn provider(&self) -> &str;

    /// Get model name
    fn model(&self) -> &str;

    /// Submit the full ordered conversation and return the delta stream.
    ///
    /// Failures before any delta is produced (connection refused, rejected
    /// request) surface as the outer `Err`; failures after streaming has
    /// begun arrive as stream items.
    async fn complete_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<DeltaStream, ProviderError>;
}
