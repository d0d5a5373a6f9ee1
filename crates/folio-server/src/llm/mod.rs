//! LLM module - provider clients behind a common streaming trait

mod client;
mod mock;
mod openai;

pub use client::{ChatDelta, DeltaStream, LlmClient, ProviderError};
pub use mock::{MockLlmClient, MockStep};
pub use openai::OpenAIClient;
