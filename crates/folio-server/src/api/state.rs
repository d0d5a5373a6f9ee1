use std::sync::Arc;

use crate::llm::LlmClient;
use crate::persona::Persona;

/// Application state shared across all API handlers.
pub struct AppContext {
    pub llm: Arc<dyn LlmClient>,
    pub persona: Persona,
}

pub type AppState = Arc<AppContext>;
