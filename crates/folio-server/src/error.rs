//! API error responses

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use folio_relay::ErrorBody;
use thiserror::Error;

use crate::llm::ProviderError;

/// Failure before the event stream has started. Rendered as a structured
/// JSON body rather than a stream frame.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("chat request failed: {0}")]
    Chat(#[from] ProviderError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let ApiError::Chat(err) = &self;
        tracing::error!(error = %err, "chat request failed");
        let body = ErrorBody {
            error: "Failed to process chat request".to_string(),
            details: Some(err.to_string()),
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
