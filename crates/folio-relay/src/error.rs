//! Relay error types

use thiserror::Error;

/// Errors that escape the decoder.
///
/// Frame-level problems (a line without the `data: ` prefix, a payload that
/// is not valid JSON) never appear here; they are recovered inside the
/// decoder and the affected line is skipped.
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("no response body")]
    MissingBody,

    #[error("stream error: {0}")]
    Transport(String),
}
