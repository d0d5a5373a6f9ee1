//! Client error types

use folio_relay::RelayError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("server returned {status}: {details}")]
    Api { status: u16, details: String },

    #[error(transparent)]
    Relay(#[from] RelayError),
}
