//! Consumer side of the folio chat relay.
//!
//! [`ChatClient`] submits a conversation to the server and hands back the
//! streaming response; [`Transcript`] accumulates the decoded fragments
//! into the assistant's transcript entry.

mod chat;
mod error;
mod transcript;

pub use chat::{ChatClient, ResponseStream};
pub use error::ClientError;
pub use transcript::{Transcript, accumulate};
