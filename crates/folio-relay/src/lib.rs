//! Wire protocol for the folio chat relay.
//!
//! The relay moves model output from the server to the UI as a line-oriented
//! `text/event-stream` body: one `data: {"content": ...}` event per text
//! fragment, terminated by a literal `data: [DONE]` sentinel. This crate
//! holds the framing shared by both sides, the incremental decoder, and the
//! chat data model carried over the HTTP boundary.

mod decode;
mod error;
mod frame;
mod models;

pub use decode::{FragmentStream, FrameDecoder};
pub use error::RelayError;
pub use frame::{DATA_PREFIX, DONE_MARKER, Frame};
pub use models::{ChatMessage, ChatRequest, ChatRole, ErrorBody, FileRef};
