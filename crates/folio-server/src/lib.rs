//! folio server: relays a portfolio-site conversation to a hosted
//! chat-completion model and re-frames its incremental output as
//! server-sent events.

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod persona;
