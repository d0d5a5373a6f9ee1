//! Event framing
//!
//! One frame is one newline-delimited wire unit: the `data: ` prefix
//! followed by either a JSON object carrying a text fragment or the literal
//! terminal marker. Events are separated by a blank line, so a full frame on
//! the wire is `data: <payload>\n\n`.

use serde::{Deserialize, Serialize};

/// Payload prefix, exactly six characters.
pub const DATA_PREFIX: &str = "data: ";

/// Terminal payload signaling that no further fragments will be sent.
pub const DONE_MARKER: &str = "[DONE]";

#[derive(Serialize, Deserialize)]
struct FramePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
}

/// A single wire unit of the relay protocol.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// A fragment of model output. `None` when the payload parsed but
    /// carried no `content` field.
    Content(Option<String>),
    /// The terminal marker.
    Done,
}

impl Frame {
    /// Build a content frame from a text fragment.
    pub fn content(text: impl Into<String>) -> Self {
        Frame::Content(Some(text.into()))
    }

    /// Serialize this frame as one complete wire event, including the blank
    /// separator line.
    pub fn encode(&self) -> String {
        match self {
            Frame::Content(content) => {
                let payload = FramePayload {
                    content: content.clone(),
                };
                // FramePayload cannot fail to serialize
                let json = serde_json::to_string(&payload).unwrap_or_else(|_| "{}".to_string());
                format!("{DATA_PREFIX}{json}\n\n")
            }
            Frame::Done => format!("{DATA_PREFIX}{DONE_MARKER}\n\n"),
        }
    }

    /// Parse one line of the stream.
    ///
    /// Returns `None` both for lines without the payload prefix and for
    /// prefixed lines whose payload is not valid JSON; callers skip those
    /// lines and continue.
    pub fn parse_line(line: &str) -> Option<Frame> {
        let data = line.strip_prefix(DATA_PREFIX)?;
        if data.trim() == DONE_MARKER {
            return Some(Frame::Done);
        }
        match serde_json::from_str::<FramePayload>(data) {
            Ok(payload) => Some(Frame::Content(payload.content)),
            Err(_) => None,
        }
    }
}
