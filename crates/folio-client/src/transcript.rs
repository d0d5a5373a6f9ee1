//! Transcript assembly
//!
//! Concatenates decoded fragments in arrival order into the assistant's
//! transcript entry and marks it done once the sequence ends, normally or
//! via the terminal marker. A stream error is recorded on the entry instead
//! of being propagated; the UI presents it inline.

use folio_relay::{ChatMessage, RelayError};
use futures::{Stream, StreamExt, pin_mut};

/// An assistant transcript entry being assembled from a fragment stream.
#[derive(Debug)]
pub struct Transcript {
    message: ChatMessage,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::start()
    }
}

impl Transcript {
    pub fn start() -> Self {
        let mut message = ChatMessage::assistant("");
        message.done = Some(false);
        Self { message }
    }

    pub fn push_fragment(&mut self, fragment: &str) {
        self.message.content.push_str(fragment);
    }

    pub fn content(&self) -> &str {
        &self.message.content
    }

    /// Mark the entry complete and take it.
    pub fn finish(mut self) -> ChatMessage {
        self.message.done = Some(true);
        self.message
    }

    /// Record a failure on the entry and take it.
    pub fn fail(mut self, error: impl Into<String>) -> ChatMessage {
        self.message.error = Some(error.into());
        self.message.done = Some(true);
        self.message
    }
}

/// Drive a fragment stream to completion and return the finished entry.
pub async fn accumulate<S>(stream: S) -> ChatMessage
where
    S: Stream<Item = Result<String, RelayError>>,
{
    pin_mut!(stream);
    let mut transcript = Transcript::start();
    while let Some(item) = stream.next().await {
        match item {
            Ok(fragment) => transcript.push_fragment(&fragment),
            Err(err) => {
                tracing::warn!(error = %err, "chat stream failed");
                return transcript.fail(err.to_string());
            }
        }
    }
    transcript.finish()
}

#[cfg(test)]
mod tests {
    use futures::stream;

    use super::*;

    #[tokio::test]
    async fn concatenates_fragments_in_arrival_order() {
        let fragments = stream::iter(vec![
            Ok("Hel".to_string()),
            Ok("lo ".to_string()),
            Ok("there".to_string()),
        ]);
        let message = accumulate(fragments).await;
        assert_eq!(message.content, "Hello there");
        assert_eq!(message.done, Some(true));
        assert!(message.error.is_none());
    }

    #[tokio::test]
    async fn empty_stream_finishes_with_empty_content() {
        let fragments = stream::iter(Vec::<Result<String, RelayError>>::new());
        let message = accumulate(fragments).await;
        assert_eq!(message.content, "");
        assert_eq!(message.done, Some(true));
    }

    #[tokio::test]
    async fn stream_error_is_recorded_on_the_entry() {
        let fragments = stream::iter(vec![
            Ok("partial".to_string()),
            Err(RelayError::Transport("connection reset".to_string())),
        ]);
        let message = accumulate(fragments).await;
        assert_eq!(message.content, "partial");
        assert_eq!(message.done, Some(true));
        assert!(message.error.unwrap().contains("connection reset"));
    }
}
