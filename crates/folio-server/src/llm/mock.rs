//! Deterministic mock LLM client for handler and integration tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_stream::stream;
use async_trait::async_trait;
use folio_relay::ChatMessage;
use tokio::sync::Mutex;

use crate::llm::client::{ChatDelta, DeltaStream, LlmClient, ProviderError};

/// Scripted step for one mock completion.
#[derive(Debug, Clone)]
pub enum MockStep {
    /// Yield one text fragment.
    Fragment(String),
    /// Fail mid-stream after the fragments queued before this step.
    StreamError(String),
    /// Refuse the request up front, before any fragment.
    Refuse(String),
}

impl MockStep {
    pub fn fragment(content: impl Into<String>) -> Self {
        MockStep::Fragment(content.into())
    }

    pub fn stream_error(message: impl Into<String>) -> Self {
        MockStep::StreamError(message.into())
    }

    pub fn refuse(message: impl Into<String>) -> Self {
        MockStep::Refuse(message.into())
    }
}

/// A deterministic mock LLM client driven by scripted steps.
///
/// Each call to `complete_stream` drains the whole script and records the
/// conversation it was given.
#[derive(Debug, Clone, Default)]
pub struct MockLlmClient {
    model: String,
    script: Arc<Mutex<VecDeque<MockStep>>>,
    requests: Arc<Mutex<Vec<Vec<ChatMessage>>>>,
}

impl MockLlmClient {
    pub fn from_steps(model: impl Into<String>, steps: Vec<MockStep>) -> Self {
        Self {
            model: model.into(),
            script: Arc::new(Mutex::new(VecDeque::from(steps))),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn push_step(&self, step: MockStep) {
        self.script.lock().await.push_back(step);
    }

    /// Conversations received so far, in call order.
    pub async fn requests(&self) -> Vec<Vec<ChatMessage>> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn complete_stream(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<DeltaStream, ProviderError> {
        self.requests.lock().await.push(messages);

        let steps: Vec<MockStep> = self.script.lock().await.drain(..).collect();
        if let Some(MockStep::Refuse(message)) = steps.first() {
            return Err(ProviderError::Api {
                status: 500,
                message: message.clone(),
            });
        }

        Ok(Box::pin(stream! {
            for step in steps {
                match step {
                    MockStep::Fragment(content) => yield Ok(ChatDelta::text(content)),
                    MockStep::StreamError(message) => {
                        yield Err(ProviderError::Stream(message));
                        return;
                    }
                    MockStep::Refuse(message) => {
                        yield Err(ProviderError::Stream(message));
                        return;
                    }
                }
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use super::*;

    #[tokio::test]
    async fn mock_client_streams_scripted_fragments() {
        let client = MockLlmClient::from_steps(
            "mock-model",
            vec![MockStep::fragment("one"), MockStep::fragment("two")],
        );

        let deltas: Vec<_> = client
            .complete_stream(vec![ChatMessage::user("hi")])
            .await
            .expect("mock stream should start")
            .map(|d| d.unwrap().content)
            .collect()
            .await;

        assert_eq!(deltas, vec!["one", "two"]);
        assert_eq!(client.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn mock_client_refuses_up_front() {
        let client =
            MockLlmClient::from_steps("mock-model", vec![MockStep::refuse("quota exceeded")]);

        let err = client
            .complete_stream(vec![ChatMessage::user("hi")])
            .await
            .err()
            .expect("refusal should surface before streaming");
        assert!(matches!(err, ProviderError::Api { status: 500, .. }));
    }

    #[tokio::test]
    async fn mock_client_fails_mid_stream() {
        let client = MockLlmClient::from_steps(
            "mock-model",
            vec![
                MockStep::fragment("before"),
                MockStep::stream_error("connection lost"),
            ],
        );

        let mut stream = client
            .complete_stream(vec![ChatMessage::user("hi")])
            .await
            .unwrap();

        assert_eq!(stream.next().await.unwrap().unwrap().content, "before");
        assert!(matches!(
            stream.next().await.unwrap(),
            Err(ProviderError::Stream(_))
        ));
        assert!(stream.next().await.is_none());
    }
}
