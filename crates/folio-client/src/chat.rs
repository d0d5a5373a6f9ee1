//! Chat request submission and response streaming.

use std::pin::Pin;

use bytes::Bytes;
use folio_relay::{ChatMessage, ChatRequest, ErrorBody, FragmentStream};
use futures::Stream;
use reqwest::Client;

use crate::error::ClientError;

type BodyStream = Pin<Box<dyn Stream<Item = Result<Bytes, reqwest::Error>> + Send>>;

/// Lazy fragment sequence over one chat response.
pub type ResponseStream = FragmentStream<BodyStream>;

/// HTTP client for the folio chat endpoint.
pub struct ChatClient {
    http: Client,
    base_url: String,
}

impl ChatClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            base_url: base_url.into(),
        }
    }

    /// POST the conversation and optional uploaded-file context.
    ///
    /// A non-success status is surfaced as [`ClientError::Api`] carrying the
    /// `details` string of the structured error body, with a generic message
    /// when the body is not the structured shape.
    pub async fn send_message(
        &self,
        messages: &[ChatMessage],
        context: Option<&str>,
    ) -> Result<reqwest::Response, ClientError> {
        let request = ChatRequest {
            messages: messages.to_vec(),
            context: context.map(str::to_string),
        };

        let response = self
            .http
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let details = match response.json::<ErrorBody>().await {
                Ok(body) => body.details.unwrap_or(body.error),
                Err(_) => "Failed to send message".to_string(),
            };
            return Err(ClientError::Api {
                status: status.as_u16(),
                details,
            });
        }

        Ok(response)
    }

    /// Adapt a streaming response into its fragment sequence.
    pub fn stream_response(response: reqwest::Response) -> Result<ResponseStream, ClientError> {
        let body: BodyStream = Box::pin(response.bytes_stream());
        Ok(FragmentStream::new(Some(body))?)
    }
}

#[cfg(test)]
mod tests {
    use futures::StreamExt;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::transcript::accumulate;

    #[tokio::test]
    async fn streams_a_chat_response_end_to_end() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"content\":\"Hello\"}\n\ndata: {\"content\":\" world\"}\n\ndata: [DONE]\n\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let response = client
            .send_message(&[ChatMessage::user("hi")], None)
            .await
            .expect("request should succeed");

        let fragments: Vec<_> = ChatClient::stream_response(response)
            .unwrap()
            .map(|fragment| fragment.unwrap())
            .collect()
            .await;
        assert_eq!(fragments, vec!["Hello", " world"]);
    }

    #[tokio::test]
    async fn surfaces_structured_error_details() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "error": "Failed to process chat request",
                "details": "provider returned 429: rate limited",
            })))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let err = client
            .send_message(&[ChatMessage::user("hi")], None)
            .await
            .expect_err("error status should fail");

        match err {
            ClientError::Api { status, details } => {
                assert_eq!(status, 500);
                assert_eq!(details, "provider returned 429: rate limited");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn falls_back_to_generic_message_on_unstructured_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let err = client
            .send_message(&[ChatMessage::user("hi")], None)
            .await
            .expect_err("error status should fail");

        match err {
            ClientError::Api { details, .. } => assert_eq!(details, "Failed to send message"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn accumulates_a_full_transcript_entry() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                "data: {\"content\":\"To\"}\n\ndata: {\"content\":\"gether\"}\n\ndata: [DONE]\n\n",
                "text/event-stream",
            ))
            .mount(&server)
            .await;

        let client = ChatClient::new(server.uri());
        let response = client
            .send_message(&[ChatMessage::user("hi")], Some("uploaded context"))
            .await
            .unwrap();

        let message = accumulate(ChatClient::stream_response(response).unwrap()).await;
        assert_eq!(message.content, "Together");
        assert_eq!(message.done, Some(true));
        assert!(message.error.is_none());
    }
}
