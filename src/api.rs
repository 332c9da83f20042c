use std::time::Instant;

use log::{debug, error};
use serde::{Deserialize, Serialize};

use crate::errors::{ParleyError, ParleyResult};
use crate::logging::log_api_call;
use crate::session::Session;

/// Body of the POST to the chat endpoint. `session_id` is left out of the
/// JSON entirely until the server has issued a token.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ChatRequest {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Body of a successful reply. `reply` is required; a 2xx body without it
/// fails deserialization and is reported as a malformed response.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
    pub session_id: Option<String>,
}

/// Outbound request dispatcher for the chat backend.
#[derive(Debug, Clone)]
pub struct ChatClient {
    http: reqwest::Client,
    endpoint: String,
}

impl ChatClient {
    /// Builds a client for a fixed endpoint. No request timeout is set, so
    /// a hung server keeps the caller waiting.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends one user message, attaching the session token if one is held.
    ///
    /// Any non-2xx status maps to `ParleyError::Server`; a body that is not
    /// the expected JSON shape maps to `ParleyError::MalformedResponse`.
    pub async fn send(&self, message: &str, session: &Session) -> ParleyResult<ChatResponse> {
        let request = ChatRequest {
            message: message.to_string(),
            session_id: session.token().map(str::to_string),
        };

        let started = Instant::now();
        let response = self
            .http
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        log_api_call(&self.endpoint, status.as_u16(), started.elapsed().as_millis());

        if !status.is_success() {
            error!("Chat endpoint returned {}", status);
            return Err(ParleyError::server_error(status.as_u16()));
        }

        let body = response.text().await?;
        let parsed: ChatResponse = serde_json::from_str(&body).map_err(|e| {
            error!("Failed to parse chat response: {}", e);
            ParleyError::malformed_response(e.to_string())
        })?;

        debug!("Reply received ({} chars)", parsed.reply.len());
        Ok(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn session_with(token: &str) -> Session {
        let mut session = Session::new();
        session.absorb(Some(token.to_string()));
        session
    }

    #[test]
    fn request_without_token_serializes_message_only() {
        let request = ChatRequest {
            message: "Hello".to_string(),
            session_id: None,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"message": "Hello"})
        );
    }

    #[test]
    fn request_with_token_carries_it_verbatim() {
        let request = ChatRequest {
            message: "Again".to_string(),
            session_id: Some("abc123".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({"message": "Again", "session_id": "abc123"})
        );
    }

    #[tokio::test]
    async fn first_send_posts_json_without_session_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({"message": "Hello"})))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"reply": "Hi!", "session_id": "abc123"})),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/chat", server.uri()));
        let response = client.send("Hello", &Session::new()).await.unwrap();

        assert_eq!(response.reply, "Hi!");
        assert_eq!(response.session_id.as_deref(), Some("abc123"));
    }

    #[tokio::test]
    async fn held_token_is_attached_to_the_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .and(body_json(json!({"message": "Again", "session_id": "abc123"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Sure."})))
            .expect(1)
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/chat", server.uri()));
        let response = client.send("Again", &session_with("abc123")).await.unwrap();

        assert_eq!(response.reply, "Sure.");
        assert!(response.session_id.is_none());
    }

    #[tokio::test]
    async fn non_success_status_maps_to_server_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/chat", server.uri()));
        let err = client.send("Hello", &Session::new()).await.unwrap_err();

        assert!(matches!(err, ParleyError::Server { status: 500 }));
    }

    #[tokio::test]
    async fn missing_reply_field_is_a_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"session_id": "zzz"})))
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/chat", server.uri()));
        let err = client.send("Hello", &Session::new()).await.unwrap_err();

        assert!(matches!(err, ParleyError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn unparseable_body_is_a_malformed_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = ChatClient::new(format!("{}/chat", server.uri()));
        let err = client.send("Hello", &Session::new()).await.unwrap_err();

        assert!(matches!(err, ParleyError::MalformedResponse { .. }));
    }
}
