//! Claude (Anthropic) model implementation.
//!
//! Claude receives system instructions through a dedicated `system` field rather
//! than inside the message list. Messages tagged `system` are pulled out of the
//! conversation before the request is built; everything else is sent as
//! `user`/`assistant` turns. Only the first text segment of the reply is read.

use async_trait::async_trait;
use reqwest::Client;
use rumen_abstraction::{
    ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage, ROLE_ASSISTANT,
    ROLE_USER,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Default Anthropic API endpoint.
pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Messages API version header value.
const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Used when the caller passes no parameters.
const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Claude model implementation.
#[derive(Debug, Clone)]
pub struct ClaudeModel {
    /// The model ID (e.g., "claude-sonnet-4-20250514").
    model_id: String,
    /// The API key for authentication.
    api_key: String,
    /// The base URL for the Claude API.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

impl ClaudeModel {
    /// Creates a new `ClaudeModel` with an explicit API key.
    #[must_use]
    pub fn with_api_key(model_id: String, api_key: String) -> Self {
        Self {
            model_id,
            api_key,
            base_url: DEFAULT_ANTHROPIC_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Points the model at a different endpoint (proxies, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Converts our ChatMessage to Claude API message format.
    fn to_claude_message(msg: &ChatMessage) -> ClaudeMessage {
        ClaudeMessage {
            role: if msg.role == ROLE_ASSISTANT { ROLE_ASSISTANT } else { ROLE_USER }.to_string(),
            content: msg.content.clone(),
        }
    }

    /// Extracts the system prompt from the chat history.
    ///
    /// Claude takes a single system prompt; the first `system` message wins.
    ///
    /// # Example
    /// ```
    /// use rumen_abstraction::ChatMessage;
    /// use rumen_models::ClaudeModel;
    /// let messages = vec![ChatMessage::system("You are helpful."), ChatMessage::user("Hello")];
    /// let system = ClaudeModel::extract_system_prompt(&messages);
    /// assert_eq!(system, Some("You are helpful.".to_string()));
    /// ```
    #[must_use]
    pub fn extract_system_prompt(messages: &[ChatMessage]) -> Option<String> {
        messages.iter().find(|msg| msg.is_system()).map(|msg| msg.content.clone())
    }

    /// Decides whether a non-success reply is a quota or rate-limit condition.
    fn is_quota_error(status: u16, error_text: &str) -> bool {
        if status == 402 {
            return true;
        }
        if status != 429 {
            return false;
        }

        let error_type = serde_json::from_str::<serde_json::Value>(error_text).ok().and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("type"))
                .or_else(|| json.get("type"))
                .and_then(|t| t.as_str())
                .map(str::to_string)
        });

        match error_type {
            Some(kind) => {
                matches!(kind.as_str(), "rate_limit_error" | "overloaded_error" | "insufficient_quota")
            }
            // 429 without a recognisable body is still a rate limit.
            None => true,
        }
    }
}

#[async_trait]
impl Model for ClaudeModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.model_id,
            prompt_len = prompt.len(),
            parameters = ?parameters,
            "ClaudeModel generating text"
        );

        let messages = vec![ChatMessage::user(prompt)];
        self.generate_chat_completion(&messages, parameters).await
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.model_id,
            message_count = messages.len(),
            parameters = ?parameters,
            "ClaudeModel generating chat completion"
        );

        let url = format!("{}/messages", self.base_url);

        let system = Self::extract_system_prompt(messages);
        let claude_messages: Vec<ClaudeMessage> = messages
            .iter()
            .filter(|msg| !msg.is_system())
            .map(Self::to_claude_message)
            .collect();

        let mut request_body = ClaudeRequest {
            model: self.model_id.clone(),
            messages: claude_messages,
            max_tokens: DEFAULT_MAX_TOKENS,
            system,
            temperature: None,
            top_p: None,
            stop_sequences: None,
        };

        if let Some(params) = parameters {
            request_body.temperature = params.temperature;
            request_body.top_p = params.top_p;
            if let Some(max_tokens) = params.max_tokens {
                request_body.max_tokens = max_tokens;
            }
            request_body.stop_sequences = params.stop_sequences;
        }

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Claude API");
                ModelError::RequestError(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                status = %status,
                error = %error_text,
                "Claude API returned error status"
            );

            if Self::is_quota_error(status.as_u16(), &error_text) {
                return Err(ModelError::QuotaExceeded {
                    provider: "anthropic".to_string(),
                    message: Some(error_text),
                });
            }

            return Err(ModelError::ModelResponseError(format!(
                "API error ({}): {}",
                status, error_text
            )));
        }

        let claude_response: ClaudeResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Claude API response");
            ModelError::SerializationError(format!("Failed to parse response: {}", e))
        })?;

        let content = claude_response
            .content
            .iter()
            .find(|c| c.content_type == "text")
            .and_then(|c| c.text.clone())
            .ok_or_else(|| {
                error!("No text content in Claude API response");
                ModelError::ModelResponseError("No text content in API response".to_string())
            })?;

        let usage = claude_response.usage.map(|u| ModelUsage {
            prompt_tokens: u.input_tokens,
            completion_tokens: u.output_tokens,
            total_tokens: u.input_tokens + u.output_tokens,
        });

        Ok(ModelResponse { content, model_id: Some(self.model_id.clone()), usage })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Claude API request/response structures

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    messages: Vec<ClaudeMessage>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ClaudeContent>,
    #[serde(default)]
    usage: Option<ClaudeUsage>,
}

#[derive(Debug, Deserialize)]
struct ClaudeContent {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClaudeUsage {
    input_tokens: u32,
    output_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn model_for(server: &mockito::ServerGuard) -> ClaudeModel {
        ClaudeModel::with_api_key("claude-sonnet-4-20250514".to_string(), "test-key".to_string())
            .with_base_url(format!("{}/v1", server.url()))
    }

    #[test]
    fn test_claude_model_creation_with_api_key() {
        let model =
            ClaudeModel::with_api_key("claude-sonnet-4-20250514".to_string(), "test-key".to_string());
        assert_eq!(model.model_id(), "claude-sonnet-4-20250514");
    }

    #[test]
    fn test_system_prompt_extraction() {
        let messages = vec![ChatMessage::system("You are helpful"), ChatMessage::user("Hello")];
        assert_eq!(ClaudeModel::extract_system_prompt(&messages), Some("You are helpful".to_string()));
        assert_eq!(ClaudeModel::extract_system_prompt(&messages[1..]), None);
    }

    #[test]
    fn test_quota_error_classification() {
        assert!(ClaudeModel::is_quota_error(402, ""));
        assert!(ClaudeModel::is_quota_error(
            429,
            r#"{"error":{"type":"rate_limit_error","message":"Rate limit exceeded"}}"#
        ));
        assert!(ClaudeModel::is_quota_error(429, r#"{"type":"overloaded_error"}"#));
        assert!(ClaudeModel::is_quota_error(429, "not json"));
        assert!(!ClaudeModel::is_quota_error(429, r#"{"error":{"type":"invalid_request_error"}}"#));
        assert!(!ClaudeModel::is_quota_error(500, "quota"));
    }

    #[tokio::test]
    async fn test_system_instruction_sent_in_dedicated_field() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .match_header("x-api-key", "test-key")
            .match_header("anthropic-version", "2023-06-01")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "model": "claude-sonnet-4-20250514",
                "max_tokens": 2000,
                "system": "You are an expert.",
                "messages": [{"role": "user", "content": "Which pipeline?"}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "content": [
                        {"type": "text", "text": "Use DADA2."},
                        {"type": "text", "text": "ignored"}
                    ],
                    "usage": {"input_tokens": 12, "output_tokens": 3}
                }"#,
            )
            .create_async()
            .await;

        let model = model_for(&server);
        let messages = vec![ChatMessage::system("You are an expert."), ChatMessage::user("Which pipeline?")];
        let response = model
            .generate_chat_completion(&messages, Some(ModelParameters::with_max_tokens(2000)))
            .await
            .unwrap();

        assert_eq!(response.content, "Use DADA2.");
        assert_eq!(response.model_id.as_deref(), Some("claude-sonnet-4-20250514"));
        let usage = response.usage.unwrap();
        assert_eq!(usage.total_tokens, 15);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_rate_limit_maps_to_quota_exceeded() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/messages")
            .with_status(429)
            .with_body(r#"{"error":{"type":"rate_limit_error","message":"slow down"}}"#)
            .create_async()
            .await;

        let model = model_for(&server);
        let err = model.generate_text("hi", None).await.unwrap_err();
        match err {
            ModelError::QuotaExceeded { provider, message } => {
                assert_eq!(provider, "anthropic");
                assert!(message.unwrap().contains("slow down"));
            }
            other => panic!("Expected QuotaExceeded, got {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_auth_failure_is_response_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(401)
            .with_body(r#"{"error":{"type":"authentication_error","message":"invalid x-api-key"}}"#)
            .create_async()
            .await;

        let model = model_for(&server);
        let err = model.generate_text("hi", None).await.unwrap_err();
        assert!(matches!(err, ModelError::ModelResponseError(ref msg) if msg.contains("401")));
    }

    #[tokio::test]
    async fn test_reply_without_text_segment_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/messages")
            .with_status(200)
            .with_body(r#"{"content": [{"type": "tool_use"}]}"#)
            .create_async()
            .await;

        let model = model_for(&server);
        let err = model.generate_text("hi", None).await.unwrap_err();
        assert!(matches!(err, ModelError::ModelResponseError(_)));
    }
}
