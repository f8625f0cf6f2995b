//! Google Gemini model implementation.
//!
//! The router only ever hands Gemini one combined prompt, but system messages are
//! still honoured through `systemInstruction` so the type behaves like any other
//! `Model`.

use async_trait::async_trait;
use reqwest::Client;
use rumen_abstraction::{
    ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage, ROLE_ASSISTANT,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

/// Default Gemini API endpoint.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Generation method a model must support to be usable here.
pub const GENERATE_CONTENT_METHOD: &str = "generateContent";

/// Google Gemini model implementation.
#[derive(Debug, Clone)]
pub struct GeminiModel {
    /// The model ID (e.g., "gemini-2.5-flash").
    model_id: String,
    /// The API key for authentication.
    api_key: String,
    /// The base URL for the Gemini API.
    base_url: String,
    /// HTTP client for making requests.
    client: Client,
}

/// A model entry returned by the Gemini model listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiModelInfo {
    /// Resource name, e.g. `models/gemini-2.5-flash`.
    pub name: String,
    /// Human readable name, when provided.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Generation methods the model accepts.
    #[serde(default)]
    pub supported_generation_methods: Vec<String>,
}

impl GeminiModelInfo {
    /// True when the model can serve `generateContent` requests.
    #[must_use]
    pub fn supports_generate_content(&self) -> bool {
        self.supported_generation_methods.iter().any(|m| m == GENERATE_CONTENT_METHOD)
    }
}

impl GeminiModel {
    /// Creates a new `GeminiModel` with an explicit API key.
    #[must_use]
    pub fn with_api_key(model_id: String, api_key: String) -> Self {
        Self {
            model_id,
            api_key,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            client: Client::new(),
        }
    }

    /// Points the model at a different endpoint (proxies, test servers).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Converts our ChatMessage role to Gemini API role format.
    fn role_to_gemini(role: &str) -> String {
        if role == ROLE_ASSISTANT { "model".to_string() } else { "user".to_string() }
    }

    /// Extracts system messages from the chat history and joins them with a blank line.
    fn extract_system_messages(messages: &[ChatMessage]) -> Option<String> {
        let system_messages: Vec<&str> =
            messages.iter().filter(|msg| msg.is_system()).map(|msg| msg.content.as_str()).collect();

        if system_messages.is_empty() { None } else { Some(system_messages.join("\n\n")) }
    }

    fn map_error_status(status: reqwest::StatusCode, error_text: String) -> ModelError {
        let quota_hint = error_text.to_uppercase().contains("RESOURCE_EXHAUSTED")
            || error_text.to_lowercase().contains("quota")
            || error_text.to_lowercase().contains("rate limit");

        if matches!(status.as_u16(), 402 | 429) || (quota_hint && status.is_client_error()) {
            return ModelError::QuotaExceeded {
                provider: "gemini".to_string(),
                message: Some(error_text),
            };
        }

        ModelError::ModelResponseError(format!("API error ({}): {}", status, error_text))
    }

    /// Lists the models visible to this API key.
    ///
    /// # Errors
    /// Returns a `ModelError` if the request fails or the reply cannot be parsed.
    pub async fn list_models(&self) -> Result<Vec<GeminiModelInfo>, ModelError> {
        let url = format!("{}/models", self.base_url);
        debug!(url = %url, "Listing Gemini models");

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str()), ("pageSize", "1000")])
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to list Gemini models");
                ModelError::RequestError(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(status = %status, error = %error_text, "Gemini model listing failed");
            return Err(Self::map_error_status(status, error_text));
        }

        let listing: GeminiModelList = response.json().await.map_err(|e| {
            ModelError::SerializationError(format!("Failed to parse model list: {}", e))
        })?;
        Ok(listing.models)
    }
}

#[async_trait]
impl Model for GeminiModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        debug!(
            model_id = %self.model_id,
            prompt_len = prompt.len(),
            parameters = ?parameters,
            "GeminiModel generating text"
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
            "GeminiModel generating chat completion"
        );

        let url = format!("{}/models/{}:generateContent", self.base_url, self.model_id);

        let system_instruction = Self::extract_system_messages(messages);
        let contents: Vec<GeminiContent> = messages
            .iter()
            .filter(|msg| !msg.is_system())
            .map(|msg| GeminiContent {
                role: Self::role_to_gemini(&msg.role),
                parts: vec![GeminiPart { text: msg.content.clone() }],
            })
            .collect();

        let request_body = GeminiRequest {
            contents,
            generation_config: parameters.map(|params| GeminiGenerationConfig {
                temperature: params.temperature,
                top_p: params.top_p,
                max_output_tokens: params.max_tokens,
                stop_sequences: params.stop_sequences,
            }),
            system_instruction: system_instruction
                .map(|text| GeminiSystemInstruction { parts: vec![GeminiPart { text }] }),
        };

        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request_body)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to send request to Gemini API");
                ModelError::RequestError(format!("Network error: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            error!(
                status = %status,
                error = %error_text,
                "Gemini API returned error status"
            );
            return Err(Self::map_error_status(status, error_text));
        }

        let gemini_response: GeminiResponse = response.json().await.map_err(|e| {
            error!(error = %e, "Failed to parse Gemini API response");
            ModelError::SerializationError(format!("Failed to parse response: {}", e))
        })?;

        let content = gemini_response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| {
                content.parts.iter().map(|p| p.text.as_str()).collect::<Vec<_>>().concat()
            })
            .filter(|text| !text.is_empty())
            .ok_or_else(|| {
                error!("No content in Gemini API response");
                ModelError::ModelResponseError("No content in API response".to_string())
            })?;

        let usage = gemini_response.usage_metadata.map(|meta| ModelUsage {
            prompt_tokens: meta.prompt_token_count.unwrap_or(0),
            completion_tokens: meta.candidates_token_count.unwrap_or(0),
            total_tokens: meta.total_token_count.unwrap_or(0),
        });

        Ok(ModelResponse { content, model_id: Some(self.model_id.clone()), usage })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// Gemini API request/response structures

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
    total_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiModelList {
    #[serde(default)]
    models: Vec<GeminiModelInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn model_for(server: &mockito::ServerGuard) -> GeminiModel {
        GeminiModel::with_api_key("gemini-2.5-flash".to_string(), "g-key".to_string())
            .with_base_url(format!("{}/v1beta", server.url()))
    }

    #[test]
    fn test_role_mapping() {
        assert_eq!(GeminiModel::role_to_gemini("assistant"), "model");
        assert_eq!(GeminiModel::role_to_gemini("user"), "user");
    }

    #[test]
    fn test_system_messages_are_joined() {
        let messages = vec![
            ChatMessage::system("First."),
            ChatMessage::system("Second."),
            ChatMessage::user("Hi"),
        ];
        assert_eq!(
            GeminiModel::extract_system_messages(&messages),
            Some("First.\n\nSecond.".to_string())
        );
        assert_eq!(GeminiModel::extract_system_messages(&messages[2..]), None);
    }

    #[tokio::test]
    async fn test_single_prompt_without_system_instruction() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::UrlEncoded("key".into(), "g-key".into()))
            .match_body(Matcher::Json(serde_json::json!({
                "contents": [{"role": "user", "parts": [{"text": "role of X"}]}]
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "candidates": [{"content": {"role": "model", "parts": [{"text": "X ferments fibre."}]}}],
                    "usageMetadata": {"promptTokenCount": 4, "candidatesTokenCount": 3, "totalTokenCount": 7}
                }"#,
            )
            .create_async()
            .await;

        let model = model_for(&server);
        let response = model.generate_text("role of X", None).await.unwrap();

        assert_eq!(response.content, "X ferments fibre.");
        assert_eq!(response.usage.unwrap().total_tokens, 7);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_resource_exhausted_maps_to_quota() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body(r#"{"error":{"status":"RESOURCE_EXHAUSTED"}}"#)
            .create_async()
            .await;

        let err = model_for(&server).generate_text("hi", None).await.unwrap_err();
        assert!(matches!(err, ModelError::QuotaExceeded { ref provider, .. } if provider == "gemini"));
    }

    #[tokio::test]
    async fn test_empty_candidates_is_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1beta/models/gemini-2.5-flash:generateContent")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;

        let err = model_for(&server).generate_text("hi", None).await.unwrap_err();
        assert!(matches!(err, ModelError::ModelResponseError(_)));
    }

    #[tokio::test]
    async fn test_list_models_filters_by_method() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/v1beta/models")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                r#"{"models": [
                    {"name": "models/gemini-2.5-flash", "supportedGenerationMethods": ["generateContent", "countTokens"]},
                    {"name": "models/text-embedding-004", "supportedGenerationMethods": ["embedContent"]}
                ]}"#,
            )
            .create_async()
            .await;

        let models = model_for(&server).list_models().await.unwrap();
        let usable: Vec<_> =
            models.iter().filter(|m| m.supports_generate_content()).map(|m| m.name.as_str()).collect();
        assert_eq!(models.len(), 2);
        assert_eq!(usable, vec!["models/gemini-2.5-flash"]);
    }
}
