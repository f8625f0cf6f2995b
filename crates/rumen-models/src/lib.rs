//! Model implementations for Rumen.
//!
//! This crate provides concrete implementations of the `Model` trait.
//!
//! # Supported Providers
//!
//! - **Mock**: Echoes what it receives; used by tests and `--offline` runs
//! - **Claude**: Anthropic's Claude models (API key required)
//! - **Gemini**: Google's Gemini models (API key required)

pub mod claude;
pub mod factory;
pub mod gemini;

use async_trait::async_trait;
use rumen_abstraction::{ChatMessage, Model, ModelError, ModelParameters, ModelResponse, ModelUsage};
use std::fmt::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::debug;

pub use claude::ClaudeModel;
pub use factory::{ModelConfig, ModelFactory, ModelType};
pub use gemini::{GeminiModel, GeminiModelInfo};

/// A mock implementation of the `Model` trait.
///
/// The reply lists every received message as `[role] content`, one per line, so
/// callers can see exactly what would have been sent to a hosted backend.
#[derive(Debug, Default)]
pub struct MockModel {
    id: String,
    calls: AtomicUsize,
}

impl MockModel {
    /// Creates a new `MockModel` with the given ID.
    #[must_use]
    pub const fn new(id: String) -> Self {
        Self { id, calls: AtomicUsize::new(0) }
    }

    /// Number of generation requests served so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Model for MockModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        self.generate_chat_completion(&[ChatMessage::user(prompt)], parameters).await
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        debug!(
            model_id = %self.id,
            message_count = messages.len(),
            parameters = ?parameters,
            "MockModel generating chat completion"
        );

        let mut content = String::new();
        for message in messages {
            let _ = writeln!(content, "[{}] {}", message.role, message.content);
        }

        let prompt_tokens = messages.iter().map(|m| count_tokens(&m.content)).sum::<u32>();
        let completion_tokens = count_tokens(&content);

        Ok(ModelResponse {
            content,
            model_id: Some(self.id.clone()),
            usage: Some(ModelUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            }),
        })
    }

    fn model_id(&self) -> &str {
        &self.id
    }
}

/// Count tokens in a string (simplified: word count).
#[allow(clippy::cast_possible_truncation)]
fn count_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_echoes_roles_and_counts_calls() {
        let model = MockModel::new("echo".to_string());
        let messages = vec![ChatMessage::system("be terse"), ChatMessage::user("hello there")];

        let response = model.generate_chat_completion(&messages, None).await.unwrap();
        assert_eq!(response.content, "[system] be terse\n[user] hello there\n");
        assert_eq!(response.model_id.as_deref(), Some("echo"));
        assert_eq!(response.usage.unwrap().prompt_tokens, 4);

        model.generate_text("again", None).await.unwrap();
        assert_eq!(model.call_count(), 2);
    }
}
