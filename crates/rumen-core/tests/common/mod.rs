//! Shared test utilities for Rumen Core integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use rumen_abstraction::{ChatMessage, Model, ModelError, ModelParameters, ModelResponse};
use rumen_core::{StudyContext, TaskRouter};
use std::sync::{Arc, Mutex};

/// How a recorded request reached the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallKind {
    Text,
    Chat,
}

/// One request seen by a [`RecordingModel`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub kind: CallKind,
    pub messages: Vec<ChatMessage>,
    pub parameters: Option<ModelParameters>,
}

impl RecordedCall {
    /// Concatenated content of the non-system messages.
    pub fn user_text(&self) -> String {
        self.messages.iter().filter(|m| !m.is_system()).map(|m| m.content.as_str()).collect()
    }

    /// System instruction, if one was sent.
    pub fn system(&self) -> Option<&str> {
        self.messages.iter().find(|m| m.is_system()).map(|m| m.content.as_str())
    }
}

/// A model that records every request and answers with a fixed reply or error.
pub struct RecordingModel {
    id: String,
    reply: Result<String, ModelError>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingModel {
    pub fn new(id: &str, reply: &str) -> Arc<Self> {
        Arc::new(Self { id: id.to_string(), reply: Ok(reply.to_string()), calls: Mutex::new(Vec::new()) })
    }

    pub fn failing(id: &str, error: ModelError) -> Arc<Self> {
        Arc::new(Self { id: id.to_string(), reply: Err(error), calls: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(
        &self,
        kind: CallKind,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        self.calls.lock().unwrap().push(RecordedCall { kind, messages: messages.to_vec(), parameters });
        self.reply.clone().map(|content| ModelResponse { content, model_id: Some(self.id.clone()), usage: None })
    }
}

#[async_trait]
impl Model for RecordingModel {
    async fn generate_text(
        &self,
        prompt: &str,
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        self.record(CallKind::Text, &[ChatMessage::user(prompt)], parameters)
    }

    async fn generate_chat_completion(
        &self,
        messages: &[ChatMessage],
        parameters: Option<ModelParameters>,
    ) -> Result<ModelResponse, ModelError> {
        self.record(CallKind::Chat, messages, parameters)
    }

    fn model_id(&self) -> &str {
        &self.id
    }
}

/// Router over two recording backends with the default study framing.
pub fn recording_router() -> (TaskRouter, Arc<RecordingModel>, Arc<RecordingModel>) {
    let claude = RecordingModel::new("claude-test", "reply from A");
    let gemini = RecordingModel::new("gemini-test", "reply from B");
    let router = TaskRouter::new(claude.clone(), gemini.clone(), StudyContext::default(), 2000);
    (router, claude, gemini)
}
