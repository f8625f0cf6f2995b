//! Model factory for creating model instances from configuration.
//!
//! API keys are never read from the environment here; callers resolve them from a
//! loaded credential set and pass them in explicitly.

use crate::{ClaudeModel, GeminiModel, MockModel};
use rumen_abstraction::{Model, ModelError};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error};

/// Model type enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// Echoing model for tests and offline runs.
    Mock,
    /// Anthropic Claude model.
    Claude,
    /// Google Gemini model.
    Gemini,
}

impl ModelType {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mock => "mock",
            Self::Claude => "claude",
            Self::Gemini => "gemini",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "mock" => Ok(Self::Mock),
            "claude" | "anthropic" => Ok(Self::Claude),
            "gemini" | "google" => Ok(Self::Gemini),
            _ => Err(()),
        }
    }
}

/// Model configuration.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// The type of model to create.
    pub model_type: ModelType,
    /// The model ID (e.g., "gemini-2.5-flash").
    pub model_id: String,
    /// API key; required for every hosted provider.
    pub api_key: Option<String>,
    /// Optional endpoint override.
    pub base_url: Option<String>,
}

impl ModelConfig {
    /// Creates a new `ModelConfig` with the given type and model ID.
    #[must_use]
    pub fn new(model_type: ModelType, model_id: String) -> Self {
        Self { model_type, model_id, api_key: None, base_url: None }
    }

    /// Sets the API key for this configuration.
    #[must_use]
    pub fn with_api_key(mut self, api_key: String) -> Self {
        self.api_key = Some(api_key);
        self
    }

    /// Sets an endpoint override for this configuration.
    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }
}

/// Factory for creating model instances.
pub struct ModelFactory;

impl ModelFactory {
    /// Creates a model instance from the given configuration.
    ///
    /// # Errors
    /// Returns `ModelError::UnsupportedModelProvider` if a hosted provider has no API key.
    pub fn create(config: ModelConfig) -> Result<Arc<dyn Model>, ModelError> {
        debug!(
            model_type = %config.model_type,
            model_id = %config.model_id,
            "Creating model instance"
        );

        match config.model_type {
            ModelType::Mock => Ok(Arc::new(MockModel::new(config.model_id))),
            ModelType::Claude => {
                let api_key = Self::require_key(&config)?;
                let mut model = ClaudeModel::with_api_key(config.model_id, api_key);
                if let Some(base_url) = config.base_url {
                    model = model.with_base_url(base_url);
                }
                Ok(Arc::new(model))
            }
            ModelType::Gemini => {
                let api_key = Self::require_key(&config)?;
                let mut model = GeminiModel::with_api_key(config.model_id, api_key);
                if let Some(base_url) = config.base_url {
                    model = model.with_base_url(base_url);
                }
                Ok(Arc::new(model))
            }
        }
    }

    /// Creates a model instance from a model type string and model ID.
    ///
    /// # Errors
    /// Returns a `ModelError` if the model type is unrecognized or creation fails.
    pub fn create_from_str(
        model_type_str: &str,
        model_id: String,
        api_key: Option<String>,
    ) -> Result<Arc<dyn Model>, ModelError> {
        let model_type = ModelType::from_str(model_type_str).map_err(|()| {
            error!(model_type = %model_type_str, "Unrecognized model type");
            ModelError::UnsupportedModelProvider(format!(
                "Unrecognized model type: {}",
                model_type_str
            ))
        })?;

        let mut config = ModelConfig::new(model_type, model_id);
        config.api_key = api_key;
        Self::create(config)
    }

    fn require_key(config: &ModelConfig) -> Result<String, ModelError> {
        config.api_key.clone().filter(|key| !key.trim().is_empty()).ok_or_else(|| {
            ModelError::UnsupportedModelProvider(format!(
                "{} model '{}' requires an API key",
                config.model_type, config.model_id
            ))
        })
    }
}
