//! Configuration file support.
//!
//! Settings come from `~/.rumen/config.toml` and then `./rumen.toml`; values in the
//! local file override the global one. Every field is optional and the accessors
//! fall back to built-in defaults.

use crate::prompts::StudyContext;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default backend A model.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";
/// Default backend B model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";
/// Default output bound for backend A.
pub const DEFAULT_MAX_TOKENS: u32 = 2000;
/// Default credential file location.
pub const DEFAULT_CREDENTIALS_PATH: &str = "configs/api_keys.env";
/// Default directory for saved replies and reports.
pub const DEFAULT_RESULTS_DIR: &str = "results";

/// Rumen configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RumenConfig {
    /// Credential file path
    #[serde(default)]
    pub credentials_path: Option<String>,

    /// Directory for saved outputs
    #[serde(default)]
    pub results_dir: Option<String>,

    /// Log level
    #[serde(default)]
    pub log_level: Option<String>,

    /// Backend settings
    #[serde(default)]
    pub models: ModelsConfig,

    /// Study framing
    #[serde(default)]
    pub study: StudyConfig,
}

/// Backend model settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelsConfig {
    /// Backend A model id.
    #[serde(default)]
    pub claude: Option<String>,
    /// Backend B model id.
    #[serde(default)]
    pub gemini: Option<String>,
    /// Output bound for backend A.
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Backend A endpoint override.
    #[serde(default)]
    pub anthropic_base_url: Option<String>,
    /// Backend B endpoint override.
    #[serde(default)]
    pub gemini_base_url: Option<String>,
}

/// Taxonomic families the prompts are framed around.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudyConfig {
    /// Family under study.
    #[serde(default)]
    pub focus_family: Option<String>,
    /// Previously analysed family used for comparisons.
    #[serde(default)]
    pub reference_family: Option<String>,
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Configuration file not found.
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// Failed to read or write configuration file.
    #[error("Failed to read configuration file: {0}")]
    ReadError(String),

    /// Failed to parse configuration file.
    #[error("Failed to parse configuration file: {0}")]
    ParseError(String),

    /// Invalid configuration value.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

impl RumenConfig {
    /// Load configuration from a TOML file.
    pub fn load_from_file(path: &Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound(path.display().to_string()));
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::ParseError(format!("Failed to serialize: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::ReadError(format!("Failed to create directory: {}", e)))?;
        }

        std::fs::write(path, content)
            .map_err(|e| ConfigError::ReadError(format!("Failed to write file: {}", e)))
    }

    /// Get default global configuration file path.
    #[allow(clippy::disallowed_methods)] // HOME lookup for path discovery
    pub fn default_global_path() -> PathBuf {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(".rumen")
            .join("config.toml")
    }

    /// Get default local configuration file path.
    pub fn default_local_path() -> PathBuf {
        PathBuf::from("rumen.toml")
    }

    /// Discover and load configuration files.
    ///
    /// Unreadable or malformed discovered files are skipped.
    pub fn discover_and_load() -> Self {
        let mut config = Self::default();

        if let Ok(global_config) = Self::load_from_file(&Self::default_global_path()) {
            config.merge(&global_config);
        }

        if let Ok(local_config) = Self::load_from_file(&Self::default_local_path()) {
            config.merge(&local_config);
        }

        config
    }

    /// Loads an explicitly named file on top of the discovered configuration.
    ///
    /// Unlike discovery, a named file must exist and parse.
    pub fn load(explicit: Option<&Path>) -> ConfigResult<Self> {
        let mut config = Self::discover_and_load();
        if let Some(path) = explicit {
            config.merge(&Self::load_from_file(path)?);
        }
        Ok(config)
    }

    /// Merge another configuration into this one.
    ///
    /// Values from `other` override values in `self` if they are Some.
    pub fn merge(&mut self, other: &Self) {
        fn take(slot: &mut Option<String>, other: &Option<String>) {
            if let Some(value) = other {
                *slot = Some(value.clone());
            }
        }

        take(&mut self.credentials_path, &other.credentials_path);
        take(&mut self.results_dir, &other.results_dir);
        take(&mut self.log_level, &other.log_level);
        take(&mut self.models.claude, &other.models.claude);
        take(&mut self.models.gemini, &other.models.gemini);
        take(&mut self.models.anthropic_base_url, &other.models.anthropic_base_url);
        take(&mut self.models.gemini_base_url, &other.models.gemini_base_url);
        if other.models.max_tokens.is_some() {
            self.models.max_tokens = other.models.max_tokens;
        }
        take(&mut self.study.focus_family, &other.study.focus_family);
        take(&mut self.study.reference_family, &other.study.reference_family);
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.models.max_tokens == Some(0) {
            return Err(ConfigError::InvalidValue("models.max_tokens must be positive".to_string()));
        }
        for (name, value) in [
            ("study.focus_family", &self.study.focus_family),
            ("study.reference_family", &self.study.reference_family),
        ] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                return Err(ConfigError::InvalidValue(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }

    /// Credential file path.
    pub fn credentials_path(&self) -> PathBuf {
        PathBuf::from(self.credentials_path.as_deref().unwrap_or(DEFAULT_CREDENTIALS_PATH))
    }

    /// Directory for saved outputs.
    pub fn results_dir(&self) -> PathBuf {
        PathBuf::from(self.results_dir.as_deref().unwrap_or(DEFAULT_RESULTS_DIR))
    }

    /// Backend A model id.
    pub fn claude_model(&self) -> &str {
        self.models.claude.as_deref().unwrap_or(DEFAULT_CLAUDE_MODEL)
    }

    /// Backend B model id.
    pub fn gemini_model(&self) -> &str {
        self.models.gemini.as_deref().unwrap_or(DEFAULT_GEMINI_MODEL)
    }

    /// Output bound for backend A.
    pub fn max_tokens(&self) -> u32 {
        self.models.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS)
    }

    /// Study framing with defaults applied.
    pub fn study_context(&self) -> StudyContext {
        let defaults = StudyContext::default();
        StudyContext {
            focus_family: self.study.focus_family.clone().unwrap_or(defaults.focus_family),
            reference_family: self.study.reference_family.clone().unwrap_or(defaults.reference_family),
        }
    }
}
