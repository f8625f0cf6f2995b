//! Provider secret definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value some setups leave in the optional OpenAI slot instead of a real key.
pub const PLACEHOLDER_SECRET: &str = "placeholder_for_now";

/// Providers whose secrets the credential file may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    /// Anthropic, serving backend A.
    Anthropic,
    /// Google, serving backend B.
    Google,
    /// OpenAI; an optional slot nothing dispatches to yet.
    OpenAI,
}

impl Provider {
    /// Returns the string representation of the provider.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::Google => "google",
            Self::OpenAI => "openai",
        }
    }

    /// Returns all known providers in report order.
    #[must_use]
    pub fn all() -> [Self; 3] {
        [Self::Anthropic, Self::Google, Self::OpenAI]
    }

    /// Whether AI commands refuse to start without this secret.
    #[must_use]
    pub fn is_required(self) -> bool {
        !matches!(self, Self::OpenAI)
    }

    /// Variable names that can hold this provider's key, checked in order.
    #[must_use]
    pub fn env_var_names(self) -> &'static [&'static str] {
        match self {
            Self::Anthropic => &["ANTHROPIC_API_KEY"],
            Self::Google => &["GOOGLE_API_KEY", "GEMINI_API_KEY"],
            Self::OpenAI => &["OPENAI_API_KEY"],
        }
    }

    /// The variable name reported when the secret is missing.
    #[must_use]
    pub fn primary_env_var(self) -> &'static str {
        self.env_var_names()[0]
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
