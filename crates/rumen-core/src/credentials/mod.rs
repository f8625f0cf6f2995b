//! Credential loading.
//!
//! Secrets live in a `KEY=VALUE` file (by default `configs/api_keys.env`). The file
//! is read once into an immutable [`CredentialSet`] that is passed by reference to
//! whatever needs a key. A missing file, a missing key or a malformed line is never
//! fatal at load time: malformed lines are skipped and reported through
//! [`CredentialSet::skipped`]. AI commands call [`CredentialSet::validate_required`]
//! before their first request.
//!
//! # Examples
//!
//! ```no_run
//! use rumen_core::credentials::{CredentialSet, Provider};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let creds = CredentialSet::load("configs/api_keys.env");
//! creds.validate_required()?;
//! let anthropic = creds.require(Provider::Anthropic)?;
//! # Ok(())
//! # }
//! ```

mod error;
mod providers;

pub use error::{CredentialsError, CredentialsResult};
pub use providers::{PLACEHOLDER_SECRET, Provider};

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Secrets loaded from a credential file.
#[derive(Debug, Clone, Default)]
pub struct CredentialSet {
    source: PathBuf,
    values: BTreeMap<String, String>,
    env_fallback: bool,
    skipped: Vec<SkippedLine>,
}

/// Part of a credential file that could not be used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedLine {
    /// 1-based line number, when it could be located.
    pub line: Option<usize>,
    /// Why it was skipped. Never contains the line's text.
    pub reason: String,
}

/// Whether a provider's secret is usable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretState {
    /// A usable value was found.
    Loaded,
    /// Only the placeholder value was found.
    Placeholder,
    /// No value was found.
    Missing,
}

/// Per-provider credential report line.
#[derive(Debug, Clone, Serialize)]
pub struct CredentialStatus {
    /// The provider.
    pub provider: Provider,
    /// Variable name that was reported.
    pub secret: &'static str,
    /// What was found.
    pub state: SecretState,
    /// Whether AI commands need it.
    pub required: bool,
}

impl CredentialSet {
    /// Loads secrets from `path`.
    ///
    /// Process environment variables act as a fallback for keys the file does not
    /// define. A missing or unreadable file gives an empty set. Malformed lines are
    /// logged and skipped while the remaining pairs are kept.
    pub fn load(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let mut set = Self { source: path.to_path_buf(), env_fallback: true, ..Self::default() };

        if !path.exists() {
            warn!(path = %path.display(), "Credential file not found; secrets treated as not configured");
            return set;
        }

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Credential file unreadable; secrets treated as not configured");
                set.skipped.push(SkippedLine { line: None, reason: format!("file unreadable: {e}") });
                return set;
            }
        };

        for entry in dotenvy::from_read_iter(contents.as_bytes()) {
            match entry {
                Ok((key, value)) => {
                    set.values.insert(key, value);
                }
                Err(dotenvy::Error::LineParse(text, _)) => {
                    let first = text.lines().next().unwrap_or_default();
                    let line = contents.lines().position(|l| l == first).map(|index| index + 1);
                    warn!(path = %path.display(), line = ?line, "Skipping malformed credential line");
                    set.skipped.push(SkippedLine { line, reason: "malformed entry".to_string() });
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Stopped reading credential file");
                    set.skipped.push(SkippedLine { line: None, reason: e.to_string() });
                    break;
                }
            }
        }

        debug!(path = %path.display(), count = set.values.len(), skipped = set.skipped.len(), "Loaded credential file");
        set
    }

    /// Builds a set from explicit pairs with no environment fallback.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            source: PathBuf::from("<inline>"),
            values: pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            env_fallback: false,
            skipped: Vec::new(),
        }
    }

    /// Enables or disables reading unset keys from the process environment.
    #[must_use]
    pub fn with_env_fallback(mut self, enabled: bool) -> Self {
        self.env_fallback = enabled;
        self
    }

    /// The file the secrets were read from.
    pub fn source_path(&self) -> &Path {
        &self.source
    }

    /// Lines of the file that were not loaded.
    pub fn skipped(&self) -> &[SkippedLine] {
        &self.skipped
    }

    /// Number of keys read from the file.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the file defined no keys.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Returns a value defined in the credential file, or `None` when absent or empty.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    #[allow(clippy::disallowed_methods)] // env::var is the documented fallback source
    fn lookup(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_string).or_else(|| {
            if self.env_fallback {
                std::env::var(name).ok().filter(|v| !v.trim().is_empty())
            } else {
                None
            }
        })
    }

    fn state_of(&self, provider: Provider) -> (SecretState, Option<String>) {
        let mut saw_placeholder = false;
        for name in provider.env_var_names() {
            match self.lookup(name) {
                Some(value) if value == PLACEHOLDER_SECRET => saw_placeholder = true,
                Some(value) => return (SecretState::Loaded, Some(value)),
                None => {}
            }
        }
        if saw_placeholder { (SecretState::Placeholder, None) } else { (SecretState::Missing, None) }
    }

    /// Resolves a provider's key from the first variable that holds a usable value.
    pub fn resolve(&self, provider: Provider) -> Option<String> {
        self.state_of(provider).1
    }

    /// Resolves a provider's key or names the missing secret.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Missing`] when no usable value exists.
    pub fn require(&self, provider: Provider) -> CredentialsResult<String> {
        self.resolve(provider).ok_or_else(|| CredentialsError::Missing {
            secret: provider.primary_env_var().to_string(),
            source_path: self.source.display().to_string(),
        })
    }

    /// Fails on the first required provider without a usable key.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsError::Missing`] naming the secret.
    pub fn validate_required(&self) -> CredentialsResult<()> {
        for provider in Provider::all().into_iter().filter(|p| p.is_required()) {
            self.require(provider)?;
        }
        Ok(())
    }

    /// Reports the state of every provider's secret.
    pub fn status(&self) -> Vec<CredentialStatus> {
        Provider::all()
            .into_iter()
            .map(|provider| CredentialStatus {
                provider,
                secret: provider.primary_env_var(),
                state: self.state_of(provider).0,
                required: provider.is_required(),
            })
            .collect()
    }

    /// Exports every loaded pair into the process environment, skipping keys that
    /// are already set. Calling it again with the same set changes nothing.
    ///
    /// # Safety
    ///
    /// This function modifies environment variables. It should only be called
    /// from single-threaded code before spawning threads.
    #[allow(unsafe_code, clippy::disallowed_methods)]
    pub unsafe fn apply_to_env(&self) {
        for (key, value) in &self.values {
            if std::env::var_os(key).is_none() {
                // SAFETY: upheld by the caller.
                unsafe { std::env::set_var(key, value) };
            }
        }
    }
}
