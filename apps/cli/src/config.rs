//! CLI configuration loading and per-invocation session state.

use anyhow::Context;
use rumen_core::{Analyzer, CredentialSet, RumenConfig, StudyContext, TaskRouter};
use std::path::{Path, PathBuf};

/// Load and merge configuration.
///
/// Configuration precedence:
/// 1. CLI arguments (handled by clap)
/// 2. Explicit `--config` file
/// 3. Local config file (./rumen.toml)
/// 4. Global config file (~/.rumen/config.toml)
/// 5. Defaults
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<RumenConfig> {
    RumenConfig::load(explicit).context("Failed to load configuration")
}

/// Configuration and secrets for one invocation.
#[derive(Debug)]
pub struct Session {
    pub config: RumenConfig,
    pub credentials: CredentialSet,
    pub offline: bool,
}

impl Session {
    /// Reads the credential file named on the command line or in the configuration.
    ///
    /// Never fails: problems with the file surface when a command needs a key.
    pub fn new(config: RumenConfig, credentials_path: Option<&Path>, offline: bool) -> Self {
        let path = credentials_path.map_or_else(|| config.credentials_path(), Path::to_path_buf);
        let credentials = CredentialSet::load(&path);
        Self { config, credentials, offline }
    }

    pub fn study(&self) -> StudyContext {
        self.config.study_context()
    }

    pub fn results_dir(&self) -> PathBuf {
        self.config.results_dir()
    }

    /// Builds the router, checking both provider keys first unless offline.
    pub fn router(&self) -> anyhow::Result<TaskRouter> {
        if self.offline {
            return Ok(TaskRouter::offline(self.study(), self.config.max_tokens()));
        }
        TaskRouter::from_config(&self.config, &self.credentials)
            .with_context(|| format!("AI commands need provider keys in {}", self.credentials.source_path().display()))
    }

    pub fn analyzer(&self) -> anyhow::Result<Analyzer> {
        Ok(Analyzer::new(self.router()?))
    }
}
