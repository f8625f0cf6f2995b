//! Rumen Core - task routing and genome table utilities for the Rumen assistant.
//!
//! This crate provides:
//! - Credential loading and validation
//! - Configuration management
//! - The task router and the study-specific analysis operations
//! - Fenced code block extraction and result files
//! - Native filters over GTDB-Tk and CheckM tables
//!
//! # Example
//!
//! ```rust,no_run
//! use rumen_core::{Analyzer, CredentialSet, RumenConfig, TaskRouter};
//!
//! #[tokio::main]
//! async fn main() -> rumen_core::Result<()> {
//!     let config = RumenConfig::discover_and_load();
//!     let credentials = CredentialSet::load(config.credentials_path());
//!     let analyzer = Analyzer::new(TaskRouter::from_config(&config, &credentials)?);
//!
//!     let outcome = analyzer.literature_review("butyrate production in reptile guts").await?;
//!     if let Some(text) = outcome.text() {
//!         println!("{text}");
//!     }
//!     Ok(())
//! }
//! ```

pub mod analysis;
pub mod code_blocks;
pub mod config;
pub mod credentials;
pub mod error;
pub mod genomes;
pub mod prompts;
pub mod reports;
pub mod router;

pub use analysis::{AnalysisError, Analyzer};
pub use code_blocks::{CodeBlock, CodeBlockError, CodeBlockParser, write_script};
pub use config::{ConfigError, RumenConfig};
pub use credentials::{CredentialSet, CredentialStatus, CredentialsError, Provider, SecretState, SkippedLine};
pub use error::{Result, RumenError};
pub use genomes::{
    GenomeError, Manifest, ManifestBuilder, QualityThresholds, TablePreview, filter_reference_genomes,
    preview_table,
};
pub use prompts::StudyContext;
pub use reports::{Report, save_text};
pub use router::{
    BackendKind, Rejection, RouterError, TaskOutcome, TaskResponse, TaskRouter, TaskType,
};
