//! Error types for Rumen Core.

use crate::analysis::AnalysisError;
use crate::code_blocks::CodeBlockError;
use crate::config::ConfigError;
use crate::credentials::CredentialsError;
use crate::genomes::GenomeError;
use crate::router::RouterError;
use thiserror::Error;

/// Core error type for Rumen operations.
#[derive(Error, Debug)]
pub enum RumenError {
    /// Configuration file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Credential loading or validation errors
    #[error("Credential error: {0}")]
    Credentials(#[from] CredentialsError),

    /// Routing and backend errors
    #[error("Router error: {0}")]
    Router(#[from] RouterError),

    /// Analysis façade errors
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Code block extraction and script writing errors
    #[error("Code block error: {0}")]
    CodeBlock(#[from] CodeBlockError),

    /// Genome table errors
    #[error("Genome table error: {0}")]
    Genome(#[from] GenomeError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Rumen operations.
pub type Result<T> = std::result::Result<T, RumenError>;
