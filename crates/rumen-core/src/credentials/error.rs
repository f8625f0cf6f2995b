//! Error types for credential operations.

use thiserror::Error;

/// Credential-related errors.
#[derive(Error, Debug)]
pub enum CredentialsError {
    /// A required secret is absent from both the credential file and the environment.
    #[error("required secret {secret} is not set (looked in {source_path} and the environment)")]
    Missing {
        /// Variable name of the missing secret.
        secret: String,
        /// Credential file that was consulted.
        source_path: String,
    },
}

/// Result type alias for credential operations.
pub type CredentialsResult<T> = std::result::Result<T, CredentialsError>;
