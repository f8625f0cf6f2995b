//! Error types for code block operations.

use std::fmt;

/// Errors that can occur during code block operations.
#[derive(Debug)]
pub enum CodeBlockError {
    /// I/O error while writing an extracted block.
    Io(std::io::Error),
    /// No block with the requested language tag.
    NotFound(String),
}

impl fmt::Display for CodeBlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::NotFound(language) => write!(f, "No ```{language} block found in response"),
        }
    }
}

impl std::error::Error for CodeBlockError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::NotFound(_) => None,
        }
    }
}

impl From<std::io::Error> for CodeBlockError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

/// Result type for code block operations.
pub type Result<T> = std::result::Result<T, CodeBlockError>;
