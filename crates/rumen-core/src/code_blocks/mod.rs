//! Fenced code block extraction.
//!
//! Model replies carry scripts inside markdown fences. Blocks are pulled out
//! verbatim; nothing here parses, validates or runs the code.

mod error;
mod parser;

pub use error::{CodeBlockError, Result};
pub use parser::CodeBlockParser;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// A code block extracted from markdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Sequential index of this block (1-based).
    pub index: usize,

    /// Language tag from the opening fence, if any.
    pub language: Option<String>,

    /// Text between the fences.
    pub content: String,

    /// Line of the opening fence in the original text.
    pub start_line: usize,
}

impl CodeBlock {
    /// True when the fence was tagged with `language` (case-insensitive).
    pub fn is_language(&self, language: &str) -> bool {
        self.language.as_deref().is_some_and(|l| l.eq_ignore_ascii_case(language))
    }
}

/// Writes `content` to `path`, creating parent directories.
///
/// When `executable` is set the file gets mode `0755` on unix.
pub fn write_script(path: &Path, content: &str, executable: bool) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut text = content.to_string();
    if !text.ends_with('\n') {
        text.push('\n');
    }
    fs::write(path, text)?;

    if executable {
        set_executable(path)?;
    }

    debug!(path = %path.display(), executable, "Wrote script");
    Ok(())
}

#[cfg(unix)]
fn set_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
    Ok(())
}

#[cfg(not(unix))]
fn set_executable(_path: &Path) -> Result<()> {
    Ok(())
}
