//! Plain-text result files.
//!
//! Replies are saved under the results directory, either as-is or wrapped in a
//! [`Report`] with ruled headings.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// Width of the `=` and `-` rules.
pub const RULE_WIDTH: usize = 70;

/// A heavy `=` rule.
pub fn heavy_rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// A light `-` rule.
pub fn light_rule() -> String {
    "-".repeat(RULE_WIDTH)
}

#[derive(Debug, Clone)]
struct Section {
    heading: Option<String>,
    body: String,
}

/// A titled report made of ordered sections.
#[derive(Debug, Clone)]
pub struct Report {
    title: String,
    preamble: Vec<String>,
    sections: Vec<Section>,
}

impl Report {
    /// Starts a report with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self { title: title.into(), preamble: Vec::new(), sections: Vec::new() }
    }

    /// Adds a line shown between the title and the first section.
    #[must_use]
    pub fn line(mut self, line: impl Into<String>) -> Self {
        self.preamble.push(line.into());
        self
    }

    /// Adds a section under a `[heading]` and a light rule.
    #[must_use]
    pub fn section(mut self, heading: impl Into<String>, body: impl Into<String>) -> Self {
        self.sections.push(Section { heading: Some(heading.into()), body: body.into() });
        self
    }

    /// Adds a section with no heading.
    #[must_use]
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.sections.push(Section { heading: None, body: body.into() });
        self
    }

    /// Renders the report text.
    pub fn render(&self) -> String {
        let heavy = heavy_rule();
        let mut out = format!("{heavy}\n{}\n{heavy}\n\n", self.title);

        if !self.preamble.is_empty() {
            for line in &self.preamble {
                out.push_str(line);
                out.push('\n');
            }
            out.push_str(&heavy);
            out.push_str("\n\n");
        }

        let rendered: Vec<String> = self
            .sections
            .iter()
            .map(|section| match &section.heading {
                Some(heading) => format!("[{heading}]\n{}\n{}", light_rule(), section.body),
                None => section.body.clone(),
            })
            .collect();
        out.push_str(&rendered.join("\n\n"));
        out.push('\n');
        out
    }

    /// Renders and saves the report under `results_dir`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the directory or file cannot be written.
    pub fn save(&self, results_dir: &Path, file_name: &str) -> io::Result<PathBuf> {
        save_text(results_dir, file_name, &self.render())
    }
}

/// Writes `text` to `results_dir/file_name`, creating the directory.
///
/// # Errors
///
/// Returns an I/O error if the directory or file cannot be written, or
/// [`io::ErrorKind::InvalidInput`] for an empty file name.
pub fn save_text(results_dir: &Path, file_name: &str, text: &str) -> io::Result<PathBuf> {
    let file_name = file_name.trim();
    if file_name.is_empty() {
        return Err(io::Error::new(io::ErrorKind::InvalidInput, "file name must not be empty"));
    }

    let path = results_dir.join(file_name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, text)?;

    info!(path = %path.display(), bytes = text.len(), "Saved result");
    Ok(path)
}
