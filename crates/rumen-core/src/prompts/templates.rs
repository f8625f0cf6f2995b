//! Prompt template processing.
//!
//! Templates use `{{KEY}}` placeholders. Rendering is a single left-to-right pass,
//! so placeholder-like text inside a substituted value is left alone.

use std::collections::HashMap;
use thiserror::Error;

/// Prompt template errors.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Missing placeholder value.
    #[error("missing placeholder value: {0}")]
    MissingPlaceholder(String),
}

/// Result type for prompt operations.
pub type Result<T> = std::result::Result<T, PromptError>;

/// Prompt template context for variable replacement.
#[derive(Debug, Clone, Default)]
pub struct PromptContext {
    values: HashMap<String, String>,
}

impl PromptContext {
    /// Create a new empty context.
    pub fn new() -> Self {
        Self { values: HashMap::new() }
    }

    /// Set a context value.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    /// Builder-style [`set`](Self::set).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    /// Get a context value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Check if context contains a key.
    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }
}

/// Prompt template.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    content: &'static str,
}

/// One piece of a template.
enum Segment<'a> {
    Text(&'a str),
    Placeholder(&'a str),
}

impl PromptTemplate {
    /// Create a template from static text.
    pub const fn new(content: &'static str) -> Self {
        Self { content }
    }

    /// Get the template content.
    pub fn content(&self) -> &'static str {
        self.content
    }

    fn segments(&self) -> Vec<Segment<'static>> {
        let mut segments = Vec::new();
        let mut rest = self.content;

        while let Some(start) = rest.find("{{") {
            let after_open = &rest[start + 2..];
            let Some(end) = after_open.find("}}") else {
                break;
            };
            let name = after_open[..end].trim();
            if name.is_empty() {
                segments.push(Segment::Text(&rest[..start + 2 + end + 2]));
            } else {
                segments.push(Segment::Text(&rest[..start]));
                segments.push(Segment::Placeholder(name));
            }
            rest = &after_open[end + 2..];
        }
        segments.push(Segment::Text(rest));
        segments
    }

    fn render_inner(&self, context: &PromptContext, strict: bool) -> Result<String> {
        let mut out = String::with_capacity(self.content.len());
        for segment in self.segments() {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder(name) => match context.get(name) {
                    Some(value) => out.push_str(value),
                    None if strict => return Err(PromptError::MissingPlaceholder(name.to_string())),
                    None => {}
                },
            }
        }
        Ok(out)
    }

    /// Render the template, failing on the first placeholder without a value.
    ///
    /// # Errors
    ///
    /// Returns error if a placeholder is missing from the context.
    pub fn render(&self, context: &PromptContext) -> Result<String> {
        self.render_inner(context, true)
    }

    /// Render the template, replacing unknown placeholders with nothing.
    pub fn fill(&self, context: &PromptContext) -> String {
        self.render_inner(context, false).unwrap_or_default()
    }

    /// List all placeholders in the template, first occurrence order.
    pub fn list_placeholders(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for segment in self.segments() {
            if let Segment::Placeholder(name) = segment {
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }
}
