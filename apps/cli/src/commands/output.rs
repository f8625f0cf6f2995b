//! Shared terminal output helpers.

use anyhow::anyhow;
use colored::Colorize;
use rumen_core::reports::{heavy_rule, light_rule};
use rumen_core::{TaskOutcome, save_text};
use std::path::Path;

/// Characters shown when a reply is previewed.
pub const PREVIEW_CHARS: usize = 500;

/// Prints a title between heavy rules.
pub fn banner(title: &str) {
    println!();
    println!("{}", heavy_rule());
    println!("{}", title.bold().cyan());
    println!("{}", heavy_rule());
    println!();
}

/// Prints a section heading over a light rule.
pub fn part(heading: &str) {
    println!();
    println!("{}", format!("[{heading}]").bold());
    println!("{}", light_rule());
}

/// The first `PREVIEW_CHARS` characters of a reply.
pub fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Reply text of a completed request, or the rejection as an error.
pub fn reply_text(outcome: TaskOutcome) -> anyhow::Result<String> {
    outcome.into_result().map(|response| response.text).map_err(|rejection| anyhow!("{rejection}"))
}

/// Prints a reply and optionally saves it under the results directory.
pub fn print_reply(text: &str, save: Option<&str>, results_dir: &Path) -> anyhow::Result<()> {
    println!("{text}");
    if let Some(file_name) = save {
        let path = save_text(results_dir, file_name, text)?;
        println!();
        println!("{} {}", "✓ Saved to".green(), path.display());
    }
    Ok(())
}
