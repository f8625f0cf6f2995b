//! Check command implementation.
//!
//! Reports which provider keys the credential file supplies.

use crate::config::Session;
use colored::Colorize;
use rumen_core::{Provider, SecretState};
use serde_json::json;

/// Execute the check command.
pub fn execute(session: &Session, json_output: bool) -> anyhow::Result<()> {
    let status = session.credentials.status();
    let ready = status.iter().filter(|s| s.required).all(|s| s.state == SecretState::Loaded);

    if json_output {
        let output = json!({
            "credentials_path": session.credentials.source_path().display().to_string(),
            "ready": ready,
            "secrets": status,
            "skipped_lines": session.credentials.skipped(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("{}", "=".repeat(50));
    println!("{}", "Testing Rumen Setup".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{}", "✓ Checking API keys...".bold());
    println!("  Source: {}", session.credentials.source_path().display().to_string().dimmed());

    for entry in &status {
        let label = match entry.provider {
            Provider::Anthropic => "Claude",
            Provider::Google => "Gemini",
            Provider::OpenAI => "OpenAI",
        };
        let state = match (entry.state, entry.required) {
            (SecretState::Loaded, _) => "✓ Loaded".green(),
            (_, true) => "✗ Missing".red(),
            (_, false) => "✗ Missing (OK for now)".yellow(),
        };
        println!("  {label} API key ({}): {state}", entry.secret);
    }

    for skipped in session.credentials.skipped() {
        let location = skipped.line.map_or_else(|| "file".to_string(), |line| format!("line {line}"));
        println!("  {}", format!("⚠️  Skipped {location}: {}", skipped.reason).yellow());
    }

    println!();
    if ready {
        println!("{}", "🎉 All systems ready!".green().bold());
    } else {
        println!(
            "{}",
            format!(
                "⚠️  Some required API keys missing. Check {}",
                session.credentials.source_path().display()
            )
            .yellow()
        );
    }
    Ok(())
}
