//! Models command implementation.

use crate::config::Session;
use anyhow::{Context, bail};
use colored::Colorize;
use rumen_core::Provider;
use rumen_models::GeminiModel;
use serde_json::json;

/// Execute the models command.
pub async fn execute(session: &Session, json_output: bool) -> anyhow::Result<()> {
    if session.offline {
        bail!("Listing models needs provider access; run without --offline");
    }

    let api_key = session.credentials.require(Provider::Google)?;
    let mut client = GeminiModel::with_api_key(session.config.gemini_model().to_string(), api_key);
    if let Some(url) = &session.config.models.gemini_base_url {
        client = client.with_base_url(url.clone());
    }

    let models: Vec<_> = client
        .list_models()
        .await
        .context("Failed to list Gemini models")?
        .into_iter()
        .filter(|info| info.supports_generate_content())
        .collect();

    if json_output {
        let names: Vec<_> = models.iter().map(|m| json!({"name": m.name, "display_name": m.display_name})).collect();
        println!("{}", serde_json::to_string_pretty(&names)?);
        return Ok(());
    }

    println!("{}", "Available Gemini models:".bold());
    for model in &models {
        println!("  - {}", model.name);
    }
    if models.is_empty() {
        println!("  {}", "(none support generateContent)".dimmed());
    }
    Ok(())
}
