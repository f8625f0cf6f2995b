//! Example three-step workflow.

use super::output::{banner, part, preview, reply_text};
use crate::config::Session;
use colored::Colorize;

/// Runs pipeline design, literature context and statistical design in turn,
/// printing a preview of each reply.
pub async fn execute(session: &Session) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    let family = analyzer.study().focus_family.clone();

    banner(&format!("EXAMPLE WORKFLOW: Complete {family} Analysis"));

    part("STEP 1: Pipeline Design");
    let pipeline = reply_text(
        analyzer
            .design_pipeline("16S V4 amplicon sequencing", "50 gut microbiome samples from dietary intervention study")
            .await?,
    )?;
    println!("{}", preview(&pipeline));

    part("STEP 2: Literature Context");
    let literature =
        reply_text(analyzer.literature_review(&format!("Role of {family} in dietary fiber metabolism")).await?)?;
    println!("{}", preview(&literature));

    part("STEP 3: Statistical Design");
    let stats = reply_text(
        analyzer
            .statistical_design(&format!(
                "Compare {family} abundance between high-fiber and low-fiber diet groups (n=25 each)"
            ))
            .await?,
    )?;
    println!("{}", preview(&stats));

    println!();
    println!("{}", "✅ Example workflow completed!".green().bold());
    println!("{}", "💡 For a menu-driven session run: rumen interactive".dimmed());
    Ok(())
}
