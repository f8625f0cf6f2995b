//! Download-job command implementation.
//!
//! Asks the pipeline backend for a SLURM script that fetches the reference
//! accessions and writes the first bash block as an executable job.

use super::output::reply_text;
use crate::config::Session;
use colored::Colorize;
use rumen_core::prompts::{PromptContext, PromptTemplate};
use rumen_core::{CodeBlockParser, TaskType, save_text, write_script};
use std::fs;
use std::path::Path;
use tracing::warn;

const SAMPLE_ACCESSIONS: [&str; 3] = ["GB_GCA_018379485.1", "GB_GCA_017517145.1", "RS_GCF_010509575.1"];

const DOWNLOAD_JOB_REQUEST: PromptTemplate = PromptTemplate::new(
    "I have {{count}} {{focus_family}} genome accessions in: {{accessions}}

Example accessions:
{{examples}}

Create a SLURM job script that:
1. Downloads genomes from NCBI FTP
2. Handles both GCA and GCF accessions
3. Handles GB_ and RS_ prefixes
4. Uses wget with retry logic
5. Downloads in parallel (8 jobs)
6. Resource requirements: 16GB RAM, 8 CPUs, 24 hours
7. Partition: batch

Output only the SLURM script in this format:
```bash
#!/bin/bash
#SBATCH ...
[script here]
```",
);

/// File the raw reply is kept in when it holds no bash block.
pub const RAW_REPLY_FILE: &str = "download_job_response.txt";

/// Accession count and up to three examples from the list, if it can be read.
fn accession_summary(path: &Path) -> (String, Vec<String>) {
    match fs::read_to_string(path) {
        Ok(text) => {
            let accessions: Vec<String> =
                text.lines().map(str::trim).filter(|line| !line.is_empty()).map(str::to_string).collect();
            let examples = accessions.iter().take(SAMPLE_ACCESSIONS.len()).cloned().collect();
            (accessions.len().to_string(), examples)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Accession list not readable, using sample accessions");
            ("300".to_string(), SAMPLE_ACCESSIONS.iter().map(|s| s.to_string()).collect())
        }
    }
}

fn build_request(session: &Session, accessions: &Path) -> String {
    let (count, examples) = accession_summary(accessions);
    let context: PromptContext = session
        .study()
        .prompt_context()
        .with("count", count)
        .with("accessions", accessions.display().to_string())
        .with("examples", examples.join("\n"));
    DOWNLOAD_JOB_REQUEST.fill(&context)
}

/// Execute the download-job command.
pub async fn execute(session: &Session, accessions: &Path, output: &Path) -> anyhow::Result<()> {
    let router = session.router()?;

    println!("{}", "🤖 Asking for a download job script...".cyan());
    let request = build_request(session, accessions);
    let reply = reply_text(router.dispatch(TaskType::BioinformaticsAndPipelineDesign, &request).await?)?;
    println!("{reply}");

    match CodeBlockParser::first_with_language(&reply, "bash") {
        Some(block) => {
            write_script(output, &block.content, true)?;
            println!();
            println!("{} {}", "✅ Created:".green().bold(), output.display());
            println!("🚀 Ready to submit: sbatch {}", output.display());
        }
        None => {
            warn!("Reply contained no bash block");
            let path = save_text(&session.results_dir(), RAW_REPLY_FILE, &reply)?;
            println!();
            println!("{}", "⚠️  Could not extract script".yellow());
            println!("Reply saved for review: {}", path.display());
        }
    }
    Ok(())
}
