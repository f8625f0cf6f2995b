//! Auto-filter command implementation.
//!
//! Shows a backend the shape of a metadata table and keeps the Python filter
//! it writes. The generated code is saved for review, never run.

use super::output::{banner, part, reply_text};
use crate::config::Session;
use colored::Colorize;
use rumen_core::prompts::PromptTemplate;
use rumen_core::{CodeBlockParser, TablePreview, TaskType, preview_table, save_text, write_script};
use std::path::Path;
use tracing::warn;

/// Data rows shown to the backend.
const PREVIEW_ROWS: usize = 3;

/// File the raw reply is kept in when it holds no python block.
pub const RAW_REPLY_FILE: &str = "ai_response.txt";

const FILTER_SCRIPT_REQUEST: PromptTemplate = PromptTemplate::new(
    "I have GTDB metadata with the following structure:

GTDB Metadata Structure:
{{structure}}
The file is at: {{metadata}}

Task: Write Python code that:
1. Reads this EXACT metadata file
2. Identifies which columns contain completeness and contamination data
3. Filters for genomes with >90% completeness, <5% contamination
4. Selects top 300 by completeness
5. Saves filtered list to: data/filtered_genomes/high_quality_genomes.tsv
6. Saves accession list to: data/filtered_genomes/accession_list.txt

IMPORTANT:
- Use the ACTUAL column names from the data shown above
- The file has NO HEADER - use column positions
- Column 3 appears to be completeness
- Column 4 appears to be contamination
- Column 1 appears to be accession

Write ONLY executable Python code, no explanations.
Use this format:
```python
[your code here]
```",
);

fn build_request(session: &Session, metadata: &Path, preview: &TablePreview) -> String {
    let context = session
        .study()
        .prompt_context()
        .with("structure", preview.to_string())
        .with("metadata", metadata.display().to_string());
    FILTER_SCRIPT_REQUEST.fill(&context)
}

/// Execute the auto-filter command.
pub async fn execute(session: &Session, metadata: &Path, output: &Path) -> anyhow::Result<()> {
    let router = session.router()?;

    banner("🧠 Generating a metadata filter");

    part("Step 1: Inspecting metadata structure");
    let preview = preview_table(metadata, PREVIEW_ROWS)?;
    print!("{preview}");

    part("Step 2: Asking for a filter written against this table");
    let request = build_request(session, metadata, &preview);
    let reply = reply_text(router.dispatch(TaskType::BioinformaticsAndPipelineDesign, &request).await?)?;
    println!("{reply}");

    part("Step 3: Extracting the script");
    match CodeBlockParser::first_with_language(&reply, "python") {
        Some(block) => {
            write_script(output, &block.content, false)?;
            println!("{} {}", "✓ Code extracted and saved to".green(), output.display());
            println!("{}", "Review it before running; it was not executed.".dimmed());
            println!("Native alternative: rumen filter-genomes --metadata {}", metadata.display());
        }
        None => {
            warn!("Reply contained no python block");
            let path = save_text(&session.results_dir(), RAW_REPLY_FILE, &reply)?;
            println!("{}", "⚠️  No Python code found in the reply".yellow());
            println!("Reply saved for review: {}", path.display());
        }
    }
    Ok(())
}
