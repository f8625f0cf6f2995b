//! Interactive analysis session.

use super::output::banner;
use crate::config::Session;
use colored::Colorize;
use inquire::{Confirm, InquireError, Select, Text};
use rumen_core::{AnalysisError, Analyzer, TaskOutcome};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Design,
    Review,
    Stats,
    Compare,
    Quit,
}

impl Action {
    const MENU: [Self; 5] = [Self::Design, Self::Review, Self::Stats, Self::Compare, Self::Quit];
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Design => "Design bioinformatics pipeline",
            Self::Review => "Literature review",
            Self::Stats => "Statistical analysis design",
            Self::Compare => "Compare to reference family",
            Self::Quit => "Quit",
        };
        f.write_str(label)
    }
}

/// Execute the interactive command.
pub async fn execute(session: &Session) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    banner(&format!("{} ANALYSIS ASSISTANT", analyzer.study().focus_family.to_uppercase()));

    loop {
        let action = match Select::new("What would you like to do?", Action::MENU.to_vec()).prompt() {
            Ok(action) => action,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Action::Quit,
            Err(e) => return Err(e.into()),
        };
        let outcome = match run_action(&analyzer, action).await {
            Ok(Some(outcome)) => outcome,
            Ok(None) => {
                println!();
                println!("👋 Goodbye!");
                return Ok(());
            }
            Err(e) => {
                if let Some(AnalysisError::MissingParameter(name)) = e.downcast_ref::<AnalysisError>() {
                    println!("{}", format!("Please provide {name}.").yellow());
                    continue;
                }
                return Err(e);
            }
        };

        let text = match outcome {
            TaskOutcome::Completed(response) => response.text,
            TaskOutcome::Rejected(rejection) => {
                println!("{}", rejection.to_string().red());
                continue;
            }
        };
        println!("{text}");
        println!();

        if Confirm::new("💾 Save this output to file?").with_default(false).prompt().unwrap_or(false) {
            let file_name = Text::new("Filename (will be saved in results/):").prompt()?;
            if let Err(e) = print_saved(&text, file_name.trim(), session) {
                println!("{}", format!("Could not save: {e}").red());
            }
        }
    }
}

async fn run_action(analyzer: &Analyzer, action: Action) -> anyhow::Result<Option<TaskOutcome>> {
    let outcome = match action {
        Action::Design => {
            let data_type = Text::new("What type of data? (e.g., '16S amplicon', 'metagenome'):").prompt()?;
            let samples = Text::new("Sample information:").prompt()?;
            println!("\n🔬 Designing pipeline...\n");
            analyzer.design_pipeline(&data_type, &samples).await?
        }
        Action::Review => {
            let topic = Text::new("Literature review topic:").prompt()?;
            println!("\n📚 Reviewing literature...\n");
            analyzer.literature_review(&topic).await?
        }
        Action::Stats => {
            let experiment = Text::new("Describe your experiment:").prompt()?;
            println!("\n📊 Designing statistical approach...\n");
            analyzer.statistical_design(&experiment).await?
        }
        Action::Compare => {
            let aspect = Text::new("What aspect to compare?:").prompt()?;
            println!("\n🔍 Comparing families...\n");
            analyzer.compare_to_reference_family(&aspect).await?
        }
        Action::Quit => return Ok(None),
    };
    Ok(Some(outcome))
}

fn print_saved(text: &str, file_name: &str, session: &Session) -> anyhow::Result<()> {
    let path = rumen_core::save_text(&session.results_dir(), file_name, text)?;
    println!("{} {}", "✓ Saved to".green(), path.display());
    Ok(())
}
