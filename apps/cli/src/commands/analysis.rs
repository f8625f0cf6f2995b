//! Façade commands: design, review, stats and compare.

use super::output::{print_reply, reply_text};
use crate::config::Session;
use colored::Colorize;

/// Design a processing pipeline for a data type and sample set.
pub async fn design(session: &Session, data_type: &str, samples: &str, save: Option<&str>) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    println!("{}", "🔬 Designing pipeline...".cyan());
    println!();
    let text = reply_text(analyzer.design_pipeline(data_type, samples).await?)?;
    print_reply(&text, save, &session.results_dir())
}

/// Critical literature review of a topic.
pub async fn review(session: &Session, topic: &str, save: Option<&str>) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    println!("{}", "📚 Reviewing literature...".cyan());
    println!();
    let text = reply_text(analyzer.literature_review(topic).await?)?;
    print_reply(&text, save, &session.results_dir())
}

/// Statistical approach for an experiment.
pub async fn stats(session: &Session, experiment: &str, save: Option<&str>) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    println!("{}", "📊 Designing statistical approach...".cyan());
    println!();
    let text = reply_text(analyzer.statistical_design(experiment).await?)?;
    print_reply(&text, save, &session.results_dir())
}

/// Compare the focus family against the reference family.
pub async fn compare(session: &Session, aspect: &str, save: Option<&str>) -> anyhow::Result<()> {
    let analyzer = session.analyzer()?;
    println!("{}", "🔍 Comparing families...".cyan());
    println!();
    let text = reply_text(analyzer.compare_to_reference_family(aspect).await?)?;
    print_reply(&text, save, &session.results_dir())
}
