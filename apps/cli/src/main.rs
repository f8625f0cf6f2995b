//! Rumen CLI - Command-line interface for the Rumen research assistant
//!
//! This CLI provides a `rumen` command that routes microbiome analysis
//! questions to hosted models and filters genome quality tables.

mod commands;
mod config;

use clap::{CommandFactory, Parser, Subcommand};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{analysis, ask, auto_filter, check, download_job, genomes, interactive, models, project, workflow};
use config::Session;

/// Rumen CLI - Multi-provider assistant for comparative genomics
///
/// Rumen routes pipeline, literature and statistics questions to the model
/// best suited for each and keeps the replies as plain-text results.
#[derive(Parser, Debug)]
#[command(
    name = "rumen",
    author,
    version,
    about = "Rumen - Multi-provider assistant for microbial comparative genomics",
    long_about = "Rumen routes analysis questions to Claude or Gemini depending on the task,\nextracts scripts from the replies and filters GTDB-Tk and CheckM tables."
)]
struct Args {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    /// Configuration file (overrides discovered rumen.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Credential file with KEY=VALUE lines
    #[arg(long, global = true)]
    credentials: Option<PathBuf>,

    /// Answer with local echo backends instead of calling providers
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report which provider keys are configured
    Check {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List Gemini models that support content generation
    Models {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Send a raw query for a task type
    ///
    /// Task types: bioinformatics-and-pipeline-design (bioinformatics),
    /// literature-and-interpretation (literature), statistical-analysis (analysis).
    Ask {
        /// Task type tag
        task_type: String,

        /// Query text
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Save the reply under the results directory
        #[arg(long)]
        save: Option<String>,
    },

    /// Design a bioinformatics pipeline
    Design {
        /// Kind of data (e.g. "16S amplicon", "metagenome")
        #[arg(long)]
        data_type: String,

        /// Sample information
        #[arg(long)]
        samples: String,

        /// Save the reply under the results directory
        #[arg(long)]
        save: Option<String>,
    },

    /// Critical literature review of a topic
    Review {
        /// Topic
        #[arg(required = true, num_args = 1..)]
        topic: Vec<String>,

        /// Save the reply under the results directory
        #[arg(long)]
        save: Option<String>,
    },

    /// Statistical approach for an experiment
    Stats {
        /// Experiment description
        #[arg(required = true, num_args = 1..)]
        experiment: Vec<String>,

        /// Save the reply under the results directory
        #[arg(long)]
        save: Option<String>,
    },

    /// Compare the focus family against the reference family
    Compare {
        /// Aspect to compare
        #[arg(required = true, num_args = 1..)]
        aspect: Vec<String>,

        /// Save the reply under the results directory
        #[arg(long)]
        save: Option<String>,
    },

    /// Run the example pipeline, literature and statistics workflow
    Workflow,

    /// Menu-driven analysis session
    Interactive,

    /// Evaluate the scientific merit of the MAG project
    Evaluate,

    /// Plan comparative genomics with resource requirements
    Plan,

    /// Ask for the minimum publishable analysis pipeline
    Prioritize,

    /// Generate a SLURM download job for reference accessions
    DownloadJob {
        /// Accession list the job should read
        #[arg(long, default_value = "data/filtered_genomes/accession_list.txt")]
        accessions: PathBuf,

        /// Where to write the job script
        #[arg(long, default_value = "jobs/03_download_final.sh")]
        output: PathBuf,
    },

    /// Generate a filter script for a reference metadata table
    ///
    /// The generated code is saved for review and never run.
    AutoFilter {
        /// Headerless GTDB metadata table
        #[arg(long, default_value = "reference_genomes/ruminococcaceae_metadata.tsv")]
        metadata: PathBuf,

        /// Where to write the generated script
        #[arg(long, default_value = "scripts/filter_genomes_auto.py")]
        output: PathBuf,
    },

    /// Build MAG manifests from GTDB-Tk and CheckM results
    Manifest {
        /// Root searched for gtdbtk.bac120.summary.tsv files
        #[arg(long)]
        gtdb_root: PathBuf,

        /// Root holding <sample>/summary_table.tsv CheckM files
        #[arg(long)]
        checkm_root: PathBuf,

        /// Root holding <sample>/bins/<bin>.fa files
        #[arg(long)]
        bins_root: PathBuf,

        /// Output directory
        #[arg(long, default_value = "data")]
        out_dir: PathBuf,

        /// File name prefix (defaults to the focus family in lower case)
        #[arg(long)]
        prefix: Option<String>,

        /// Family to keep (defaults to the configured focus family)
        #[arg(long)]
        family: Option<String>,

        /// Minimum completeness, inclusive
        #[arg(long, default_value_t = 90.0)]
        min_completeness: f64,

        /// Maximum contamination, inclusive
        #[arg(long, default_value_t = 5.0)]
        max_contamination: f64,
    },

    /// Select high-quality reference genomes from GTDB metadata
    FilterGenomes {
        /// Headerless GTDB metadata table
        #[arg(long, default_value = "reference_genomes/ruminococcaceae_metadata.tsv")]
        metadata: PathBuf,

        /// Output directory
        #[arg(long, default_value = "data/filtered_genomes")]
        out_dir: PathBuf,

        /// Number of genomes to keep
        #[arg(long, default_value_t = 300)]
        limit: usize,

        /// Completeness must be above this
        #[arg(long, default_value_t = 90.0)]
        min_completeness: f64,

        /// Contamination must be below this
        #[arg(long, default_value_t = 5.0)]
        max_contamination: f64,
    },
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let rumen_config = config::load_config(args.config.as_deref())?;

    // Initialize tracing
    let level_name = args.log_level.as_deref().or(rumen_config.log_level.as_deref()).unwrap_or("info");
    let level = match level_name {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .without_time()
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let session = Session::new(rumen_config, args.credentials.as_deref(), args.offline);

    // Export loaded secrets for child tools (only if not already set)
    // SAFETY: no other threads exist yet; the runtime is built afterwards.
    unsafe {
        session.credentials.apply_to_env();
    }

    // If no command provided, show help
    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    runtime.block_on(run(command, &session))
}

async fn run(command: Command, session: &Session) -> anyhow::Result<()> {
    match command {
        Command::Check { json } => check::execute(session, json),
        Command::Models { json } => models::execute(session, json).await,
        Command::Ask { task_type, query, save } => {
            ask::execute(session, &task_type, &query.join(" "), save.as_deref()).await
        }
        Command::Design { data_type, samples, save } => {
            analysis::design(session, &data_type, &samples, save.as_deref()).await
        }
        Command::Review { topic, save } => analysis::review(session, &topic.join(" "), save.as_deref()).await,
        Command::Stats { experiment, save } => {
            analysis::stats(session, &experiment.join(" "), save.as_deref()).await
        }
        Command::Compare { aspect, save } => analysis::compare(session, &aspect.join(" "), save.as_deref()).await,
        Command::Workflow => workflow::execute(session).await,
        Command::Interactive => interactive::execute(session).await,
        Command::Evaluate => project::evaluate(session).await,
        Command::Plan => project::plan(session).await,
        Command::Prioritize => project::prioritize(session).await,
        Command::DownloadJob { accessions, output } => download_job::execute(session, &accessions, &output).await,
        Command::AutoFilter { metadata, output } => auto_filter::execute(session, &metadata, &output).await,
        Command::Manifest {
            gtdb_root,
            checkm_root,
            bins_root,
            out_dir,
            prefix,
            family,
            min_completeness,
            max_contamination,
        } => genomes::manifest(
            session,
            &genomes::ManifestArgs {
                gtdb_root,
                checkm_root,
                bins_root,
                out_dir,
                prefix,
                family,
                thresholds: rumen_core::QualityThresholds { min_completeness, max_contamination },
            },
        ),
        Command::FilterGenomes { metadata, out_dir, limit, min_completeness, max_contamination } => {
            genomes::filter(
                &metadata,
                &out_dir,
                limit,
                &rumen_core::QualityThresholds { min_completeness, max_contamination },
            )
        }
    }
}
