//! Native genome table commands: manifest and filter-genomes.

use super::output::banner;
use crate::config::Session;
use colored::Colorize;
use rumen_core::{ManifestBuilder, QualityThresholds, filter_reference_genomes};
use std::path::{Path, PathBuf};
use tracing::info;

/// Inputs for [`manifest`].
#[derive(Debug, Clone)]
pub struct ManifestArgs {
    pub gtdb_root: PathBuf,
    pub checkm_root: PathBuf,
    pub bins_root: PathBuf,
    pub out_dir: PathBuf,
    pub prefix: Option<String>,
    pub family: Option<String>,
    pub thresholds: QualityThresholds,
}

/// Build the all-bins and high-quality manifests for one family.
pub fn manifest(session: &Session, args: &ManifestArgs) -> anyhow::Result<()> {
    let family = args.family.clone().unwrap_or_else(|| session.study().focus_family);
    let prefix = args.prefix.clone().unwrap_or_else(|| family.to_lowercase());

    info!(family = %family, gtdb_root = %args.gtdb_root.display(), "Building manifest");
    let manifest = ManifestBuilder::new(&args.gtdb_root, &args.checkm_root, &args.bins_root, family.as_str())
        .with_thresholds(args.thresholds)
        .build()?;
    let files = manifest.write(&args.out_dir, &prefix)?;

    banner(&format!("{family} manifest"));
    println!("Bins classified as {family}: {}", manifest.all.len());
    println!(
        "High-quality (completeness >= {}, contamination <= {}): {}",
        args.thresholds.min_completeness,
        args.thresholds.max_contamination,
        manifest.high_quality.len().to_string().green().bold()
    );
    println!();
    println!("  {}", files.all.display());
    println!("  {}", files.high_quality.display());
    println!("  {}", files.bins_list.display());
    Ok(())
}

/// Select the most complete reference genomes passing the thresholds.
pub fn filter(metadata: &Path, out_dir: &Path, limit: usize, thresholds: &QualityThresholds) -> anyhow::Result<()> {
    let summary = filter_reference_genomes(metadata, out_dir, thresholds, limit)?;

    println!("Rows read: {}", summary.total_rows);
    println!(
        "Passing (completeness > {}, contamination < {}): {}",
        thresholds.min_completeness, thresholds.max_contamination, summary.passed
    );
    println!("Kept: {}", summary.kept.len().to_string().green().bold());
    println!("  {}", summary.table_path.display());
    println!("  {}", summary.accession_path.display());

    if summary.kept.is_empty() {
        println!("{}", "⚠️  No genomes passed the filter".yellow());
    } else {
        println!();
        println!("🚀 Next: rumen download-job --accessions {}", summary.accession_path.display());
    }
    Ok(())
}
