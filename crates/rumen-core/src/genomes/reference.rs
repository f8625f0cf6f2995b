//! Reference genome selection from headerless GTDB metadata.

use super::{GenomeError, GenomeResult, QualityThresholds, tsv_reader, tsv_writer};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default number of references kept.
pub const DEFAULT_REFERENCE_LIMIT: usize = 300;

const ACCESSION_COLUMN: usize = 0;
const COMPLETENESS_COLUMN: usize = 2;
const CONTAMINATION_COLUMN: usize = 3;

/// A metadata row that passed the quality filter.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceGenome {
    /// Accession, prefix included (`GB_GCA_…` or `RS_GCF_…`).
    pub accession: String,
    /// Completeness in percent.
    pub completeness: f64,
    /// Contamination in percent.
    pub contamination: f64,
    /// The full original row.
    pub fields: Vec<String>,
}

/// What [`filter_reference_genomes`] read and wrote.
#[derive(Debug, Clone)]
pub struct ReferenceFilterSummary {
    /// Rows read.
    pub total_rows: usize,
    /// Rows passing the thresholds.
    pub passed: usize,
    /// Genomes kept after the limit, best completeness first.
    pub kept: Vec<ReferenceGenome>,
    /// Filtered rows.
    pub table_path: PathBuf,
    /// Kept accessions, one per line.
    pub accession_path: PathBuf,
}

fn parse_row(fields: Vec<String>) -> Option<ReferenceGenome> {
    let number = |column: usize| fields.get(column)?.trim().parse::<f64>().ok().filter(|v| !v.is_nan());
    let completeness = number(COMPLETENESS_COLUMN)?;
    let contamination = number(CONTAMINATION_COLUMN)?;
    let accession = fields.get(ACCESSION_COLUMN)?.trim().to_string();
    Some(ReferenceGenome { accession, completeness, contamination, fields })
}

/// Keeps rows with completeness above and contamination below the thresholds,
/// then the `limit` most complete.
///
/// Writes `high_quality_genomes.tsv` and `accession_list.txt` into `out_dir`.
/// Rows whose metric columns are missing or not numeric are dropped.
///
/// # Errors
///
/// Returns an error if the metadata cannot be read or the outputs cannot be written.
pub fn filter_reference_genomes(
    metadata: &Path,
    out_dir: &Path,
    thresholds: &QualityThresholds,
    limit: usize,
) -> GenomeResult<ReferenceFilterSummary> {
    let mut reader = tsv_reader(metadata, false)?;
    let mut total_rows = 0;
    let mut passing = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| GenomeError::csv(metadata, e))?;
        total_rows += 1;
        let Some(genome) = parse_row(record.iter().map(str::to_string).collect()) else {
            debug!(row = total_rows, "Skipping row without numeric quality columns");
            continue;
        };
        if thresholds.admits_strictly(genome.completeness, genome.contamination) {
            passing.push(genome);
        }
    }

    let passed = passing.len();
    passing.sort_by(|a, b| b.completeness.total_cmp(&a.completeness));
    passing.truncate(limit);

    let table_path = out_dir.join("high_quality_genomes.tsv");
    let accession_path = out_dir.join("accession_list.txt");

    let mut writer = tsv_writer(&table_path)?;
    for genome in &passing {
        writer.write_record(&genome.fields).map_err(|e| GenomeError::csv(&table_path, e))?;
    }
    writer.flush().map_err(|e| GenomeError::io(&table_path, e))?;

    let mut list = std::fs::File::create(&accession_path).map_err(|e| GenomeError::io(&accession_path, e))?;
    for genome in &passing {
        writeln!(list, "{}", genome.accession).map_err(|e| GenomeError::io(&accession_path, e))?;
    }

    info!(total_rows, passed, kept = passing.len(), "Filtered reference genomes");
    Ok(ReferenceFilterSummary { total_rows, passed, kept: passing, table_path, accession_path })
}
