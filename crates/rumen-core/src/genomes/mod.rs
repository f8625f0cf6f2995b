//! Genome quality tables.
//!
//! Tab-separated GTDB-Tk, CheckM and reference-metadata tables are filtered
//! natively here. Nothing in this module talks to a model.

mod manifest;
mod reference;

pub use manifest::{Manifest, ManifestBuilder, ManifestFiles, ManifestRow};
pub use reference::{
    DEFAULT_REFERENCE_LIMIT, ReferenceFilterSummary, ReferenceGenome, filter_reference_genomes,
};

use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from genome table operations.
#[derive(Debug, Error)]
pub enum GenomeError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A table could not be parsed or written.
    #[error("Table error in {path}: {source}")]
    Csv {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: csv::Error,
    },

    /// A search pattern was invalid.
    #[error("Invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// The table had no header row.
    #[error("Table is empty: {0}")]
    EmptyTable(PathBuf),
}

impl GenomeError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        Self::Io { path: path.to_path_buf(), source }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv { path: path.to_path_buf(), source }
    }
}

/// Result type for genome table operations.
pub type GenomeResult<T> = std::result::Result<T, GenomeError>;

/// Completeness and contamination cut-offs, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualityThresholds {
    /// Lowest acceptable completeness.
    pub min_completeness: f64,
    /// Highest acceptable contamination.
    pub max_contamination: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self { min_completeness: 90.0, max_contamination: 5.0 }
    }
}

impl QualityThresholds {
    /// Bounds included: completeness ≥ min and contamination ≤ max.
    pub fn admits(&self, completeness: f64, contamination: f64) -> bool {
        completeness >= self.min_completeness && contamination <= self.max_contamination
    }

    /// Bounds excluded: completeness > min and contamination < max.
    pub fn admits_strictly(&self, completeness: f64, contamination: f64) -> bool {
        completeness > self.min_completeness && contamination < self.max_contamination
    }
}

pub(crate) fn tsv_reader(path: &Path, has_headers: bool) -> GenomeResult<csv::Reader<std::fs::File>> {
    csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(has_headers)
        .flexible(true)
        .from_path(path)
        .map_err(|e| GenomeError::csv(path, e))
}

pub(crate) fn tsv_writer(path: &Path) -> GenomeResult<csv::Writer<std::fs::File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| GenomeError::io(parent, e))?;
    }
    csv::WriterBuilder::new()
        .delimiter(b'\t')
        .flexible(true)
        .from_path(path)
        .map_err(|e| GenomeError::csv(path, e))
}

/// Shape of a table: column count, leading column names and first rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TablePreview {
    /// Number of columns in the first row.
    pub column_count: usize,
    /// Up to the first 20 column names.
    pub columns: Vec<String>,
    /// First data rows.
    pub rows: Vec<Vec<String>>,
}

/// Maximum number of column names kept in a preview.
pub const PREVIEW_COLUMNS: usize = 20;

/// Reads the first row as column names plus up to `rows` data rows.
///
/// # Errors
///
/// Returns [`GenomeError::EmptyTable`] when the file has no rows at all.
pub fn preview_table(path: &Path, rows: usize) -> GenomeResult<TablePreview> {
    let mut reader = tsv_reader(path, false)?;
    let mut records = reader.records();

    let header = match records.next() {
        Some(record) => record.map_err(|e| GenomeError::csv(path, e))?,
        None => return Err(GenomeError::EmptyTable(path.to_path_buf())),
    };

    let mut preview_rows = Vec::with_capacity(rows);
    for record in records.take(rows) {
        let record = record.map_err(|e| GenomeError::csv(path, e))?;
        preview_rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(TablePreview {
        column_count: header.len(),
        columns: header.iter().take(PREVIEW_COLUMNS).map(str::to_string).collect(),
        rows: preview_rows,
    })
}

impl fmt::Display for TablePreview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "- Total columns: {}", self.column_count)?;
        writeln!(f, "- Sample columns: [{}]", self.columns.join(", "))?;
        writeln!(f, "- First few rows:")?;
        for row in &self.rows {
            writeln!(f, "{}", row.join("\t"))?;
        }
        Ok(())
    }
}
