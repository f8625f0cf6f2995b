//! MAG manifest from GTDB-Tk classifications and CheckM quality tables.

use super::{GenomeError, GenomeResult, QualityThresholds, tsv_reader, tsv_writer};
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

const GTDB_SUMMARY: &str = "gtdbtk.bac120.summary.tsv";
const CHECKM_SUMMARY: &str = "summary_table.tsv";

#[derive(Debug, Deserialize)]
struct GtdbRow {
    user_genome: String,
    #[serde(default)]
    classification: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckmRow {
    #[serde(rename = "Bin Id")]
    bin_id: String,
    #[serde(rename = "Completeness")]
    completeness: Option<f64>,
    #[serde(rename = "Contamination")]
    contamination: Option<f64>,
}

/// One classified bin.
#[derive(Debug, Clone, PartialEq)]
pub struct ManifestRow {
    /// Bin id as reported by GTDB-Tk.
    pub bin_id: String,
    /// Sample the bin came from.
    pub sample_id: String,
    /// Full GTDB taxonomy string.
    pub classification: String,
    /// Expected location of the bin's FASTA file.
    pub mag_path: PathBuf,
    /// Summary file the row was read from.
    pub gtdb_file: PathBuf,
    /// CheckM completeness, when a quality row matched.
    pub completeness: Option<f64>,
    /// CheckM contamination, when a quality row matched.
    pub contamination: Option<f64>,
}

impl ManifestRow {
    /// `completeness − 5 × contamination`, when both are known.
    pub fn quality_score(&self) -> Option<f64> {
        Some(self.completeness? - 5.0 * self.contamination?)
    }

    fn is_high_quality(&self, thresholds: &QualityThresholds) -> bool {
        match (self.completeness, self.contamination) {
            (Some(completeness), Some(contamination)) => thresholds.admits(completeness, contamination),
            _ => false,
        }
    }
}

/// Collects bins of one family and joins their quality metrics.
#[derive(Debug, Clone)]
pub struct ManifestBuilder {
    gtdb_root: PathBuf,
    checkm_root: PathBuf,
    bins_root: PathBuf,
    family: String,
    thresholds: QualityThresholds,
}

/// Every classified bin of the family plus the high-quality subset.
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// All bins, in discovery order.
    pub all: Vec<ManifestRow>,
    /// High-quality bins, best quality score first.
    pub high_quality: Vec<ManifestRow>,
}

/// Paths written by [`Manifest::write`].
#[derive(Debug, Clone)]
pub struct ManifestFiles {
    /// All bins.
    pub all: PathBuf,
    /// High-quality bins.
    pub high_quality: PathBuf,
    /// High-quality MAG paths, one per line.
    pub bins_list: PathBuf,
}

/// Glob pattern for `parts` under `root`, with the root matched literally.
fn search_pattern(root: &Path, parts: &[&str]) -> String {
    let mut pattern = glob::Pattern::escape(&root.to_string_lossy());
    for part in parts {
        if !pattern.is_empty() && !pattern.ends_with('/') {
            pattern.push('/');
        }
        pattern.push_str(part);
    }
    pattern
}

impl ManifestBuilder {
    /// Creates a builder over the three result roots.
    pub fn new(
        gtdb_root: impl Into<PathBuf>,
        checkm_root: impl Into<PathBuf>,
        bins_root: impl Into<PathBuf>,
        family: impl Into<String>,
    ) -> Self {
        Self {
            gtdb_root: gtdb_root.into(),
            checkm_root: checkm_root.into(),
            bins_root: bins_root.into(),
            family: family.into(),
            thresholds: QualityThresholds::default(),
        }
    }

    /// Overrides the quality cut-offs.
    #[must_use]
    pub fn with_thresholds(mut self, thresholds: QualityThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Scans the roots and builds the manifest.
    ///
    /// Unreadable GTDB-Tk or CheckM files are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`GenomeError::Pattern`] if a root path cannot form a search pattern.
    pub fn build(&self) -> GenomeResult<Manifest> {
        let mut all = self.classified_bins()?;
        let quality = self.quality_metrics()?;

        for row in &mut all {
            if let Some(&(completeness, contamination)) =
                quality.get(&(row.sample_id.clone(), row.bin_id.clone()))
            {
                row.completeness = completeness;
                row.contamination = contamination;
            }
        }

        let mut high_quality: Vec<ManifestRow> =
            all.iter().filter(|row| row.is_high_quality(&self.thresholds)).cloned().collect();
        high_quality.sort_by(|a, b| {
            b.quality_score().unwrap_or(f64::MIN).total_cmp(&a.quality_score().unwrap_or(f64::MIN))
        });

        info!(
            family = %self.family,
            total = all.len(),
            high_quality = high_quality.len(),
            "Manifest built"
        );
        Ok(Manifest { all, high_quality })
    }

    fn classified_bins(&self) -> GenomeResult<Vec<ManifestRow>> {
        let marker = format!("f__{}", self.family);
        let pattern = search_pattern(&self.gtdb_root, &["**", GTDB_SUMMARY]);
        let mut rows = Vec::new();

        for gtdb_file in glob::glob(&pattern)?.flatten() {
            let sample_id = gtdb_file
                .parent()
                .and_then(Path::file_name)
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();

            match self.read_gtdb(&gtdb_file, &sample_id, &marker) {
                Ok(found) => {
                    debug!(file = %gtdb_file.display(), bins = found.len(), "Read classifications");
                    rows.extend(found);
                }
                Err(e) => warn!(file = %gtdb_file.display(), error = %e, "Skipping unreadable classification file"),
            }
        }
        Ok(rows)
    }

    fn read_gtdb(&self, gtdb_file: &Path, sample_id: &str, marker: &str) -> GenomeResult<Vec<ManifestRow>> {
        let mut reader = tsv_reader(gtdb_file, true)?;
        let mut rows = Vec::new();

        for record in reader.deserialize::<GtdbRow>() {
            let record = record.map_err(|e| GenomeError::csv(gtdb_file, e))?;
            let Some(classification) = record.classification.filter(|c| c.contains(marker)) else {
                continue;
            };
            rows.push(ManifestRow {
                mag_path: self.bins_root.join(sample_id).join("bins").join(format!("{}.fa", record.user_genome)),
                bin_id: record.user_genome,
                sample_id: sample_id.to_string(),
                classification,
                gtdb_file: gtdb_file.to_path_buf(),
                completeness: None,
                contamination: None,
            });
        }
        Ok(rows)
    }

    fn quality_metrics(&self) -> GenomeResult<HashMap<(String, String), (Option<f64>, Option<f64>)>> {
        let pattern = search_pattern(&self.checkm_root, &["*", CHECKM_SUMMARY]);
        let mut metrics = HashMap::new();

        for summary in glob::glob(&pattern)?.flatten() {
            let Some(sample_id) = summary.parent().and_then(Path::file_name) else {
                continue;
            };
            let sample_id = sample_id.to_string_lossy().into_owned();

            let rows = tsv_reader(&summary, true).and_then(|mut reader| {
                reader
                    .deserialize::<CheckmRow>()
                    .collect::<Result<Vec<_>, _>>()
                    .map_err(|e| GenomeError::csv(&summary, e))
            });
            match rows {
                Ok(rows) => {
                    for row in rows {
                        metrics
                            .entry((sample_id.clone(), row.bin_id))
                            .or_insert((row.completeness, row.contamination));
                    }
                }
                Err(e) => warn!(file = %summary.display(), error = %e, "Skipping unreadable quality table"),
            }
        }
        Ok(metrics)
    }
}

fn format_metric(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

impl Manifest {
    /// Writes `{prefix}_all_manifest.tsv`, `{prefix}_HQ_manifest.tsv` and
    /// `{prefix}_HQ_bins.txt` into `out_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if any file cannot be written.
    pub fn write(&self, out_dir: &Path, prefix: &str) -> GenomeResult<ManifestFiles> {
        let files = ManifestFiles {
            all: out_dir.join(format!("{prefix}_all_manifest.tsv")),
            high_quality: out_dir.join(format!("{prefix}_HQ_manifest.tsv")),
            bins_list: out_dir.join(format!("{prefix}_HQ_bins.txt")),
        };

        write_table(&files.all, &self.all, false)?;
        write_table(&files.high_quality, &self.high_quality, true)?;

        let mut list = std::fs::File::create(&files.bins_list).map_err(|e| GenomeError::io(&files.bins_list, e))?;
        for row in &self.high_quality {
            writeln!(list, "{}", row.mag_path.display()).map_err(|e| GenomeError::io(&files.bins_list, e))?;
        }

        Ok(files)
    }
}

fn write_table(path: &Path, rows: &[ManifestRow], with_score: bool) -> GenomeResult<()> {
    let mut writer = tsv_writer(path)?;
    let mut header =
        vec!["bin_id", "sample_id", "classification", "mag_path", "gtdb_file", "Completeness", "Contamination"];
    if with_score {
        header.push("quality_score");
    }
    writer.write_record(&header).map_err(|e| GenomeError::csv(path, e))?;

    for row in rows {
        let mut record = vec![
            row.bin_id.clone(),
            row.sample_id.clone(),
            row.classification.clone(),
            row.mag_path.display().to_string(),
            row.gtdb_file.display().to_string(),
            format_metric(row.completeness),
            format_metric(row.contamination),
        ];
        if with_score {
            record.push(format_metric(row.quality_score()));
        }
        writer.write_record(&record).map_err(|e| GenomeError::csv(path, e))?;
    }

    writer.flush().map_err(|e| GenomeError::io(path, e))
}
