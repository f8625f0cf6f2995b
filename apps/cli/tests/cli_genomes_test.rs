//! Integration tests for the native genome table commands.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn rumen(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rumen").unwrap();
    cmd.current_dir(temp_dir.path()).env("HOME", temp_dir.path()).env("NO_COLOR", "1");
    cmd
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_filter_genomes_keeps_strictly_passing_rows() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir.path().join("reference_genomes").join("ruminococcaceae_metadata.tsv"),
        "GB_GCA_000000001.1\tx\t95.0\t1.0\n\
         RS_GCF_000000002.1\tx\t99.0\t0.2\n\
         GB_GCA_000000003.1\tx\t90.0\t1.0\n\
         GB_GCA_000000004.1\tx\t97.0\t5.0\n\
         GB_GCA_000000005.1\tx\tn/a\t1.0\n",
    );

    rumen(&temp_dir)
        .arg("filter-genomes")
        .assert()
        .success()
        .stdout(predicate::str::contains("Rows read: 5"))
        .stdout(predicate::str::contains("Kept: 2"));

    let out = temp_dir.path().join("data").join("filtered_genomes");
    let accessions = fs::read_to_string(out.join("accession_list.txt")).unwrap();
    assert_eq!(accessions.lines().collect::<Vec<_>>(), vec!["RS_GCF_000000002.1", "GB_GCA_000000001.1"]);

    let table = fs::read_to_string(out.join("high_quality_genomes.tsv")).unwrap();
    assert_eq!(table.lines().count(), 2);
}

#[test]
fn test_filter_genomes_limit_and_thresholds() {
    let temp_dir = TempDir::new().unwrap();
    let metadata = temp_dir.path().join("meta.tsv");
    write(&metadata, "A\tx\t80.0\t9.0\nB\tx\t85.0\t8.0\nC\tx\t70.0\t1.0\n");

    rumen(&temp_dir)
        .args(["filter-genomes", "--limit", "1", "--min-completeness", "75", "--max-contamination", "10"])
        .arg("--metadata")
        .arg(&metadata)
        .arg("--out-dir")
        .arg("out")
        .assert()
        .success()
        .stdout(predicate::str::contains("Kept: 1"));

    let accessions = fs::read_to_string(temp_dir.path().join("out").join("accession_list.txt")).unwrap();
    assert_eq!(accessions.trim(), "B");
}

#[test]
fn test_filter_genomes_missing_metadata_fails() {
    let temp_dir = TempDir::new().unwrap();

    rumen(&temp_dir).args(["filter-genomes", "--metadata", "nope.tsv"]).assert().failure();
}

#[test]
fn test_manifest_builds_family_tables() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        &root.join("gtdb").join("S1").join("gtdbtk.bac120.summary.tsv"),
        "user_genome\tclassification\n\
         bin.1\td__Bacteria;f__Ruminococcaceae;g__Ruminococcus\n\
         bin.2\td__Bacteria;f__Lachnospiraceae;g__Blautia\n",
    );
    write(
        &root.join("checkm").join("S1").join("summary_table.tsv"),
        "Bin Id\tMarker lineage\tCompleteness\tContamination\nbin.1\tc__Clostridia\t96.0\t1.0\n",
    );

    rumen(&temp_dir)
        .args(["manifest", "--gtdb-root", "gtdb", "--checkm-root", "checkm", "--bins-root", "bins"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bins classified as Ruminococcaceae: 1"));

    let data = root.join("data");
    assert!(data.join("ruminococcaceae_all_manifest.tsv").exists());
    let bins = fs::read_to_string(data.join("ruminococcaceae_HQ_bins.txt")).unwrap();
    assert_eq!(bins.lines().count(), 1);
    assert!(bins.trim_end().ends_with("bin.1.fa"));
}

#[test]
fn test_manifest_other_family_and_prefix() {
    let temp_dir = TempDir::new().unwrap();
    write(
        &temp_dir.path().join("gtdb").join("S1").join("gtdbtk.bac120.summary.tsv"),
        "user_genome\tclassification\nbin.2\td__Bacteria;f__Lachnospiraceae;g__Blautia\n",
    );

    rumen(&temp_dir)
        .args(["manifest", "--gtdb-root", "gtdb", "--checkm-root", "checkm", "--bins-root", "bins"])
        .args(["--family", "Lachnospiraceae", "--prefix", "lachno", "--out-dir", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Bins classified as Lachnospiraceae: 1"));

    let hq = fs::read_to_string(temp_dir.path().join("out").join("lachno_HQ_manifest.tsv")).unwrap();
    assert_eq!(hq.lines().count(), 1);
}
