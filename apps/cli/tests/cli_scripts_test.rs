//! Integration tests for the script-generating commands in offline mode.
//!
//! Offline replies echo the request, so the fenced example in each request is
//! what gets extracted.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn rumen(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("rumen").unwrap();
    cmd.current_dir(temp_dir.path())
        .env("HOME", temp_dir.path())
        .env("NO_COLOR", "1")
        .env_remove("ANTHROPIC_API_KEY")
        .env_remove("GOOGLE_API_KEY")
        .env_remove("GEMINI_API_KEY");
    cmd
}

#[test]
fn test_download_job_writes_executable_script() {
    let temp_dir = TempDir::new().unwrap();
    let list = temp_dir.path().join("data").join("filtered_genomes").join("accession_list.txt");
    fs::create_dir_all(list.parent().unwrap()).unwrap();
    fs::write(&list, "RS_GCF_000000002.1\nGB_GCA_000000001.1\n").unwrap();

    rumen(&temp_dir)
        .args(["--offline", "download-job"])
        .assert()
        .success()
        .stdout(predicate::str::contains("I have 2 Ruminococcaceae genome accessions"))
        .stdout(predicate::str::contains("Created:"));

    let job = temp_dir.path().join("jobs").join("03_download_final.sh");
    let script = fs::read_to_string(&job).unwrap();
    assert!(script.starts_with("#!/bin/bash"));
    assert!(!script.contains("```"));

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(&job).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }
}

#[test]
fn test_auto_filter_saves_without_running() {
    let temp_dir = TempDir::new().unwrap();
    let metadata = temp_dir.path().join("meta.tsv");
    fs::write(&metadata, "GB_GCA_1.1\tx\t95.0\t1.0\nGB_GCA_2.1\tx\t91.0\t2.0\n").unwrap();

    rumen(&temp_dir)
        .args(["--offline", "auto-filter", "--output", "scripts/filter.py"])
        .arg("--metadata")
        .arg(&metadata)
        .assert()
        .success()
        .stdout(predicate::str::contains("- Total columns: 4"))
        .stdout(predicate::str::contains("it was not executed"));

    let script = fs::read_to_string(temp_dir.path().join("scripts").join("filter.py")).unwrap();
    assert_eq!(script, "[your code here]\n");
    assert!(!temp_dir.path().join("data").join("filtered_genomes").exists());
}

#[test]
fn test_auto_filter_requires_metadata() {
    let temp_dir = TempDir::new().unwrap();

    rumen(&temp_dir).args(["--offline", "auto-filter", "--metadata", "missing.tsv"]).assert().failure();
}

#[test]
fn test_evaluate_writes_report() {
    let temp_dir = TempDir::new().unwrap();

    rumen(&temp_dir)
        .args(["--offline", "evaluate"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Evaluation complete"));

    let report = fs::read_to_string(temp_dir.path().join("results").join("project_evaluation.txt")).unwrap();
    assert!(report.contains("SCIENTIFIC EVALUATION"));
    assert!(report.contains("Is this publishable?"));
}

#[test]
fn test_plan_writes_three_parts() {
    let temp_dir = TempDir::new().unwrap();

    rumen(&temp_dir).args(["--offline", "plan"]).assert().success();

    let report =
        fs::read_to_string(temp_dir.path().join("results").join("comparative_genomics_plan.txt")).unwrap();
    assert!(report.contains("[PART 1: Download Strategy & Requirements]"));
    assert!(report.contains("[PART 2: Comparative Analysis Pipeline & Resources]"));
    assert!(report.contains("[PART 3: Statistical Analysis & Visualization Resources]"));
    assert!(report.contains("Dataset: 284 high-quality herptile Ruminococcaceae MAGs"));
}
