//! Integration tests for the analysis operations.

mod common;

use common::{CallKind, recording_router};
use rumen_core::prompts::{BIOINFORMATICS_SYSTEM, STATISTICS_SYSTEM};
use rumen_core::{AnalysisError, Analyzer, StudyContext, TaskRouter};

#[tokio::test]
async fn test_design_pipeline_embeds_both_parameters() {
    let (router, claude, gemini) = recording_router();
    let analyzer = Analyzer::new(router);

    let outcome = analyzer.design_pipeline("16S V4 amplicon sequencing", "50 gut samples").await.unwrap();
    assert_eq!(outcome.text(), Some("reply from A"));

    let calls = claude.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(gemini.call_count(), 0);
    assert_eq!(calls[0].system(), Some(BIOINFORMATICS_SYSTEM));

    let prompt = calls[0].user_text();
    assert!(prompt.contains("16S V4 amplicon sequencing"));
    assert!(prompt.contains("50 gut samples"));
    assert!(prompt.contains("Ruminococcaceae-specific considerations"));
}

#[tokio::test]
async fn test_literature_review_goes_only_to_backend_b() {
    let (router, claude, gemini) = recording_router();
    let analyzer = Analyzer::new(router);

    let outcome = analyzer.literature_review("dietary fiber metabolism").await.unwrap();
    assert_eq!(outcome.text(), Some("reply from B"));
    assert_eq!(claude.call_count(), 0);

    let calls = gemini.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].kind, CallKind::Text);
    let prompt = calls[0].user_text();
    assert!(prompt.contains("dietary fiber metabolism"));
    assert!(prompt.contains("Ruminococcaceae"));
    assert!(prompt.contains("Controversies or gaps in knowledge"));
}

#[tokio::test]
async fn test_statistical_design_uses_statistics_instruction() {
    let (router, claude, _gemini) = recording_router();
    let analyzer = Analyzer::new(router);

    analyzer.statistical_design("high vs low fiber, n=25 each").await.unwrap();

    let calls = claude.calls();
    assert_eq!(calls[0].system(), Some(STATISTICS_SYSTEM));
    let prompt = calls[0].user_text();
    assert!(prompt.contains("high vs low fiber, n=25 each"));
    assert!(prompt.contains("Multiple testing corrections"));
}

#[tokio::test]
async fn test_compare_routes_as_bioinformatics() {
    let (router, claude, gemini) = recording_router();
    let analyzer = Analyzer::new(router);

    analyzer.compare_to_reference_family("CAZyme profiles").await.unwrap();

    assert_eq!(gemini.call_count(), 0);
    let calls = claude.calls();
    assert_eq!(calls[0].system(), Some(BIOINFORMATICS_SYSTEM));
    let prompt = calls[0].user_text();
    assert!(prompt.contains("Lachnospiraceae"));
    assert!(prompt.contains("CAZyme profiles"));
}

#[tokio::test]
async fn test_missing_parameter_sends_nothing() {
    let (router, claude, gemini) = recording_router();
    let analyzer = Analyzer::new(router);

    let err = analyzer.statistical_design("").await.unwrap_err();
    assert!(matches!(err, AnalysisError::MissingParameter("experiment_description")));
    let err = analyzer.compare_to_reference_family("   ").await.unwrap_err();
    assert!(matches!(err, AnalysisError::MissingParameter("aspect")));
    assert_eq!(claude.call_count() + gemini.call_count(), 0);
}

#[tokio::test]
async fn test_offline_pipeline_echo_contains_instruction_and_parameters() {
    let analyzer = Analyzer::new(TaskRouter::offline(StudyContext::default(), 2000));
    let outcome = analyzer.design_pipeline("shotgun metagenome", "157 herptile fecal samples").await.unwrap();

    let text = outcome.text().unwrap();
    assert!(text.contains(BIOINFORMATICS_SYSTEM));
    assert!(text.contains("shotgun metagenome"));
    assert!(text.contains("157 herptile fecal samples"));
}
