//! End-to-end routing against mock provider endpoints.

use mockito::Matcher;
use rumen_core::config::ModelsConfig;
use rumen_core::{BackendKind, CredentialSet, RumenConfig, TaskRouter};

fn config_for(server: &mockito::Server) -> RumenConfig {
    RumenConfig {
        models: ModelsConfig {
            anthropic_base_url: Some(format!("{}/anthropic", server.url())),
            gemini_base_url: Some(format!("{}/gemini", server.url())),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn credentials() -> CredentialSet {
    CredentialSet::from_pairs([("ANTHROPIC_API_KEY", "sk-test"), ("GOOGLE_API_KEY", "g-test")])
}

#[tokio::test]
async fn test_bioinformatics_request_over_http() {
    let mut server = mockito::Server::new_async().await;
    let claude = server
        .mock("POST", "/anthropic/messages")
        .match_header("x-api-key", "sk-test")
        .match_body(Matcher::PartialJson(serde_json::json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 2000,
            "system": "You are an expert bioinformatician specializing in microbiome analysis and metagenomics.",
            "messages": [{"role": "user", "content": "Which binner?"}]
        })))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"content":[{"type":"text","text":"MetaBAT2"}],"model":"claude-sonnet-4-20250514"}"#)
        .create_async()
        .await;

    let router = TaskRouter::from_config(&config_for(&server), &credentials()).unwrap();
    let response = router.route("bioinformatics", "Which binner?").await.unwrap().into_result().unwrap();

    assert_eq!(response.backend, BackendKind::Claude);
    assert_eq!(response.text, "MetaBAT2");
    claude.assert_async().await;
}

#[tokio::test]
async fn test_literature_request_over_http() {
    let mut server = mockito::Server::new_async().await;
    let gemini = server
        .mock("POST", "/gemini/models/gemini-2.5-flash:generateContent")
        .match_query(Matcher::UrlEncoded("key".into(), "g-test".into()))
        .match_body(Matcher::Regex("role of X".to_string()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"Fiber degraders."}]}}]}"#)
        .create_async()
        .await;
    let claude = server.mock("POST", "/anthropic/messages").expect(0).create_async().await;

    let router = TaskRouter::from_config(&config_for(&server), &credentials()).unwrap();
    let outcome = router.route("literature-and-interpretation", "role of X").await.unwrap();

    assert_eq!(outcome.text(), Some("Fiber degraders."));
    gemini.assert_async().await;
    claude.assert_async().await;
}

#[tokio::test]
async fn test_rejection_never_contacts_providers() {
    let mut server = mockito::Server::new_async().await;
    let any = server.mock("POST", Matcher::Any).expect(0).create_async().await;

    let router = TaskRouter::from_config(&config_for(&server), &credentials()).unwrap();
    assert!(router.route("unknown", "query").await.unwrap().is_rejected());
    any.assert_async().await;
}
