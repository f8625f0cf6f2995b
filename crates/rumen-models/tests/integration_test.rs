//! Integration tests for model providers.

use rumen_abstraction::{ChatMessage, Model, ModelError};
use rumen_models::{ClaudeModel, GeminiModel, MockModel, ModelConfig, ModelFactory, ModelType};

#[tokio::test]
async fn test_mock_model_text_generation() {
    let model = MockModel::new("test-model".to_string());
    let result = model.generate_text("Hello", None).await.unwrap();

    assert!(result.content.contains("[user] Hello"));
    assert!(result.usage.is_some());
}

#[tokio::test]
async fn test_model_factory_mock() {
    let model = ModelFactory::create_from_str("mock", "mock-model".to_string(), None).unwrap();
    assert_eq!(model.model_id(), "mock-model");

    let reply = model
        .generate_chat_completion(&[ChatMessage::system("sys"), ChatMessage::user("q")], None)
        .await
        .unwrap();
    assert_eq!(reply.content, "[system] sys\n[user] q\n");
}

#[tokio::test]
async fn test_model_factory_invalid_type() {
    let err = ModelFactory::create_from_str("invalid", "test".to_string(), None).err().unwrap();
    assert!(matches!(err, ModelError::UnsupportedModelProvider(_)));
}

#[tokio::test]
async fn test_factory_models_hit_configured_endpoints() {
    let mut server = mockito::Server::new_async().await;
    let claude_mock = server
        .mock("POST", "/anthropic/messages")
        .with_status(200)
        .with_body(r#"{"content":[{"type":"text","text":"from claude"}]}"#)
        .create_async()
        .await;
    let gemini_mock = server
        .mock("POST", "/gemini/models/gemini-2.5-flash:generateContent")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_body(r#"{"candidates":[{"content":{"parts":[{"text":"from gemini"}]}}]}"#)
        .create_async()
        .await;

    let claude = ModelFactory::create(
        ModelConfig::new(ModelType::Claude, "claude-sonnet-4-20250514".to_string())
            .with_api_key("a".to_string())
            .with_base_url(format!("{}/anthropic", server.url())),
    )
    .unwrap();
    let gemini = ModelFactory::create(
        ModelConfig::new(ModelType::Gemini, "gemini-2.5-flash".to_string())
            .with_api_key("g".to_string())
            .with_base_url(format!("{}/gemini/", server.url())),
    )
    .unwrap();

    assert_eq!(claude.generate_text("q", None).await.unwrap().content, "from claude");
    assert_eq!(gemini.generate_text("q", None).await.unwrap().content, "from gemini");
    claude_mock.assert_async().await;
    gemini_mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_backend_is_request_error() {
    // Nothing listens on the discard port.
    let model = ClaudeModel::with_api_key("m".to_string(), "k".to_string())
        .with_base_url("http://127.0.0.1:9/v1");
    let err = model.generate_text("q", None).await.unwrap_err();
    assert!(matches!(err, ModelError::RequestError(_)));

    let model = GeminiModel::with_api_key("m".to_string(), "k".to_string())
        .with_base_url("http://127.0.0.1:9/v1beta");
    assert!(matches!(model.list_models().await.unwrap_err(), ModelError::RequestError(_)));
}
