//! HTTP clients against a mock server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use laru_chat::error::{AssetError, ConversationError};
use laru_chat::i18n::LanguageCode;
use laru_chat::llm::{ChatCompletionsClient, CompletionClient, LlmSettings, Provider};
use laru_chat::widget::{AskClient, AssetSource, HttpAskClient, HttpAssetSource};

// =============================================================================
// Asset source
// =============================================================================

#[tokio::test]
async fn test_asset_source_fetches_both_assets() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/static/translations/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "chatbot_title": "LARUbot Support",
            "send_button": "Send"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/static/knowledge/en.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "example_questions": ["Pricing?", "Hours?"],
            "data": {"Hours": "9-17"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let source = HttpAssetSource::new(server.uri()).unwrap();
    let en = LanguageCode::en();

    let translations = source.translations(&en).await.unwrap();
    assert_eq!(translations.get("chatbot_title"), Some("LARUbot Support"));

    let knowledge = source.knowledge(&en).await.unwrap();
    assert_eq!(knowledge.example_questions, vec!["Pricing?", "Hours?"]);
}

#[tokio::test]
async fn test_asset_source_reports_status() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = HttpAssetSource::new(server.uri()).unwrap();
    let err = source.translations(&LanguageCode::en()).await.unwrap_err();
    assert!(matches!(
        err,
        AssetError::Status {
            asset: "translations",
            status: 404,
            ..
        }
    ));
}

#[tokio::test]
async fn test_asset_source_rejects_malformed_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/static/knowledge/ja.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{not json"))
        .mount(&server)
        .await;

    let source = HttpAssetSource::new(server.uri()).unwrap();
    let err = source.knowledge(&LanguageCode::ja()).await.unwrap_err();
    assert!(matches!(err, AssetError::Decode { asset: "knowledge", .. }));
}

// =============================================================================
// Ask client
// =============================================================================

#[tokio::test]
async fn test_ask_client_posts_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .and(body_partial_json(json!({"message": "料金は？"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "answer": "月額1,000円です。",
            "follow_up_questions": ["支払い方法は？"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = HttpAskClient::new(server.uri()).unwrap();
    let response = client.ask("料金は？").await.unwrap();
    assert_eq!(response.answer, "月額1,000円です。");
    assert_eq!(response.follow_up_questions, vec!["支払い方法は？"]);
}

#[tokio::test]
async fn test_ask_client_missing_follow_ups_default_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"answer": "ok"})))
        .mount(&server)
        .await;

    let client = HttpAskClient::new(server.uri()).unwrap();
    let response = client.ask("hi").await.unwrap();
    assert!(response.follow_up_questions.is_empty());
}

#[tokio::test]
async fn test_ask_client_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"answer": "ignored"})))
        .mount(&server)
        .await;

    let client = HttpAskClient::new(server.uri()).unwrap();
    let err = client.ask("hi").await.unwrap_err();
    assert!(matches!(err, ConversationError::Status(500)));
}

#[tokio::test]
async fn test_ask_client_malformed_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ask"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "wrong shape"})))
        .mount(&server)
        .await;

    let client = HttpAskClient::new(server.uri()).unwrap();
    let err = client.ask("hi").await.unwrap_err();
    assert!(matches!(err, ConversationError::Decode(_)));
}

#[tokio::test]
async fn test_ask_client_connection_refused() {
    // Nothing listens on the discard port.
    let client = HttpAskClient::new("http://127.0.0.1:9").unwrap();
    let err = client.ask("hi").await.unwrap_err();
    assert!(matches!(err, ConversationError::Network(_)));
}

// =============================================================================
// Completion client
// =============================================================================

#[tokio::test]
async fn test_completion_uses_bearer_and_parses_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "test-model", "stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "答えです"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatCompletionsClient::new(LlmSettings {
        base_url: server.uri(),
        api_key: Some("sk-test".into()),
        model: "test-model".into(),
        provider: Provider::Generic,
    });
    let content = client
        .complete("質問", Duration::from_secs(5))
        .await
        .unwrap();
    assert_eq!(content, "答えです");
}

#[tokio::test]
async fn test_completion_azure_uses_api_key_header() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/openai/deployments/support/chat/completions"))
        .and(query_param("api-version", "2024-08-01-preview"))
        .and(header("api-key", "az-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatCompletionsClient::new(LlmSettings {
        base_url: server.uri(),
        api_key: Some("az-key".into()),
        model: "gpt-4o".into(),
        provider: Provider::AzureOpenAI {
            deployment_name: "support".into(),
            api_version: "2024-08-01-preview".into(),
        },
    });
    assert_eq!(
        client.complete("q", Duration::from_secs(5)).await.unwrap(),
        "ok"
    );
}

#[tokio::test]
async fn test_completion_errors_on_missing_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let client = ChatCompletionsClient::new(LlmSettings {
        base_url: server.uri(),
        api_key: None,
        model: "m".into(),
        provider: Provider::Generic,
    });
    assert!(client.complete("q", Duration::from_secs(5)).await.is_err());
}

#[tokio::test]
async fn test_completion_errors_on_http_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = ChatCompletionsClient::new(LlmSettings {
        base_url: server.uri(),
        api_key: None,
        model: "m".into(),
        provider: Provider::Generic,
    });
    assert!(client.complete("q", Duration::from_secs(5)).await.is_err());
}
