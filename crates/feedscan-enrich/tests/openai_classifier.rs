//! Integration tests for `OpenAiClassifier` and the adapter built from
//! configuration, against a local `wiremock` server.

use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use feedscan_enrich::{Classifier, EnrichError, EnrichmentAdapter, OpenAiClassifier};
use tokio_util::sync::CancellationToken;

fn test_classifier(server: &MockServer) -> OpenAiClassifier {
    OpenAiClassifier::new("sk-test", "gpt-4o", &server.uri(), Duration::from_secs(5))
        .expect("failed to build test OpenAiClassifier")
}

fn completion(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
    })
}

fn samples() -> Vec<String> {
    vec!["Sunset in Lisbon #travel".to_owned(), "Brunch spots".to_owned()]
}

#[tokio::test]
async fn classify_posts_chat_request_and_parses_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(
            r#"{"content_type":"travel","tone":"relaxed","suggested_tags":"lisbon, food"}"#,
        )))
        .expect(1)
        .mount(&server)
        .await;

    let result = test_classifier(&server).classify(&samples()).await.unwrap();

    assert_eq!(result.content_type, "travel");
    assert_eq!(result.tone, "relaxed");
    assert_eq!(result.suggested_tags, vec!["lisbon", "food"]);
}

#[tokio::test]
async fn classify_error_status_is_status_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid api key"))
        .mount(&server)
        .await;

    let err = test_classifier(&server)
        .classify(&samples())
        .await
        .unwrap_err();
    assert!(
        matches!(err, EnrichError::Status { status: 401, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn classify_without_choices_is_empty_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = test_classifier(&server)
        .classify(&samples())
        .await
        .unwrap_err();
    assert!(matches!(err, EnrichError::EmptyResponse));
}

#[tokio::test]
async fn adapter_folds_malformed_content_into_empty_result() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("not json at all")))
        .expect(1)
        .mount(&server)
        .await;

    let adapter =
        EnrichmentAdapter::new(std::sync::Arc::new(test_classifier(&server)), Duration::from_secs(5));
    let result = adapter.classify(&samples(), &CancellationToken::new()).await;
    assert!(result.is_empty());
}

#[tokio::test]
async fn adapter_without_api_key_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("{}")))
        .expect(0)
        .mount(&server)
        .await;

    let base_url = server.uri();
    let config = feedscan_core::build_app_config(|key| match key {
        "OPENAI_BASE_URL" => Ok(base_url.clone()),
        _ => Err(std::env::VarError::NotPresent),
    })
    .expect("defaults should form a valid config");
    let adapter = EnrichmentAdapter::from_config(&config).unwrap();

    assert!(!adapter.is_configured());
    let result = adapter.classify(&samples(), &CancellationToken::new()).await;
    assert!(result.is_empty());
}
