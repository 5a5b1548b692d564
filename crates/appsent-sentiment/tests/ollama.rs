//! Integration tests for `OllamaClient` and `SentimentScorer` against a mocked model server.

use std::sync::Arc;
use std::time::Duration;

use appsent_sentiment::{ChatMessage, ChatModel, ChatRequest, LlmError, OllamaClient, SentimentScorer};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request(content: &str) -> ChatRequest {
    ChatRequest {
        model: "mistral".to_string(),
        messages: vec![ChatMessage::user(content)],
        stream: false,
    }
}

fn reply(content: &str) -> serde_json::Value {
    serde_json::json!({
        "model": "mistral",
        "message": { "role": "assistant", "content": content },
        "done": true
    })
}

#[tokio::test]
async fn chat_posts_request_and_returns_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(serde_json::json!({
            "model": "mistral",
            "stream": false,
            "messages": [{ "role": "user", "content": "hello" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("0.42")))
        .expect(1)
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "appsent-test/0.1").expect("client");
    let response = client.chat(&request("hello")).await.expect("chat");
    assert_eq!(response.content(), Some("0.42"));
}

#[tokio::test]
async fn server_error_maps_to_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "appsent-test/0.1").expect("client");
    let err = client.chat(&request("hello")).await.unwrap_err();
    match err {
        LlmError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "model not loaded");
        }
        other => panic!("expected Status, got: {other:?}"),
    }
}

#[tokio::test]
async fn malformed_body_maps_to_deserialize() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "appsent-test/0.1").expect("client");
    let err = client.chat(&request("hello")).await.unwrap_err();
    assert!(matches!(err, LlmError::Deserialize(_)), "got: {err:?}");
}

#[tokio::test]
async fn reply_without_message_has_no_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "done": true })),
        )
        .mount(&server)
        .await;

    let client = OllamaClient::new(&server.uri(), "appsent-test/0.1").expect("client");
    let response = client.chat(&request("hello")).await.expect("chat");
    assert!(response.content().is_none());
}

#[tokio::test]
async fn scorer_clamps_reply_from_live_client() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("Sentiment Score: 1.7")))
        .mount(&server)
        .await;

    let client = Arc::new(OllamaClient::new(&server.uri(), "appsent-test/0.1").expect("client"));
    let scorer = SentimentScorer::new(client, "mistral", Duration::from_secs(5));
    assert_eq!(scorer.score("best app ever").await, Some(1.0));
}

#[tokio::test]
async fn scorer_times_out_on_slow_model() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("0.9"))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = Arc::new(OllamaClient::new(&server.uri(), "appsent-test/0.1").expect("client"));
    let scorer = SentimentScorer::new(client, "mistral", Duration::from_millis(100));
    assert_eq!(scorer.score("hung").await, None);
}
