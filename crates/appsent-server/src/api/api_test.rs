use std::time::Duration;

use appsent_sentiment::{
    ChatModel, ChatRequest, ChatResponse, LlmError, PipelineSettings, SentimentScorer,
};
use appsent_store::{
    AppId, AppStore, AppSummary, ReviewPage, ReviewQuery, SearchQuery, StoreError, StoreReview,
};
use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request};
use tower::ServiceExt;

use super::*;

const ORIGIN: &str = "http://localhost:3000";

/// Store whose search hits and reviews are fixed; `None` makes the call fail.
struct FakeStore {
    hits: Option<Vec<AppSummary>>,
    reviews: Option<Vec<&'static str>>,
}

#[async_trait]
impl AppStore for FakeStore {
    async fn search(
        &self,
        _term: &str,
        query: &SearchQuery,
    ) -> Result<Vec<AppSummary>, StoreError> {
        let hits = self.hits.clone().ok_or(StoreError::Status {
            status: 503,
            url: "http://store.test/search".to_string(),
        })?;
        Ok(hits.into_iter().take(query.limit).collect())
    }

    async fn reviews(&self, _app_id: &AppId, _query: &ReviewQuery) -> Result<ReviewPage, StoreError> {
        let texts = self.reviews.clone().ok_or(StoreError::Status {
            status: 503,
            url: "http://store.test/rss".to_string(),
        })?;
        Ok(ReviewPage {
            reviews: texts
                .into_iter()
                .map(|t| StoreReview {
                    content: Some(t.to_string()),
                    ..StoreReview::default()
                })
                .collect(),
            next: None,
        })
    }
}

/// "great" → 1.0, "terrible" → -1.0, anything else → an unparseable reply.
struct KeywordModel;

#[async_trait]
impl ChatModel for KeywordModel {
    async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse, LlmError> {
        let prompt = &request.messages[0].content;
        let reply = if prompt.contains("great") {
            "1.0"
        } else if prompt.contains("terrible") {
            "-1.0"
        } else {
            "not sure"
        };
        Ok(ChatResponse::assistant(reply))
    }
}

fn hit(id: &str, title: &str) -> AppSummary {
    AppSummary {
        app_id: AppId(id.to_string()),
        title: title.to_string(),
        developer: None,
        bundle_id: None,
    }
}

fn app(store: FakeStore) -> Router {
    let scorer = SentimentScorer::new(Arc::new(KeywordModel), "mistral", Duration::from_secs(5));
    let pipeline = ReviewPipeline::new(Arc::new(store), scorer, PipelineSettings::default());
    build_app(
        AppState {
            pipeline: Arc::new(pipeline),
        },
        &[ORIGIN.to_string()],
    )
}

fn popular_app() -> Router {
    app(FakeStore {
        hits: Some(vec![hit("1", "Popular App")]),
        reviews: Some(vec!["great app", "terrible", "", "meh"]),
    })
}

fn sentiment_request(body: &str) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri("/get-sentiment")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    serde_json::from_slice(&body).expect("json parse")
}

#[test]
fn api_error_codes_map_to_statuses() {
    let cases = [
        ("not_found", StatusCode::NOT_FOUND),
        ("validation_error", StatusCode::UNPROCESSABLE_ENTITY),
        ("upstream_error", StatusCode::INTERNAL_SERVER_ERROR),
        ("scoring_failed", StatusCode::INTERNAL_SERVER_ERROR),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "detail").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn health_returns_ok() {
    let response = popular_app().oneshot(get("/health")).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({ "status": "ok" }));
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let response = popular_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(REQUEST_ID_HEADER, "req-abc")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );

    let response = popular_app().oneshot(get("/health")).await.expect("response");
    let generated = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .expect("generated request id");
    assert!(uuid::Uuid::parse_str(generated).is_ok(), "not a uuid: {generated}");
}

#[tokio::test]
async fn get_sentiment_returns_report() {
    let response = popular_app()
        .oneshot(sentiment_request(r#"{"app_name": "Popular App"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    let json = json_body(response).await;
    assert_eq!(json["review_count"], 3);
    assert_eq!(
        json["reviews"],
        serde_json::json!(["great app", "terrible", "meh"])
    );
    assert_eq!(json["sentiment_scores"], serde_json::json!([1.0, -1.0, null]));
    assert!(json["average_sentiment"].as_f64().expect("average").abs() < f64::EPSILON);
}

#[tokio::test]
async fn get_sentiment_unknown_app_is_404() {
    let app = app(FakeStore {
        hits: Some(vec![]),
        reviews: Some(vec![]),
    });
    let response = app
        .oneshot(sentiment_request(r#"{"app_name": "nonexistent-app-xyz"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = json_body(response).await;
    assert_eq!(json["code"], "not_found");
    assert_eq!(json["detail"], appsent_sentiment::error::APP_NOT_FOUND);
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn get_sentiment_fetch_failure_is_500() {
    let app = app(FakeStore {
        hits: Some(vec![hit("1", "App")]),
        reviews: None,
    });
    let response = app
        .oneshot(sentiment_request(r#"{"app_name": "app"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = json_body(response).await;
    assert_eq!(json["code"], "upstream_error");
    assert!(json["detail"]
        .as_str()
        .expect("detail")
        .starts_with("Failed to fetch reviews"));
}

#[tokio::test]
async fn get_sentiment_all_unscored_is_500() {
    let app = app(FakeStore {
        hits: Some(vec![hit("1", "App")]),
        reviews: Some(vec!["meh", "whatever"]),
    });
    let response = app
        .oneshot(sentiment_request(r#"{"app_name": "app"}"#))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["code"], "scoring_failed");
}

#[tokio::test]
async fn get_sentiment_rejects_bad_bodies() {
    for body in [r#"{"app_name": ""}"#, r#"{"name": "x"}"#, "not json"] {
        let response = popular_app()
            .oneshot(sentiment_request(body))
            .await
            .expect("response");
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "body {body}"
        );
        assert_eq!(json_body(response).await["code"], "validation_error");
    }
}

#[tokio::test]
async fn autocomplete_returns_titles_in_order() {
    let app = app(FakeStore {
        hits: Some(
            (0..7)
                .map(|i| hit(&i.to_string(), &format!("Facebook {i}")))
                .collect(),
        ),
        reviews: Some(vec![]),
    });
    let response = app
        .oneshot(get("/autocomplete?query=face"))
        .await
        .expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        serde_json::json!({
            "suggestions": ["Facebook 0", "Facebook 1", "Facebook 2", "Facebook 3", "Facebook 4"]
        })
    );
}

#[tokio::test]
async fn autocomplete_requires_non_empty_query() {
    for uri in ["/autocomplete", "/autocomplete?query="] {
        let response = popular_app().oneshot(get(uri)).await.expect("response");
        assert_eq!(
            response.status(),
            StatusCode::UNPROCESSABLE_ENTITY,
            "uri {uri}"
        );
    }
}

#[tokio::test]
async fn autocomplete_store_failure_is_500() {
    let app = app(FakeStore {
        hits: None,
        reviews: None,
    });
    let response = app
        .oneshot(get("/autocomplete?query=face"))
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn cors_preflight_allows_configured_origin_with_credentials() {
    let response = popular_app()
        .oneshot(
            Request::builder()
                .method(Method::OPTIONS)
                .uri("/get-sentiment")
                .header(header::ORIGIN, ORIGIN)
                .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
                .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");

    let headers = response.headers();
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some(ORIGIN)
    );
    assert_eq!(
        headers
            .get(header::ACCESS_CONTROL_ALLOW_CREDENTIALS)
            .and_then(|v| v.to_str().ok()),
        Some("true")
    );
}

#[tokio::test]
async fn cors_ignores_unlisted_origin() {
    let response = popular_app()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header(header::ORIGIN, "http://evil.example")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert!(response
        .headers()
        .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
        .is_none());
}
