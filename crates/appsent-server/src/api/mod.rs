mod autocomplete;
mod sentiment;

use std::sync::Arc;

use appsent_sentiment::{PipelineError, ReviewPipeline};
use axum::{
    http::{HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ReviewPipeline>,
}

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub detail: String,
    pub code: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        detail: impl Into<String>,
    ) -> Self {
        Self {
            detail: detail.into(),
            code: code.into(),
            request_id: request_id.into(),
        }
    }

    /// Translate a pipeline failure into its caller-facing error.
    pub(super) fn from_pipeline(request_id: String, error: &PipelineError) -> Self {
        let code = match error {
            PipelineError::InvalidInput(_) => "validation_error",
            PipelineError::NotFound(_) => "not_found",
            PipelineError::Upstream { .. } => "upstream_error",
            PipelineError::ScoringFailed { .. } => "scoring_failed",
        };
        match error {
            PipelineError::InvalidInput(_) | PipelineError::NotFound(_) => {
                tracing::warn!(request_id = %request_id, code, error = %error, "request failed");
            }
            PipelineError::Upstream { .. } | PipelineError::ScoringFailed { .. } => {
                tracing::error!(request_id = %request_id, code, error = %error, "request failed");
            }
        }
        Self::new(request_id, code, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "validation_error" => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Credentialed CORS for the configured origins; methods and headers are
/// mirrored from the preflight request.
fn build_cors(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/get-sentiment", post(sentiment::get_sentiment))
        .route("/autocomplete", get(autocomplete::autocomplete))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors(cors_origins))
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(HealthData { status: "ok" })
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
