use appsent_sentiment::SentimentReport;
use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::Deserialize;
use tracing::Instrument;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct SentimentRequest {
    pub app_name: String,
}

/// `POST /get-sentiment`: score the newest reviews of the best-matching app.
pub(super) async fn get_sentiment(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    payload: Result<Json<SentimentRequest>, JsonRejection>,
) -> Result<Json<SentimentReport>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(
            request_id = %req_id.0,
            error = %rejection.body_text(),
            "rejected sentiment request body"
        );
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let span = tracing::info_span!("get_sentiment", request_id = %req_id.0);
    state
        .pipeline
        .build_report(&request.app_name)
        .instrument(span)
        .await
        .map(Json)
        .map_err(|e| ApiError::from_pipeline(req_id.0, &e))
}
