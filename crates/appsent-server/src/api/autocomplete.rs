use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use crate::middleware::RequestId;

use super::{ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct AutocompleteParams {
    pub query: String,
}

#[derive(Debug, Serialize)]
pub(super) struct AutocompleteResponse {
    pub suggestions: Vec<String>,
}

/// `GET /autocomplete?query=`: app titles matching a partial name.
pub(super) async fn autocomplete(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    params: Result<Query<AutocompleteParams>, QueryRejection>,
) -> Result<Json<AutocompleteResponse>, ApiError> {
    let Query(params) = params.map_err(|rejection| {
        tracing::warn!(
            request_id = %req_id.0,
            error = %rejection.body_text(),
            "rejected autocomplete query"
        );
        ApiError::new(req_id.0.clone(), "validation_error", rejection.body_text())
    })?;

    let span = tracing::info_span!("autocomplete", request_id = %req_id.0);
    let suggestions = state
        .pipeline
        .suggest(&params.query)
        .instrument(span)
        .await
        .map_err(|e| ApiError::from_pipeline(req_id.0, &e))?;

    Ok(Json(AutocompleteResponse { suggestions }))
}
