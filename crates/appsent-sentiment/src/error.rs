use std::time::Duration;

use appsent_store::StoreError;
use thiserror::Error;

use crate::llm::LlmError;

/// Message for a search that matched nothing.
pub const APP_NOT_FOUND: &str = "App not found. Please try a different app name.";

/// Message for an app whose reviews are all empty or missing.
pub const NO_REVIEWS_FOUND: &str = "No reviews found for this app.";

/// Which store call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamStage {
    Search,
    Fetch,
    Autocomplete,
}

impl std::fmt::Display for UpstreamStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamStage::Search => write!(f, "Failed to search for app"),
            UpstreamStage::Fetch => write!(f, "Failed to fetch reviews"),
            UpstreamStage::Autocomplete => write!(f, "Failed to fetch autocomplete suggestions"),
        }
    }
}

/// Request-level failures. Any of these aborts the whole report.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Caller input rejected before any collaborator was called.
    #[error("{0}")]
    InvalidInput(String),

    /// No app matched, or the app has no usable reviews.
    #[error("{0}")]
    NotFound(String),

    #[error("{stage}: {source}")]
    Upstream {
        stage: UpstreamStage,
        #[source]
        source: StoreError,
    },

    /// Every review came back unscored, so there is no average to report.
    #[error("Error analyzing sentiments: none of {attempted} reviews could be scored")]
    ScoringFailed { attempted: usize },
}

/// Why a single review has no score. Never surfaced as a request failure.
#[derive(Debug, Error)]
pub enum ScoreUnavailable {
    #[error("no numeric score in model response")]
    NoNumber,

    #[error("could not convert '{0}' to a number")]
    Unparseable(String),

    #[error("unexpected model response shape")]
    UnexpectedShape,

    #[error("model call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("model call timed out after {0:?}")]
    TimedOut(Duration),
}

/// Failure wiring a pipeline from configuration.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("store client setup failed: {0}")]
    Store(#[from] StoreError),

    #[error("model client setup failed: {0}")]
    Llm(#[from] LlmError),
}
