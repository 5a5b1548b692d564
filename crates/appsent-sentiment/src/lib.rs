//! Review sentiment pipeline for appsent.
//!
//! Resolves an app name through an [`appsent_store::AppStore`], fetches its
//! newest reviews, asks a chat model to score each one in `[-1.0, 1.0]`, and
//! aggregates the results into a [`SentimentReport`]. Individual reviews that
//! cannot be scored are kept in the report with an absent score.

pub mod error;
pub mod extract;
pub mod llm;
pub mod pipeline;
pub mod scorer;
pub mod types;

pub use error::{PipelineError, ScoreUnavailable, SetupError, UpstreamStage};
pub use extract::extract_score;
pub use llm::{ChatMessage, ChatModel, ChatRequest, ChatResponse, LlmError, OllamaClient};
pub use pipeline::{PipelineSettings, ReviewPipeline};
pub use scorer::SentimentScorer;
pub use types::{average_score, SentimentReport};
