//! Per-review sentiment scoring through a chat model.

use std::sync::Arc;
use std::time::Duration;

use crate::error::ScoreUnavailable;
use crate::extract::parse_score;
use crate::llm::{ChatMessage, ChatModel, ChatRequest};

/// Longest review prefix sent to the model, in characters.
pub const MAX_REVIEW_CHARS: usize = 512;

/// Review prefix length used in log fields.
const PREVIEW_CHARS: usize = 50;

/// Scores one review at a time. Cheap to share; holds no per-call state.
pub struct SentimentScorer {
    model: Arc<dyn ChatModel>,
    model_name: String,
    timeout: Duration,
}

impl SentimentScorer {
    #[must_use]
    pub fn new(model: Arc<dyn ChatModel>, model_name: impl Into<String>, timeout: Duration) -> Self {
        Self {
            model,
            model_name: model_name.into(),
            timeout,
        }
    }

    /// Score `review`, folding every failure into `None`.
    ///
    /// Never returns an error: collaborator failures, timeouts, and
    /// unparseable replies are logged with a review preview and dropped.
    pub async fn score(&self, review: &str) -> Option<f64> {
        match self.try_score(review).await {
            Ok(score) => Some(score),
            Err(e) => {
                tracing::warn!(
                    review = preview(review),
                    model = %self.model_name,
                    error = %e,
                    "review left unscored"
                );
                None
            }
        }
    }

    /// Score `review`, reporting why a score is unavailable.
    ///
    /// # Errors
    ///
    /// Returns the [`ScoreUnavailable`] reason when the model call fails,
    /// times out, replies without a message body, or replies without a number.
    pub async fn try_score(&self, review: &str) -> Result<f64, ScoreUnavailable> {
        let truncated = truncate_chars(review, MAX_REVIEW_CHARS);
        let request = ChatRequest {
            model: self.model_name.clone(),
            messages: vec![ChatMessage::user(build_prompt(truncated))],
            stream: false,
        };

        tracing::debug!(review = preview(truncated), "sending review to model");

        // Dropping the in-flight call on timeout cancels it.
        let response = tokio::time::timeout(self.timeout, self.model.chat(&request))
            .await
            .map_err(|_| ScoreUnavailable::TimedOut(self.timeout))??;

        let Some(content) = response.content() else {
            tracing::error!(review = preview(truncated), "unexpected model response structure");
            return Err(ScoreUnavailable::UnexpectedShape);
        };
        let content = content.trim();

        tracing::info!(
            review = preview(truncated),
            content,
            "model raw response content"
        );

        parse_score(content)
    }
}

/// The fixed instruction wrapped around every review.
pub(crate) fn build_prompt(review: &str) -> String {
    format!(
        "Analyze the sentiment of the following review.Respond with ONLY a single \
         floating-point number between -1.0(very negative) and 1.0 ( very positive).\
         Do not include explanations or any other text.\n\
         Review: \"{review}\"\n\
         Sentiment Score:"
    )
}

/// Longest prefix of `text` holding at most `max` characters.
pub(crate) fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

fn preview(text: &str) -> &str {
    truncate_chars(text, PREVIEW_CHARS)
}
