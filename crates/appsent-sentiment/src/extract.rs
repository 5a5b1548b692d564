//! Pull a bounded sentiment score out of free-form model output.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ScoreUnavailable;

/// Optional sign, optional integer part, optional point, at least one digit.
/// ASCII digits only; `\d` would also match other scripts' digits.
static SCORE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?[0-9]*\.?[0-9]+").expect("valid score regex"));

/// Parse the first signed decimal in `text` and clamp it to `[-1.0, 1.0]`.
///
/// # Errors
///
/// [`ScoreUnavailable::NoNumber`] when nothing in `text` looks like a number,
/// [`ScoreUnavailable::Unparseable`] when the match does not convert to `f64`.
pub(crate) fn parse_score(text: &str) -> Result<f64, ScoreUnavailable> {
    let matched = SCORE_PATTERN
        .find(text)
        .ok_or(ScoreUnavailable::NoNumber)?
        .as_str();
    tracing::trace!(matched, "score pattern matched");

    let score: f64 = matched
        .parse()
        .map_err(|_| ScoreUnavailable::Unparseable(matched.to_owned()))?;
    if score.is_nan() {
        return Err(ScoreUnavailable::Unparseable(matched.to_owned()));
    }

    let clamped = score.clamp(-1.0, 1.0);
    if !(-1.0..=1.0).contains(&score) {
        tracing::debug!(raw = score, clamped, "score clamped to range");
    }
    Ok(clamped)
}

/// Extract a sentiment score from a model response.
///
/// Returns `None` (never `0.0`) when the text holds no usable number.
#[must_use]
pub fn extract_score(text: &str) -> Option<f64> {
    match parse_score(text) {
        Ok(score) => Some(score),
        Err(e) => {
            tracing::warn!(response = text, error = %e, "no score extracted from model response");
            None
        }
    }
}
