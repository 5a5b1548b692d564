use serde::Serialize;

/// Aggregated sentiment for one app.
///
/// `reviews` and `sentiment_scores` are parallel and in store order;
/// unscored reviews keep their slot as `None`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentReport {
    /// Mean of the scored reviews only.
    pub average_sentiment: f64,
    pub review_count: usize,
    pub reviews: Vec<String>,
    pub sentiment_scores: Vec<Option<f64>>,
}

impl SentimentReport {
    /// Assemble a report, or `None` when no review carries a score.
    ///
    /// `scores` must hold one slot per review.
    #[must_use]
    pub fn from_scores(reviews: Vec<String>, scores: Vec<Option<f64>>) -> Option<Self> {
        debug_assert_eq!(
            reviews.len(),
            scores.len(),
            "every review needs exactly one score slot"
        );
        let average_sentiment = average_score(&scores)?;
        Some(Self {
            average_sentiment,
            review_count: reviews.len(),
            reviews,
            sentiment_scores: scores,
        })
    }

    /// Number of reviews that received a score.
    #[must_use]
    pub fn scored_count(&self) -> usize {
        self.sentiment_scores.iter().flatten().count()
    }
}

/// Mean of the present scores; absent scores count in neither sum nor denominator.
#[must_use]
pub fn average_score(scores: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = scores
        .iter()
        .flatten()
        .fold((0.0_f64, 0_usize), |(sum, count), s| (sum + s, count + 1));
    if count == 0 {
        return None;
    }
    #[allow(clippy::cast_precision_loss)]
    let denom = count as f64;
    Some(sum / denom)
}
