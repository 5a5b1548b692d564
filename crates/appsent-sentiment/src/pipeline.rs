//! Report orchestration: search → fetch → filter → score → aggregate.

use std::sync::Arc;
use std::time::Duration;

use appsent_core::AppConfig;
use appsent_store::{
    AppId, AppStore, ItunesStoreClient, ReviewQuery, ReviewSort, SearchQuery, StoreReview,
};
use futures::stream::{self, StreamExt};
use tracing::Instrument;

use crate::error::{PipelineError, SetupError, UpstreamStage, APP_NOT_FOUND, NO_REVIEWS_FOUND};
use crate::llm::OllamaClient;
use crate::scorer::SentimentScorer;
use crate::types::SentimentReport;

/// Store locale and fan-out limits for one pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub lang: String,
    pub country: String,
    /// Reviews requested from the store per report.
    pub review_count: usize,
    /// Titles returned by [`ReviewPipeline::suggest`].
    pub suggestion_limit: usize,
    /// Scoring calls allowed in flight at once.
    pub max_concurrent_scores: usize,
}

impl PipelineSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            lang: config.store_lang.clone(),
            country: config.store_country.clone(),
            review_count: config.review_count,
            suggestion_limit: config.suggestion_limit,
            max_concurrent_scores: config.max_concurrent_scores,
        }
    }
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            lang: "en".to_string(),
            country: "us".to_string(),
            review_count: 100,
            suggestion_limit: 5,
            max_concurrent_scores: 8,
        }
    }
}

/// Builds sentiment reports and autocomplete suggestions.
///
/// Holds no per-request state; one instance serves every request.
pub struct ReviewPipeline {
    store: Arc<dyn AppStore>,
    scorer: SentimentScorer,
    settings: PipelineSettings,
}

impl ReviewPipeline {
    #[must_use]
    pub fn new(store: Arc<dyn AppStore>, scorer: SentimentScorer, settings: PipelineSettings) -> Self {
        Self {
            store,
            scorer,
            settings,
        }
    }

    /// Wire the live iTunes store and Ollama clients from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if either HTTP client cannot be built or a
    /// configured base URL is invalid.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, SetupError> {
        let store = ItunesStoreClient::with_base_url(
            &config.store_base_url,
            config.store_timeout_secs,
            &config.user_agent,
        )?;
        let model = OllamaClient::new(&config.ollama_url, &config.user_agent)?;
        let scorer = SentimentScorer::new(
            Arc::new(model),
            config.llm_model.clone(),
            Duration::from_secs(config.llm_timeout_secs),
        );
        Ok(Self::new(
            Arc::new(store),
            scorer,
            PipelineSettings::from_app_config(config),
        ))
    }

    #[must_use]
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Build a sentiment report for the app best matching `app_name`.
    ///
    /// 1. Resolve the lowercased name to the first search hit.
    /// 2. Fetch the newest reviews, unfiltered by rating.
    /// 3. Drop reviews with empty or missing text, keeping order.
    /// 4. Score every remaining review, at most `max_concurrent_scores` at a time.
    /// 5. Average the scores that came back.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] for a blank `app_name`.
    /// - [`PipelineError::NotFound`] if no app matches or it has no reviews.
    /// - [`PipelineError::Upstream`] if the search or review fetch fails.
    /// - [`PipelineError::ScoringFailed`] if no review could be scored.
    ///
    /// A review that cannot be scored is not an error; it stays in the
    /// report with an absent score.
    pub async fn build_report(&self, app_name: &str) -> Result<SentimentReport, PipelineError> {
        let query = app_name.to_lowercase();
        if query.trim().is_empty() {
            return Err(PipelineError::InvalidInput(
                "app_name must not be empty".to_string(),
            ));
        }

        let span = tracing::info_span!("build_report", app = %query);
        self.run_report(&query).instrument(span).await
    }

    async fn run_report(&self, query: &str) -> Result<SentimentReport, PipelineError> {
        let app_id = self.resolve(query).await?;
        tracing::info!(app_id = %app_id, "resolved app");

        let fetched = self.fetch(&app_id).await?;
        let fetched_count = fetched.len();
        let reviews = review_texts(fetched);
        tracing::info!(
            app_id = %app_id,
            fetched = fetched_count,
            kept = reviews.len(),
            "fetched reviews"
        );

        if reviews.is_empty() {
            tracing::warn!(app_id = %app_id, "no reviews found");
            return Err(PipelineError::NotFound(NO_REVIEWS_FOUND.to_string()));
        }

        let scores = self.score_all(&reviews).await;
        let attempted = reviews.len();

        let Some(report) = SentimentReport::from_scores(reviews, scores) else {
            tracing::error!(app_id = %app_id, attempted, "no review could be scored");
            return Err(PipelineError::ScoringFailed { attempted });
        };

        tracing::info!(
            app_id = %app_id,
            scored = report.scored_count(),
            review_count = report.review_count,
            average = report.average_sentiment,
            "sentiment analysis completed"
        );
        Ok(report)
    }

    /// Up to `suggestion_limit` app titles for a partial name, in store order.
    ///
    /// # Errors
    ///
    /// - [`PipelineError::InvalidInput`] if `partial` is empty.
    /// - [`PipelineError::Upstream`] if the store search fails.
    pub async fn suggest(&self, partial: &str) -> Result<Vec<String>, PipelineError> {
        if partial.is_empty() {
            return Err(PipelineError::InvalidInput(
                "query must contain at least 1 character".to_string(),
            ));
        }
        tracing::info!(query = partial, "autocomplete query received");

        let limit = self.settings.suggestion_limit;
        let hits = self
            .store
            .search(partial, &self.search_query(limit))
            .await
            .map_err(|e| {
                tracing::error!(query = partial, error = %e, "autocomplete search failed");
                PipelineError::Upstream {
                    stage: UpstreamStage::Autocomplete,
                    source: e,
                }
            })?;

        let suggestions: Vec<String> = hits.into_iter().take(limit).map(|h| h.title).collect();
        tracing::debug!(?suggestions, "autocomplete suggestions");
        Ok(suggestions)
    }

    async fn resolve(&self, query: &str) -> Result<AppId, PipelineError> {
        let hits = self
            .store
            .search(query, &self.search_query(1))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "app search failed");
                PipelineError::Upstream {
                    stage: UpstreamStage::Search,
                    source: e,
                }
            })?;

        match hits.into_iter().next() {
            Some(hit) => Ok(hit.app_id),
            None => {
                tracing::warn!("no app matched");
                Err(PipelineError::NotFound(APP_NOT_FOUND.to_string()))
            }
        }
    }

    async fn fetch(&self, app_id: &AppId) -> Result<Vec<StoreReview>, PipelineError> {
        let query = ReviewQuery {
            lang: self.settings.lang.clone(),
            country: self.settings.country.clone(),
            sort: ReviewSort::Newest,
            count: self.settings.review_count,
            filter_score: None,
            continue_from: None,
        };

        self.store
            .reviews(app_id, &query)
            .await
            .map(|page| page.reviews)
            .map_err(|e| {
                tracing::error!(app_id = %app_id, error = %e, "review fetch failed");
                PipelineError::Upstream {
                    stage: UpstreamStage::Fetch,
                    source: e,
                }
            })
    }

    /// One score slot per review, in review order. `buffered` keeps output
    /// order while bounding in-flight calls; every call settles before return.
    async fn score_all(&self, reviews: &[String]) -> Vec<Option<f64>> {
        let max_concurrent = self.settings.max_concurrent_scores.max(1);
        // Built up front: a borrowing closure inside the stream makes the
        // report future non-`Send`.
        let calls: Vec<_> = reviews
            .iter()
            .map(|review| self.scorer.score(review))
            .collect();
        stream::iter(calls).buffered(max_concurrent).collect().await
    }

    fn search_query(&self, limit: usize) -> SearchQuery {
        SearchQuery {
            lang: self.settings.lang.clone(),
            country: self.settings.country.clone(),
            limit,
        }
    }
}

/// Non-empty review texts in store order.
fn review_texts(reviews: Vec<StoreReview>) -> Vec<String> {
    reviews
        .into_iter()
        .filter_map(|r| r.content)
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod tests;
