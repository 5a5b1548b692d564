//! HTTP client for the iTunes Search API and App Store review feed.
//!
//! Search goes through `GET /search`; reviews come from the customer-reviews
//! RSS feed in its JSON flavour, which serves 50 entries per page and at most
//! [`MAX_FEED_PAGES`] pages per app.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::store::AppStore;
use crate::types::{
    AppId, AppSummary, FeedEntry, OneOrMany, ReviewCursor, ReviewFeedResponse, ReviewPage,
    ReviewQuery, SearchQuery, SearchResponse, SearchResult, StoreReview,
};

/// Entries per review-feed page.
pub(crate) const FEED_PAGE_SIZE: usize = 50;

/// The feed stops serving after this page.
pub(crate) const MAX_FEED_PAGES: u32 = 10;

/// Client for the public iTunes endpoints.
///
/// The base URL is configurable so tests can point it at a mock server.
pub struct ItunesStoreClient {
    client: Client,
    base_url: Url,
}

impl ItunesStoreClient {
    /// Creates a client with a custom base URL.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`StoreError::InvalidBaseUrl`] if `base_url` is not an absolute
    /// URL that can carry a path.
    pub fn with_base_url(
        base_url: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, StoreError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so path segments append instead of
        // replacing the last one.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let parsed = Url::parse(&normalised)
            .map_err(|_| StoreError::InvalidBaseUrl(base_url.to_owned()))?;
        if parsed.cannot_be_a_base() {
            return Err(StoreError::InvalidBaseUrl(base_url.to_owned()));
        }

        Ok(Self {
            client,
            base_url: parsed,
        })
    }

    fn search_url(&self, term: &str, query: &SearchQuery) -> Result<Url, StoreError> {
        let mut url = self.url_with_segments(&["search"])?;
        url.query_pairs_mut()
            .append_pair("term", term)
            .append_pair("country", &query.country)
            .append_pair("lang", &query.lang)
            .append_pair("entity", "software")
            .append_pair("limit", &query.limit.to_string());
        Ok(url)
    }

    fn review_page_url(
        &self,
        app_id: &AppId,
        query: &ReviewQuery,
        page: u32,
    ) -> Result<Url, StoreError> {
        let page_segment = format!("page={page}");
        let id_segment = format!("id={app_id}");
        let sort_segment = format!("sortby={}", query.sort.feed_key());
        let mut url = self.url_with_segments(&[
            query.country.as_str(),
            "rss",
            "customerreviews",
            &page_segment,
            &id_segment,
            &sort_segment,
            "json",
        ])?;
        url.query_pairs_mut().append_pair("l", &query.lang);
        Ok(url)
    }

    /// Appends percent-encoded path segments to the base URL.
    fn url_with_segments(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| StoreError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Sends a GET request, asserts a 2xx status, and decodes the JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, StoreError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| StoreError::Deserialize {
            context: url.to_string(),
            source: e,
        })
    }

    async fn fetch_review_page(
        &self,
        app_id: &AppId,
        query: &ReviewQuery,
        page: u32,
    ) -> Result<Vec<StoreReview>, StoreError> {
        let url = self.review_page_url(app_id, query, page)?;
        let feed: ReviewFeedResponse = self.get_json(url).await?;
        Ok(feed
            .feed
            .entry
            .map(OneOrMany::into_vec)
            .unwrap_or_default()
            .into_iter()
            .filter(FeedEntry::is_review)
            .map(FeedEntry::into_review)
            .collect())
    }
}

#[async_trait]
impl AppStore for ItunesStoreClient {
    async fn search(
        &self,
        term: &str,
        query: &SearchQuery,
    ) -> Result<Vec<AppSummary>, StoreError> {
        let url = self.search_url(term, query)?;
        let response: SearchResponse = self.get_json(url).await?;

        let hits: Vec<AppSummary> = response
            .results
            .into_iter()
            .filter_map(SearchResult::into_summary)
            .collect();

        tracing::debug!(term, hits = hits.len(), "store search complete");
        Ok(hits)
    }

    async fn reviews(&self, app_id: &AppId, query: &ReviewQuery) -> Result<ReviewPage, StoreError> {
        let mut reviews = Vec::with_capacity(query.count.min(FEED_PAGE_SIZE * 2));
        let mut page = query.continue_from.map_or(1, |c| c.0.max(1));
        let mut next = None;

        while page <= MAX_FEED_PAGES {
            let entries = self.fetch_review_page(app_id, query, page).await?;
            let page_len = entries.len();
            tracing::debug!(app_id = %app_id, page, entries = page_len, "fetched review page");

            reviews.extend(
                entries
                    .into_iter()
                    .filter(|r| query.filter_score.is_none_or(|s| r.rating == Some(s))),
            );

            let more_available = page_len >= FEED_PAGE_SIZE && page < MAX_FEED_PAGES;
            if reviews.len() >= query.count {
                reviews.truncate(query.count);
                next = more_available.then_some(ReviewCursor(page + 1));
                break;
            }
            if !more_available {
                break;
            }
            page += 1;
        }

        Ok(ReviewPage { reviews, next })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
