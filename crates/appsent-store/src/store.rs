use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{AppId, AppSummary, ReviewPage, ReviewQuery, SearchQuery};

/// Search and review access to an app store.
///
/// Implementations must be cheap to share across concurrent requests.
#[async_trait]
pub trait AppStore: Send + Sync {
    /// Search the store for apps matching `term`, best match first.
    ///
    /// An empty result is `Ok(vec![])`, not an error.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the store cannot be reached or answers
    /// with something other than a search result.
    async fn search(&self, term: &str, query: &SearchQuery)
        -> Result<Vec<AppSummary>, StoreError>;

    /// Fetch up to `query.count` reviews for `app_id` in the requested order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if any page request fails.
    async fn reviews(&self, app_id: &AppId, query: &ReviewQuery)
        -> Result<ReviewPage, StoreError>;
}
