//! Store-facing types.
//!
//! The first half models what callers see; the second half models the
//! iTunes JSON payloads and is private to the crate.

use serde::Deserialize;

/// Opaque store identifier for one app.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AppId(pub String);

impl std::fmt::Display for AppId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One search hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSummary {
    pub app_id: AppId,
    pub title: String,
    pub developer: Option<String>,
    pub bundle_id: Option<String>,
}

/// One customer review as the store returned it. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreReview {
    pub review_id: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub content: Option<String>,
    /// Star rating, 1 through 5.
    pub rating: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub lang: String,
    pub country: String,
    /// Maximum number of hits to request from the store.
    pub limit: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewSort {
    #[default]
    Newest,
    MostHelpful,
}

impl ReviewSort {
    pub(crate) fn feed_key(self) -> &'static str {
        match self {
            ReviewSort::Newest => "mostrecent",
            ReviewSort::MostHelpful => "mosthelpful",
        }
    }
}

/// Position to resume a review listing from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewCursor(pub u32);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewQuery {
    pub lang: String,
    pub country: String,
    pub sort: ReviewSort,
    pub count: usize,
    /// Keep only reviews with exactly this star rating. `None` keeps all.
    pub filter_score: Option<u8>,
    pub continue_from: Option<ReviewCursor>,
}

/// Reviews in store order plus the cursor for the next page, if any.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewPage {
    pub reviews: Vec<StoreReview>,
    pub next: Option<ReviewCursor>,
}

// ---------------------------------------------------------------------------
// iTunes Search API
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SearchResult {
    pub track_id: Option<u64>,
    pub track_name: Option<String>,
    pub artist_name: Option<String>,
    pub bundle_id: Option<String>,
}

impl SearchResult {
    /// Hits without an id or a title cannot be resolved or displayed.
    pub(crate) fn into_summary(self) -> Option<AppSummary> {
        Some(AppSummary {
            app_id: AppId(self.track_id?.to_string()),
            title: self.track_name?,
            developer: self.artist_name,
            bundle_id: self.bundle_id,
        })
    }
}

// ---------------------------------------------------------------------------
// Customer-reviews RSS (JSON flavour)
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewFeedResponse {
    pub feed: ReviewFeed,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReviewFeed {
    #[serde(default)]
    pub entry: Option<OneOrMany<FeedEntry>>,
}

/// The feed collapses a one-element `entry` array into a bare object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum OneOrMany<T> {
    Many(Vec<T>),
    One(T),
}

impl<T> OneOrMany<T> {
    pub(crate) fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::Many(items) => items,
            OneOrMany::One(item) => vec![item],
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Label {
    pub label: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Author {
    pub name: Option<Label>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedEntry {
    pub id: Option<Label>,
    pub author: Option<Author>,
    pub title: Option<Label>,
    pub content: Option<Label>,
    #[serde(rename = "im:rating")]
    pub rating: Option<Label>,
}

impl FeedEntry {
    /// The first entry of page one describes the app itself and carries
    /// neither a rating nor review text.
    pub(crate) fn is_review(&self) -> bool {
        self.rating.is_some() || self.content.is_some()
    }

    pub(crate) fn into_review(self) -> StoreReview {
        StoreReview {
            review_id: self.id.map(|l| l.label),
            author: self.author.and_then(|a| a.name).map(|l| l.label),
            title: self.title.map(|l| l.label),
            content: self.content.map(|l| l.label),
            rating: self.rating.and_then(|l| l.label.trim().parse::<u8>().ok()),
        }
    }
}
