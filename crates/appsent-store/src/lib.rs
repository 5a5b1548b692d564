//! App-store collaborator for appsent.
//!
//! [`AppStore`] is the seam the sentiment pipeline depends on: search apps
//! by name and page through an app's customer reviews. [`ItunesStoreClient`]
//! implements it against the public iTunes Search API and the App Store
//! customer-reviews RSS feed.

pub mod client;
pub mod error;
pub mod store;
pub mod types;

pub use client::ItunesStoreClient;
pub use error::StoreError;
pub use store::AppStore;
pub use types::{
    AppId, AppSummary, ReviewCursor, ReviewPage, ReviewQuery, ReviewSort, SearchQuery,
    StoreReview,
};
