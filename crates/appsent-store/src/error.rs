use thiserror::Error;

/// Errors returned by an [`AppStore`](crate::AppStore) implementation.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The store answered with a non-2xx status.
    #[error("store returned status {status} for {url}")]
    Status { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid store base URL '{0}'")]
    InvalidBaseUrl(String),
}
