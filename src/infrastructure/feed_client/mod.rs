pub mod http_feed_client;

pub use http_feed_client::HttpFeedClient;

use async_trait::async_trait;
use reqwest::Url;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Network(String),
    #[error("upstream responded with status {0}")]
    HttpStatus(u16),
    #[error("feed is larger than {limit} bytes")]
    TooLarge { limit: usize },
}

/// Retrieves the raw body of a remote feed.
///
/// Implementations own transport concerns (timeouts, redirects, size limits);
/// the conversion pipeline only ever sees the returned bytes.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// # Errors
    /// Returns `FetchError` if the feed cannot be retrieved or the origin
    /// answers with a non-success status.
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError>;
}
