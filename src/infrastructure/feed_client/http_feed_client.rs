use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Url;
use std::time::Duration;

use super::{FeedFetcher, FetchError};

const FEED_ACCEPT: &str =
    "application/rss+xml, application/rdf+xml;q=0.9, application/xml;q=0.9, text/xml;q=0.9, */*;q=0.8";

pub struct HttpFeedClient {
    http_client: reqwest::Client,
    max_body_bytes: usize,
}

impl HttpFeedClient {
    pub fn new(
        timeout: Duration,
        user_agent: &str,
        max_body_bytes: usize,
    ) -> Result<Self, FetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()
            .map_err(|e| FetchError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self::with_client(http_client, max_body_bytes))
    }

    /// Wrap an already configured `reqwest::Client`
    pub fn with_client(http_client: reqwest::Client, max_body_bytes: usize) -> Self {
        Self {
            http_client,
            max_body_bytes,
        }
    }
}

#[async_trait]
impl FeedFetcher for HttpFeedClient {
    async fn fetch(&self, url: &Url) -> Result<Vec<u8>, FetchError> {
        let mut response = self
            .http_client
            .get(url.clone())
            .header(ACCEPT, FEED_ACCEPT)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Feed origin returned an error status");
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let too_large = FetchError::TooLarge {
            limit: self.max_body_bytes,
        };

        if response
            .content_length()
            .is_some_and(|length| length > self.max_body_bytes as u64)
        {
            return Err(too_large);
        }

        // Content-Length can be absent or wrong, so the limit is enforced while reading
        let mut body = Vec::new();
        while let Some(chunk) = response
            .chunk()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?
        {
            if body.len() + chunk.len() > self.max_body_bytes {
                return Err(too_large);
            }
            body.extend_from_slice(&chunk);
        }

        tracing::debug!(url = %url, bytes = body.len(), "Fetched feed");

        Ok(body)
    }
}
