use super::error::ConversionError;
use crate::domain::calendar::{CalendarBuilder, CalendarDocument, DescriptionFormat};
use crate::domain::feed::{parse_feed, ParsedFeed};
use crate::domain::shared::clock::Clock;
use crate::infrastructure::feed_client::FeedFetcher;
use async_trait::async_trait;
use reqwest::Url;
use std::sync::Arc;

/// Outcome of converting one feed
#[derive(Debug, Clone)]
pub struct Conversion {
    pub document: CalendarDocument,
    /// Items dropped by the parser before any event was built
    pub skipped_items: usize,
}

impl Conversion {
    /// Items of the feed that did not make it into the calendar
    pub fn total_skipped(&self) -> usize {
        self.skipped_items + self.document.skipped_events
    }
}

pub struct ConversionService {
    fetcher: Arc<dyn FeedFetcher>,
    clock: Arc<dyn Clock>,
    description_format: DescriptionFormat,
}

impl ConversionService {
    pub fn new(
        fetcher: Arc<dyn FeedFetcher>,
        clock: Arc<dyn Clock>,
        description_format: DescriptionFormat,
    ) -> Self {
        Self {
            fetcher,
            clock,
            description_format,
        }
    }
}

#[async_trait]
pub trait ConversionServiceApi: Send + Sync {
    /// Fetches the feed at `source_url` and converts it to a calendar
    async fn convert_url(&self, source_url: &str) -> Result<Conversion, ConversionError>;

    /// Fetches and parses the feed at `source_url` without building a calendar
    async fn inspect_url(&self, source_url: &str) -> Result<ParsedFeed, ConversionError>;
}

#[async_trait]
impl ConversionServiceApi for ConversionService {
    async fn convert_url(&self, source_url: &str) -> Result<Conversion, ConversionError> {
        let xml = self.fetch(source_url).await?;
        self.convert_feed(&xml, source_url.trim())
    }

    async fn inspect_url(&self, source_url: &str) -> Result<ParsedFeed, ConversionError> {
        let xml = self.fetch(source_url).await?;
        Ok(parse_feed(&xml)?)
    }
}

impl ConversionService {
    /// Converts already-fetched feed bytes. The clock is read exactly once, so
    /// every event of the resulting document shares one generation instant.
    pub fn convert_feed(
        &self,
        xml: &[u8],
        source_url: &str,
    ) -> Result<Conversion, ConversionError> {
        let generated_at = self.clock.now();
        let feed = parse_feed(xml)?;

        let document = CalendarBuilder::new(source_url, generated_at)
            .title(feed.title.as_deref())
            .description(feed.description.as_deref())
            .description_format(self.description_format)
            .build(&feed.items);

        let conversion = Conversion {
            document,
            skipped_items: feed.skipped_items,
        };

        tracing::info!(
            source_url,
            events = conversion.document.events.len(),
            skipped = conversion.total_skipped(),
            "Converted feed to calendar"
        );

        Ok(conversion)
    }

    async fn fetch(&self, source_url: &str) -> Result<Vec<u8>, ConversionError> {
        let url = validate_source_url(source_url)?;
        tracing::info!(url = %url, "Fetching feed");
        Ok(self.fetcher.fetch(&url).await?)
    }
}

/// Accepts absolute `http`/`https` URLs only
pub fn validate_source_url(raw: &str) -> Result<Url, ConversionError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ConversionError::MissingSourceUrl);
    }

    let url = Url::parse(raw).map_err(|e| ConversionError::InvalidSourceUrl(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConversionError::InvalidSourceUrl(format!(
            "unsupported scheme `{}`",
            other
        ))),
    }
}
