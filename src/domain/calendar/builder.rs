use chrono::{DateTime, Datelike, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::date::normalize_date;
use super::error::EventBuildError;
use super::model::{CalendarDocument, NormalizedEvent};
use super::text::{escape_text, html_to_text};
use super::uid::generate_uid;
use crate::domain::feed::FeedItem;

pub const DEFAULT_CALENDAR_TITLE: &str = "RSS Calendar";
pub const DEFAULT_CALENDAR_DESCRIPTION: &str = "Calendar converted from RSS feed";
pub const UNTITLED_EVENT: &str = "Untitled Event";

const EVENT_DURATION_HOURS: i64 = 1;

/// Years a four-digit DATE-TIME can carry
const WRITABLE_YEARS: std::ops::RangeInclusive<i32> = 0..=9999;

/// How item descriptions are carried into events
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    /// Keep the feed text as is, markup included
    #[default]
    Raw,
    /// Render HTML descriptions as plain text
    Text,
}

/// Turns feed items into a `CalendarDocument`.
///
/// All events of one document share `generated_at` as their DTSTAMP and as
/// the start time of items without a usable publish date.
#[derive(Debug, Clone)]
pub struct CalendarBuilder<'a> {
    source_url: &'a str,
    generated_at: DateTime<Utc>,
    title: Option<&'a str>,
    description: Option<&'a str>,
    description_format: DescriptionFormat,
}

impl<'a> CalendarBuilder<'a> {
    pub fn new(source_url: &'a str, generated_at: DateTime<Utc>) -> Self {
        Self {
            source_url,
            generated_at,
            title: None,
            description: None,
            description_format: DescriptionFormat::default(),
        }
    }

    pub fn title(mut self, title: Option<&'a str>) -> Self {
        self.title = title;
        self
    }

    pub fn description(mut self, description: Option<&'a str>) -> Self {
        self.description = description;
        self
    }

    pub fn description_format(mut self, format: DescriptionFormat) -> Self {
        self.description_format = format;
        self
    }

    /// Builds one event per item, in item order. Items that fail to build are
    /// logged and left out; they never abort the document.
    pub fn build(&self, items: &[FeedItem]) -> CalendarDocument {
        let mut events = Vec::with_capacity(items.len());
        let mut skipped_events = 0;

        for (index, item) in items.iter().enumerate() {
            match self.build_event(index, item) {
                Ok(event) => events.push(event),
                Err(err) => {
                    tracing::warn!(index, error = %err, "Skipping calendar event");
                    skipped_events += 1;
                }
            }
        }

        CalendarDocument {
            title: self.title.unwrap_or(DEFAULT_CALENDAR_TITLE).to_string(),
            description: self
                .description
                .unwrap_or(DEFAULT_CALENDAR_DESCRIPTION)
                .to_string(),
            generated_at: self.generated_at,
            events,
            skipped_events,
        }
    }

    pub fn build_event(
        &self,
        index: usize,
        item: &FeedItem,
    ) -> Result<NormalizedEvent, EventBuildError> {
        let starts_at = normalize_date(item.pub_date.as_deref(), self.generated_at);
        let ends_at = starts_at
            .checked_add_signed(Duration::hours(EVENT_DURATION_HOURS))
            .ok_or(EventBuildError::TimeOverflow { starts_at })?;
        ensure_writable(starts_at)?;
        ensure_writable(ends_at)?;

        let description = item.description.as_deref().unwrap_or_default();
        let description = match self.description_format {
            DescriptionFormat::Raw => escape_text(description),
            DescriptionFormat::Text => escape_text(&html_to_text(description)),
        };

        Ok(NormalizedEvent {
            uid: generate_uid(
                item.guid.as_deref(),
                index,
                self.source_url,
                self.generated_at,
            ),
            created_at: self.generated_at,
            starts_at,
            ends_at,
            summary: escape_text(item.title.as_deref().unwrap_or(UNTITLED_EVENT)),
            description,
            url: item
                .link
                .as_deref()
                .map(strip_control_characters)
                .unwrap_or_default(),
        })
    }
}

fn ensure_writable(instant: DateTime<Utc>) -> Result<(), EventBuildError> {
    if WRITABLE_YEARS.contains(&instant.year()) {
        Ok(())
    } else {
        Err(EventBuildError::OutOfRange { instant })
    }
}

/// URI values are not escaped, but a stray line break would split the content line
fn strip_control_characters(link: &str) -> String {
    link.chars().filter(|c| !c.is_control()).collect()
}

/// Converts parsed feed items straight to calendar text
pub fn convert_to_calendar(
    items: &[FeedItem],
    channel_title: Option<&str>,
    channel_description: Option<&str>,
    source_url: &str,
    generated_at: DateTime<Utc>,
) -> String {
    CalendarBuilder::new(source_url, generated_at)
        .title(channel_title)
        .description(channel_description)
        .build(items)
        .render()
}
