use chrono::{DateTime, Utc};

use super::text::{escape_text, fold_value};

const CRLF: &str = "\r\n";
const TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

pub const PRODUCT_ID: &str = "-//RSS to iCal Converter//EN";

/// One calendar event derived from one feed item. Text fields are already
/// escaped for RFC 5545; folding happens when the document is rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEvent {
    pub uid: String,
    pub created_at: DateTime<Utc>,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub summary: String,
    pub description: String,
    pub url: String,
}

/// A calendar ready to be rendered. Built fresh for every conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarDocument {
    pub title: String,
    pub description: String,
    pub generated_at: DateTime<Utc>,
    pub events: Vec<NormalizedEvent>,
    /// Feed items that could not be turned into events
    pub skipped_events: usize,
}

/// A single content line, `NAME:value`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    pub name: &'static str,
    pub value: String,
}

impl Property {
    pub fn new(name: &'static str, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }

    pub fn timestamp(name: &'static str, instant: DateTime<Utc>) -> Self {
        Self::new(name, format_timestamp(instant))
    }

    fn write_to(&self, out: &mut String) {
        out.push_str(self.name);
        out.push(':');
        out.push_str(&fold_value(&self.value));
        out.push_str(CRLF);
    }
}

/// `YYYYMMDDTHHMMSSZ`
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    instant.format(TIMESTAMP_FORMAT).to_string()
}

impl NormalizedEvent {
    pub fn properties(&self) -> Vec<Property> {
        vec![
            Property::new("UID", self.uid.as_str()),
            Property::timestamp("DTSTAMP", self.created_at),
            Property::timestamp("DTSTART", self.starts_at),
            Property::timestamp("DTEND", self.ends_at),
            Property::new("SUMMARY", self.summary.as_str()),
            Property::new("DESCRIPTION", self.description.as_str()),
            Property::new("URL", self.url.as_str()),
            Property::new("STATUS", "CONFIRMED"),
            Property::new("SEQUENCE", "0"),
            Property::new("TRANSP", "OPAQUE"),
        ]
    }
}

impl CalendarDocument {
    fn header(&self) -> Vec<Property> {
        vec![
            Property::new("VERSION", "2.0"),
            Property::new("PRODID", PRODUCT_ID),
            Property::new("CALSCALE", "GREGORIAN"),
            Property::new("X-WR-CALNAME", escape_text(&self.title)),
            Property::new("X-WR-CALDESC", escape_text(&self.description)),
            Property::new("X-WR-TIMEZONE", "UTC"),
            Property::new("METHOD", "PUBLISH"),
        ]
    }

    /// Serializes the document as RFC 5545 text with CRLF line endings
    pub fn render(&self) -> String {
        let mut out = String::new();

        Property::new("BEGIN", "VCALENDAR").write_to(&mut out);
        for property in self.header() {
            property.write_to(&mut out);
        }

        for event in &self.events {
            Property::new("BEGIN", "VEVENT").write_to(&mut out);
            for property in event.properties() {
                property.write_to(&mut out);
            }
            Property::new("END", "VEVENT").write_to(&mut out);
        }

        Property::new("END", "VCALENDAR").write_to(&mut out);
        out
    }
}
