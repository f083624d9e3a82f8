use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Timestamp layouts without offset that show up in hand-written feeds, read as UTC
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Resolves a raw publish date to an instant. Never fails: a missing or
/// unrecognized date yields `now`.
pub fn normalize_date(raw: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    let Some(raw) = raw.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return now;
    };

    match parse_date(raw) {
        Some(instant) => instant,
        None => {
            tracing::debug!(raw_date = raw, "Unrecognized publish date, using generation time");
            now
        }
    }
}

/// Parses the date layouts found in RSS feeds: RFC 822/2822, RFC 3339, and a
/// few offset-less ISO 8601 variants.
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(raw)
        .ok()
        .or_else(|| strip_weekday(raw).and_then(|rest| DateTime::parse_from_rfc2822(rest).ok()))
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok())
        .map(|instant| instant.with_timezone(&Utc))
        .or_else(|| {
            NAIVE_DATETIME_FORMATS
                .iter()
                .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
                .map(|naive| naive.and_utc())
        })
        .or_else(|| {
            NaiveDate::parse_from_str(raw, DATE_FORMAT)
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
                .map(|naive| naive.and_utc())
        })
}

/// `Wednesday, 02 Oct 2024 ...` and `Wed 02 Oct 2024 ...` are not RFC 2822,
/// but the rest of the string usually is.
fn strip_weekday(raw: &str) -> Option<&str> {
    let (weekday, rest) = raw.split_once(|c: char| c == ',' || c.is_whitespace())?;
    if weekday.is_empty() || !weekday.chars().all(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    Some(rest.trim_start_matches(|c: char| c == ',' || c.is_whitespace()))
}
