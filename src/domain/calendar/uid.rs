use chrono::{DateTime, Utc};

/// Domain part appended to every generated UID
pub const UID_DOMAIN: &str = "rss-to-ical.local";

/// Builds the UID for the item at `index`.
///
/// The seed is the item's guid, or `<source_url>#<index>` when the feed has
/// none. Everything outside `[A-Za-z0-9-]` is stripped from it. The generation
/// timestamp and the item index are appended, so two items with the same guid
/// never share a UID within one document.
pub fn generate_uid(
    guid: Option<&str>,
    index: usize,
    source_url: &str,
    generated_at: DateTime<Utc>,
) -> String {
    let seed = match guid {
        Some(guid) => clean_seed(guid),
        None => clean_seed(&format!("{source_url}#{index}")),
    };
    let seed = if seed.is_empty() {
        format!("event-{index}")
    } else {
        seed
    };

    format!(
        "{seed}-{}-{index}@{UID_DOMAIN}",
        generated_at.timestamp_millis()
    )
}

fn clean_seed(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
        .collect()
}
