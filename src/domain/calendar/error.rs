use chrono::{DateTime, Utc};

/// Reason an individual event was left out of a calendar
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventBuildError {
    #[error("event starting at {starts_at} has no representable end time")]
    TimeOverflow { starts_at: DateTime<Utc> },
    #[error("{instant} cannot be written as an RFC 5545 date-time")]
    OutOfRange { instant: DateTime<Utc> },
}
