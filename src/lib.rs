//! Converts RSS feeds into iCalendar (RFC 5545) documents that calendar
//! clients can subscribe to.
//!
//! The conversion engine lives in [`domain`]: [`domain::feed`] parses feed
//! XML into typed items and [`domain::calendar`] turns those items into a
//! calendar document. [`infrastructure`] and [`controllers`] expose it over
//! HTTP.

pub mod controllers;
pub mod domain;
pub mod error;
pub mod infrastructure;
