use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    domain::calendar::{CalendarDocument, NormalizedEvent},
    domain::conversion::{validate_source_url, ConversionService, ConversionServiceApi},
    domain::feed::FeedItem,
    error::AppResult,
};

pub const CALENDAR_CONTENT_TYPE: &str = "text/calendar; charset=utf-8";
pub const X_SKIPPED_ITEMS: &str = "x-skipped-items";

const DEBUG_SAMPLE_SIZE: usize = 3;

// Request DTOs
#[derive(Debug, Deserialize)]
pub struct FeedUrlQuery {
    #[serde(default)]
    pub url: Option<String>,
}

// Response DTOs
#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub feed_url: String,
    pub ical_url: String,
}

#[derive(Debug, Serialize)]
pub struct FeedDebugResponse {
    pub success: bool,
    pub channel_title: Option<String>,
    pub item_count: usize,
    pub skipped_items: usize,
    pub first_item: Option<FeedItem>,
    pub sample_items: Vec<FeedItem>,
}

pub struct CalendarController {
    conversion_service: Arc<ConversionService>,
    public_base_url: String,
}

impl CalendarController {
    pub fn new(conversion_service: Arc<ConversionService>, public_base_url: String) -> Self {
        Self {
            conversion_service,
            public_base_url,
        }
    }

    /// GET /api/ical?url= - Convert a remote feed into a subscribable calendar
    pub async fn get_ical(
        State(controller): State<Arc<CalendarController>>,
        Query(query): Query<FeedUrlQuery>,
    ) -> AppResult<Response> {
        let source_url = query.url.unwrap_or_default();
        let conversion = controller
            .conversion_service
            .convert_url(&source_url)
            .await?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_DISPOSITION,
            HeaderValue::from_static("attachment; filename=\"calendar.ics\""),
        );
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        );
        headers.insert(header::PRAGMA, HeaderValue::from_static("no-cache"));
        headers.insert(header::EXPIRES, HeaderValue::from_static("0"));
        headers.insert(
            X_SKIPPED_ITEMS,
            HeaderValue::from(conversion.total_skipped()),
        );

        Ok(calendar_response(headers, conversion.document.render()))
    }

    /// GET /api/test-ical - Fixed one-event calendar for checking client setup
    pub async fn get_test_ical() -> Response {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=3600"),
        );

        calendar_response(headers, sample_calendar().render())
    }

    /// GET /api/debug-rss?url= - Show what the parser extracts from a feed
    pub async fn debug_rss(
        State(controller): State<Arc<CalendarController>>,
        Query(query): Query<FeedUrlQuery>,
    ) -> AppResult<Json<FeedDebugResponse>> {
        let source_url = query.url.unwrap_or_default();
        let feed = controller
            .conversion_service
            .inspect_url(&source_url)
            .await?;

        Ok(Json(FeedDebugResponse {
            success: true,
            channel_title: feed.title,
            item_count: feed.items.len(),
            skipped_items: feed.skipped_items,
            first_item: feed.items.first().cloned(),
            sample_items: feed.items.into_iter().take(DEBUG_SAMPLE_SIZE).collect(),
        }))
    }

    /// GET /api/subscription?url= - Build the calendar link for a feed
    pub async fn get_subscription(
        State(controller): State<Arc<CalendarController>>,
        Query(query): Query<FeedUrlQuery>,
    ) -> AppResult<Json<SubscriptionResponse>> {
        let source_url = query.url.unwrap_or_default();
        validate_source_url(&source_url)?;

        let feed_url = source_url.trim().to_string();
        let ical_url = format!(
            "{}/api/ical?url={}",
            controller.public_base_url,
            urlencoding::encode(&feed_url)
        );

        Ok(Json(SubscriptionResponse { feed_url, ical_url }))
    }
}

fn calendar_response(mut headers: HeaderMap, body: String) -> Response {
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(CALENDAR_CONTENT_TYPE),
    );
    (StatusCode::OK, headers, body).into_response()
}

fn sample_calendar() -> CalendarDocument {
    let generated_at = sample_instant(20, 12);

    CalendarDocument {
        title: "Test Calendar".to_string(),
        description: "Sample calendar for verifying subscriptions".to_string(),
        generated_at,
        events: vec![NormalizedEvent {
            uid: "test-event-123@rss-to-ical.local".to_string(),
            created_at: generated_at,
            starts_at: sample_instant(21, 14),
            ends_at: sample_instant(21, 15),
            summary: "Test Event".to_string(),
            description: "This is a test event to verify iCal format".to_string(),
            url: String::new(),
        }],
        skipped_events: 0,
    }
}

fn sample_instant(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, day, hour, 0, 0)
        .single()
        .unwrap_or_default()
}
