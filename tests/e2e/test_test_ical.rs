use crate::e2e::helpers;

use helpers::assertions::{assert_calendar_document, event_blocks, property};
use helpers::TestContext;
use hyper::StatusCode;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_the_sample_calendar(ctx: &TestContext) {
    let response = ctx.client.get("/api/test-ical").await.unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("content-type", "text/calendar; charset=utf-8")
        .assert_header("cache-control", "public, max-age=3600");

    let ics = response.text();
    assert_calendar_document(&ics);
    assert!(ics.contains("\r\nX-WR-CALNAME:Test Calendar\r\n"));

    let events = event_blocks(&ics);
    assert_eq!(events.len(), 1);
    assert_eq!(
        property(&events[0], "UID"),
        Some("test-event-123@rss-to-ical.local")
    );
    assert_eq!(property(&events[0], "SUMMARY"), Some("Test Event"));
    assert_eq!(property(&events[0], "DTSTART"), Some("20250821T140000Z"));
    assert_eq!(property(&events[0], "DTEND"), Some("20250821T150000Z"));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_allow_any_origin(ctx: &TestContext) {
    let response = ctx
        .client
        .get_with_headers("/api/test-ical", &[("origin", "https://app.example.net")])
        .await
        .unwrap();

    response
        .assert_status(StatusCode::OK)
        .assert_header("access-control-allow-origin", "*");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_serve_the_same_document_every_time(ctx: &TestContext) {
    let first = ctx.client.get("/api/test-ical").await.unwrap().text();
    let second = ctx.client.get("/api/test-ical").await.unwrap().text();

    assert_eq!(first, second);
}
