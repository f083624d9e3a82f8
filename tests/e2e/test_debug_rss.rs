use crate::e2e::helpers;

use helpers::TestContext;
use hyper::StatusCode;
use serde_json::json;
use test_context::test_context;

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_describe_a_parsed_feed(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&ctx.path_for("/api/debug-rss", &ctx.feed_url("campus.xml")))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["channel_title"], json!("Campus Calendar"));
    assert_eq!(body["item_count"], json!(3));
    assert_eq!(body["skipped_items"], json!(0));
    assert_eq!(
        body["first_item"],
        json!({
            "title": "Opening Lecture",
            "description": "<p>Welcome to the <b>new</b> term</p>",
            "link": "https://campus.example.com/events/1",
            "pub_date": "Mon, 01 Sep 2025 09:00:00 +0200",
            "guid": "https://campus.example.com/events/1"
        })
    );
    assert_eq!(body["sample_items"].as_array().unwrap().len(), 3);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_limit_sample_items(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&ctx.path_for("/api/debug-rss", &ctx.feed_url("duplicate-guids.xml")))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["item_count"], json!(5));

    let titles: Vec<&str> = body["sample_items"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|item| item["title"].as_str())
        .collect();
    assert_eq!(titles, vec!["One", "Two", "Three"]);
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_count_skipped_items(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&ctx.path_for("/api/debug-rss", &ctx.feed_url("partially-broken.xml")))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["item_count"], json!(2));
    assert_eq!(body["skipped_items"], json!(1));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_return_no_first_item_for_an_empty_channel(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&ctx.path_for("/api/debug-rss", &ctx.feed_url("empty.xml")))
        .await
        .unwrap();

    response.assert_status(StatusCode::OK);

    let body = response.body.as_ref().unwrap();
    assert_eq!(body["channel_title"], json!(null));
    assert_eq!(body["item_count"], json!(0));
    assert_eq!(body["first_item"], json!(null));
    assert_eq!(body["sample_items"], json!([]));
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_reject_malformed_feeds(ctx: &TestContext) {
    let response = ctx
        .client
        .get(&ctx.path_for("/api/debug-rss", &ctx.feed_url("not-xml.html")))
        .await
        .unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("malformed XML");
}

#[test_context(TestContext)]
#[tokio::test]
async fn it_should_require_a_url(ctx: &TestContext) {
    let response = ctx.client.get("/api/debug-rss").await.unwrap();

    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_error_message("RSS URL is required");
}
