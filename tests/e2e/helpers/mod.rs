use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use chrono::{DateTime, TimeZone, Utc};
use rss_to_ical::controllers::CalendarController;
use rss_to_ical::domain::calendar::DescriptionFormat;
use rss_to_ical::domain::conversion::ConversionService;
use rss_to_ical::domain::shared::FixedClock;
use rss_to_ical::infrastructure::feed_client::HttpFeedClient;
use rss_to_ical::infrastructure::http::build_router;
use std::sync::Arc;
use test_context::AsyncTestContext;
use tokio::net::TcpListener;

pub mod assertions;

use api_client::TestClient;

pub const PUBLIC_BASE_URL: &str = "https://cal.example.test";
pub const DEFAULT_MAX_FEED_BYTES: usize = 1024 * 1024;

pub struct TestContext {
    pub client: TestClient,
    pub upstream_url: String,
    pub generated_at: DateTime<Utc>,
}

impl AsyncTestContext for TestContext {
    fn setup() -> impl std::future::Future<Output = Self> + Send {
        Self::start(DEFAULT_MAX_FEED_BYTES, DescriptionFormat::Raw)
    }

    fn teardown(self) -> impl std::future::Future<Output = ()> + Send {
        async {
            // Both servers stop with the test runtime
        }
    }
}

impl TestContext {
    /// Start the upstream and the application with a custom feed size limit
    /// and description format
    pub async fn start(max_feed_bytes: usize, description_format: DescriptionFormat) -> Self {
        let upstream_url = spawn(upstream_router()).await;

        let generated_at = generation_instant();
        let http_client = reqwest::Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to build HTTP client");
        let feed_client = HttpFeedClient::with_client(http_client, max_feed_bytes);

        let conversion_service = Arc::new(ConversionService::new(
            Arc::new(feed_client),
            Arc::new(FixedClock(generated_at)),
            description_format,
        ));
        let calendar_controller = Arc::new(CalendarController::new(
            conversion_service,
            PUBLIC_BASE_URL.to_string(),
        ));

        let base_url = spawn(build_router(calendar_controller)).await;

        Self {
            client: TestClient::new(&base_url),
            upstream_url,
            generated_at,
        }
    }

    /// Address of a fixture feed on the upstream server
    pub fn feed_url(&self, name: &str) -> String {
        format!("{}/feeds/{}", self.upstream_url, name)
    }

    /// Upstream address that always answers with `status`
    pub fn status_url(&self, status: u16) -> String {
        format!("{}/status/{}", self.upstream_url, status)
    }

    /// Request path for `endpoint` with `url` as the encoded query parameter
    pub fn path_for(&self, endpoint: &str, url: &str) -> String {
        format!("{}?url={}", endpoint, urlencoding::encode(url))
    }
}

/// Instant every test calendar is generated at
pub fn generation_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 8, 20, 12, 0, 0).unwrap()
}

async fn spawn(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("Failed to get local addr");

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn upstream_router() -> Router {
    Router::new()
        .route("/feeds/:name", get(serve_fixture))
        .route("/status/:code", get(serve_status))
}

async fn serve_fixture(Path(name): Path<String>) -> Response {
    match fixtures::feed(&name) {
        Some(body) => (
            [(header::CONTENT_TYPE, "application/rss+xml; charset=utf-8")],
            body,
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn serve_status(Path(code): Path<u16>) -> Response {
    StatusCode::from_u16(code)
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
        .into_response()
}
