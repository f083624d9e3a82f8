use rss_to_ical::controllers::CalendarController;
use rss_to_ical::domain::conversion::ConversionService;
use rss_to_ical::domain::shared::SystemClock;
use rss_to_ical::infrastructure::config::{Config, LogFormat};
use rss_to_ical::infrastructure::feed_client::HttpFeedClient;
use rss_to_ical::infrastructure::http::start_http_server;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        "Starting RSS to iCal converter on {}:{}",
        config.host,
        config.port
    );

    let feed_client = HttpFeedClient::new(
        config.fetch_timeout(),
        &config.user_agent,
        config.max_feed_bytes,
    )?;
    tracing::info!(
        timeout_secs = config.fetch_timeout_secs,
        max_feed_bytes = config.max_feed_bytes,
        user_agent = %config.user_agent,
        "Feed client initialized"
    );

    let config = Arc::new(config);

    // === DEPENDENCY INJECTION SETUP ===
    let conversion_service = Arc::new(ConversionService::new(
        Arc::new(feed_client),
        Arc::new(SystemClock),
        config.description_format,
    ));
    let calendar_controller = Arc::new(CalendarController::new(
        conversion_service,
        config.base_url(),
    ));

    start_http_server(config, calendar_controller).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "rss_to_ical=debug,tower_http=debug"
    } else {
        "rss_to_ical=info,tower_http=info"
    };

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| default_filter.into()),
            )
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
