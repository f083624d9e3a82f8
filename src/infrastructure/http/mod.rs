use axum::{
    http::{header, Method},
    middleware,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::controllers::{calendar::CalendarController, health};
use crate::infrastructure::config::Config;
use crate::infrastructure::middleware::request_id_middleware;

/// Assemble the application router
pub fn build_router(calendar_controller: Arc<CalendarController>) -> Router {
    // Calendar routes are public and read-only, any origin may call them
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers([header::CONTENT_TYPE]);

    let calendar_routes = Router::new()
        .route("/api/ical", get(CalendarController::get_ical))
        .route("/api/test-ical", get(CalendarController::get_test_ical))
        .route("/api/debug-rss", get(CalendarController::debug_rss))
        .route("/api/subscription", get(CalendarController::get_subscription))
        .with_state(calendar_controller)
        .layer(cors);

    Router::new()
        .route("/health", get(health::health))
        .merge(calendar_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    calendar_controller: Arc<CalendarController>,
) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_router(calendar_controller);

    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
