pub mod config;
pub mod feed_client;
pub mod http;
pub mod middleware;
