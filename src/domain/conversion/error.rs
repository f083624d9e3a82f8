use crate::domain::feed::FeedParseError;
use crate::error::AppError;
use crate::infrastructure::feed_client::FetchError;

#[derive(Debug, thiserror::Error)]
pub enum ConversionError {
    #[error("RSS URL is required")]
    MissingSourceUrl,
    #[error("Invalid RSS URL format: {0}")]
    InvalidSourceUrl(String),
    #[error("Failed to fetch RSS feed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Failed to parse RSS feed: {0}")]
    Parse(#[from] FeedParseError),
}

impl From<ConversionError> for AppError {
    fn from(err: ConversionError) -> Self {
        match err {
            ConversionError::MissingSourceUrl
            | ConversionError::InvalidSourceUrl(_)
            | ConversionError::Parse(_) => AppError::BadRequest(err.to_string()),
            ConversionError::Fetch(_) => AppError::ExternalService(err.to_string()),
        }
    }
}
