pub mod error;
pub mod model;
pub mod parser;

pub use error::{FeedParseError, ItemError};
pub use model::{FeedItem, ParsedFeed};
pub use parser::parse_feed;
