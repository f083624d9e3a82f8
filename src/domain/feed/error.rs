/// Fatal feed parsing failure. Only a document that is not well-formed XML ends up here.
#[derive(Debug, thiserror::Error)]
pub enum FeedParseError {
    #[error("malformed XML: {0}")]
    MalformedXml(String),
}

impl FeedParseError {
    pub(crate) fn malformed(reason: impl std::fmt::Display) -> Self {
        Self::MalformedXml(reason.to_string())
    }
}

/// Per-item extraction failure. The item is skipped and parsing continues.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ItemError {
    #[error("field `{field}` is not valid UTF-8")]
    InvalidEncoding { field: &'static str },
}
