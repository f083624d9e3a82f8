pub mod error;
pub mod service;

pub use error::ConversionError;
pub use service::{validate_source_url, Conversion, ConversionService, ConversionServiceApi};
