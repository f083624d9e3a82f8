pub mod calendar;
pub mod conversion;
pub mod feed;
pub mod shared;
