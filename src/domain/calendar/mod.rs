pub mod builder;
pub mod date;
pub mod error;
pub mod model;
pub mod text;
pub mod uid;

pub use builder::{
    convert_to_calendar, CalendarBuilder, DescriptionFormat, DEFAULT_CALENDAR_DESCRIPTION,
    DEFAULT_CALENDAR_TITLE, UNTITLED_EVENT,
};
pub use error::EventBuildError;
pub use model::{CalendarDocument, NormalizedEvent, Property};
