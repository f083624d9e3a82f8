pub mod calendar;
pub mod health;

pub use calendar::CalendarController;
