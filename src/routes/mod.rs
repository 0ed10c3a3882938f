pub mod attendance;
pub mod birthdays;
pub mod calendar;
pub mod history;
