pub mod auth;
pub mod calendars;
pub mod events;
pub mod link;
