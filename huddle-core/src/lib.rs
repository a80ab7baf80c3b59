//! Core types for the huddle client.
//!
//! This crate provides the types shared between the feature engine and
//! calendar providers:
//! - `CalendarEntry` / `CalendarInfo` normalized calendar types
//! - the `CalendarProvider` integration trait
//! - the `CalendarError` taxonomy

pub mod credentials;
pub mod entry;
pub mod error;
pub mod invite;
pub mod provider;
pub mod window;

pub use credentials::Credentials;
pub use entry::{CalendarEntry, CalendarInfo, extract_url_from_description};
pub use error::{CalendarError, CalendarResult};
pub use provider::CalendarProvider;
pub use window::FetchWindow;
