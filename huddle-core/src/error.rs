//! Error types for the huddle calendar slice.

use thiserror::Error;

/// Errors that can occur in calendar operations.
#[derive(Error, Debug)]
pub enum CalendarError {
    #[error("Missing CalDAV credentials")]
    MissingCredentials,

    #[error("Not authorized, please sign in")]
    NotAuthorized,

    #[error("No calendars found")]
    NoCalendars,

    #[error("Calendar not found: {0}")]
    CalendarNotFound(String),

    #[error("Event not found: {0}")]
    EventNotFound(String),

    #[error("Invalid server URL: {0}")]
    InvalidServerUrl(String),

    #[error("ICS parse error: {0}")]
    IcsParse(String),

    #[error("Calendar backend error: {0}")]
    Backend(String),
}

impl CalendarError {
    /// Wrap a transport or auth failure as a backend error.
    pub fn backend(err: impl std::fmt::Display) -> Self {
        CalendarError::Backend(err.to_string())
    }
}

/// Result type alias for calendar operations.
pub type CalendarResult<T> = Result<T, CalendarError>;
