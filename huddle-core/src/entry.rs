//! Provider-neutral calendar types.
//!
//! Providers convert their API responses into these types; the client
//! works exclusively with them for display and meeting-link handling.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// A calendar collection discovered on the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarInfo {
    /// Stable calendar id. For CalDAV this is the collection href.
    pub id: String,
    /// Human-readable name, when the server reports one.
    pub display_name: Option<String>,
    /// Calendar color, when the server reports one.
    pub color: Option<String>,
}

impl CalendarInfo {
    /// The name shown to the user, falling back to the id.
    pub fn name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.id)
    }
}

/// A normalized calendar event entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEntry {
    /// Event UID.
    pub id: String,
    /// Id of the calendar the event lives in.
    pub calendar_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub location: Option<String>,
    /// Meeting URL carried by the event, when one could be found.
    pub url: Option<String>,
}

static URL_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Extract a meeting URL from an event description.
///
/// The first http(s) URL in the text wins; the description may carry
/// arbitrary prose around it.
pub fn extract_url_from_description(description: Option<&str>) -> Option<String> {
    let description = description?;
    let pattern =
        URL_PATTERN.get_or_init(|| Regex::new(r"https?://\S+").expect("URL pattern is valid"));
    pattern.find(description).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_url_from_description() {
        let url = extract_url_from_description(Some(
            "Join at https://meet.example/room123 now",
        ));
        assert_eq!(url.as_deref(), Some("https://meet.example/room123"));
    }

    #[test]
    fn test_extract_url_takes_first_match() {
        let url = extract_url_from_description(Some(
            "Primary: http://meet.example/a Backup: https://meet.example/b",
        ));
        assert_eq!(url.as_deref(), Some("http://meet.example/a"));
    }

    #[test]
    fn test_extract_url_none_without_url() {
        assert_eq!(extract_url_from_description(Some("Weekly planning")), None);
        assert_eq!(extract_url_from_description(None), None);
    }
}
