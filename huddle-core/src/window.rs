//! Fetch window for calendar event queries.

use chrono::{DateTime, Duration, Utc};

/// Days fetched before "now" when the caller gives no offset.
pub const DEFAULT_FETCH_START_DAYS: i64 = -14;
/// Days fetched after "now" when the caller gives no offset.
pub const DEFAULT_FETCH_END_DAYS: i64 = 28;

/// A UTC time range that event queries are constrained to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl FetchWindow {
    /// Window spanning `start_days..end_days` around the given instant.
    pub fn from_day_offsets(
        now: DateTime<Utc>,
        start_days: Option<i64>,
        end_days: Option<i64>,
    ) -> Self {
        let start_days = start_days.unwrap_or(DEFAULT_FETCH_START_DAYS);
        let end_days = end_days.unwrap_or(DEFAULT_FETCH_END_DAYS);

        FetchWindow {
            start: now + Duration::days(start_days),
            end: now + Duration::days(end_days),
        }
    }

    /// Window around the current instant.
    pub fn around_now(start_days: Option<i64>, end_days: Option<i64>) -> Self {
        Self::from_day_offsets(Utc::now(), start_days, end_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_window_is_minus_14_plus_28_days() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let window = FetchWindow::from_day_offsets(now, None, None);

        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 7, 13, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_explicit_offsets_override_defaults() {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 12, 0, 0).unwrap();
        let window = FetchWindow::from_day_offsets(now, Some(-1), Some(1));

        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 6, 14, 12, 0, 0).unwrap());
        assert_eq!(window.end, Utc.with_ymd_and_hms(2025, 6, 16, 12, 0, 0).unwrap());
    }
}
