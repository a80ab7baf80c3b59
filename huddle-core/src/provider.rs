//! The calendar integration surface shared by all providers.

use crate::credentials::Credentials;
use crate::entry::{CalendarEntry, CalendarInfo};
use crate::error::CalendarResult;

/// Calendar operations the client relies on.
///
/// Every calendar backend conforms to this contract; providers differ
/// in auth and transport, not in surface.
#[allow(async_fn_in_trait)]
pub trait CalendarProvider {
    /// Prepare the integration. CalDAV needs no external resources to
    /// load, so implementations may simply succeed.
    async fn load(&self) -> CalendarResult<()>;

    /// The signed-in account identity, or an empty string when signed
    /// out. Never fails.
    fn current_email(&self) -> String;

    /// Validate credentials against the server and remember them.
    ///
    /// Fields missing from `credentials` fall back to a previously
    /// stored session. Returns the discovered calendar list.
    async fn sign_in(&self, credentials: Option<Credentials>) -> CalendarResult<Vec<CalendarInfo>>;

    /// Fetch normalized entries in a day-offset window around now.
    ///
    /// Requires a prior sign-in. A failure on one calendar skips that
    /// calendar; it does not abort the aggregation.
    async fn calendar_entries(
        &self,
        start_days: Option<i64>,
        end_days: Option<i64>,
    ) -> CalendarResult<Vec<CalendarEntry>>;

    /// Write a meeting link into an event's location and description.
    /// Resolves with the location on success.
    async fn update_calendar_event(
        &self,
        id: &str,
        calendar_id: &str,
        location: &str,
    ) -> CalendarResult<String>;

    /// Whether the stored credentials still authenticate against the
    /// server. Converts every failure into `false`; never errors.
    async fn is_signed_in(&self) -> bool;
}
