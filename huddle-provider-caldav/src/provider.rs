//! CalDAV implementation of the calendar provider surface.
//!
//! Semantics the client depends on:
//! - sign-in validates credentials by fetching the calendar list and
//!   refuses to persist anything when the account has no calendars;
//! - event aggregation tolerates individual calendar failures;
//! - `is_signed_in` never errors.

use std::sync::Mutex;

use huddle_core::{
    CalendarEntry, CalendarError, CalendarInfo, CalendarProvider, CalendarResult, Credentials,
    FetchWindow, invite::share_info_text,
};
use tracing::{debug, error, warn};
use url::Url;

use crate::backend::DavBackend;
use crate::ics;
use crate::requests::CalendarObject;
use crate::session::Session;

/// Auth state for the signed-in account.
///
/// Held by the provider, not the application store; the store only ever
/// sees the username and calendar list.
#[derive(Debug, Clone)]
struct CalDavAuth {
    credentials: Credentials,
    calendars: Vec<CalendarInfo>,
}

/// CalDAV calendar provider.
pub struct CalDavProvider<B> {
    backend: B,
    auth: Mutex<Option<CalDavAuth>>,
    persist_session: bool,
}

impl<B: DavBackend> CalDavProvider<B> {
    /// Provider with in-memory auth only.
    pub fn new(backend: B) -> Self {
        CalDavProvider {
            backend,
            auth: Mutex::new(None),
            persist_session: false,
        }
    }

    /// Provider that saves credentials to the on-disk session on
    /// sign-in and falls back to it when none are supplied.
    pub fn with_persisted_session(backend: B) -> Self {
        CalDavProvider {
            backend,
            auth: Mutex::new(None),
            persist_session: true,
        }
    }

    fn auth(&self) -> Option<CalDavAuth> {
        self.auth.lock().expect("auth state lock poisoned").clone()
    }

    /// Credentials from memory, then from the saved session.
    fn stored_credentials(&self) -> Option<Credentials> {
        if let Some(auth) = self.auth() {
            return Some(auth.credentials);
        }

        if self.persist_session {
            match Session::load() {
                Ok(session) => return session.map(|s| s.credentials().clone()),
                Err(err) => warn!("Failed to load CalDAV session: {err}"),
            }
        }

        None
    }

    /// Merge supplied credentials over stored ones, field by field.
    fn merge_credentials(&self, supplied: Option<Credentials>) -> Credentials {
        let stored = self.stored_credentials().unwrap_or_default();

        match supplied {
            None => stored,
            Some(supplied) => Credentials {
                server_url: pick(supplied.server_url, stored.server_url),
                username: pick(supplied.username, stored.username),
                password: pick(supplied.password, stored.password),
            },
        }
    }
}

fn pick(supplied: String, stored: String) -> String {
    if supplied.is_empty() { stored } else { supplied }
}

impl<B: DavBackend> CalendarProvider for CalDavProvider<B> {
    /// CalDAV needs no external resources, so loading succeeds
    /// immediately.
    async fn load(&self) -> CalendarResult<()> {
        Ok(())
    }

    fn current_email(&self) -> String {
        self.stored_credentials()
            .map(|c| c.username)
            .unwrap_or_default()
    }

    async fn sign_in(&self, credentials: Option<Credentials>) -> CalendarResult<Vec<CalendarInfo>> {
        let credentials = self.merge_credentials(credentials);

        if !credentials.is_complete() {
            return Err(CalendarError::MissingCredentials);
        }

        // Catch malformed URLs before any client is built
        Url::parse(&credentials.server_url)
            .map_err(|_| CalendarError::InvalidServerUrl(credentials.server_url.clone()))?;

        // Validate the credentials by fetching the calendar list
        let calendars = self
            .backend
            .list_calendars(&credentials)
            .await
            .inspect_err(|err| error!("CalDAV sign in failed: {err}"))?;

        if calendars.is_empty() {
            return Err(CalendarError::NoCalendars);
        }

        if self.persist_session {
            if let Err(err) = Session::from_credentials(credentials.clone()).save() {
                warn!("Failed to persist CalDAV session: {err}");
            }
        }

        *self.auth.lock().expect("auth state lock poisoned") = Some(CalDavAuth {
            credentials,
            calendars: calendars.clone(),
        });

        Ok(calendars)
    }

    async fn calendar_entries(
        &self,
        start_days: Option<i64>,
        end_days: Option<i64>,
    ) -> CalendarResult<Vec<CalendarEntry>> {
        let auth = self.auth().ok_or(CalendarError::NotAuthorized)?;
        let window = FetchWindow::around_now(start_days, end_days);

        let mut entries = Vec::new();
        for calendar in &auth.calendars {
            match self
                .backend
                .events_in_range(&auth.credentials, &calendar.id, &window)
                .await
            {
                Ok(objects) => {
                    for object in objects {
                        match ics::parse_entry(&object.data, &calendar.id) {
                            Some(entry) => entries.push(entry),
                            None => debug!(
                                "Skipping unparseable calendar resource {}",
                                object.href
                            ),
                        }
                    }
                }
                Err(err) => {
                    // One bad calendar must not blank the whole list
                    warn!(
                        "Error fetching events for calendar {}: {err}",
                        calendar.id
                    );
                }
            }
        }

        Ok(entries)
    }

    async fn update_calendar_event(
        &self,
        id: &str,
        calendar_id: &str,
        location: &str,
    ) -> CalendarResult<String> {
        let auth = self.auth().ok_or(CalendarError::NotAuthorized)?;

        let calendar = auth
            .calendars
            .iter()
            .find(|c| c.id == calendar_id)
            .ok_or_else(|| CalendarError::CalendarNotFound(calendar_id.to_string()))?;

        let object = self
            .backend
            .event_by_uid(&auth.credentials, &calendar.id, id)
            .await
            .inspect_err(|err| error!("Error updating CalDAV event: {err}"))?
            .ok_or_else(|| CalendarError::EventNotFound(id.to_string()))?;

        let share_info = share_info_text(location);
        let patched = ics::patch_event_ics(&object.data, location, &share_info)?;

        let updated = CalendarObject {
            data: patched,
            ..object
        };
        self.backend
            .put_event(&auth.credentials, &updated)
            .await
            .inspect_err(|err| error!("Error updating CalDAV event: {err}"))?;

        Ok(location.to_string())
    }

    async fn is_signed_in(&self) -> bool {
        let Some(credentials) = self.stored_credentials() else {
            return false;
        };
        if !credentials.is_complete() {
            return false;
        }

        match self.backend.list_calendars(&credentials).await {
            Ok(calendars) => !calendars.is_empty(),
            Err(err) => {
                warn!("CalDAV authorization check failed: {err}");
                false
            }
        }
    }
}
