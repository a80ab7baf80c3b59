//! Transport seam between provider logic and the CalDAV wire.
//!
//! `CalDavProvider` talks to a `DavBackend` rather than to libdav
//! directly, so its contract (credential validation, partial-failure
//! tolerance, not-found handling) is testable without a server.

use huddle_core::{CalendarError, CalendarInfo, CalendarResult, Credentials, FetchWindow};
use libdav::dav::{PutResource, mime_types};
use tracing::debug;

use crate::client::{DavClient, create_caldav_client, url_to_href};
use crate::requests::{
    CalendarHomeSet, CalendarObject, CurrentUserPrincipal, GetEventByUid, GetEventsInRange,
    ListCalendars,
};

/// The CalDAV operations the provider needs.
#[allow(async_fn_in_trait)]
pub trait DavBackend {
    /// Discover the account's calendar collections.
    async fn list_calendars(&self, credentials: &Credentials)
    -> CalendarResult<Vec<CalendarInfo>>;

    /// Fetch raw event resources within a time window.
    async fn events_in_range(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        window: &FetchWindow,
    ) -> CalendarResult<Vec<CalendarObject>>;

    /// Fetch the raw event resource matching a UID, if any.
    async fn event_by_uid(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        uid: &str,
    ) -> CalendarResult<Option<CalendarObject>>;

    /// Write an updated event resource back (etag-conditional).
    async fn put_event(
        &self,
        credentials: &Credentials,
        object: &CalendarObject,
    ) -> CalendarResult<()>;
}

/// Production backend: a fresh libdav client per call.
///
/// Client construction is cheap next to the CalDAV round-trips
/// themselves, and per-call clients always pick up the credentials the
/// caller passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct LibdavBackend;

impl LibdavBackend {
    pub fn new() -> Self {
        LibdavBackend
    }
}

impl DavBackend for LibdavBackend {
    async fn list_calendars(
        &self,
        credentials: &Credentials,
    ) -> CalendarResult<Vec<CalendarInfo>> {
        let client = create_caldav_client(credentials)?;
        let server_path = url_to_href(&credentials.server_url);
        let home = discover_calendar_home(&client, &server_path).await;

        client
            .request(ListCalendars::new(&home))
            .await
            .map_err(CalendarError::backend)
    }

    async fn events_in_range(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        window: &FetchWindow,
    ) -> CalendarResult<Vec<CalendarObject>> {
        let client = create_caldav_client(credentials)?;

        client
            .request(GetEventsInRange::new(calendar_id, &window.start, &window.end))
            .await
            .map_err(CalendarError::backend)
    }

    async fn event_by_uid(
        &self,
        credentials: &Credentials,
        calendar_id: &str,
        uid: &str,
    ) -> CalendarResult<Option<CalendarObject>> {
        let client = create_caldav_client(credentials)?;

        let resources = client
            .request(GetEventByUid::new(calendar_id, uid))
            .await
            .map_err(CalendarError::backend)?;

        Ok(resources.into_iter().next())
    }

    async fn put_event(
        &self,
        credentials: &Credentials,
        object: &CalendarObject,
    ) -> CalendarResult<()> {
        let client = create_caldav_client(credentials)?;

        // The etag came with the resource we are rewriting; a
        // conditional PUT refuses to clobber concurrent edits.
        let etag = object
            .etag
            .as_deref()
            .ok_or_else(|| CalendarError::backend("missing etag for conditional update"))?;

        client
            .request(PutResource::new(&object.href).update(&object.data, mime_types::CALENDAR, etag))
            .await
            .map_err(CalendarError::backend)?;

        Ok(())
    }
}

/// Resolve the calendar home for the account.
///
/// Walks current-user-principal -> calendar-home-set; accounts pointed
/// directly at their calendar home (common for plain CalDAV setups)
/// fall back to the server path itself.
async fn discover_calendar_home(client: &DavClient, server_path: &str) -> String {
    let principal = match client.request(CurrentUserPrincipal::new(server_path)).await {
        Ok(Some(href)) => href,
        Ok(None) => return server_path.to_string(),
        Err(err) => {
            debug!("Principal discovery failed, treating server path as calendar home: {err}");
            return server_path.to_string();
        }
    };

    match client.request(CalendarHomeSet::new(&principal)).await {
        Ok(Some(href)) => href,
        Ok(None) => server_path.to_string(),
        Err(err) => {
            debug!("Calendar home discovery failed, treating server path as calendar home: {err}");
            server_path.to_string()
        }
    }
}
