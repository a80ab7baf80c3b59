//! Custom CalDAV requests.
//!
//! libdav covers plain resource fetches, but this client needs
//! server-side filtering (time ranges, UID lookup) and collection
//! discovery. These are expressed as `DavRequest` implementations with
//! hand-built REPORT/PROPFIND bodies and roxmltree multistatus parsing.

use chrono::{DateTime, Utc};
use http::uri::PathAndQuery;
use http::{Method, Request, Uri};
use huddle_core::CalendarInfo;
use libdav::requests::{DavRequest, ParseResponseError};

/// Assemble an `http::Request` from the method/path/body/headers a DavRequest
/// describes, resolving `path` against the client's `base_url`.
fn build_request(
    base_url: Uri,
    method: Method,
    path: &str,
    body: String,
    headers: &[(String, String)],
) -> std::result::Result<Request<String>, http::Error> {
    let mut parts = base_url.into_parts();
    parts.path_and_query = Some(PathAndQuery::try_from(path)?);
    let mut builder = Request::builder().method(method).uri(Uri::from_parts(parts)?);
    for (name, value) in headers {
        builder = builder.header(name, value);
    }
    builder.body(body)
}

/// A fetched calendar resource with its raw ICS data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarObject {
    pub href: String,
    pub etag: Option<String>,
    pub data: String,
}

/// Format an instant for CalDAV time-range queries (YYYYMMDDTHHMMSSZ).
pub fn format_caldav_datetime(datetime: &DateTime<Utc>) -> String {
    datetime.format("%Y%m%dT%H%M%SZ").to_string()
}

/// Escape text placed inside an XML request body.
fn xml_escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

// ============================================================================
// Collection discovery
// ============================================================================

/// PROPFIND for the current user's principal href.
pub struct CurrentUserPrincipal<'a> {
    path: &'a str,
}

impl<'a> CurrentUserPrincipal<'a> {
    pub fn new(path: &'a str) -> Self {
        Self { path }
    }
}

impl DavRequest for CurrentUserPrincipal<'_> {
    type Response = Option<String>;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self, base_url: Uri) -> std::result::Result<Request<String>, http::Error> {
        let body = r#"<propfind xmlns="DAV:">
    <prop>
        <current-user-principal/>
    </prop>
</propfind>"#
            .to_string();

        build_request(
            base_url,
            Method::from_bytes(b"PROPFIND")?,
            self.path,
            body,
            &[("Depth".to_string(), "0".to_string())],
        )
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> std::result::Result<Self::Response, ParseResponseError> {
        if !parts.status.is_success() {
            return Err(ParseResponseError::BadStatusCode(parts.status));
        }
        parse_nested_href(body, "current-user-principal")
    }
}

/// PROPFIND for a principal's calendar-home-set href.
pub struct CalendarHomeSet<'a> {
    principal_href: &'a str,
}

impl<'a> CalendarHomeSet<'a> {
    pub fn new(principal_href: &'a str) -> Self {
        Self { principal_href }
    }
}

impl DavRequest for CalendarHomeSet<'_> {
    type Response = Option<String>;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self, base_url: Uri) -> std::result::Result<Request<String>, http::Error> {
        let body = r#"<propfind xmlns="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
    <prop>
        <C:calendar-home-set/>
    </prop>
</propfind>"#
            .to_string();

        build_request(
            base_url,
            Method::from_bytes(b"PROPFIND")?,
            self.principal_href,
            body,
            &[("Depth".to_string(), "0".to_string())],
        )
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> std::result::Result<Self::Response, ParseResponseError> {
        if !parts.status.is_success() {
            return Err(ParseResponseError::BadStatusCode(parts.status));
        }
        parse_nested_href(body, "calendar-home-set")
    }
}

/// PROPFIND listing the calendar collections under a calendar home.
pub struct ListCalendars<'a> {
    home_href: &'a str,
}

impl<'a> ListCalendars<'a> {
    pub fn new(home_href: &'a str) -> Self {
        Self { home_href }
    }
}

impl DavRequest for ListCalendars<'_> {
    type Response = Vec<CalendarInfo>;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self, base_url: Uri) -> std::result::Result<Request<String>, http::Error> {
        let body = r#"<propfind xmlns="DAV:" xmlns:IC="http://apple.com/ns/ical/">
    <prop>
        <displayname/>
        <resourcetype/>
        <IC:calendar-color/>
    </prop>
</propfind>"#
            .to_string();

        build_request(
            base_url,
            Method::from_bytes(b"PROPFIND")?,
            self.home_href,
            body,
            &[("Depth".to_string(), "1".to_string())],
        )
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> std::result::Result<Self::Response, ParseResponseError> {
        if !parts.status.is_success() {
            return Err(ParseResponseError::BadStatusCode(parts.status));
        }
        parse_calendar_list(body)
    }
}

// ============================================================================
// Filtered calendar queries
// ============================================================================

/// calendar-query REPORT fetching resources within a time range.
///
/// Server-side time-range filtering avoids pulling the whole collection
/// and filtering locally.
pub struct GetEventsInRange<'a> {
    collection_href: &'a str,
    start: String,
    end: String,
}

impl<'a> GetEventsInRange<'a> {
    pub fn new(collection_href: &'a str, start: &DateTime<Utc>, end: &DateTime<Utc>) -> Self {
        Self {
            collection_href,
            start: format_caldav_datetime(start),
            end: format_caldav_datetime(end),
        }
    }
}

impl DavRequest for GetEventsInRange<'_> {
    type Response = Vec<CalendarObject>;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self, base_url: Uri) -> std::result::Result<Request<String>, http::Error> {
        let body = format!(
            r#"<C:calendar-query xmlns="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
    <prop>
        <getetag/>
        <C:calendar-data/>
    </prop>
    <C:filter>
        <C:comp-filter name="VCALENDAR">
            <C:comp-filter name="VEVENT">
                <C:time-range start="{}" end="{}"/>
            </C:comp-filter>
        </C:comp-filter>
    </C:filter>
</C:calendar-query>"#,
            self.start, self.end
        );

        build_request(
            base_url,
            Method::from_bytes(b"REPORT")?,
            self.collection_href,
            body,
            &[("Depth".to_string(), "1".to_string())],
        )
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> std::result::Result<Self::Response, ParseResponseError> {
        if !parts.status.is_success() {
            return Err(ParseResponseError::BadStatusCode(parts.status));
        }
        parse_calendar_resources(body)
    }
}

/// calendar-query REPORT fetching the single resource matching a UID.
pub struct GetEventByUid<'a> {
    collection_href: &'a str,
    uid: &'a str,
}

impl<'a> GetEventByUid<'a> {
    pub fn new(collection_href: &'a str, uid: &'a str) -> Self {
        Self {
            collection_href,
            uid,
        }
    }
}

impl DavRequest for GetEventByUid<'_> {
    type Response = Vec<CalendarObject>;
    type ParseError = ParseResponseError;
    type Error<E> = libdav::dav::WebDavError<E>;

    fn prepare_request(&self, base_url: Uri) -> std::result::Result<Request<String>, http::Error> {
        let body = format!(
            r#"<C:calendar-query xmlns="DAV:" xmlns:C="urn:ietf:params:xml:ns:caldav">
    <prop>
        <getetag/>
        <C:calendar-data/>
    </prop>
    <C:filter>
        <C:comp-filter name="VCALENDAR">
            <C:comp-filter name="VEVENT">
                <C:prop-filter name="UID">
                    <C:text-match collation="i;ascii-casemap" negate-condition="no">{}</C:text-match>
                </C:prop-filter>
            </C:comp-filter>
        </C:comp-filter>
    </C:filter>
</C:calendar-query>"#,
            xml_escape(self.uid)
        );

        build_request(
            base_url,
            Method::from_bytes(b"REPORT")?,
            self.collection_href,
            body,
            &[("Depth".to_string(), "1".to_string())],
        )
    }

    fn parse_response(
        &self,
        parts: &http::response::Parts,
        body: &[u8],
    ) -> std::result::Result<Self::Response, ParseResponseError> {
        if !parts.status.is_success() {
            return Err(ParseResponseError::BadStatusCode(parts.status));
        }
        parse_calendar_resources(body)
    }
}

// ============================================================================
// Multistatus parsing
// ============================================================================

/// Parse calendar resources from a CalDAV multistatus response.
fn parse_calendar_resources(
    body: &[u8],
) -> std::result::Result<Vec<CalendarObject>, ParseResponseError> {
    let text = std::str::from_utf8(body)?;
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();

    let mut resources = Vec::new();

    for response in root
        .descendants()
        .filter(|n| n.tag_name().name() == "response")
    {
        let href = response
            .descendants()
            .find(|n| n.tag_name().name() == "href")
            .and_then(|n| n.text())
            .map(|s| s.to_string());

        let Some(href) = href else { continue };

        let etag = response
            .descendants()
            .find(|n| n.tag_name().name() == "getetag")
            .and_then(|n| n.text())
            .map(|s| s.to_string());

        let data = response
            .descendants()
            .find(|n| n.tag_name().name() == "calendar-data")
            .and_then(|n| n.text())
            .map(|s| s.to_string());

        // Only include resources that actually carry calendar data
        if let Some(data) = data {
            resources.push(CalendarObject { href, etag, data });
        }
    }

    Ok(resources)
}

/// Parse the calendar collections out of a PROPFIND multistatus body.
///
/// Collections whose resourcetype does not include `calendar` (the home
/// itself, address books, ...) are dropped.
fn parse_calendar_list(
    body: &[u8],
) -> std::result::Result<Vec<CalendarInfo>, ParseResponseError> {
    let text = std::str::from_utf8(body)?;
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();

    let mut calendars = Vec::new();

    for response in root
        .descendants()
        .filter(|n| n.tag_name().name() == "response")
    {
        let href = response
            .descendants()
            .find(|n| n.tag_name().name() == "href")
            .and_then(|n| n.text())
            .map(|s| s.to_string());

        let Some(href) = href else { continue };

        let is_calendar = response
            .descendants()
            .find(|n| n.tag_name().name() == "resourcetype")
            .map(|rt| rt.children().any(|c| c.tag_name().name() == "calendar"))
            .unwrap_or(false);

        if !is_calendar {
            continue;
        }

        let display_name = response
            .descendants()
            .find(|n| n.tag_name().name() == "displayname")
            .and_then(|n| n.text())
            .map(|s| s.to_string());

        let color = response
            .descendants()
            .find(|n| n.tag_name().name() == "calendar-color")
            .and_then(|n| n.text())
            .map(|s| s.to_string());

        calendars.push(CalendarInfo {
            id: href,
            display_name,
            color,
        });
    }

    Ok(calendars)
}

/// Parse an href nested under the named property in a PROPFIND body.
fn parse_nested_href(
    body: &[u8],
    property: &str,
) -> std::result::Result<Option<String>, ParseResponseError> {
    let text = std::str::from_utf8(body)?;
    let doc = roxmltree::Document::parse(text)?;
    let root = doc.root_element();

    let href = root
        .descendants()
        .find(|n| n.tag_name().name() == property)
        .and_then(|prop| {
            prop.descendants()
                .find(|n| n.tag_name().name() == "href")
                .and_then(|n| n.text())
                .map(|s| s.to_string())
        });

    Ok(href)
}
