//! CalDAV client construction using libdav.

use http::Uri;
use huddle_core::{CalendarError, CalendarResult, Credentials};
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use libdav::CalDavClient;
use libdav::dav::WebDavClient;
use tower::ServiceBuilder;
use tower_http::auth::AddAuthorization;
use tower_http::follow_redirect::{FollowRedirect, FollowRedirectLayer};

/// Type alias for the HTTP client with auth and redirect following.
type HttpClient = FollowRedirect<
    AddAuthorization<
        Client<hyper_rustls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>, String>,
    >,
>;

/// Type alias for our CalDAV client.
pub type DavClient = CalDavClient<HttpClient>;

/// Create a libdav CalDavClient for the given account.
///
/// The client is configured with:
/// - Basic authentication using the account credentials
/// - Automatic redirect following (servers commonly redirect to
///   per-user hosts)
/// - HTTPS support
pub fn create_caldav_client(credentials: &Credentials) -> CalendarResult<DavClient> {
    let uri: Uri = credentials
        .server_url
        .parse()
        .map_err(|_| CalendarError::InvalidServerUrl(credentials.server_url.clone()))?;

    let https_connector = HttpsConnectorBuilder::new()
        .with_native_roots()
        .map_err(CalendarError::backend)?
        .https_or_http()
        .enable_http1()
        .build();

    let http_client = Client::builder(TokioExecutor::new()).build(https_connector);

    let auth_client =
        AddAuthorization::basic(http_client, &credentials.username, &credentials.password);

    let client = ServiceBuilder::new()
        .layer(FollowRedirectLayer::new())
        .service(auth_client);

    let webdav = WebDavClient::new(uri, client);
    Ok(CalDavClient::new(webdav))
}

/// Extract the href path from a full URL.
///
/// Converts "https://dav.example.com/user/calendars/work/" to
/// "/user/calendars/work/".
pub fn url_to_href(url: &str) -> String {
    if let Ok(uri) = url.parse::<Uri>() {
        uri.path().to_string()
    } else {
        url.to_string()
    }
}
