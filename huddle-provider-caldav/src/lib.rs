//! CalDAV calendar provider for the huddle client.
//!
//! Wraps a libdav-based CalDAV stack behind the `CalendarProvider`
//! surface: credential sign-in, calendar discovery, windowed event
//! fetch, and meeting-link writeback.

pub mod backend;
pub mod client;
pub mod ics;
pub mod provider;
pub mod requests;
pub mod session;

pub use backend::{DavBackend, LibdavBackend};
pub use provider::CalDavProvider;
pub use requests::CalendarObject;
pub use session::Session;
