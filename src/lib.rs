//! Feature engine for the huddle conferencing client.
//!
//! Everything user-visible is expressed as [`Effect`] intents returned
//! from [`Store::dispatch`]; a shell (GUI or the bundled CLI) executes
//! them. The calendar integration lives behind the `CalendarProvider`
//! trait from `huddle-core`, with the CalDAV implementation in
//! `huddle-provider-caldav`.

pub mod actions;
pub mod calendar_sync;
pub mod deep_link;
pub mod effects;
pub mod media;
pub mod notifications;
pub mod permissions;
pub mod store;

pub use actions::Action;
pub use effects::{DialogRequest, Effect};
pub use notifications::{Notification, NotificationTimeout};
pub use store::{AppState, Flow, Middleware, Store};
