//! The action vocabulary dispatched through the store.

use huddle_core::CalendarInfo;

/// Actions accepted by [`crate::store::Store::dispatch`].
///
/// A closed sum type: consumers match on it directly, so a new variant
/// fails loudly everywhere it matters.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// The application shell is about to mount.
    AppWillMount,

    /// The user (or the system) toggled video mute.
    SetVideoMuted { muted: bool },

    /// The user chose the web client after a desktop deep-link prompt.
    OpenWebApp,

    /// The owed media-permission prompt has been handled.
    ClearDeepLinkPermissionRequest,

    /// Calendar sign-in completed; store the non-secret projection.
    SetCalendarAuthState {
        username: String,
        calendars: Vec<CalendarInfo>,
    },
}
