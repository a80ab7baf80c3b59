//! Deep-linking state: flags left behind by the web/desktop handoff.

use crate::actions::Action;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeepLinkState {
    /// The user chose the web client over the desktop app.
    pub launch_in_web: bool,
    /// A media-permission prompt is still owed after that choice.
    pub needs_permission_request: bool,
}

pub fn reduce(state: &mut DeepLinkState, action: &Action) {
    match action {
        Action::OpenWebApp => {
            state.launch_in_web = true;
            // The prompt is owed once the user lands in the web client
            state.needs_permission_request = true;
        }
        Action::ClearDeepLinkPermissionRequest => {
            state.needs_permission_request = false;
        }
        _ => {}
    }
}
