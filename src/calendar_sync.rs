//! Store-resident calendar sign-in projection.
//!
//! Only the non-secret half of a sign-in lives here; credentials stay
//! inside the provider's session.

use huddle_core::CalendarInfo;

use crate::actions::Action;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CalendarSyncState {
    /// Signed-in account identity.
    pub username: Option<String>,
    /// Calendars discovered at sign-in.
    pub calendars: Vec<CalendarInfo>,
}

impl CalendarSyncState {
    pub fn is_signed_in(&self) -> bool {
        self.username.is_some()
    }
}

pub fn reduce(state: &mut CalendarSyncState, action: &Action) {
    if let Action::SetCalendarAuthState {
        username,
        calendars,
    } = action
    {
        state.username = Some(username.clone());
        state.calendars = calendars.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_state_projection() {
        let mut state = CalendarSyncState::default();
        assert!(!state.is_signed_in());

        reduce(
            &mut state,
            &Action::SetCalendarAuthState {
                username: "lena".to_string(),
                calendars: vec![CalendarInfo {
                    id: "/lena/calendars/work/".to_string(),
                    display_name: Some("Work".to_string()),
                    color: None,
                }],
            },
        );

        assert!(state.is_signed_in());
        assert_eq!(state.username.as_deref(), Some("lena"));
        assert_eq!(state.calendars.len(), 1);
    }
}
