//! Notification vocabulary.

use std::time::Duration;

/// How long a notification stays on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationTimeout {
    Short,
    Medium,
    Long,
    /// Stays until the user dismisses it.
    Sticky,
}

impl NotificationTimeout {
    pub fn duration(self) -> Option<Duration> {
        match self {
            NotificationTimeout::Short => Some(Duration::from_millis(2500)),
            NotificationTimeout::Medium => Some(Duration::from_secs(5)),
            NotificationTimeout::Long => Some(Duration::from_secs(10)),
            NotificationTimeout::Sticky => None,
        }
    }
}

/// A notification the shell should show.
///
/// The `uid` lets the shell dedup repeats of the same notice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub uid: &'static str,
    pub title: String,
    pub description: String,
    pub timeout: NotificationTimeout,
}

impl Notification {
    /// Warning shown when unmuting video while the running local
    /// recording was started without video.
    pub fn local_recording_no_video() -> Self {
        Notification {
            uid: "recording.local-recording-no-video",
            title: "Recording has no video".to_string(),
            description: "The running local recording was started without video; \
                          unmuting will not add it to the recording."
                .to_string(),
            timeout: NotificationTimeout::Medium,
        }
    }

    /// Sticky notice asking the user to grant device permissions.
    pub fn browser_permissions() -> Self {
        Notification {
            uid: "deep-linking.permissions",
            title: "Allow camera and microphone".to_string(),
            description: "Grant device access to join meetings with audio and video."
                .to_string(),
            timeout: NotificationTimeout::Sticky,
        }
    }
}
