//! Side-effect intents emitted by the middleware chain.
//!
//! The store never performs I/O of its own; dialogs, notifications and
//! track creation come back from `dispatch` as values for the shell
//! runtime to execute.

use std::time::Duration;

use crate::notifications::Notification;

/// A dialog the shell should present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogRequest {
    /// Confirm stopping the local recording before muting video.
    StopRecording { local_recording_video_stop: bool },

    /// Ask for the user gesture that unlocks media permissions.
    PermissionRequest,
}

/// A side effect for the shell runtime to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    OpenDialog {
        dialog: DialogRequest,
        /// Present the dialog after this long, when set.
        delay: Option<Duration>,
    },
    CloseDialog,
    ShowNotification(Notification),
    CreateLocalTracks { audio: bool, video: bool },
}

impl Effect {
    pub fn open_dialog(dialog: DialogRequest) -> Self {
        Effect::OpenDialog {
            dialog,
            delay: None,
        }
    }

    pub fn open_dialog_after(dialog: DialogRequest, delay: Duration) -> Self {
        Effect::OpenDialog {
            dialog,
            delay: Some(delay),
        }
    }
}
