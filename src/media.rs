//! Media state and the recording-aware mute middleware.

use crate::actions::Action;
use crate::effects::{DialogRequest, Effect};
use crate::notifications::Notification;
use crate::store::{AppState, Flow, Middleware};

/// Local-recording flags for the current session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfRecording {
    /// Recording of the local participant is running.
    pub on: bool,
    /// The recording captures video.
    pub with_video: bool,
}

/// Read access to the local recording session.
///
/// Injected into the middleware rather than reached for as a global
/// recording manager.
pub trait RecordingMonitor: Send {
    fn is_recording_locally(&self) -> bool;
    fn self_recording(&self) -> SelfRecording;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MediaState {
    pub video_muted: bool,
}

pub fn reduce(state: &mut MediaState, action: &Action) {
    if let Action::SetVideoMuted { muted } = action {
        state.video_muted = *muted;
    }
}

/// Intercepts video-mute toggles while a local recording is running.
pub struct MediaMuteMiddleware<R> {
    recording: R,
}

impl<R: RecordingMonitor> MediaMuteMiddleware<R> {
    pub fn new(recording: R) -> Self {
        MediaMuteMiddleware { recording }
    }
}

impl<R: RecordingMonitor> Middleware for MediaMuteMiddleware<R> {
    fn handle(&mut self, _state: &AppState, action: &Action, effects: &mut Vec<Effect>) -> Flow {
        let Action::SetVideoMuted { muted } = action else {
            return Flow::Forward;
        };

        let self_recording = self.recording.self_recording();
        if !self.recording.is_recording_locally() || !self_recording.on {
            return Flow::Forward;
        }

        if *muted && self_recording.with_video {
            // Muting would cut video out of the running recording; the
            // user has to stop it explicitly first.
            effects.push(Effect::open_dialog(DialogRequest::StopRecording {
                local_recording_video_stop: true,
            }));
            return Flow::Swallow;
        }

        if !*muted && !self_recording.with_video {
            effects.push(Effect::ShowNotification(
                Notification::local_recording_no_video(),
            ));
        }

        Flow::Forward
    }
}
