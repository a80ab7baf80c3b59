//! Deep-link permission flow.
//!
//! When a user declines the desktop app and lands in the web client, a
//! media-permission prompt is still owed. The mount middleware decides
//! how to present it; `run_permission_request` drives the actual probe
//! once the user provides the required gesture.

use std::time::Duration;

use thiserror::Error;
use tracing::warn;

use crate::actions::Action;
use crate::effects::{DialogRequest, Effect};
use crate::notifications::Notification;
use crate::store::{AppState, Flow, Middleware, Store};

/// The permission dialog appears this long after mount, so it lands
/// after navigation settles.
pub const PERMISSION_DIALOG_DELAY: Duration = Duration::from_millis(500);

/// Media-device failures surfaced by the platform.
#[derive(Debug, Error)]
pub enum MediaDevicesError {
    #[error("Permission denied")]
    PermissionDenied,

    #[error("Device error: {0}")]
    Device(String),
}

/// A granted device stream.
pub trait DeviceGrant {
    /// Stop the granted tracks so the devices are not held open.
    fn release(self);
}

/// Platform media-device capability.
///
/// Replaces user-agent sniffing: the platform states outright whether
/// its permission prompt is gated behind a user gesture.
#[allow(async_fn_in_trait)]
pub trait MediaDevices {
    type Grant: DeviceGrant;

    /// Whether a permission prompt requires a user gesture.
    fn needs_user_gesture(&self) -> bool;

    /// Prompt for device access.
    async fn request(&self, audio: bool, video: bool) -> Result<Self::Grant, MediaDevicesError>;
}

/// Opens the owed permission prompt when the app mounts after a
/// deep-link rejection.
pub struct DeepLinkPermissionMiddleware {
    needs_user_gesture: bool,
}

impl DeepLinkPermissionMiddleware {
    /// The gesture requirement is queried once; platforms do not change
    /// it mid-session.
    pub fn new<D: MediaDevices>(devices: &D) -> Self {
        DeepLinkPermissionMiddleware {
            needs_user_gesture: devices.needs_user_gesture(),
        }
    }
}

impl Middleware for DeepLinkPermissionMiddleware {
    fn handle(&mut self, state: &AppState, action: &Action, effects: &mut Vec<Effect>) -> Flow {
        if *action != Action::AppWillMount {
            return Flow::Forward;
        }

        if !state.deep_link.needs_permission_request {
            return Flow::Forward;
        }

        // Exactly one prompt path per mount
        if self.needs_user_gesture {
            effects.push(Effect::open_dialog_after(
                DialogRequest::PermissionRequest,
                PERMISSION_DIALOG_DELAY,
            ));
        } else {
            effects.push(Effect::ShowNotification(Notification::browser_permissions()));
        }

        Flow::Forward
    }
}

/// Drive the permission prompt's button press.
///
/// Requests audio+video access, releases any granted tracks right away,
/// then completes the flow. The completion path runs on success *and*
/// failure, so the caller is never left waiting on a rejected probe.
pub async fn run_permission_request<D: MediaDevices>(
    devices: &D,
    store: &mut Store,
) -> Vec<Effect> {
    let mut effects = Vec::new();

    match devices.request(true, true).await {
        Ok(grant) => {
            // Free the devices right away; track creation reopens them
            grant.release();
            effects.push(Effect::CreateLocalTracks {
                audio: true,
                video: true,
            });
        }
        Err(err) => {
            warn!("Media permission request failed: {err}");
        }
    }

    effects.push(Effect::CloseDialog);
    effects.extend(store.dispatch(Action::ClearDeepLinkPermissionRequest));
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeDevices {
        needs_gesture: bool,
        deny: bool,
        released: Arc<AtomicBool>,
    }

    impl FakeDevices {
        fn new(needs_gesture: bool, deny: bool) -> Self {
            FakeDevices {
                needs_gesture,
                deny,
                released: Arc::new(AtomicBool::new(false)),
            }
        }
    }

    struct FakeGrant {
        released: Arc<AtomicBool>,
    }

    impl DeviceGrant for FakeGrant {
        fn release(self) {
            self.released.store(true, Ordering::SeqCst);
        }
    }

    impl MediaDevices for FakeDevices {
        type Grant = FakeGrant;

        fn needs_user_gesture(&self) -> bool {
            self.needs_gesture
        }

        async fn request(&self, _audio: bool, _video: bool) -> Result<FakeGrant, MediaDevicesError> {
            if self.deny {
                Err(MediaDevicesError::PermissionDenied)
            } else {
                Ok(FakeGrant {
                    released: self.released.clone(),
                })
            }
        }
    }

    fn store_with_mount_middleware(devices: &FakeDevices) -> Store {
        let mut store = Store::new();
        store.register(Box::new(DeepLinkPermissionMiddleware::new(devices)));
        store
    }

    #[test]
    fn test_mount_with_owed_prompt_opens_delayed_dialog() {
        let devices = FakeDevices::new(true, false);
        let mut store = store_with_mount_middleware(&devices);
        store.dispatch(Action::OpenWebApp);

        let effects = store.dispatch(Action::AppWillMount);

        assert_eq!(
            effects,
            vec![Effect::open_dialog_after(
                DialogRequest::PermissionRequest,
                PERMISSION_DIALOG_DELAY,
            )],
            "Exactly one prompt path per mount"
        );
    }

    #[test]
    fn test_mount_without_gesture_requirement_shows_sticky_notification() {
        let devices = FakeDevices::new(false, false);
        let mut store = store_with_mount_middleware(&devices);
        store.dispatch(Action::OpenWebApp);

        let effects = store.dispatch(Action::AppWillMount);

        assert_eq!(
            effects,
            vec![Effect::ShowNotification(Notification::browser_permissions())]
        );
    }

    #[test]
    fn test_mount_without_owed_prompt_is_silent() {
        let devices = FakeDevices::new(true, false);
        let mut store = store_with_mount_middleware(&devices);

        let effects = store.dispatch(Action::AppWillMount);

        assert!(effects.is_empty());
    }

    #[tokio::test]
    async fn test_granted_probe_releases_devices_and_creates_tracks() {
        let devices = FakeDevices::new(true, false);
        let mut store = store_with_mount_middleware(&devices);
        store.dispatch(Action::OpenWebApp);

        let effects = run_permission_request(&devices, &mut store).await;

        assert!(
            devices.released.load(Ordering::SeqCst),
            "Granted tracks are stopped immediately"
        );
        assert!(effects.contains(&Effect::CreateLocalTracks {
            audio: true,
            video: true,
        }));
        assert!(effects.contains(&Effect::CloseDialog));
        assert!(
            !store.state().deep_link.needs_permission_request,
            "The owed prompt is cleared"
        );
    }

    #[tokio::test]
    async fn test_denied_probe_still_completes_the_flow() {
        let devices = FakeDevices::new(true, true);
        let mut store = store_with_mount_middleware(&devices);
        store.dispatch(Action::OpenWebApp);

        let effects = run_permission_request(&devices, &mut store).await;

        assert!(
            !effects
                .iter()
                .any(|e| matches!(e, Effect::CreateLocalTracks { .. })),
            "No tracks without permission"
        );
        assert!(effects.contains(&Effect::CloseDialog));
        assert!(
            !store.state().deep_link.needs_permission_request,
            "Completion runs even when the probe is rejected"
        );
    }

    #[test]
    fn test_prompt_fires_on_every_mount_until_cleared() {
        let devices = FakeDevices::new(true, false);
        let mut store = store_with_mount_middleware(&devices);
        store.dispatch(Action::OpenWebApp);

        assert_eq!(store.dispatch(Action::AppWillMount).len(), 1);
        store.dispatch(Action::ClearDeepLinkPermissionRequest);
        assert!(store.dispatch(Action::AppWillMount).is_empty());
    }
}
