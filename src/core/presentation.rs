// Presentation controller: lifecycle dispatch for the alert surface.
//
// Three entry transitions converge on the same wake-and-present routine:
// - ColdStart: initial launch parameters carry the alert marker
// - Resume: a new launch intent reaches the already-running surface
// - ForegroundCommand: the bridge endpoint fires while foregrounded
// The routine owns no shared state, so the transitions never interfere.

use std::sync::Arc;

use log::debug;

use crate::core::config::WakeSettings;
use crate::core::model::{
    AlertEvent, AlertSource, LaunchIntent, LaunchKind, PresentationIntent, SurfaceFlags,
};
use crate::core::platform::{PlatformAdapter, PlatformError};
use crate::core::wake::wake_and_present;

pub struct PresentationController {
    platform: Arc<dyn PlatformAdapter>,
    settings: WakeSettings,
}

impl PresentationController {
    pub fn new(platform: Arc<dyn PlatformAdapter>, settings: WakeSettings) -> Self {
        Self { platform, settings }
    }

    /// Initial launch of the surface.
    ///
    /// The lock-screen-bypass baseline is applied unconditionally; the timed
    /// wake path runs only when the launch carries the alert marker. Returns
    /// the consumed intent, or `None` when the launch was ordinary.
    pub fn on_create(
        &self,
        intent: &LaunchIntent,
    ) -> Result<Option<PresentationIntent>, PlatformError> {
        self.platform
            .apply_surface_flags(SurfaceFlags::lock_screen_baseline())?;
        if !intent.is_alert() {
            return Ok(None);
        }
        self.enter(intent, LaunchKind::ColdStart).map(Some)
    }

    /// New launch intent delivered while the surface is already running.
    /// An absent or false alert marker suppresses the wake path entirely.
    pub fn on_new_intent(
        &self,
        intent: &LaunchIntent,
    ) -> Result<Option<PresentationIntent>, PlatformError> {
        if !intent.is_alert() {
            return Ok(None);
        }
        self.enter(intent, LaunchKind::Resume).map(Some)
    }

    /// Foreground command path used by the bridge endpoint. The caller
    /// already knows an alert is active; there is no payload to extract.
    pub fn launch_alert(&self) -> Result<PresentationIntent, PlatformError> {
        let event = AlertEvent::new(AlertSource::BridgeCommand, None);
        self.present(PresentationIntent {
            event,
            kind: LaunchKind::ForegroundCommand,
        })
    }

    fn enter(
        &self,
        intent: &LaunchIntent,
        kind: LaunchKind,
    ) -> Result<PresentationIntent, PlatformError> {
        let event = AlertEvent::new(AlertSource::BroadcastTrigger, intent.subject_label());
        self.present(PresentationIntent { event, kind })
    }

    fn present(&self, intent: PresentationIntent) -> Result<PresentationIntent, PlatformError> {
        debug!(
            "wake-and-present ({:?}, subject: {})",
            intent.kind, intent.event.subject_label
        );
        // The assertion is dropped here on purpose: its deferred timer owns
        // the release, and nothing in this design cancels it early.
        let _assertion = wake_and_present(self.platform.as_ref(), &self.settings)?;
        Ok(intent)
    }
}
