// Broadcast entry point: the trigger path that fires while the app is
// backgrounded or killed.
//
// The OS delivers the broadcast on its own callback context, so this path
// must not block: it acquires a short hold, issues the forced foreground
// launch, and returns. The alert payload travels to the presentation
// controller inside the launch directive.

use std::sync::Arc;

use log::info;

use crate::core::config::WakeSettings;
use crate::core::model::{AlertEvent, AlertSource, BroadcastSignal, LaunchDirective};
use crate::core::platform::{PlatformAdapter, PlatformError};
use crate::core::wake::{WakeAssertion, RECEIVER_WAKE_TAG};

pub struct BroadcastListener {
    platform: Arc<dyn PlatformAdapter>,
    settings: WakeSettings,
}

impl BroadcastListener {
    pub fn new(platform: Arc<dyn PlatformAdapter>, settings: WakeSettings) -> Self {
        Self { platform, settings }
    }

    /// Handle one alert broadcast: short wake hold, forced foreground
    /// launch, deferred release.
    ///
    /// There is no durable queue of pending alerts, so a platform denial is
    /// not retried; it propagates as an unrecoverable listener failure. The
    /// deferred release is scheduled before the launch so it fires whether
    /// or not the launch succeeds.
    pub fn on_receive(&self, signal: &BroadcastSignal) -> Result<(), PlatformError> {
        let event = AlertEvent::new(
            AlertSource::BroadcastTrigger,
            signal.animal().map(str::to_string),
        );
        info!(
            "predator alert received - launching app (subject: {})",
            event.subject_label
        );

        let assertion = WakeAssertion::acquire(
            self.platform.as_ref(),
            RECEIVER_WAKE_TAG,
            self.settings.receiver_hold(),
        )?;
        assertion.schedule_release(self.settings.receiver_release_delay());

        let directive = LaunchDirective::alert(event.subject_label);
        self.platform.launch_surface(&directive)
    }
}
