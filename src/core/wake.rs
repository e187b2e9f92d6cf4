// The wake-and-present routine shared by every trigger path.
//
// Cold start, resume, and the bridge command all converge here. Each call
// owns its own assertion and its own release timer; overlapping calls never
// share or double-release a hold.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::core::config::WakeSettings;
use crate::core::model::SurfaceFlags;
use crate::core::platform::{PlatformAdapter, PlatformError, WakeHold};

/// Wake-lock tag for the short hold taken by the broadcast listener.
pub const RECEIVER_WAKE_TAG: &str = "predatoralert:wakelock";
/// Wake-lock tag for the long hold taken by the presentation path.
pub const ALERT_WAKE_TAG: &str = "predatoralert:alertwake";

struct HoldState {
    released: AtomicBool,
    hold: Box<dyn WakeHold>,
}

impl HoldState {
    fn release(&self) {
        // Monotonic false -> true; the loser of the race is a no-op.
        if self.released.swap(true, Ordering::SeqCst) {
            return;
        }
        self.hold.release();
    }
}

/// An exclusive, time-bounded hold preventing device sleep.
///
/// Owned solely by the call that acquired it. The platform hold is dropped
/// exactly once, by whichever of the deferred timer or an explicit
/// [`release`](Self::release) gets there first.
pub struct WakeAssertion {
    held_since: Instant,
    hold_duration: Duration,
    state: Arc<HoldState>,
}

impl WakeAssertion {
    /// Acquire a hold bounded by `hold_duration`. Denial by the platform is
    /// not retried; the error propagates.
    pub fn acquire(
        platform: &dyn PlatformAdapter,
        tag: &str,
        hold_duration: Duration,
    ) -> Result<Self, PlatformError> {
        let hold = platform.acquire_wake(tag, hold_duration)?;
        debug!("acquired {tag} for {hold_duration:?}");
        Ok(Self {
            held_since: Instant::now(),
            hold_duration,
            state: Arc::new(HoldState {
                released: AtomicBool::new(false),
                hold,
            }),
        })
    }

    pub fn held_since(&self) -> Instant {
        self.held_since
    }

    pub fn hold_duration(&self) -> Duration {
        self.hold_duration
    }

    pub fn is_released(&self) -> bool {
        self.state.released.load(Ordering::SeqCst)
    }

    /// Release now. No-op if already released.
    pub fn release(&self) {
        self.state.release();
    }

    /// Schedule a fire-and-forget release after `delay` on the shared
    /// runtime. The timer is not cancellable; the `released` flag guards
    /// against it racing an explicit release.
    pub fn schedule_release(&self, delay: Duration) {
        // The deadline is fixed here, not at the task's first poll, so the
        // hold never outlives its configured bound on a busy runtime.
        let deadline = tokio::time::Instant::now() + delay;
        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            tokio::time::sleep_until(deadline).await;
            state.release();
        });
    }
}

impl fmt::Debug for WakeAssertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WakeAssertion")
            .field("held_since", &self.held_since)
            .field("hold_duration", &self.hold_duration)
            .field("released", &self.is_released())
            .finish()
    }
}

/// Wake the device and force the surface visible: acquire a long-bound
/// assertion, apply the lock-screen-bypass display flags, and schedule the
/// assertion's release.
///
/// Must run inside the host's tokio runtime. Safe to invoke from several
/// entry points in quick succession: every call gets its own assertion and
/// its own timer.
pub fn wake_and_present(
    platform: &dyn PlatformAdapter,
    settings: &WakeSettings,
) -> Result<WakeAssertion, PlatformError> {
    let assertion = WakeAssertion::acquire(platform, ALERT_WAKE_TAG, settings.presenter_hold())?;
    // Scheduled before the display directives so a refused directive cannot
    // leak the hold.
    assertion.schedule_release(settings.presenter_release_delay());
    platform.apply_surface_flags(SurfaceFlags::wake_visible())?;
    Ok(assertion)
}
