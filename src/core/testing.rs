// Recording platform adapter shared by the core tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::core::model::{LaunchDirective, SurfaceFlags};
use crate::core::platform::{PlatformAdapter, PlatformError, WakeHold};

/// One wake hold handed out by [`FakePlatform`], with its release count.
pub struct FakeHoldState {
    pub tag: String,
    pub duration: Duration,
    releases: AtomicUsize,
}

impl FakeHoldState {
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

struct FakeHold {
    state: Arc<FakeHoldState>,
}

impl WakeHold for FakeHold {
    fn release(&self) {
        self.state.releases.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakePlatform {
    holds: Mutex<Vec<Arc<FakeHoldState>>>,
    flags: Mutex<Vec<SurfaceFlags>>,
    launches: Mutex<Vec<LaunchDirective>>,
    deny_wake: AtomicBool,
    fail_flags: AtomicBool,
    refuse_launch: AtomicBool,
}

impl FakePlatform {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn holds(&self) -> Vec<Arc<FakeHoldState>> {
        self.holds.lock().unwrap().clone()
    }

    pub fn flag_calls(&self) -> Vec<SurfaceFlags> {
        self.flags.lock().unwrap().clone()
    }

    pub fn launch_calls(&self) -> Vec<LaunchDirective> {
        self.launches.lock().unwrap().clone()
    }

    pub fn deny_wake(&self) {
        self.deny_wake.store(true, Ordering::SeqCst);
    }

    pub fn fail_flags(&self) {
        self.fail_flags.store(true, Ordering::SeqCst);
    }

    pub fn refuse_launch(&self) {
        self.refuse_launch.store(true, Ordering::SeqCst);
    }
}

impl PlatformAdapter for FakePlatform {
    fn acquire_wake(
        &self,
        tag: &str,
        duration: Duration,
    ) -> Result<Box<dyn WakeHold>, PlatformError> {
        if self.deny_wake.load(Ordering::SeqCst) {
            return Err(PlatformError::WakeDenied("denied by test".to_string()));
        }
        let state = Arc::new(FakeHoldState {
            tag: tag.to_string(),
            duration,
            releases: AtomicUsize::new(0),
        });
        self.holds.lock().unwrap().push(Arc::clone(&state));
        Ok(Box::new(FakeHold { state }))
    }

    fn apply_surface_flags(&self, flags: SurfaceFlags) -> Result<(), PlatformError> {
        if self.fail_flags.load(Ordering::SeqCst) {
            return Err(PlatformError::DisplayFailed("failed by test".to_string()));
        }
        self.flags.lock().unwrap().push(flags);
        Ok(())
    }

    fn launch_surface(&self, directive: &LaunchDirective) -> Result<(), PlatformError> {
        if self.refuse_launch.load(Ordering::SeqCst) {
            return Err(PlatformError::LaunchRefused("refused by test".to_string()));
        }
        self.launches.lock().unwrap().push(directive.clone());
        Ok(())
    }
}

/// Give fire-and-forget release timers a chance to run after the paused
/// clock advances.
pub async fn settle() {
    for _ in 0..10 {
        tokio::task::yield_now().await;
    }
}
