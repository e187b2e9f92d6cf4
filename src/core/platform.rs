// OS seam for wake holds, display directives, and foreground launches.
//
// The mobile shells implement `PlatformAdapter` over the real OS services.
// `SystemPlatform` backs desktop hosts with an inhibitor child process and
// host-supplied shell commands.

use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;

use log::{debug, info, warn};
use thiserror::Error;

use crate::core::model::{LaunchDirective, SurfaceFlags};

/// Errors surfaced by the platform seam.
///
/// Resource denials are not retried here; callers propagate them to the
/// platform's own fault boundary.
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("wake assertion denied: {0}")]
    WakeDenied(String),
    #[error("display directive failed: {0}")]
    DisplayFailed(String),
    #[error("launch directive refused: {0}")]
    LaunchRefused(String),
    #[error("no presentation controller installed")]
    NotInstalled,
}

/// Opaque platform token for a held wake assertion.
///
/// `release` is called at most once per token; the idempotence guard lives
/// in the owning [`crate::core::wake::WakeAssertion`], not here.
pub trait WakeHold: Send + Sync {
    fn release(&self);
}

/// The operating-system services the wake sequencer depends on.
pub trait PlatformAdapter: Send + Sync {
    /// Request a wake hold bounded by `duration`. The tag names the owner
    /// in platform diagnostics.
    fn acquire_wake(
        &self,
        tag: &str,
        duration: Duration,
    ) -> Result<Box<dyn WakeHold>, PlatformError>;

    /// Apply display directives to the top-level surface.
    fn apply_surface_flags(&self, flags: SurfaceFlags) -> Result<(), PlatformError>;

    /// Bring the surface to the foreground with the given directive.
    fn launch_surface(&self, directive: &LaunchDirective) -> Result<(), PlatformError>;
}

/// Host-supplied commands backing [`SystemPlatform`].
#[derive(Debug, Clone, Default)]
pub struct SystemPlatformPlan {
    /// Shell command forcing the display on (sysfs backlight write, DPMS, ...).
    pub display_wake_command: Option<String>,
    /// Shell command bringing the alert surface to the foreground. Receives
    /// the subject label in `PREDATOR_SUBJECT`.
    pub launch_command: Option<String>,
}

/// Desktop implementation of [`PlatformAdapter`].
///
/// Wake holds spawn a sleep inhibitor (`systemd-inhibit` on Linux,
/// `caffeinate` on macOS) whose own lifetime is bounded by the requested
/// duration, so an unreleased hold still expires on schedule.
pub struct SystemPlatform {
    plan: SystemPlatformPlan,
}

impl SystemPlatform {
    pub fn new(plan: SystemPlatformPlan) -> Self {
        Self { plan }
    }
}

impl PlatformAdapter for SystemPlatform {
    fn acquire_wake(
        &self,
        tag: &str,
        duration: Duration,
    ) -> Result<Box<dyn WakeHold>, PlatformError> {
        let mut cmd = inhibitor_command(tag, duration);
        let child = cmd
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| PlatformError::WakeDenied(format!("{tag}: {e}")))?;
        debug!("acquired wake hold {} (pid {})", tag, child.id());
        Ok(Box::new(InhibitorHold {
            tag: tag.to_string(),
            child: Mutex::new(Some(child)),
        }))
    }

    fn apply_surface_flags(&self, flags: SurfaceFlags) -> Result<(), PlatformError> {
        debug!("applying surface flags: {flags:?}");
        if flags.turn_screen_on {
            if let Some(cmd) = self.plan.display_wake_command.as_deref() {
                run_shell(cmd, &[]).map_err(PlatformError::DisplayFailed)?;
            }
        }
        Ok(())
    }

    fn launch_surface(&self, directive: &LaunchDirective) -> Result<(), PlatformError> {
        info!(
            "launching alert surface (subject: {}, flags: {:?})",
            directive.subject_label, directive.flags
        );
        if let Some(cmd) = self.plan.launch_command.as_deref() {
            run_shell(cmd, &[("PREDATOR_SUBJECT", &directive.subject_label)])
                .map_err(PlatformError::LaunchRefused)?;
        }
        Ok(())
    }
}

struct InhibitorHold {
    tag: String,
    child: Mutex<Option<Child>>,
}

impl WakeHold for InhibitorHold {
    fn release(&self) {
        let mut guard = self.child.lock().unwrap();
        if let Some(mut child) = guard.take() {
            if let Err(e) = child.kill() {
                // Most likely the bounded inhibitor already exited on its own.
                warn!("wake hold {}: failed to stop inhibitor: {e}", self.tag);
            }
            let _ = child.wait();
            debug!("released wake hold {}", self.tag);
        }
    }
}

fn inhibitor_command(tag: &str, duration: Duration) -> Command {
    let secs = duration.as_secs().max(1).to_string();
    #[cfg(target_os = "macos")]
    {
        let _ = tag;
        let mut cmd = Command::new("caffeinate");
        cmd.args(["-d", "-u", "-t", &secs]);
        cmd
    }
    #[cfg(not(target_os = "macos"))]
    {
        let mut cmd = Command::new("systemd-inhibit");
        cmd.arg("--what=sleep:idle")
            .arg(format!("--who={tag}"))
            .arg("--why=predator alert")
            .arg("sleep")
            .arg(&secs);
        cmd
    }
}

fn run_shell(command: &str, envs: &[(&str, &str)]) -> Result<(), String> {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    for (key, value) in envs {
        cmd.env(key, value);
    }
    let status = cmd
        .status()
        .map_err(|e| format!("failed to spawn '{command}': {e}"))?;
    if status.success() {
        Ok(())
    } else {
        Err(format!(
            "command '{command}' exited with status {}",
            status.code().unwrap_or(-1)
        ))
    }
}
