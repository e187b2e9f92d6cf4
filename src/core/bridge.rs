// Bridge command endpoint: the in-process trigger path from the UI layer.
//
// Mirrors a method channel: one fixed channel id, one supported command,
// anything else answered with an explicit not-implemented reply rather than
// silently succeeding or crashing.

use std::sync::{Arc, RwLock};

use lazy_static::lazy_static;
use log::debug;

use crate::core::platform::PlatformError;
use crate::core::presentation::PresentationController;

/// Fixed identifier of the alert command channel.
pub const CHANNEL: &str = "com.predatoralert.app/alert";
/// The single supported command name.
pub const COMMAND_LAUNCH_ALERT: &str = "launchAlert";

/// Reply sent back over the command channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    /// The command ran; `true` acknowledges the wake cycle started.
    Success(bool),
    /// Unrecognized command name.
    NotImplemented,
}

/// Dispatcher bound to one presentation controller.
pub struct BridgeEndpoint {
    controller: Arc<PresentationController>,
}

impl BridgeEndpoint {
    pub fn new(controller: Arc<PresentationController>) -> Self {
        Self { controller }
    }

    /// Dispatch one command received on [`CHANNEL`]. `launchAlert` runs the
    /// wake-and-present routine synchronously; every other name gets
    /// [`CommandReply::NotImplemented`].
    pub fn handle(&self, method: &str) -> Result<CommandReply, PlatformError> {
        if method != COMMAND_LAUNCH_ALERT {
            debug!("unsupported bridge command: {method}");
            return Ok(CommandReply::NotImplemented);
        }
        self.controller.launch_alert()?;
        Ok(CommandReply::Success(true))
    }
}

lazy_static! {
    // Process-wide endpoint so the host shell's channel handler can dispatch
    // without plumbing the controller through its own layers.
    static ref ENDPOINT: RwLock<Option<Arc<BridgeEndpoint>>> = RwLock::new(None);
}

/// Install the endpoint the process-wide channel dispatches into. Called
/// once by the host shell when the surface is configured.
pub fn install(endpoint: Arc<BridgeEndpoint>) {
    *ENDPOINT.write().unwrap() = Some(endpoint);
}

/// Remove the installed endpoint (surface torn down).
pub fn uninstall() {
    *ENDPOINT.write().unwrap() = None;
}

/// Dispatch through the process-wide endpoint.
pub fn handle_command(method: &str) -> Result<CommandReply, PlatformError> {
    let endpoint = ENDPOINT.read().unwrap().clone();
    endpoint
        .ok_or(PlatformError::NotInstalled)?
        .handle(method)
}
