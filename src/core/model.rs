// Data model for a single alert-handling episode.
//
// Nothing here outlives the episode: an event is created when a trigger
// fires, consumed once by the presentation controller, and dropped.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

/// Extra key carrying the detected animal name in broadcast and launch payloads.
pub const EXTRA_ANIMAL: &str = "animal";
/// Extra key marking a launch as caused by a predator alert.
pub const EXTRA_PREDATOR_ALERT: &str = "predator_alert";
/// Sentinel subject used when the transport omits the animal extra.
pub const UNKNOWN_SUBJECT: &str = "unknown";

/// Which trigger path produced an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertSource {
    /// System broadcast delivered while the app may not be running.
    BroadcastTrigger,
    /// In-process command from the already-foregrounded UI layer.
    BridgeCommand,
}

/// A single predator alert as seen by the platform layer.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub source: AlertSource,
    pub subject_label: String,
    pub received_at: DateTime<Utc>,
}

impl AlertEvent {
    /// Stamp a new event. A missing subject label falls back to the
    /// [`UNKNOWN_SUBJECT`] sentinel rather than failing.
    pub fn new(source: AlertSource, subject_label: Option<String>) -> Self {
        Self {
            source,
            subject_label: subject_label.unwrap_or_else(|| UNKNOWN_SUBJECT.to_string()),
            received_at: Utc::now(),
        }
    }
}

/// How the surface came to the foreground for this episode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    ColdStart,
    Resume,
    ForegroundCommand,
}

/// Directive handed from a trigger path into the presentation controller.
#[derive(Debug, Clone)]
pub struct PresentationIntent {
    pub event: AlertEvent,
    pub kind: LaunchKind,
}

/// Inbound signal from the broadcast transport.
///
/// Extras are loosely typed; missing fields are recovered with defaults,
/// never surfaced as errors.
#[derive(Debug, Clone, Default)]
pub struct BroadcastSignal {
    extras: Map<String, Value>,
}

impl BroadcastSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extras.insert(key.to_string(), value);
        self
    }

    /// The `animal` string extra, if the transport attached one.
    pub fn animal(&self) -> Option<&str> {
        self.extras.get(EXTRA_ANIMAL).and_then(Value::as_str)
    }
}

/// Launch parameters as observed by the surface, either at initial launch
/// or when a new intent reaches an already-running surface.
#[derive(Debug, Clone, Default)]
pub struct LaunchIntent {
    extras: Map<String, Value>,
}

impl LaunchIntent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra(mut self, key: &str, value: Value) -> Self {
        self.extras.insert(key.to_string(), value);
        self
    }

    /// True only when the alert marker is present and set. An absent or
    /// false marker must never trigger the wake path.
    pub fn is_alert(&self) -> bool {
        self.extras
            .get(EXTRA_PREDATOR_ALERT)
            .and_then(Value::as_bool)
            .unwrap_or(false)
    }

    /// The forwarded subject label, if any.
    pub fn subject_label(&self) -> Option<String> {
        self.extras
            .get(EXTRA_ANIMAL)
            .and_then(Value::as_str)
            .map(str::to_string)
    }
}

/// Task-stack flags on an outbound launch directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LaunchFlags {
    pub new_task: bool,
    pub clear_top: bool,
    pub single_top: bool,
    pub from_background: bool,
}

impl LaunchFlags {
    /// Flag set used when re-launching the surface from the background
    /// trigger path: start as a new task, clear any existing top, reuse the
    /// surface if it is already top, and mark the launch as
    /// background-originated.
    pub fn background_relaunch() -> Self {
        Self {
            new_task: true,
            clear_top: true,
            single_top: true,
            from_background: true,
        }
    }
}

/// Outbound directive that forces the surface to the foreground.
#[derive(Debug, Clone)]
pub struct LaunchDirective {
    pub flags: LaunchFlags,
    pub subject_label: String,
    pub alert_marker: bool,
}

impl LaunchDirective {
    /// Directive for an alert-driven background relaunch.
    pub fn alert(subject_label: impl Into<String>) -> Self {
        Self {
            flags: LaunchFlags::background_relaunch(),
            subject_label: subject_label.into(),
            alert_marker: true,
        }
    }

    /// The launch intent the surface will observe for this directive.
    pub fn to_intent(&self) -> LaunchIntent {
        LaunchIntent::new()
            .with_extra(EXTRA_PREDATOR_ALERT, Value::Bool(self.alert_marker))
            .with_extra(EXTRA_ANIMAL, Value::String(self.subject_label.clone()))
    }
}

/// Display directives applied to the top-level surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceFlags {
    pub show_when_locked: bool,
    pub turn_screen_on: bool,
    pub keep_screen_on: bool,
    pub dismiss_keyguard: bool,
}

impl SurfaceFlags {
    /// Flags forced by the wake-and-present routine: render over the lock
    /// screen and keep the display illuminated.
    pub fn wake_visible() -> Self {
        Self {
            show_when_locked: true,
            turn_screen_on: true,
            keep_screen_on: true,
            dismiss_keyguard: false,
        }
    }

    /// Baseline posture applied at every cold start, alert or not.
    pub fn lock_screen_baseline() -> Self {
        Self {
            show_when_locked: true,
            turn_screen_on: true,
            keep_screen_on: true,
            dismiss_keyguard: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_subject_defaults_to_unknown() {
        let event = AlertEvent::new(AlertSource::BroadcastTrigger, None);
        assert_eq!(event.subject_label, UNKNOWN_SUBJECT);

        let event = AlertEvent::new(AlertSource::BridgeCommand, Some("boar".to_string()));
        assert_eq!(event.subject_label, "boar");
    }

    #[test]
    fn test_launch_intent_marker_absent_or_false() {
        assert!(!LaunchIntent::new().is_alert());

        let explicit_false =
            LaunchIntent::new().with_extra(EXTRA_PREDATOR_ALERT, Value::Bool(false));
        assert!(!explicit_false.is_alert());

        // A non-boolean marker is treated as absent, not as set.
        let wrong_type =
            LaunchIntent::new().with_extra(EXTRA_PREDATOR_ALERT, Value::String("true".into()));
        assert!(!wrong_type.is_alert());
    }

    #[test]
    fn test_alert_directive_flags_and_extras() {
        let directive = LaunchDirective::alert("boar");
        assert_eq!(directive.flags, LaunchFlags::background_relaunch());
        assert!(directive.alert_marker);

        let intent = directive.to_intent();
        assert!(intent.is_alert());
        assert_eq!(intent.subject_label().as_deref(), Some("boar"));
    }

    #[test]
    fn test_broadcast_signal_animal_extraction() {
        let signal = BroadcastSignal::new().with_extra(EXTRA_ANIMAL, Value::String("wolf".into()));
        assert_eq!(signal.animal(), Some("wolf"));
        assert_eq!(BroadcastSignal::new().animal(), None);
    }
}
