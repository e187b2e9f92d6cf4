use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Wake hold and release bounds, in seconds.
///
/// Defaults are the values the platform layer shipped with: a short 10s/5s
/// hold for the broadcast receiver and a long 30s/10s hold for the
/// presentation path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WakeSettings {
    /// Bound on the receiver-side wake assertion.
    #[serde(default = "default_receiver_hold_secs")]
    pub receiver_hold_secs: u64,
    /// Delay before the receiver-side assertion is released.
    #[serde(default = "default_receiver_release_secs")]
    pub receiver_release_secs: u64,
    /// Bound on the presentation-side wake assertion.
    #[serde(default = "default_presenter_hold_secs")]
    pub presenter_hold_secs: u64,
    /// Delay before the presentation-side assertion is released.
    #[serde(default = "default_presenter_release_secs")]
    pub presenter_release_secs: u64,
}

fn default_receiver_hold_secs() -> u64 {
    10
}

fn default_receiver_release_secs() -> u64 {
    5
}

fn default_presenter_hold_secs() -> u64 {
    30
}

fn default_presenter_release_secs() -> u64 {
    10
}

impl Default for WakeSettings {
    fn default() -> Self {
        Self {
            receiver_hold_secs: default_receiver_hold_secs(),
            receiver_release_secs: default_receiver_release_secs(),
            presenter_hold_secs: default_presenter_hold_secs(),
            presenter_release_secs: default_presenter_release_secs(),
        }
    }
}

impl WakeSettings {
    pub fn receiver_hold(&self) -> Duration {
        Duration::from_secs(self.receiver_hold_secs)
    }

    pub fn receiver_release_delay(&self) -> Duration {
        Duration::from_secs(self.receiver_release_secs)
    }

    pub fn presenter_hold(&self) -> Duration {
        Duration::from_secs(self.presenter_hold_secs)
    }

    pub fn presenter_release_delay(&self) -> Duration {
        Duration::from_secs(self.presenter_release_secs)
    }
}

/// Settings persisted by the host app.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub wake: WakeSettings,
}

pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(app_config_dir: PathBuf) -> Self {
        Self {
            config_path: app_config_dir.join("settings.json"),
        }
    }

    /// Load settings, falling back to defaults on any read or parse failure.
    pub fn load(&self) -> Settings {
        if self.config_path.exists() {
            if let Ok(content) = fs::read_to_string(&self.config_path) {
                if let Ok(settings) = serde_json::from_str(&content) {
                    return settings;
                }
            }
        }
        Settings::default()
    }

    pub fn save(&self, settings: &Settings) -> io::Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(settings)?;
        fs::write(&self.config_path, content)
    }
}
