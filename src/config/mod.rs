//! Configuration
//!
//! Runtime settings for block execution: WSL path translation, the
//! blacklist safety gate, and the optional pre-run confirmation.
//! Loading and persistence live in [`loader`]; WSL mount auto-discovery
//! in [`wsl`].

pub mod loader;
pub mod wsl;

pub use loader::{LoadOptions, SettingsLoader};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default WSL mount root for drive translation
pub const DEFAULT_WSL_MOUNT_PATH: &str = "/mnt";

/// Runtime settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where WSL mounts Windows drives; used when translating script
    /// paths for WSL-hosted interpreters
    pub wsl_mount_path: String,
    /// Read the mount root from `~/.wslconfig` on first use
    pub auto_discover_wsl: bool,
    /// Whether the blacklist gate scans block bodies at all
    pub blacklist_enabled: bool,
    /// Terms that trigger the confirmation dialog when found as whole
    /// words in a block body
    pub blacklist: Vec<String>,
    /// Ask before every run, showing the command and the code
    pub prompt_before_run: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            wsl_mount_path: DEFAULT_WSL_MOUNT_PATH.to_string(),
            auto_discover_wsl: true,
            blacklist_enabled: true,
            blacklist: default_blacklist(),
            prompt_before_run: false,
        }
    }
}

/// The stock blacklist: destructive commands plus one sensitive path
pub fn default_blacklist() -> Vec<String> {
    ["format", "del", "rmdir", "rm", "shutdown", "reboot", "/etc/passwd"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Settings {
    /// Check invariants a settings pane could otherwise violate
    pub fn validate(&self) -> Result<()> {
        if self.wsl_mount_path.trim().is_empty() {
            return Err(Error::ConfigValidationFailed {
                field: "wsl_mount_path".to_string(),
                reason: "WSL mount path cannot be empty".to_string(),
            });
        }

        if !self.wsl_mount_path.starts_with('/') {
            return Err(Error::ConfigValidationFailed {
                field: "wsl_mount_path".to_string(),
                reason: "WSL mount path must be absolute".to_string(),
            });
        }

        if self.blacklist.iter().any(|entry| entry.trim().is_empty()) {
            return Err(Error::ConfigValidationFailed {
                field: "blacklist".to_string(),
                reason: "Blacklist entries cannot be blank".to_string(),
            });
        }

        Ok(())
    }

    /// Blacklist as one comma-separated line, for a settings text field
    pub fn blacklist_to_ui(&self) -> String {
        self.blacklist.join(",")
    }

    /// Replace the blacklist from a comma-separated settings field.
    /// Entries are trimmed; blanks are dropped.
    pub fn set_blacklist_from_ui(&mut self, text: &str) {
        self.blacklist = text
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(String::from)
            .collect();
    }
}
