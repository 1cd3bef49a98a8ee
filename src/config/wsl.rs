//! WSL Mount Discovery
//!
//! WSL mounts Windows drives under a configurable root (`/mnt` by
//! default, overridable via the `root` key in `~/.wslconfig`). Scripts
//! handed to a WSL-hosted interpreter need their Windows paths
//! rewritten under that root, so the configured value has to match the
//! machine.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

use super::Settings;

static MOUNT_ROOT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^\s*root\s*=\s*(.*)$")
        .unwrap_or_else(|e| panic!("invalid wslconfig regex: {}", e))
});

/// Pull the mount root out of `.wslconfig` content, if one is set
pub fn parse_mount_root(content: &str) -> Option<String> {
    let root = MOUNT_ROOT
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().trim_end_matches('/').to_string())?;
    if root.is_empty() {
        None
    } else {
        Some(root)
    }
}

/// Location of the user's `.wslconfig`
pub fn wslconfig_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".wslconfig"))
}

/// Read the mount root from a `.wslconfig` file. Absent file or absent
/// key both yield `None`.
pub fn discover_mount_root_from(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    parse_mount_root(&content)
}

/// One-shot auto-discovery: when enabled, read the mount root from the
/// user's `.wslconfig` and write it into the settings, then clear the
/// flag so later translations stay stable even if the file changes.
pub fn apply_auto_discovery(settings: &mut Settings) {
    if !settings.auto_discover_wsl {
        return;
    }

    let discovered = wslconfig_path()
        .as_deref()
        .and_then(discover_mount_root_from);

    match discovered {
        Some(root) => {
            info!(mount_root = %root, "discovered WSL mount root");
            settings.wsl_mount_path = root;
        }
        None => debug!("no WSL mount root discovered, keeping configured value"),
    }
    settings.auto_discover_wsl = false;
}
