//! Language Resolution
//!
//! Maps a language tag plus host platform to a concrete execution plan:
//! a temp-file suffix and a shell command template. The mapping is a
//! declarative table keyed by `(platform, tag)`; adding a language means
//! adding a table row, not touching control flow.
//!
//! Entries flagged with `wsl_translate` run inside WSL on a Windows
//! host, so the native temp-file path is rewritten into the subsystem's
//! mount convention (`C:\foo` -> `/mnt/c/foo`) before being substituted
//! into the command template.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use std::path::PathBuf;
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::models::ExecutionPlan;

/// Host platform kind, the coarse half of the resolver's table key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Windows-like host (cmd shell interpretation, CRLF script lines)
    Windows,
    /// POSIX-like host (sh shell interpretation, LF script lines)
    Posix,
}

impl Platform {
    /// Detect the platform this process is running on
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Posix
        }
    }
}

/// One row of the language table
#[derive(Debug, Clone, Copy)]
struct LanguageEntry {
    /// Temp-file suffix, without the dot
    suffix: &'static str,
    /// Command template; `{path}` is replaced with the (possibly
    /// translated) temp-file path
    template: &'static str,
    /// Rewrite the native path into the WSL mount convention first
    wsl_translate: bool,
}

/// Table rows grouped by platform; each row covers all tags that share
/// an interpreter.
const LANGUAGE_ROWS: &[(Platform, &[&str], LanguageEntry)] = &[
    // Windows
    (
        Platform::Windows,
        &["ps1", "powershell"],
        LanguageEntry {
            suffix: "ps1",
            template: "powershell -File \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Windows,
        &["bat"],
        LanguageEntry {
            suffix: "bat",
            template: "\"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Windows,
        &["sh", "bash"],
        LanguageEntry {
            suffix: "sh",
            template: "bash \"{path}\"",
            wsl_translate: true,
        },
    ),
    (
        Platform::Windows,
        &["wsl"],
        LanguageEntry {
            suffix: "sh",
            template: "wsl bash \"{path}\"",
            wsl_translate: true,
        },
    ),
    (
        Platform::Windows,
        &["node", "javascript", "js"],
        LanguageEntry {
            suffix: "js",
            template: "node \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Windows,
        &["typescript"],
        LanguageEntry {
            suffix: "ts",
            template: "node --import=tsx \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Windows,
        &["python", "py"],
        LanguageEntry {
            suffix: "py",
            template: "python \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Windows,
        &["html"],
        LanguageEntry {
            suffix: "html",
            template: "start \"\" \"{path}\"",
            wsl_translate: false,
        },
    ),
    // POSIX
    (
        Platform::Posix,
        &["sh", "bash"],
        LanguageEntry {
            suffix: "sh",
            template: "bash \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Posix,
        &["node", "javascript", "js"],
        LanguageEntry {
            suffix: "js",
            template: "node \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Posix,
        &["python", "py"],
        LanguageEntry {
            suffix: "py",
            template: "python3 \"{path}\"",
            wsl_translate: false,
        },
    ),
    (
        Platform::Posix,
        &["html"],
        LanguageEntry {
            suffix: "html",
            template: "xdg-open \"{path}\"",
            wsl_translate: false,
        },
    ),
];

static LANGUAGE_TABLE: Lazy<HashMap<(Platform, &'static str), LanguageEntry>> = Lazy::new(|| {
    let mut table = HashMap::new();
    for (platform, tags, entry) in LANGUAGE_ROWS {
        for tag in *tags {
            table.insert((*platform, *tag), *entry);
        }
    }
    table
});

static DRIVE_PREFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([a-zA-Z]):").unwrap_or_else(|e| panic!("invalid drive prefix regex: {}", e))
});

/// Resolves language tags into execution plans for one platform
#[derive(Debug, Clone)]
pub struct Resolver {
    platform: Platform,
    /// Mount prefix the WSL subsystem exposes Windows drives under
    wsl_mount_path: String,
}

impl Resolver {
    /// Create a resolver for the given platform and WSL mount prefix
    pub fn new(platform: Platform, wsl_mount_path: impl Into<String>) -> Self {
        Self {
            platform,
            wsl_mount_path: wsl_mount_path.into(),
        }
    }

    /// The platform this resolver targets
    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Resolve a language tag to an execution plan with the fixed
    /// per-language temp-file path. Deterministic: resolving the same
    /// tag twice yields structurally identical plans.
    pub fn resolve(&self, language: &str) -> Result<ExecutionPlan> {
        self.build_plan(language, |suffix| format!("blockrun-script.{}", suffix))
    }

    /// Resolve with a fresh unique temp-file path. Concurrent runs of
    /// the same language no longer race on one file.
    pub fn resolve_unique(&self, language: &str) -> Result<ExecutionPlan> {
        self.build_plan(language, |suffix| {
            format!("blockrun-{}.{}", Uuid::new_v4(), suffix)
        })
    }

    fn build_plan(
        &self,
        language: &str,
        file_name: impl FnOnce(&str) -> String,
    ) -> Result<ExecutionPlan> {
        let entry = LANGUAGE_TABLE
            .get(&(self.platform, language))
            .ok_or_else(|| Error::UnsupportedLanguage {
                language: language.to_string(),
            })?;

        let temp_file_path: PathBuf = std::env::temp_dir().join(file_name(entry.suffix));
        let native_path = temp_file_path.to_string_lossy().to_string();

        let command_path = if entry.wsl_translate && self.platform == Platform::Windows {
            to_wsl_path(&native_path, &self.wsl_mount_path)
        } else {
            native_path
        };

        let command = entry.template.replace("{path}", &command_path);
        debug!(language, %command, "resolved language tag");

        Ok(ExecutionPlan::new(temp_file_path, command))
    }

    /// Whether a language tag is supported on this resolver's platform
    pub fn supports(&self, language: &str) -> bool {
        LANGUAGE_TABLE.contains_key(&(self.platform, language))
    }

    /// All language tags supported on this resolver's platform
    pub fn supported_tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<&'static str> = LANGUAGE_ROWS
            .iter()
            .filter(|(platform, _, _)| *platform == self.platform)
            .flat_map(|(_, tags, _)| tags.iter().copied())
            .collect();
        tags.sort_unstable();
        tags
    }

    /// Line terminator for the block body, per language and platform.
    /// Windows script hosts (cmd, powershell) expect CRLF; everything
    /// else takes LF.
    pub fn line_terminator(&self, language: &str) -> &'static str {
        match (self.platform, language) {
            (Platform::Windows, "bat" | "powershell" | "ps1") => "\r\n",
            _ => "\n",
        }
    }
}

/// Rewrite a native Windows path into the WSL mount convention:
/// backslashes to forward slashes, drive letter to `<mount>/<drive>`.
pub fn to_wsl_path(windows_path: &str, mount_path: &str) -> String {
    let forward = windows_path.replace('\\', "/");
    let mounted = DRIVE_PREFIX.replace(&forward, |caps: &regex::Captures| {
        format!("{}/{}", mount_path, caps[1].to_lowercase())
    });
    if let Some(stripped) = mounted.strip_prefix("//") {
        format!("/{}", stripped)
    } else {
        mounted.into_owned()
    }
}
