//! Error types and Result aliases for blockrun

use std::fmt;
use std::path::PathBuf;

/// Result type alias for blockrun operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for blockrun
#[derive(Debug)]
pub enum Error {
    // === Extraction errors ===
    /// No closed fenced code block encloses the cursor
    BlockNotFound,

    // === Resolution errors ===
    /// Language tag has no entry for the current platform
    UnsupportedLanguage {
        language: String,
    },

    // === Execution errors ===
    /// Failed to write the block body to the temp file
    TempFileWriteFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to spawn the resolved command
    CommandSpawnFailed {
        command: String,
        reason: String,
    },

    /// Failed to send input to the child process
    ProcessInputSendFailed {
        reason: String,
    },

    /// Kill was requested after process exit was already observed
    ProcessAlreadyExited,

    // === Configuration errors ===
    /// Failed to load settings file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Failed to save settings file
    ConfigSaveFailed {
        path: PathBuf,
        reason: String,
    },

    /// Settings file not found
    ConfigNotFound,

    /// Settings validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    /// Failed to serialize settings
    ConfigSerializationFailed {
        format: String,
        reason: String,
    },

    /// Failed to parse settings
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    /// Regex compilation errors
    Regex(regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors (for cases not yet categorized)
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Extraction errors
            Error::BlockNotFound => {
                write!(f, "No code block found under cursor")
            }

            // Resolution errors
            Error::UnsupportedLanguage { language } => {
                write!(f, "Unsupported language: '{}'", language)
            }

            // Execution errors
            Error::TempFileWriteFailed { path, reason } => {
                write!(
                    f,
                    "Failed to write temp file '{}': {}",
                    path.display(),
                    reason
                )
            }
            Error::CommandSpawnFailed { command, reason } => {
                write!(f, "Failed to spawn command '{}': {}", command, reason)
            }
            Error::ProcessInputSendFailed { reason } => {
                write!(f, "Failed to send input to process: {}", reason)
            }
            Error::ProcessAlreadyExited => {
                write!(f, "Process has already exited")
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(
                    f,
                    "Failed to load settings from '{}': {}",
                    path.display(),
                    reason
                )
            }
            Error::ConfigSaveFailed { path, reason } => {
                write!(
                    f,
                    "Failed to save settings to '{}': {}",
                    path.display(),
                    reason
                )
            }
            Error::ConfigNotFound => {
                write!(f, "Settings file not found")
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Settings validation failed for '{}': {}", field, reason)
            }
            Error::ConfigSerializationFailed { format, reason } => {
                write!(f, "Failed to serialize settings as {}: {}", format, reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} settings: {}", format, reason)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
            Error::Regex(err) => write!(f, "Regex compilation error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Regex(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
