//! Settings File Loading
//!
//! Finds, loads, and saves the settings file across a set of search
//! paths, with TOML preferred and JSON accepted.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::Settings;
use crate::error::{Error, Result};

/// Settings file loader
pub struct SettingsLoader {
    /// Search paths tried in order
    search_paths: Vec<PathBuf>,
    /// Accepted file formats
    supported_formats: Vec<SettingsFormat>,
    /// Path the current settings were loaded from, if any
    current_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SettingsFormat {
    Toml,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Fall back to defaults when no file exists
    pub create_default: bool,
    /// Validate settings after loading
    pub validate: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            create_default: true,
            validate: true,
        }
    }
}

impl SettingsLoader {
    pub fn new() -> Self {
        Self {
            search_paths: Self::get_search_paths(),
            supported_formats: vec![SettingsFormat::Toml, SettingsFormat::Json],
            current_path: None,
        }
    }

    /// Load settings with default options
    pub fn load() -> Result<Settings> {
        Self::load_with_options(LoadOptions::default())
    }

    /// Load settings with custom options
    pub fn load_with_options(options: LoadOptions) -> Result<Settings> {
        let mut loader = Self::new();

        if let Some((path, settings)) = loader.find_and_load()? {
            info!(path = %path.display(), "loaded settings");
            loader.current_path = Some(path);
            if options.validate {
                settings.validate()?;
            }
            return Ok(settings);
        }

        if options.create_default {
            debug!("no settings file found, using defaults");
            let settings = Settings::default();
            if options.validate {
                settings.validate()?;
            }
            Ok(settings)
        } else {
            Err(Error::ConfigNotFound)
        }
    }

    /// Save settings to the current path or the default location, in
    /// TOML
    pub fn save(&self, settings: &Settings) -> Result<PathBuf> {
        let path = self
            .current_path
            .clone()
            .unwrap_or_else(Self::get_default_settings_path);
        self.save_to_path(settings, &path)?;
        Ok(path)
    }

    /// Save settings to a specific path; the extension picks the format
    pub fn save_to_path(&self, settings: &Settings, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::to_string_pretty(settings).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: "JSON".to_string(),
                    reason: e.to_string(),
                }
            })?,
            _ => toml::to_string_pretty(settings).map_err(|e| {
                Error::ConfigSerializationFailed {
                    format: "TOML".to_string(),
                    reason: e.to_string(),
                }
            })?,
        };

        fs::write(path, content).map_err(|e| Error::ConfigSaveFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        debug!(path = %path.display(), "saved settings");
        Ok(())
    }

    fn find_and_load(&self) -> Result<Option<(PathBuf, Settings)>> {
        for path in &self.search_paths {
            for format in &self.supported_formats {
                let settings_path = Self::path_for_format(path, *format);

                if settings_path.exists() {
                    match self.load_settings_file(&settings_path, *format) {
                        Ok(settings) => return Ok(Some((settings_path, settings))),
                        Err(e) => {
                            warn!(path = %settings_path.display(), error = %e, "skipping unreadable settings file");
                            continue;
                        }
                    }
                }
            }
        }

        Ok(None)
    }

    fn load_settings_file(&self, path: &Path, format: SettingsFormat) -> Result<Settings> {
        let content = fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        match format {
            SettingsFormat::Toml => {
                toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: "TOML".to_string(),
                    reason: e.to_string(),
                })
            }
            SettingsFormat::Json => {
                serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                    format: "JSON".to_string(),
                    reason: e.to_string(),
                })
            }
        }
    }

    fn path_for_format(base_path: &Path, format: SettingsFormat) -> PathBuf {
        let extension = match format {
            SettingsFormat::Toml => "toml",
            SettingsFormat::Json => "json",
        };
        base_path.join("settings").with_extension(extension)
    }

    fn get_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("blockrun"));
        }

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("blockrun"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".blockrun"));
            paths.push(home.join(".config").join("blockrun"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(".blockrun"));
        }

        paths
    }

    fn get_default_settings_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("blockrun")
            .join("settings.toml")
    }

    /// Path the current settings were loaded from
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }

    pub fn search_paths(&self) -> &[PathBuf] {
        &self.search_paths
    }

    pub fn add_search_path(&mut self, path: PathBuf) {
        self.search_paths.push(path);
    }

    /// Clear all search paths and use a single one
    pub fn set_search_path(&mut self, path: PathBuf) {
        self.search_paths = vec![path];
    }
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}
