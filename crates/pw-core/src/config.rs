// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves settings from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Behavior settings (non-visual preferences)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorSettings {
    /// Ask before closing a tab whose panes still run a foreground process
    pub confirm_close_running: bool,
    /// Rebuild the last saved tab arrangement on startup
    pub restore_session: bool,
    /// Write the tab arrangement to the state directory on exit
    pub save_session_on_exit: bool,
}

impl Default for BehaviorSettings {
    fn default() -> Self {
        Self {
            confirm_close_running: true,
            restore_session: true,
            save_session_on_exit: true,
        }
    }
}

/// Layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Ratio delta applied by a single keyboard resize
    pub resize_step: f32,
    /// Logical window size used for hit-testing and drop-zone geometry
    pub window_width: f32,
    pub window_height: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            resize_step: 0.05,
            window_width: 1200.0,
            window_height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Behavior settings
    pub behavior: BehaviorSettings,

    /// Layout settings
    pub layout: LayoutSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

impl Config {
    /// Get the default config file path (~/.config/paneweave/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("paneweave").join("config.toml"))
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or_else(|| {
            ConfigError::ReadError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "Could not determine config directory",
            ))
        })?;
        self.save(&path)?;
        Ok(path)
    }
}
