// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves host defaults and pane layouts from TOML config files.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::PaneProps;

/// Defaults resolved by the host environment rather than sniffed at runtime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostSettings {
    /// Default for panes that leave `render_on_resize` unset
    pub render_on_resize: bool,
}

impl Default for HostSettings {
    fn default() -> Self {
        Self {
            render_on_resize: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NegotiationSettings {
    /// Upper bound on how long a single `element.size` listener may run.
    /// `0` disables the bound.
    pub listener_timeout_ms: u64,
}

impl NegotiationSettings {
    pub fn listener_timeout(&self) -> Option<Duration> {
        (self.listener_timeout_ms > 0).then(|| Duration::from_millis(self.listener_timeout_ms))
    }
}

impl Default for NegotiationSettings {
    fn default() -> Self {
        Self {
            listener_timeout_ms: 5000,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub host: HostSettings,

    pub negotiation: NegotiationSettings,

    /// Sibling panes, in container order
    pub panes: Vec<PaneProps>,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigPath,
}

impl Config {
    /// Get the default config file path (~/.config/reflex-pane/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reflex-pane").join("config.toml"))
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load config from a path
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| Self::load(&path).ok())
            .unwrap_or_default()
    }

    /// Save config to a path
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save config to default path
    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigPath)?;
        self.save(&path)?;
        Ok(path)
    }
}
