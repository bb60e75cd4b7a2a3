//! Viewer configuration.
//!
//! Defaults match the chat UI this viewer mirrors: 20 ms per revealed unit, animation on,
//! timestamps shown. With the `config` feature enabled a TOML file at
//! `<config dir>/chatbubble/config.toml` can override them, and command-line flags override
//! both.
//!
//! ```toml
//! tick_interval_ms = 35
//! animate = true
//! theme = "high-contrast"
//! show_timestamps = false
//! ```

use crate::error::{BubbleError, Result};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Interval between reveal ticks when nothing else is configured.
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(20);
/// Slowest accepted reveal interval.
pub const MAX_TICK_INTERVAL: Duration = Duration::from_secs(10);

/// Built-in color themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Default,
    Monochrome,
    HighContrast,
}

impl ThemeName {
    pub const ALL: [ThemeName; 3] = [
        ThemeName::Default,
        ThemeName::Monochrome,
        ThemeName::HighContrast,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ThemeName::Default => "default",
            ThemeName::Monochrome => "monochrome",
            ThemeName::HighContrast => "high-contrast",
        }
    }
}

impl fmt::Display for ThemeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeName {
    type Err = BubbleError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        ThemeName::ALL
            .into_iter()
            .find(|theme| theme.as_str() == normalized)
            .ok_or_else(|| BubbleError::config(format!("unknown theme '{s}'")))
    }
}

/// Runtime settings for the viewer.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Time between two reveal ticks.
    pub tick_interval: Duration,
    /// Honour the per-message typing flag. When off every message is shown in full.
    pub animate: bool,
    pub theme: ThemeName,
    pub show_timestamps: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tick_interval: DEFAULT_TICK_INTERVAL,
            animate: true,
            theme: ThemeName::Default,
            show_timestamps: true,
        }
    }
}

impl Config {
    /// Load configuration from the user's config file, falling back to defaults.
    #[cfg(feature = "config")]
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.is_file() => Self::load_from(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load configuration; without the `config` feature this is always the defaults.
    #[cfg(not(feature = "config"))]
    pub fn load() -> Result<Self> {
        Ok(Self::default())
    }

    /// Location of the configuration file.
    #[cfg(feature = "config")]
    pub fn default_path() -> Option<std::path::PathBuf> {
        dirs::config_dir().map(|dir| dir.join("chatbubble").join("config.toml"))
    }

    #[cfg(feature = "config")]
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            BubbleError::file_error(format!("Failed to read config {}", path.display()), e)
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a TOML document on top of the defaults.
    #[cfg(feature = "config")]
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let file: file::ConfigFile =
            toml::from_str(contents).map_err(|e| BubbleError::config(e.to_string()))?;
        let mut config = Self::default();
        file.apply(&mut config)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the reveal loop cannot honour.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval.is_zero() {
            return Err(BubbleError::config("tick interval must be greater than zero"));
        }
        if self.tick_interval > MAX_TICK_INTERVAL {
            return Err(BubbleError::config(format!(
                "tick interval must be at most {} ms",
                MAX_TICK_INTERVAL.as_millis()
            )));
        }
        Ok(())
    }
}

#[cfg(feature = "config")]
mod file {
    use super::{Config, ThemeName};
    use crate::error::Result;
    use serde::Deserialize;
    use std::time::Duration;

    /// On-disk representation; every key is optional.
    #[derive(Debug, Default, Deserialize)]
    #[serde(deny_unknown_fields)]
    pub(super) struct ConfigFile {
        tick_interval_ms: Option<u64>,
        animate: Option<bool>,
        theme: Option<String>,
        show_timestamps: Option<bool>,
    }

    impl ConfigFile {
        pub(super) fn apply(self, config: &mut Config) -> Result<()> {
            if let Some(ms) = self.tick_interval_ms {
                config.tick_interval = Duration::from_millis(ms);
            }
            if let Some(animate) = self.animate {
                config.animate = animate;
            }
            if let Some(theme) = self.theme {
                config.theme = theme.parse::<ThemeName>()?;
            }
            if let Some(show) = self.show_timestamps {
                config.show_timestamps = show;
            }
            Ok(())
        }
    }
}
