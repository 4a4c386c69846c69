//! Gallery configuration loaded from an optional `gallery.toml` at the
//! gallery root.
//!
//! All fields have sensible defaults. A config file need only specify the
//! values it wants to override. Unknown keys are rejected.
//!
//! ```toml
//! # entries/gallery.toml
//! mode = "prerendered"
//! command_timeout_secs = 600
//! plot_tool = "con-duct"
//! ```

use crate::entry::Mode;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

pub const CONFIG_FILE: &str = "gallery.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config validation error: {0}")]
    Validation(String),
}

/// Gallery-wide settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GalleryConfig {
    /// Default processing mode; the `--mode` flag overrides it.
    pub mode: Mode,
    /// Timeout for each entry's `setup.sh`, in seconds.
    pub setup_timeout_secs: u64,
    /// Timeout for each entry's `command.sh`, in seconds. Command scripts
    /// run the monitored workload and can legitimately be slow.
    pub command_timeout_secs: u64,
    /// Timeout for the external plot tool, in seconds.
    pub plot_timeout_secs: u64,
    /// The plot tool invoked as `<plot_tool> plot <usage.json> -o <png>`.
    pub plot_tool: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            setup_timeout_secs: 300,
            command_timeout_secs: 300,
            plot_timeout_secs: 60,
            plot_tool: "con-duct".to_string(),
        }
    }
}

impl GalleryConfig {
    pub fn setup_timeout(&self) -> Duration {
        Duration::from_secs(self.setup_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn plot_timeout(&self) -> Duration {
        Duration::from_secs(self.plot_timeout_secs)
    }

    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.setup_timeout_secs == 0 || self.command_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "script timeouts must be non-zero".into(),
            ));
        }
        if self.plot_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "plot_timeout_secs must be non-zero".into(),
            ));
        }
        if self.plot_tool.is_empty() {
            return Err(ConfigError::Validation("plot_tool must not be empty".into()));
        }
        Ok(())
    }
}

/// Load `gallery.toml` from the gallery root, falling back to defaults when
/// the file does not exist.
pub fn load_config(root: &Path) -> Result<GalleryConfig, ConfigError> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(GalleryConfig::default());
    }
    let content = fs::read_to_string(&path)?;
    let config: GalleryConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}
