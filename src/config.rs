//! Reporter configuration
//!
//! Optional TOML file passed with `--config`. Every field has a default,
//! so an empty file (or no file at all) is valid.

use std::path::Path;

use serde::Deserialize;

use crate::error::{ReporterError, Result};

/// Marker character that opens a command line on the wire
pub const DEFAULT_MARKER: char = '⚡';

/// Reporter configuration parsed from TOML
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ReporterConfig {
    /// Character that must start every command line (default: `⚡`)
    #[serde(default = "default_marker")]
    pub marker: char,
}

const fn default_marker() -> char {
    DEFAULT_MARKER
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            marker: default_marker(),
        }
    }
}

impl ReporterConfig {
    /// Parse a configuration file from a path
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::parse(&content)
    }

    /// Parse configuration content from a string
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        // ':' and ',' are field separators on the wire
        if matches!(self.marker, ':' | ',') {
            return Err(ReporterError::InvalidConfig(format!(
                "marker '{}' collides with a protocol separator",
                self.marker
            )));
        }
        if self.marker.is_whitespace() || self.marker.is_control() {
            return Err(ReporterError::InvalidConfig(format!(
                "marker {:?} must be a visible character",
                self.marker
            )));
        }
        Ok(())
    }
}
