//! Configuration schema (sqlgate.toml)

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Error loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    IoError(String),

    #[error("failed to parse config file: {0}")]
    ParseError(String),
}

/// Rendering defaults. CLI flags override whatever is configured here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Drop whitespace-only lines from the processed output
    #[serde(default = "default_collapse_blank_lines")]
    pub collapse_blank_lines: bool,
}

fn default_collapse_blank_lines() -> bool {
    true
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            collapse_blank_lines: true,
        }
    }
}

/// Top-level sqlgate configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Config {
    /// Rendering defaults
    #[serde(default)]
    pub render: RenderConfig,
}

impl Config {
    /// Load config from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_toml(&contents)
    }

    /// Load config from a TOML string
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_collapse_blank_lines() {
        let config = Config::default();
        assert!(config.render.collapse_blank_lines);
    }

    #[test]
    fn parses_render_section() {
        let config = Config::from_toml("[render]\ncollapse_blank_lines = false\n").unwrap();
        assert_eq!(config.render.collapse_blank_lines, false);
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();
        assert_eq!(config, Config::default());
    }
}
