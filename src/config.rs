//! Optional YAML configuration for the `aster` command.
//!
//! ```yaml
//! pattern: "aster:"
//! packages: [foo, bar]
//! strict: false
//! format: pretty
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default config file names to search for.
pub const DEFAULT_CONFIG_NAMES: &[&str] = &["aster.yaml", ".aster.yaml"];

/// Pattern used when neither the command line nor the config names one.
pub const DEFAULT_PATTERN: &str = "aster:";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct Config {
    /// Regular expression matched against comment groups.
    #[serde(default)]
    pub pattern: Option<String>,
    /// Packages to keep; empty keeps every package.
    #[serde(default)]
    pub packages: Vec<String>,
    /// Reject declarations that are neither functions nor structs.
    #[serde(default)]
    pub strict: bool,
    /// "pretty" (default) or "json"
    #[serde(default)]
    pub format: Option<String>,
}

impl Config {
    /// Parse a config from a YAML file.
    pub fn parse_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::parse_str(&content)
    }

    /// Parse a config from YAML text. Empty text is the default config.
    pub fn parse_str(content: &str) -> anyhow::Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Config = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Returns the comment pattern (defaults to "aster:").
    pub fn get_pattern(&self) -> &str {
        self.pattern.as_deref().unwrap_or(DEFAULT_PATTERN)
    }

    /// Returns the output format (defaults to "pretty").
    pub fn get_format(&self) -> &str {
        self.format.as_deref().unwrap_or("pretty")
    }
}

/// Find a config file in `dir`.
pub fn discover(dir: &Path) -> Option<PathBuf> {
    DEFAULT_CONFIG_NAMES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.is_file())
}
