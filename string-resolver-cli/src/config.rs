//! The `strings.toml` configuration file read by `string-resolver build`.
//!
//! ```toml
//! cultures = ["en", "en-AU"]   # the first culture is the base unless `base_culture` is set
//! platform = "ios"             # optional, `--ios` / `--android` override it
//! version = "1.2.3"            # optional, `--version` overrides it
//!
//! [content]
//! path = "app/content"
//!
//! [output]
//! strings = "LocalStrs"
//! code = "LocalStrs/accessors.json"
//! ```
//!
//! Relative paths are resolved against the directory holding the config file.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use string_resolver::Platform;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub cultures: Vec<String>,
    #[serde(default)]
    pub base_culture: Option<String>,
    #[serde(default)]
    pub platform: Option<Platform>,
    #[serde(default)]
    pub version: Option<String>,
    pub content: ContentConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    /// Directory containing the `*.json` entry documents.
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Directory receiving one localized table per culture.
    #[serde(default)]
    pub strings: Option<PathBuf>,
    /// File receiving the accessor descriptors.
    #[serde(default)]
    pub code: Option<PathBuf>,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("Invalid config file: {}", e))
    }

    /// Reads the config at `path` and makes its relative paths absolute.
    pub fn read_from(path: &Path) -> Result<Self, String> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config {}: {}", path.display(), e))?;
        let mut config = Self::from_toml(&content)?;
        let root = path.parent().unwrap_or_else(|| Path::new("."));
        config.resolve_paths(root);
        Ok(config)
    }

    pub fn base_culture(&self) -> Option<&str> {
        self.base_culture
            .as_deref()
            .or_else(|| self.cultures.first().map(String::as_str))
    }

    fn resolve_paths(&mut self, root: &Path) {
        self.content.path = root.join(&self.content.path);
        if let Some(strings) = &self.output.strings {
            self.output.strings = Some(root.join(strings));
        }
        if let Some(code) = &self.output.code {
            self.output.code = Some(root.join(code));
        }
    }
}
