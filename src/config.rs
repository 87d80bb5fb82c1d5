//! Configuration Management
//!
//! Handles the optional configuration file for pint-server. Values given on
//! the command line win over the file, the file wins over built-in defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

pub const DEFAULT_BIND: &str = "0.0.0.0:5000";
pub const DEFAULT_FRAMEWORK_PATTERN: &str = "framework/*.xml";
pub const DEFAULT_DELETION_MONTHS: u32 = 6;

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Listen address
    #[serde(default)]
    pub bind: Option<String>,
    /// Glob pattern locating the framework documents
    #[serde(default)]
    pub framework: Option<String>,
    /// Server types accepted in queries
    #[serde(default)]
    pub server_types: Option<Vec<String>>,
    /// Image states accepted in queries
    #[serde(default)]
    pub image_states: Option<Vec<String>>,
    /// Months between deprecation and deletion, per provider
    #[serde(default)]
    pub deletion_months: BTreeMap<String, u32>,
    /// Months between deprecation and deletion for unlisted providers
    #[serde(default)]
    pub default_deletion_months: Option<u32>,
}

impl Config {
    /// Get the default config file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pint-server").join("config.json"))
    }

    /// Load configuration from an explicit path, or from the default
    /// location when none is given. A missing default file yields defaults;
    /// a missing or broken explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::read(path);
        }

        let Some(path) = Self::default_path() else {
            return Ok(Self::default());
        };

        if !path.exists() {
            return Ok(Self::default());
        }

        match Self::read(&path) {
            Ok(config) => Ok(config),
            Err(e) => {
                tracing::warn!("Ignoring config {}: {:#}", path.display(), e);
                Ok(Self::default())
            }
        }
    }

    fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::parse(path, &content)
    }

    /// Parse config content, YAML for `.yaml`/`.yml` files and JSON otherwise
    pub fn parse(path: &Path, content: &str) -> Result<Self> {
        let is_yaml = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

        if is_yaml {
            serde_yaml::from_str(content)
                .with_context(|| format!("Invalid YAML config {}", path.display()))
        } else {
            serde_json::from_str(content)
                .with_context(|| format!("Invalid JSON config {}", path.display()))
        }
    }

    /// Get effective listen address (CLI > config > default)
    pub fn effective_bind(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.bind.clone())
            .unwrap_or_else(|| DEFAULT_BIND.to_string())
    }

    /// Get effective framework pattern (CLI > config > default)
    pub fn effective_framework(&self, cli: Option<&str>) -> String {
        cli.map(str::to_string)
            .or_else(|| self.framework.clone())
            .unwrap_or_else(|| DEFAULT_FRAMEWORK_PATTERN.to_string())
    }

    /// Query settings derived from this configuration
    pub fn settings(&self) -> Settings {
        let defaults = Settings::default();
        Settings {
            server_types: self.server_types.clone().unwrap_or(defaults.server_types),
            image_states: self.image_states.clone().unwrap_or(defaults.image_states),
            deletion_months: default_deletion_months()
                .into_iter()
                .chain(self.deletion_months.clone())
                .collect(),
            default_deletion_months: self
                .default_deletion_months
                .unwrap_or(defaults.default_deletion_months),
        }
    }
}

fn default_deletion_months() -> BTreeMap<String, u32> {
    BTreeMap::from([("amazon".to_string(), 24)])
}

/// Validation tables and lifecycle rules used while answering queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_types: Vec<String>,
    pub image_states: Vec<String>,
    pub deletion_months: BTreeMap<String, u32>,
    pub default_deletion_months: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_types: vec!["smt".to_string(), "regionserver".to_string()],
            image_states: ["active", "inactive", "deprecated", "deleted"]
                .into_iter()
                .map(String::from)
                .collect(),
            deletion_months: default_deletion_months(),
            default_deletion_months: DEFAULT_DELETION_MONTHS,
        }
    }
}

impl Settings {
    pub fn is_image_state(&self, state: &str) -> bool {
        self.image_states.iter().any(|s| s == state)
    }

    /// Months between deprecation and deletion for a provider
    pub fn deletion_months(&self, provider: &str) -> u32 {
        self.deletion_months
            .get(provider)
            .copied()
            .unwrap_or(self.default_deletion_months)
    }
}
