// SPDX-License-Identifier: AGPL-3.0-or-later
// SPDX-FileCopyrightText: 2025 Jonathan D.A. Jewell
//! Configuration management
//!
//! Settings are layered: built-in defaults, then a TOML file, then
//! `GRIDREACH_*` environment variables. Command line flags are applied last by
//! the commands themselves.

use crate::expand::Strategy;
use anyhow::{Context, Result};
use ::config::{Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// City records (`city,area`)
    pub cities: PathBuf,
    /// Power line records (`from,to,weight`)
    pub connections: PathBuf,
    /// Regions whose cities take part in the analysis
    pub areas: Vec<String>,
    /// Target network size
    pub k: usize,
    /// Directory the report is written to
    pub output_dir: PathBuf,
    /// Frontier strategy
    pub strategy: Strategy,
    /// Run expansions in parallel
    pub parallel: bool,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cities: PathBuf::from("data/cities.csv"),
            connections: PathBuf::from("data/connections.csv"),
            areas: ["purple", "gray", "red", "yellow", "brown"]
                .map(String::from)
                .to_vec(),
            k: 14,
            output_dir: PathBuf::from("."),
            strategy: Strategy::Scan,
            parallel: true,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Look up a single key, rendered as text
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        let value = match key {
            "cities" => self.cities.display().to_string(),
            "connections" => self.connections.display().to_string(),
            "areas" => self.areas.join(","),
            "k" => self.k.to_string(),
            "output_dir" => self.output_dir.display().to_string(),
            "strategy" => self.strategy.as_str().to_string(),
            "parallel" => self.parallel.to_string(),
            "log_level" => self.log_level.clone(),
            _ => return None,
        };
        Some(value)
    }

    /// Render as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }
}

/// Default location of the configuration file
#[must_use]
pub fn default_path() -> PathBuf {
    directories::ProjectDirs::from("com", "hyperpolymath", "gridreach")
        .map(|d| d.config_dir().join("config.toml"))
        .unwrap_or_else(|| PathBuf::from("gridreach.toml"))
}

/// Load configuration from disk and environment, falling back to defaults
///
/// An explicitly given file must exist; the default file is optional.
pub fn load(path: Option<&Path>) -> Result<Config> {
    let (file, required) = match path {
        Some(p) => (p.to_path_buf(), true),
        None => (default_path(), false),
    };

    let layers = ::config::Config::builder()
        .add_source(
            ::config::Config::try_from(&Config::default())
                .context("Failed to seed default configuration")?,
        )
        .add_source(File::from(file.as_path()).format(FileFormat::Toml).required(required))
        .add_source(
            Environment::with_prefix("GRIDREACH")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("areas"),
        )
        .build()
        .with_context(|| format!("Failed to load configuration from {}", file.display()))?;

    layers
        .try_deserialize()
        .context("Failed to parse configuration")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert_eq!(config.k, 14);
        assert_eq!(config.areas.len(), 5);
        assert_eq!(config.get("strategy").as_deref(), Some("scan"));
        assert_eq!(config.get("areas").as_deref(), Some("purple,gray,red,yellow,brown"));
        assert!(config.get("nonsense").is_none());
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("gridreach.toml");
        fs::write(&path, "k = 3\nareas = [\"red\"]\nstrategy = \"heap\"\n").unwrap();

        let config = load(Some(&path)).unwrap();

        assert_eq!(config.k, 3);
        assert_eq!(config.areas, vec!["red"]);
        assert_eq!(config.strategy, Strategy::Heap);
        assert_eq!(config.cities, PathBuf::from("data/cities.csv"));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load(Some(&dir.path().join("absent.toml"))).is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let rendered = config.to_toml().unwrap();

        assert!(rendered.contains("k = 14"));
        let parsed: Config = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
