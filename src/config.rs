//! Configuration module for ansible-launch
//!
//! Handles loading and merging tool settings from multiple sources:
//! - Default values
//! - System settings (/etc/ansible-launch/config.toml)
//! - User settings (~/.ansible-launch.toml)
//! - Project settings (./ansible-launch.toml)
//! - Environment variables
//!
//! These are settings of the launcher itself, not the playbook
//! configuration document (see [`crate::playbook`]).

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::command::DEFAULT_PROGRAM;

/// Main settings structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default settings
    pub defaults: Defaults,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Variables available to expansion and passed to the launched tool
    pub environment: IndexMap<String, String>,
}

/// Default values for command-line options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Program to launch
    pub program: String,

    /// Playbook configuration document
    pub configuration_file: Option<String>,

    /// Working directory for the launched tool
    pub workspace: Option<String>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            configuration_file: None,
            workspace: None,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Default multi-field format
    #[default]
    Full,
    /// Single-line compact format
    Compact,
    /// One JSON object per event
    Json,
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level used when neither RUST_LOG nor -v is given
    pub log_level: String,

    /// Log format
    pub log_format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: LogFormat::Full,
        }
    }
}

impl Config {
    /// Load settings from all sources
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let mut config = Config::default();

        for path in Self::get_config_paths(config_path) {
            if path.exists() {
                config = config.merge(Self::read_file(&path)?);
            }
        }

        config.apply_env_overrides();

        Ok(config)
    }

    /// Get the list of settings file paths to check
    fn get_config_paths(explicit_path: Option<&PathBuf>) -> Vec<PathBuf> {
        // Explicit path takes priority
        if let Some(path) = explicit_path {
            return vec![path.clone()];
        }

        if let Ok(env_config) = std::env::var("ANSIBLE_LAUNCH_SETTINGS") {
            return vec![PathBuf::from(env_config)];
        }

        let mut paths = vec![PathBuf::from("/etc/ansible-launch/config.toml")];

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".ansible-launch.toml"));
        }

        paths.push(PathBuf::from("ansible-launch.toml"));
        paths
    }

    /// Parse a settings file, choosing the format by extension
    fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;

        let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let config = match extension {
            "yml" | "yaml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            _ => toml::from_str(&content)
                .or_else(|_| serde_yaml::from_str(&content))
                .with_context(|| format!("Failed to parse settings file: {}", path.display()))?,
        };

        Ok(config)
    }

    /// Merge another config into this one; `other` wins where it differs from the defaults
    fn merge(&self, other: Config) -> Config {
        let defaults = Defaults::default();
        let logging = LoggingConfig::default();

        Config {
            defaults: Defaults {
                program: if other.defaults.program != defaults.program {
                    other.defaults.program
                } else {
                    self.defaults.program.clone()
                },
                configuration_file: other
                    .defaults
                    .configuration_file
                    .or_else(|| self.defaults.configuration_file.clone()),
                workspace: other
                    .defaults
                    .workspace
                    .or_else(|| self.defaults.workspace.clone()),
            },
            logging: LoggingConfig {
                log_level: if other.logging.log_level != logging.log_level {
                    other.logging.log_level
                } else {
                    self.logging.log_level.clone()
                },
                log_format: if other.logging.log_format != logging.log_format {
                    other.logging.log_format
                } else {
                    self.logging.log_format
                },
            },
            environment: {
                let mut env = self.environment.clone();
                env.extend(other.environment);
                env
            },
        }
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // ANSIBLE_LAUNCH_PROGRAM
        if let Ok(program) = std::env::var("ANSIBLE_LAUNCH_PROGRAM") {
            self.defaults.program = program;
        }

        // ANSIBLE_LAUNCH_CONFIG
        if let Ok(file) = std::env::var("ANSIBLE_LAUNCH_CONFIG") {
            self.defaults.configuration_file = Some(file);
        }

        // ANSIBLE_LAUNCH_WORKSPACE
        if let Ok(workspace) = std::env::var("ANSIBLE_LAUNCH_WORKSPACE") {
            self.defaults.workspace = Some(workspace);
        }

        // ANSIBLE_LAUNCH_LOG_LEVEL
        if let Ok(level) = std::env::var("ANSIBLE_LAUNCH_LOG_LEVEL") {
            self.logging.log_level = level;
        }
    }

    /// Load from a specific file, ignoring the standard locations
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Config::default().merge(Self::read_file(path.as_ref())?))
    }
}
