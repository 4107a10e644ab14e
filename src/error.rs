//! Error types for ansible-launch.
//!
//! Resolution failures are split into two kinds: structural problems with the
//! configuration or caller input ([`Error::Configuration`]) and a requested
//! playbook that does not exist ([`Error::NotFound`]). The remaining variants
//! cover the collaborators around the core: document loading and process
//! launching.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for ansible-launch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for ansible-launch.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// Structural problem in the configuration or in the caller parameters.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The requested playbook does not exist.
    #[error("{0}")]
    NotFound(String),

    // ========================================================================
    // Loading Errors
    // ========================================================================
    /// The configuration document could not be read or parsed.
    #[error("Failed to load configuration from '{path}': {message}")]
    ConfigLoad {
        /// Path to the configuration document
        path: PathBuf,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Launch Errors
    // ========================================================================
    /// The external tool could not be started or awaited.
    #[error("Failed to launch '{program}': {message}")]
    Launch {
        /// Program that was launched
        program: String,
        /// Error message
        message: String,
    },

    // ========================================================================
    // Serialization Errors
    // ========================================================================
    /// YAML parsing error.
    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),
}

impl Error {
    /// Creates a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Creates the error raised when no playbook carries the requested name.
    pub fn playbook_not_found(name: &str) -> Self {
        Self::NotFound(format!("playbook '{}' not found", name))
    }

    /// Creates a new configuration load error.
    pub fn config_load(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new launch error.
    pub fn launch(program: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Launch {
            program: program.into(),
            message: message.into(),
        }
    }

    /// Returns true for configuration errors.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Error::Configuration(_))
    }

    /// Returns true when the requested playbook was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }

    /// Returns the error code for CLI exit status.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Launch { .. } => 3,
            Error::Configuration(_) | Error::ConfigLoad { .. } | Error::YamlParse(_) => 4,
            Error::NotFound(_) => 5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_display() {
        let err = Error::configuration("no playbooks defined");
        assert_eq!(err.to_string(), "Configuration error: no playbooks defined");
        assert!(err.is_configuration());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_not_found_display() {
        let err = Error::playbook_not_found("deploy");
        assert_eq!(err.to_string(), "playbook 'deploy' not found");
        assert!(err.is_not_found());
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(Error::configuration("x").exit_code(), 4);
        assert_eq!(Error::playbook_not_found("x").exit_code(), 5);
        assert_eq!(Error::launch("ansible-playbook", "boom").exit_code(), 3);
        assert_eq!(Error::config_load("/tmp/x.yml", "bad").exit_code(), 4);
    }

    #[test]
    fn test_yaml_error_converts() {
        let err: Error = serde_yaml::from_str::<serde_yaml::Value>("[unclosed")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::YamlParse(_)));
        assert_eq!(err.exit_code(), 4);
    }
}
