//! Game configuration
//!
//! Defaults match the daily game; a JSON file may override any subset.
//!
//! ```json
//! { "max_attempts": 8, "filter": { "magnitude_cutoff": 100 } }
//! ```

use crate::game::SessionLimits;
use crate::puzzle::PlayabilityFilter;
use crate::rules::CATALOG_VERSION;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;

/// Errors raised while loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] io::Error),
    #[error("config file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Tunable game parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub sequence_length: usize,
    pub max_attempts: usize,
    pub max_hints: usize,
    pub filter: PlayabilityFilter,
    pub catalog_version: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            sequence_length: 7,
            max_attempts: 10,
            max_hints: 5,
            filter: PlayabilityFilter::default(),
            catalog_version: CATALOG_VERSION.to_string(),
        }
    }
}

impl GameConfig {
    /// Load a config file, missing fields take their defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`GameConfig::validate`].
    ///
    /// # Examples
    /// ```no_run
    /// use numericle::config::GameConfig;
    ///
    /// let config = GameConfig::load("numericle.json").unwrap();
    /// println!("{} numbers per puzzle", config.sequence_length);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse and validate a JSON config
    ///
    /// # Errors
    /// Returns `ConfigError::Json` or `ConfigError::Invalid`.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges and that the catalog version is the one built in
    ///
    /// # Errors
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sequence_length == 0 {
            return Err(ConfigError::Invalid("sequence_length must be at least 1".into()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be at least 1".into()));
        }
        if self.catalog_version != CATALOG_VERSION {
            return Err(ConfigError::Invalid(format!(
                "catalog_version '{}' is not available, this build serves '{CATALOG_VERSION}'",
                self.catalog_version
            )));
        }
        Ok(())
    }

    /// Session limits derived from this config
    #[must_use]
    pub const fn limits(&self) -> SessionLimits {
        SessionLimits {
            max_attempts: self.max_attempts,
            max_hints: self.max_hints,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_default() {
        assert_eq!(GameConfig::from_json("{}").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let config =
            GameConfig::from_json(r#"{ "max_attempts": 6, "filter": { "magnitude_cutoff": 100 } }"#)
                .unwrap();

        assert_eq!(config.max_attempts, 6);
        assert_eq!(config.max_hints, 5);
        assert_eq!(config.sequence_length, 7);
        assert_eq!(config.filter.magnitude_cutoff, 100);
        assert_eq!(config.filter.max_large_terms, 4);
        assert_eq!(
            config.limits(),
            SessionLimits {
                max_attempts: 6,
                max_hints: 5
            }
        );
    }

    #[test]
    fn zero_length_is_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "sequence_length": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn zero_attempts_is_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "max_attempts": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn foreign_catalog_is_rejected() {
        assert!(matches!(
            GameConfig::from_json(r#"{ "catalog_version": "v2" }"#),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(GameConfig::from_json("{ nope"), Err(ConfigError::Json(_))));
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("numericle-config-does-not-exist.json");
        assert!(matches!(GameConfig::load(path), Err(ConfigError::Io(_))));
    }
}
