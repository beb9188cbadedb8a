//! Configuration for state-space construction.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML)
//! 2. Environment variables (with QSTATE_ prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest `max_qubits` value accepted by [`StateSpaceConfig::validate`].
const MAX_QUBITS_LIMIT: u32 = 63;

/// Tuning knobs shared by every state space built through the factory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateSpaceConfig {
    /// Minimum qubit count at which a multi-thread budget selects the
    /// parallel backend.
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: u32,

    /// Smallest amplitude slice handed to one worker.
    #[serde(default = "default_min_chunk_len")]
    pub min_chunk_len: usize,

    /// Optional hard cap on the qubit count.
    #[serde(default)]
    pub max_qubits: Option<u32>,

    /// Fixed RNG seed; entropy-seeded when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_parallel_threshold() -> u32 {
    12
}

fn default_min_chunk_len() -> usize {
    4096
}

impl Default for StateSpaceConfig {
    fn default() -> Self {
        Self {
            parallel_threshold: default_parallel_threshold(),
            min_chunk_len: default_min_chunk_len(),
            max_qubits: None,
            seed: None,
        }
    }
}

impl StateSpaceConfig {
    /// Set a fixed RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the parallel backend threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, num_qubits: u32) -> Self {
        self.parallel_threshold = num_qubits;
        self
    }

    /// Set the minimum worker chunk length.
    #[must_use]
    pub fn with_min_chunk_len(mut self, len: usize) -> Self {
        self.min_chunk_len = len;
        self
    }

    /// Cap the qubit count accepted by the factory.
    #[must_use]
    pub fn with_max_qubits(mut self, max_qubits: u32) -> Self {
        self.max_qubits = Some(max_qubits);
        self
    }

    /// Parse configuration from a YAML document.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: StateSpaceConfig = serde_yaml_ng::from_str(contents)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Self::from_yaml_str(&contents)
    }

    /// Load configuration from environment variables on top of the defaults.
    pub fn from_env() -> Self {
        Self::default().merge_env()
    }

    /// Load configuration with the following precedence:
    /// 1. Load from file if provided
    /// 2. Apply environment variable overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env();
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides.
    ///
    /// Only variables that are set and parse override the current values.
    pub fn merge_env(mut self) -> Self {
        if let Some(v) = env_parse("QSTATE_PARALLEL_THRESHOLD") {
            self.parallel_threshold = v;
        }
        if let Some(v) = env_parse("QSTATE_MIN_CHUNK_LEN") {
            self.min_chunk_len = v;
        }
        if let Some(v) = env_parse("QSTATE_MAX_QUBITS") {
            self.max_qubits = Some(v);
        }
        if let Some(v) = env_parse("QSTATE_SEED") {
            self.seed = Some(v);
        }
        self
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_chunk_len == 0 {
            return Err(ConfigError::ValidationError(
                "min_chunk_len must be greater than 0".to_string(),
            ));
        }
        if let Some(max) = self.max_qubits {
            if max > MAX_QUBITS_LIMIT {
                return Err(ConfigError::ValidationError(format!(
                    "max_qubits must be at most {MAX_QUBITS_LIMIT}, got {max}"
                )));
            }
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = StateSpaceConfig::default();
        assert_eq!(config.parallel_threshold, 12);
        assert_eq!(config.min_chunk_len, 4096);
        assert_eq!(config.max_qubits, None);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(StateSpaceConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validate_zero_chunk_len() {
        let config = StateSpaceConfig::default().with_min_chunk_len(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_max_qubits_limit() {
        let config = StateSpaceConfig::default().with_max_qubits(64);
        assert!(config.validate().is_err());
        let config = StateSpaceConfig::default().with_max_qubits(30);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_partial_uses_defaults() {
        let config = StateSpaceConfig::from_yaml_str("seed: 7\n").unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.parallel_threshold, 12);
    }

    #[test]
    fn test_yaml_rejects_invalid_values() {
        let err = StateSpaceConfig::from_yaml_str("min_chunk_len: 0\n").unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = StateSpaceConfig::from_yaml_str("parallel_threshold: [1, 2]\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_missing_file() {
        let err = StateSpaceConfig::from_file("/nonexistent/qstate.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
