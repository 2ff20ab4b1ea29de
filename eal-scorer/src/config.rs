//! Configuration management for the scorer
//!
//! Loads scoring parameters from TOML files and provides runtime access.

use kbp_events::Realis;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScorerConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub linking: LinkingConfig,
    #[serde(default)]
    pub observers: ObserverConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Parameters of the combined argument/linking score
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Weight of the linking score in the combined score, in [0, 1]
    #[serde(default = "default_lambda")]
    pub lambda: f64,
    /// Credit subtracted for each system class judged incorrect
    #[serde(default = "default_false_positive_penalty")]
    pub false_positive_penalty: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            lambda: default_lambda(),
            false_positive_penalty: default_false_positive_penalty(),
        }
    }
}

/// System linking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkingConfig {
    /// Link system arguments by event type instead of reading a linking store
    #[serde(default)]
    pub create_default_linking: bool,
    #[serde(default = "default_linking_realis")]
    pub default_linking_realis: Vec<Realis>,
}

impl Default for LinkingConfig {
    fn default() -> Self {
        Self {
            create_default_linking: false,
            default_linking_realis: default_linking_realis(),
        }
    }
}

/// Observers run by the `align` command
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObserverConfig {
    #[serde(default = "default_observers")]
    pub enabled: Vec<String>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            enabled: default_observers(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_true")]
    pub write_json_summary: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            write_json_summary: true,
        }
    }
}

// Default value functions
fn default_true() -> bool { true }
fn default_lambda() -> f64 { 0.25 }
fn default_false_positive_penalty() -> f64 { 0.25 }
fn default_linking_realis() -> Vec<Realis> { vec![Realis::Actual, Realis::Other] }
fn default_observers() -> Vec<String> {
    ["presence", "presence-lenient", "arguments", "log"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl ScorerConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::from_toml(&content)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from default config location or return defaults
    pub fn load_or_default() -> Self {
        let config_paths = [
            "config/scorer.toml",
            "../config/scorer.toml",
            "eal-scorer/config/scorer.toml",
        ];

        for path in &config_paths {
            if let Ok(config) = Self::from_file(path) {
                tracing::info!("Loaded configuration from {}", path);
                return config;
            }
        }

        tracing::info!("Using default configuration");
        Self::default()
    }

    /// Save configuration to a TOML file
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(e.to_string()))?;
        fs::write(path, content)
            .map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(())
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        let lambda = self.scoring.lambda;
        if !(0.0..=1.0).contains(&lambda) {
            return Err(ConfigError::Invalid(format!("lambda must be in [0, 1], got {}", lambda)));
        }
        let penalty = self.scoring.false_positive_penalty;
        if !(penalty >= 0.0 && penalty.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "false_positive_penalty must be a non-negative number, got {}",
                penalty
            )));
        }
        Ok(())
    }
}

/// Configuration errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Invalid value: {0}")]
    Invalid(String),
}
