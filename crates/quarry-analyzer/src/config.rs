//! Configuration for analysis runs and the process as a whole

use crate::error::AnalyzerError;
use crate::patterns::MiningOptions;
use quarry_ner::NerConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default capacity of the per-run update stream
pub const DEFAULT_UPDATE_CAPACITY: usize = 10;

/// Default multi-word window size for the pattern strategy
pub const DEFAULT_MAX_MULTIWORD_SPAN: usize = 3;

/// Settings for [`StreamingAnalyzer`](crate::StreamingAnalyzer)
///
/// # Examples
///
/// ```
/// use quarry_analyzer::AnalyzerConfig;
///
/// let config = AnalyzerConfig::default();
/// assert_eq!(config.update_capacity, 10);
/// assert!(config.entity_categories.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Bounded capacity of each run's update stream
    pub update_capacity: usize,

    /// Largest multi-word window the pattern strategy considers (2-5)
    pub max_multiword_span: usize,

    /// Categories requested from the entity strategy; empty means all
    pub entity_categories: Vec<String>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            update_capacity: DEFAULT_UPDATE_CAPACITY,
            max_multiword_span: DEFAULT_MAX_MULTIWORD_SPAN,
            entity_categories: Vec::new(),
        }
    }
}

impl AnalyzerConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        if self.update_capacity == 0 {
            return Err(AnalyzerError::Config(
                "update_capacity must be greater than 0".to_string(),
            ));
        }
        if !(2..=5).contains(&self.max_multiword_span) {
            return Err(AnalyzerError::Config(format!(
                "max_multiword_span {} out of range [2, 5]",
                self.max_multiword_span
            )));
        }
        Ok(())
    }
}

/// Process-wide configuration, read from a TOML file
///
/// ```toml
/// [ner]
/// enabled = true
/// service_url = "http://localhost:8765"
///
/// [analyzer]
/// update_capacity = 10
///
/// [mining]
/// min_occurrences = 2
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QuarryConfig {
    /// NER service settings
    pub ner: NerConfig,

    /// Pipeline settings
    pub analyzer: AnalyzerConfig,

    /// Relationship pattern mining thresholds
    pub mining: MiningOptions,
}

impl QuarryConfig {
    /// Parse from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, AnalyzerError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Load from `path`, then apply environment overrides and validate
    ///
    /// A missing file yields the defaults; a present but malformed file is
    /// an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, AnalyzerError> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)?;
            Self::from_toml(&contents)?
        } else {
            tracing::debug!("No config at {}, using defaults", path.display());
            Self::default()
        };

        config.ner.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Validate every section
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        self.ner.validate()?;
        self.analyzer.validate()?;
        self.mining.validate()
    }
}
