//! Configuration for the NER service client
//!
//! Values come from the `[ner]` TOML section, then environment variables
//! override whatever the file provided.

use crate::NerError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default service endpoint
pub const DEFAULT_SERVICE_URL: &str = "http://localhost:8765";

/// Default request timeout (seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;

/// Default number of retries after the first attempt
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Default minimum confidence score
pub const DEFAULT_SCORE_THRESHOLD: f64 = 0.3;

/// Environment variable overriding `enabled`
pub const ENV_ENABLED: &str = "QUARRY_NER_ENABLED";
/// Environment variable overriding `service_url`
pub const ENV_SERVICE_URL: &str = "QUARRY_NER_SERVICE_URL";
/// Environment variable overriding `timeout_secs`
pub const ENV_TIMEOUT: &str = "QUARRY_NER_TIMEOUT";
/// Environment variable overriding `max_retries`
pub const ENV_MAX_RETRIES: &str = "QUARRY_NER_MAX_RETRIES";
/// Environment variable overriding `fallback_to_pattern`
pub const ENV_FALLBACK_TO_PATTERN: &str = "QUARRY_NER_FALLBACK_TO_PATTERN";
/// Environment variable overriding `score_threshold`
pub const ENV_SCORE_THRESHOLD: &str = "QUARRY_NER_SCORE_THRESHOLD";

/// Entity label lists sent to the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityTypesConfig {
    /// Labels requested when the caller asks for none
    #[serde(default = "default_entity_types")]
    pub default: Vec<String>,

    /// Extra domain-specific labels
    #[serde(default)]
    pub custom: Vec<String>,
}

fn default_entity_types() -> Vec<String> {
    ["person", "organization", "location", "technology", "concept", "product"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for EntityTypesConfig {
    fn default() -> Self {
        Self {
            default: default_entity_types(),
            custom: Vec::new(),
        }
    }
}

impl EntityTypesConfig {
    /// Default labels followed by custom labels
    pub fn all(&self) -> Vec<String> {
        self.default.iter().chain(self.custom.iter()).cloned().collect()
    }
}

/// NER service settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NerConfig {
    /// Whether to use the service at all
    pub enabled: bool,

    /// Base URL of the service
    pub service_url: String,

    /// HTTP request timeout (seconds)
    pub timeout_secs: u64,

    /// Retries after the first failed attempt
    pub max_retries: u32,

    /// Fall back to pattern matching when the service cannot be used
    pub fallback_to_pattern: bool,

    /// Minimum confidence score (0.0-1.0)
    pub score_threshold: f64,

    /// Label lists
    pub entity_types: EntityTypesConfig,
}

impl Default for NerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            service_url: DEFAULT_SERVICE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
            fallback_to_pattern: true,
            score_threshold: DEFAULT_SCORE_THRESHOLD,
            entity_types: EntityTypesConfig::default(),
        }
    }
}

impl NerConfig {
    /// Request timeout as a Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), NerError> {
        if !(0.0..=1.0).contains(&self.score_threshold) {
            return Err(NerError::Config(format!(
                "score_threshold {} out of range [0.0, 1.0]",
                self.score_threshold
            )));
        }
        if self.enabled && self.service_url.trim().is_empty() {
            return Err(NerError::Config(
                "service_url must be set when enabled".to_string(),
            ));
        }
        if self.enabled && self.timeout_secs == 0 {
            return Err(NerError::Config(
                "timeout_secs must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, NerError> {
        toml::from_str(toml_str)
            .map_err(|e| NerError::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary variable lookup
    ///
    /// Booleans compare against `"true"` case-insensitively. Numbers that
    /// fail to parse leave the current value in place.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(enabled) = get(ENV_ENABLED) {
            self.enabled = enabled.eq_ignore_ascii_case("true");
        }
        if let Some(url) = get(ENV_SERVICE_URL) {
            self.service_url = url;
        }
        if let Some(timeout) = get(ENV_TIMEOUT).and_then(|v| v.parse().ok()) {
            self.timeout_secs = timeout;
        }
        if let Some(retries) = get(ENV_MAX_RETRIES).and_then(|v| v.parse().ok()) {
            self.max_retries = retries;
        }
        if let Some(fallback) = get(ENV_FALLBACK_TO_PATTERN) {
            self.fallback_to_pattern = fallback.eq_ignore_ascii_case("true");
        }
        if let Some(threshold) = get(ENV_SCORE_THRESHOLD).and_then(|v| v.parse().ok()) {
            self.score_threshold = threshold;
        }
    }
}
