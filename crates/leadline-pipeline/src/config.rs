//! Configuration for the Pipeline

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What to do with the detected PII when extraction fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
    /// Persist nothing
    #[default]
    Discard,
    /// Persist a PII-only lead with every canonical field null
    PersistPartial,
}

/// Configuration for the Pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Maximum time for a single extraction call (seconds)
    pub extraction_timeout_secs: u64,

    /// Maximum summary length (characters, after trimming)
    pub max_summary_length: usize,

    /// Behavior when extraction fails
    pub failure_policy: FailurePolicy,
}

impl PipelineConfig {
    /// Get the extraction timeout as a Duration
    pub fn extraction_timeout(&self) -> Duration {
        Duration::from_secs(self.extraction_timeout_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.extraction_timeout_secs == 0 {
            return Err("extraction_timeout_secs must be greater than 0".to_string());
        }
        if self.max_summary_length == 0 {
            return Err("max_summary_length must be greater than 0".to_string());
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    /// Default configuration with balanced settings
    fn default() -> Self {
        Self {
            extraction_timeout_secs: 30,
            max_summary_length: 20_000,
            failure_policy: FailurePolicy::Discard,
        }
    }
}

impl PipelineConfig {
    /// Aggressive preset: short timeout, small inputs
    pub fn aggressive() -> Self {
        Self {
            extraction_timeout_secs: 15,
            max_summary_length: 10_000,
            failure_policy: FailurePolicy::Discard,
        }
    }

    /// Lenient preset: long timeout, large inputs, keep PII from failed runs
    pub fn lenient() -> Self {
        Self {
            extraction_timeout_secs: 120,
            max_summary_length: 50_000,
            failure_policy: FailurePolicy::PersistPartial,
        }
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
