//! PII detector configuration

use serde::{Deserialize, Serialize};

use crate::{EntityKind, PiiError};

/// Configuration for the pattern detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PiiConfig {
    /// Recognizers to run
    pub entities: Vec<EntityKind>,

    /// Spans scoring below this are dropped (0.0-1.0)
    pub min_score: f64,

    /// Largest input accepted, in characters
    pub max_input_chars: usize,
}

impl Default for PiiConfig {
    fn default() -> Self {
        Self {
            entities: EntityKind::ALL.to_vec(),
            min_score: 0.5,
            max_input_chars: 100_000,
        }
    }
}

impl PiiConfig {
    /// Only high-certainty recognizers (email, card, SSN)
    pub fn strict() -> Self {
        Self {
            min_score: 0.85,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), PiiError> {
        if !(0.0..=1.0).contains(&self.min_score) {
            return Err(PiiError::Config(format!(
                "min_score {} is outside [0.0, 1.0]",
                self.min_score
            )));
        }
        if self.max_input_chars == 0 {
            return Err(PiiError::Config(
                "max_input_chars must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
