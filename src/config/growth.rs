use super::traits::ConfigSection;
use crate::error::GpError;
use serde::{Deserialize, Serialize};

/// Knobs for the typed tree grower
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowthConfig {
    /// Chance of placing a terminal at a node that could hold a primitive
    pub terminal_probability: f64,
    /// Maximum height of freshly grown trees
    pub max_init_depth: usize,
    /// Maximum height of subtrees grown by mutation
    pub max_mutation_depth: usize,
    /// Grow attempts against one signature before giving up on it
    pub max_attempts: usize,
    /// Signature redraws for flexible (ADF) signatures
    pub max_signatures: usize,
}

impl Default for GrowthConfig {
    fn default() -> Self {
        Self {
            terminal_probability: 0.3,
            max_init_depth: 5,
            max_mutation_depth: 3,
            max_attempts: 200,
            max_signatures: 50,
        }
    }
}

impl ConfigSection for GrowthConfig {
    fn section_name() -> &'static str {
        "growth"
    }

    fn validate(&self) -> Result<(), GpError> {
        if !(0.0..=1.0).contains(&self.terminal_probability) {
            return Err(GpError::Configuration(
                "Terminal probability must be between 0 and 1".to_string(),
            ));
        }
        if self.max_init_depth == 0 || self.max_mutation_depth == 0 {
            return Err(GpError::Configuration(
                "Growth depths must be at least 1".to_string(),
            ));
        }
        if self.max_mutation_depth >= self.max_init_depth {
            return Err(GpError::Configuration(format!(
                "Mutation depth ({}) must be below the initial growth depth ({})",
                self.max_mutation_depth, self.max_init_depth
            )));
        }
        if self.max_attempts == 0 || self.max_signatures == 0 {
            return Err(GpError::Configuration(
                "Growth retry bounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
