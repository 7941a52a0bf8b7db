use super::traits::ConfigSection;
use crate::error::GpError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    pub population_size: usize,
    /// Best individuals copied unchanged into the next generation
    pub clone_best: usize,
    /// Relative weights of the mate, mutate and clone actions
    pub mate_mutate_clone: [u32; 3],
    pub max_mate_attempts: usize,
    /// Attempts to grow each initial individual before the run is abandoned
    pub max_construction_attempts: usize,
    pub hall_of_fame_size: usize,
    pub parallel_evaluation: bool,
    pub seed: Option<u64>,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            clone_best: 5,
            mate_mutate_clone: [80, 18, 2],
            max_mate_attempts: 10,
            max_construction_attempts: 10,
            hall_of_fame_size: 1,
            parallel_evaluation: true,
            seed: None,
        }
    }
}

impl ConfigSection for EvolutionConfig {
    fn section_name() -> &'static str {
        "evolution"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.population_size == 0 {
            return Err(GpError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.clone_best > self.population_size {
            return Err(GpError::Configuration(format!(
                "Cannot clone the best {} of a population of {}",
                self.clone_best, self.population_size
            )));
        }
        if self.mate_mutate_clone.iter().all(|&w| w == 0) {
            return Err(GpError::Configuration(
                "At least one of mate/mutate/clone must have a positive weight".to_string(),
            ));
        }
        if self.max_mate_attempts == 0 || self.max_construction_attempts == 0 {
            return Err(GpError::Configuration(
                "Retry bounds must be at least 1".to_string(),
            ));
        }
        if self.hall_of_fame_size == 0 {
            return Err(GpError::Configuration(
                "Hall of fame must hold at least one individual".to_string(),
            ));
        }
        Ok(())
    }
}
