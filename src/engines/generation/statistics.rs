use serde::{Deserialize, Serialize};

/// Mean, standard deviation and range of the primary fitness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessSummary {
    pub avg: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

impl FitnessSummary {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let avg = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / n;
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Self {
            avg,
            std: variance.sqrt(),
            min,
            max,
        })
    }
}

/// One logbook line, recorded before the generation is replaced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    pub generation: usize,
    pub fitness: FitnessSummary,
    /// Individuals evaluated after breeding
    pub evaluations: usize,
    pub mate_fallbacks: usize,
    pub failed_mutations: usize,
}
