use super::traits::ConfigSection;
use crate::error::GpError;
use serde::{Deserialize, Serialize};

/// Shape of the automatically defined functions an individual may carry
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdfConfig {
    pub max_adfs: usize,
    pub min_args: usize,
    pub max_args: usize,
}

impl Default for AdfConfig {
    fn default() -> Self {
        Self {
            max_adfs: 4,
            min_args: 1,
            max_args: 5,
        }
    }
}

impl ConfigSection for AdfConfig {
    fn section_name() -> &'static str {
        "adf"
    }

    fn validate(&self) -> Result<(), GpError> {
        if self.min_args > self.max_args {
            return Err(GpError::Configuration(format!(
                "ADF argument range is empty: {}..={}",
                self.min_args, self.max_args
            )));
        }
        Ok(())
    }
}
