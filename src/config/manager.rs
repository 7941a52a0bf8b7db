use super::{
    adf::AdfConfig, evolution::EvolutionConfig, growth::GrowthConfig, traits::ConfigSection,
};
use crate::error::GpError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GpConfig {
    pub growth: GrowthConfig,
    pub adf: AdfConfig,
    pub evolution: EvolutionConfig,
}

impl GpConfig {
    pub fn validate(&self) -> Result<(), GpError> {
        self.growth.validate()?;
        self.adf.validate()?;
        self.evolution.validate()?;
        Ok(())
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, GpError> {
        let config: GpConfig = toml::from_str(contents)
            .map_err(|e| GpError::Configuration(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, GpError> {
        toml::to_string_pretty(self)
            .map_err(|e| GpError::Configuration(format!("Failed to serialize: {}", e)))
    }
}

pub struct ConfigManager {
    config: Arc<RwLock<GpConfig>>,
}

impl ConfigManager {
    pub fn new() -> Self {
        Self {
            config: Arc::new(RwLock::new(GpConfig::default())),
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| GpError::Configuration(format!("Failed to read config: {}", e)))?;

        let config = GpConfig::from_toml_str(&contents)?;

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = config;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), GpError> {
        let toml_str = self.get().to_toml_string()?;

        std::fs::write(path, toml_str)
            .map_err(|e| GpError::Configuration(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    pub fn get(&self) -> GpConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Apply `f` to a copy of the configuration and keep it only if it validates.
    pub fn update<F>(&self, f: F) -> Result<(), GpError>
    where
        F: FnOnce(&mut GpConfig),
    {
        let mut config = self.config.write().unwrap_or_else(PoisonError::into_inner);
        let mut candidate = config.clone();
        f(&mut candidate);
        candidate.validate()?;
        *config = candidate;
        Ok(())
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
