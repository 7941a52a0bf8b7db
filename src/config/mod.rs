pub mod traits;
pub mod growth;
pub mod adf;
pub mod evolution;
pub mod manager;

pub use manager::{ConfigManager, GpConfig};
pub use growth::GrowthConfig;
pub use adf::AdfConfig;
pub use evolution::EvolutionConfig;
pub use traits::ConfigSection;
