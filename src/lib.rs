pub mod config;
pub mod engines;
pub mod error;
pub mod functions;
pub mod types;

pub use config::GpConfig;
pub use engines::evaluation::{Evaluator, Program};
pub use engines::generation::{Contract, Individual, Population};
pub use error::{GpError, Result};
pub use functions::PrimitiveCatalog;
pub use types::{DataType, Fitness, Value};
