pub mod node;
pub mod tree;
pub mod signature;
pub mod grower;
pub mod individual;
pub mod operators;
pub mod statistics;
pub mod hall_of_fame;
pub mod population;
pub mod progress;
pub mod runner;

pub use grower::{DeadBranch, TreeGrower};
pub use hall_of_fame::{HallOfFame, HallOfFameEntry};
pub use individual::Individual;
pub use node::Node;
pub use operators::RouletteWheel;
pub use population::Population;
pub use progress::{ChannelProgressCallback, ConsoleProgressCallback, ProgressCallback, ProgressMessage};
pub use runner::{run_generations, RunSummary};
pub use signature::{Contract, Signature, SignatureBuilder};
pub use statistics::{FitnessSummary, GenerationStats};
pub use tree::Tree;
