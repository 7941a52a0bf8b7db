pub mod evaluator;
pub mod program;

pub use evaluator::Evaluator;
pub use program::{CompiledFunction, Program};
