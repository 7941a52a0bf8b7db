use crate::engines::generation::individual::Individual;
use crate::types::Fitness;

/// Domain-supplied fitness function.
///
/// Must return a finite, comparable fitness for every individual; a domain
/// that cannot compute one substitutes its own "worst" value. Evaluation
/// must not touch the catalog, which allows evaluating a population in
/// parallel.
pub trait Evaluator: Send + Sync {
    fn evaluate(&self, individual: &Individual) -> Fitness;
}

impl<F> Evaluator for F
where
    F: Fn(&Individual) -> Fitness + Send + Sync,
{
    fn evaluate(&self, individual: &Individual) -> Fitness {
        self(individual)
    }
}
