use super::population::Population;
use super::progress::ProgressCallback;
use crate::engines::evaluation::Evaluator;

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub generations: usize,
    pub best_fitness: Option<f64>,
    pub reached_target: bool,
}

/// Drive `population` for up to `generations` calls to `evolve()`,
/// stopping early once the hall of fame holds an individual with primary
/// fitness at or below `target`.
pub fn run_generations<E: Evaluator, C: ProgressCallback>(
    population: &mut Population<E>,
    generations: usize,
    target: Option<f64>,
    callback: &mut C,
) -> RunSummary {
    let reached = |population: &Population<E>| match (target, population.hall_of_fame().best()) {
        (Some(target), Some(best)) => best.fitness <= target,
        _ => false,
    };

    let mut completed = 0;
    while completed < generations && !reached(population) {
        callback.on_generation_start(population.generation());
        let stats = population.evolve().clone();
        callback.on_generation_complete(&stats, population.hall_of_fame().len());
        completed += 1;
    }

    RunSummary {
        generations: completed,
        best_fitness: population.hall_of_fame().best().map(|b| b.fitness),
        reached_target: reached(population),
    }
}
