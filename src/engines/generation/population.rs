use super::{
    hall_of_fame::HallOfFame,
    individual::Individual,
    operators::{roulette_selection, RouletteWheel},
    signature::Contract,
    statistics::{FitnessSummary, GenerationStats},
};
use crate::config::GpConfig;
use crate::engines::evaluation::Evaluator;
use crate::error::{GpError, Result};
use crate::functions::PrimitiveCatalog;
use crate::types::Fitness;
use log::{debug, info, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Mate,
    Mutate,
    Clone,
}

const ACTIONS: [Action; 3] = [Action::Mate, Action::Mutate, Action::Clone];

/// A generation of individuals plus everything needed to breed the next one.
///
/// All randomness comes from one `StdRng`, seeded once from
/// `EvolutionConfig::seed`. Termination is up to the caller: call
/// [`Population::evolve`] as often as needed.
pub struct Population<E: Evaluator> {
    individuals: Vec<Individual>,
    config: GpConfig,
    evaluator: E,
    hall_of_fame: HallOfFame,
    logbook: Vec<GenerationStats>,
    generation: usize,
    rng: StdRng,
    actions: WeightedIndex<u32>,
}

impl<E: Evaluator> Population<E> {
    /// Grow and evaluate `config.evolution.population_size` individuals.
    ///
    /// Each individual gets `max_construction_attempts` tries; running out
    /// means the catalog cannot satisfy `contract` and is reported as a
    /// configuration error.
    pub fn new(
        catalog: &PrimitiveCatalog,
        contract: &Contract,
        config: GpConfig,
        evaluator: E,
    ) -> Result<Self> {
        config.validate()?;
        let mut rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let size = config.evolution.population_size;
        let max_attempts = config.evolution.max_construction_attempts;
        let mut individuals = Vec::with_capacity(size);

        for slot in 0..size {
            let mut last_error = None;
            for attempt in 1..=max_attempts {
                match Individual::new(catalog, contract, &config.growth, &config.adf, &mut rng) {
                    Ok(individual) => {
                        if attempt > 1 {
                            warn!("Individual {} needed {} construction attempts", slot, attempt);
                        }
                        individuals.push(individual);
                        last_error = None;
                        break;
                    }
                    Err(e) => last_error = Some(e),
                }
            }
            if let Some(e) = last_error {
                return Err(GpError::Configuration(format!(
                    "cannot grow individuals for {} after {} attempts: {}",
                    contract, max_attempts, e
                )));
            }
        }

        info!("Grew {} individuals for {}", individuals.len(), contract);
        Self::assemble(individuals, config, evaluator, rng)
    }

    /// Start from existing individuals; the population size follows their count
    pub fn from_individuals(
        individuals: Vec<Individual>,
        mut config: GpConfig,
        evaluator: E,
    ) -> Result<Self> {
        config.evolution.population_size = individuals.len();
        config.validate()?;
        let rng = match config.evolution.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::assemble(individuals, config, evaluator, rng)
    }

    fn assemble(
        individuals: Vec<Individual>,
        config: GpConfig,
        evaluator: E,
        rng: StdRng,
    ) -> Result<Self> {
        let actions = WeightedIndex::new(config.evolution.mate_mutate_clone)
            .map_err(|e| GpError::Configuration(format!("Invalid mate/mutate/clone weights: {}", e)))?;

        let mut population = Self {
            individuals,
            hall_of_fame: HallOfFame::new(config.evolution.hall_of_fame_size),
            config,
            evaluator,
            logbook: Vec::new(),
            generation: 0,
            rng,
            actions,
        };
        population.evaluate_pending();
        population
            .hall_of_fame
            .update(&population.individuals, population.generation);
        Ok(population)
    }

    pub fn individuals(&self) -> &[Individual] {
        &self.individuals
    }

    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn generation(&self) -> usize {
        self.generation
    }

    pub fn config(&self) -> &GpConfig {
        &self.config
    }

    pub fn hall_of_fame(&self) -> &HallOfFame {
        &self.hall_of_fame
    }

    /// One record per completed `evolve()` call
    pub fn logbook(&self) -> &[GenerationStats] {
        &self.logbook
    }

    /// The logbook as pretty-printed JSON
    pub fn logbook_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.logbook)?)
    }

    pub fn save_logbook<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.logbook_json()?)?;
        Ok(())
    }

    /// Best individual of the current generation
    pub fn best(&self) -> Option<&Individual> {
        self.individuals
            .iter()
            .min_by(|a, b| primary_fitness(a).total_cmp(&primary_fitness(b)))
    }

    /// Fitness-proportionate selection of `k` individuals, with replacement
    pub fn select(&mut self, k: usize) -> Vec<&Individual> {
        self.select_indices(k)
            .into_iter()
            .map(|idx| &self.individuals[idx])
            .collect()
    }

    pub fn select_indices(&mut self, k: usize) -> Vec<usize> {
        let fitnesses = self.primary_fitnesses();
        roulette_selection(&fitnesses, k, &mut self.rng)
    }

    /// Breed the next generation.
    ///
    /// Records statistics, copies the best `clone_best` individuals
    /// unchanged, fills the remaining slots by mating, mutating or cloning
    /// selected parents, replaces the population, evaluates every individual
    /// whose fitness was reset and offers the new generation to the hall of
    /// fame.
    pub fn evolve(&mut self) -> &GenerationStats {
        // selection needs a fitness on every individual
        self.evaluate_pending();

        let fitnesses = self.primary_fitnesses();
        let summary = FitnessSummary::from_values(&fitnesses).unwrap_or(FitnessSummary {
            avg: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
        });

        let size = self.individuals.len();
        let mut order: Vec<usize> = (0..size).collect();
        order.sort_by(|&a, &b| fitnesses[a].total_cmp(&fitnesses[b]));

        let elite = self.config.evolution.clone_best.min(size);
        let mut offspring: Vec<Individual> = order[..elite]
            .iter()
            .map(|&idx| self.individuals[idx].clone())
            .collect();

        let wheel = RouletteWheel::new(&fitnesses);
        let mut mate_fallbacks = 0;
        let mut failed_mutations = 0;

        while offspring.len() < size {
            let child = match ACTIONS[self.actions.sample(&mut self.rng)] {
                Action::Mate => match self.try_mate(&wheel) {
                    Some(child) => child,
                    None => {
                        mate_fallbacks += 1;
                        debug!(
                            "No mate after {} attempts, cloning instead",
                            self.config.evolution.max_mate_attempts
                        );
                        self.individuals[wheel.spin(&mut self.rng)].clone()
                    }
                },
                Action::Mutate => {
                    let mut child = self.individuals[wheel.spin(&mut self.rng)].clone();
                    if let Err(e) = child.mutate(&self.config.growth, &mut self.rng) {
                        failed_mutations += 1;
                        debug!("Keeping unmutated copy: {}", e);
                    }
                    child
                }
                Action::Clone => self.individuals[wheel.spin(&mut self.rng)].clone(),
            };
            offspring.push(child);
        }

        self.individuals = offspring;
        let generation = self.generation;
        self.generation += 1;
        let evaluations = self.evaluate_pending();
        self.hall_of_fame.update(&self.individuals, self.generation);

        debug!(
            "Generation {} bred: {} evaluations, {} mate fallbacks, {} failed mutations",
            generation, evaluations, mate_fallbacks, failed_mutations
        );
        self.logbook.push(GenerationStats {
            generation,
            fitness: summary,
            evaluations,
            mate_fallbacks,
            failed_mutations,
        });
        &self.logbook[self.logbook.len() - 1]
    }

    /// Clone a selected receiver and graft material from a distinct
    /// contributor, trying fresh parents up to `max_mate_attempts` times
    fn try_mate(&mut self, wheel: &RouletteWheel) -> Option<Individual> {
        for _ in 0..self.config.evolution.max_mate_attempts {
            let (receiver, contributor) = wheel.select_pair(&mut self.rng);
            let mut child = self.individuals[receiver].clone();
            if child
                .mate(&self.individuals[contributor], &mut self.rng)
                .is_ok()
            {
                return Some(child);
            }
        }
        None
    }

    /// Evaluate every individual without a fitness; returns how many were evaluated
    fn evaluate_pending(&mut self) -> usize {
        let evaluator = &self.evaluator;
        if self.config.evolution.parallel_evaluation {
            self.individuals
                .par_iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .map(|ind| {
                    let fitness = evaluator.evaluate(ind);
                    ind.set_fitness(fitness);
                    1
                })
                .sum()
        } else {
            self.individuals
                .iter_mut()
                .filter(|ind| !ind.is_evaluated())
                .map(|ind| {
                    let fitness = evaluator.evaluate(ind);
                    ind.set_fitness(fitness);
                    1
                })
                .sum()
        }
    }

    fn primary_fitnesses(&self) -> Vec<f64> {
        self.individuals.iter().map(primary_fitness).collect()
    }
}

fn primary_fitness(individual: &Individual) -> f64 {
    individual.fitness().map_or(f64::INFINITY, Fitness::primary)
}
