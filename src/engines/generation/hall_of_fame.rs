use super::individual::Individual;
use std::collections::HashSet;

#[derive(Clone, Debug)]
pub struct HallOfFameEntry {
    pub individual: Individual,
    pub fitness: f64,
    pub canonical_string: String, // For deduplication
    pub generation: usize,
}

/// Best distinct individuals seen so far, ascending by primary fitness.
/// Equal fitness keeps insertion order.
pub struct HallOfFame {
    entries: Vec<HallOfFameEntry>,
    max_size: usize,
    seen_signatures: HashSet<String>,
}

impl HallOfFame {
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: Vec::new(),
            max_size,
            seen_signatures: HashSet::new(),
        }
    }

    /// Offer every evaluated individual of a generation
    pub fn update(&mut self, individuals: &[Individual], generation: usize) -> usize {
        individuals
            .iter()
            .filter(|ind| self.try_add(ind, generation))
            .count()
    }

    /// Attempt to add an individual to the Hall of Fame
    pub fn try_add(&mut self, individual: &Individual, generation: usize) -> bool {
        let fitness = match individual.fitness() {
            Some(fitness) => fitness.primary(),
            None => return false,
        };

        if self.max_size == 0 {
            return false;
        }

        // A later arrival has to beat the worst entry outright
        if self.entries.len() >= self.max_size {
            match self.entries.last() {
                Some(worst) if fitness < worst.fitness => {}
                _ => return false,
            }
        }

        let canonical_string = get_canonical_string(individual);
        if self.seen_signatures.contains(&canonical_string) {
            return false; // Duplicate, reject
        }

        let position = self.entries.partition_point(|e| e.fitness <= fitness);
        self.seen_signatures.insert(canonical_string.clone());
        self.entries.insert(
            position,
            HallOfFameEntry {
                individual: individual.clone(),
                fitness,
                canonical_string,
                generation,
            },
        );

        // Trim to max size
        while self.entries.len() > self.max_size {
            if let Some(removed) = self.entries.pop() {
                self.seen_signatures.remove(&removed.canonical_string);
            }
        }

        true
    }

    pub fn best(&self) -> Option<&HallOfFameEntry> {
        self.entries.first()
    }

    /// Get all entries
    pub fn get_all(&self) -> &[HallOfFameEntry] {
        &self.entries
    }

    /// Get top N entries
    pub fn get_top_n(&self, n: usize) -> &[HallOfFameEntry] {
        &self.entries[..n.min(self.entries.len())]
    }

    /// Entries at least as good as `max_fitness`
    pub fn filter_by_threshold(&self, max_fitness: f64) -> Vec<HallOfFameEntry> {
        self.entries
            .iter()
            .filter(|e| e.fitness <= max_fitness)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Generate canonical string for deduplication
pub fn get_canonical_string(individual: &Individual) -> String {
    individual.canonical_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AdfConfig, GrowthConfig};
    use crate::engines::generation::signature::Contract;
    use crate::functions::PrimitiveCatalog;
    use crate::types::{DataType, Fitness, Value};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn individuals(n: usize) -> Vec<Individual> {
        let mut catalog = PrimitiveCatalog::new();
        catalog.with_boolean_primitives().unwrap();
        let contract = Contract::new(vec![DataType::BOOL; 3], DataType::BOOL);
        let growth = GrowthConfig::default();
        let adf = AdfConfig { max_adfs: 1, ..AdfConfig::default() };
        let mut rng = StdRng::seed_from_u64(4);

        let mut out: Vec<Individual> = Vec::new();
        while out.len() < n {
            let ind = Individual::new(&catalog, &contract, &growth, &adf, &mut rng).unwrap();
            if out.iter().all(|o| o.to_string() != ind.to_string()) {
                out.push(ind);
            }
        }
        out
    }

    fn with_fitness(mut ind: Individual, fitness: f64) -> Individual {
        ind.set_fitness(Fitness::single(fitness));
        ind
    }

    #[test]
    fn test_keeps_best_n_ascending() {
        let inds = individuals(5);
        let mut hof = HallOfFame::new(3);
        for (ind, fitness) in inds.into_iter().zip([4.0, 2.0, 9.0, 1.0, 3.0]) {
            hof.try_add(&with_fitness(ind, fitness), 0);
        }
        let fitnesses: Vec<f64> = hof.get_all().iter().map(|e| e.fitness).collect();
        assert_eq!(fitnesses, vec![1.0, 2.0, 3.0]);
        assert_eq!(hof.best().unwrap().fitness, 1.0);
    }

    #[test]
    fn test_ties_keep_insertion_order() {
        let inds = individuals(3);
        let names: Vec<String> = inds.iter().map(get_canonical_string).collect();
        let mut hof = HallOfFame::new(2);
        for ind in inds {
            hof.try_add(&with_fitness(ind, 1.0), 0);
        }
        assert_eq!(hof.len(), 2);
        assert_eq!(hof.get_all()[0].canonical_string, names[0]);
        assert_eq!(hof.get_all()[1].canonical_string, names[1]);
    }

    #[test]
    fn test_rejects_duplicates_and_unevaluated() {
        let ind = individuals(1).remove(0);
        let mut hof = HallOfFame::new(5);
        assert!(!hof.try_add(&ind, 0));

        let evaluated = with_fitness(ind, 2.0);
        assert!(hof.try_add(&evaluated, 0));
        assert!(!hof.try_add(&evaluated, 1));
        assert_eq!(hof.len(), 1);
        assert_eq!(hof.filter_by_threshold(1.0).len(), 0);
        assert_eq!(hof.get_top_n(10).len(), 1);
    }

    /// A lone-ephemeral individual whose constant is always `value`
    fn constant(value: f64, fitness: f64) -> Individual {
        let mut catalog = PrimitiveCatalog::new();
        catalog.add_ephemeral("c", DataType::FLOAT, move |_| Value::Float(value));
        let adf = AdfConfig { max_adfs: 0, ..AdfConfig::default() };
        let mut rng = StdRng::seed_from_u64(0);
        let ind = Individual::new(
            &catalog,
            &Contract::new(vec![], DataType::FLOAT),
            &GrowthConfig::default(),
            &adf,
            &mut rng,
        )
        .unwrap();
        with_fitness(ind, fitness)
    }

    #[test]
    fn test_nearly_equal_constants_are_distinct() {
        let coarse = constant(1e-5, 2.0);
        let fine = constant(2e-5, 1.0);
        // rendered alike, keyed apart
        assert_eq!(coarse.to_string(), fine.to_string());
        assert_ne!(get_canonical_string(&coarse), get_canonical_string(&fine));

        let mut hof = HallOfFame::new(1);
        assert!(hof.try_add(&coarse, 0));
        assert!(hof.try_add(&fine, 1));
        assert_eq!(hof.best().unwrap().fitness, 1.0);
        assert_eq!(hof.len(), 1);
    }
}
