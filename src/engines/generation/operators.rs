use rand::Rng;

/// Fitness-proportionate selection over minimised fitness values.
///
/// Each individual gets the weight `1 / (1 + fitness)`, normalised to a
/// share of 1.0. Shares are kept sorted best-first so a spin usually stops
/// early. NaN and fitness at or below -1 have no finite positive weight
/// and get no share; if no individual has a share the wheel is uniform.
#[derive(Debug, Clone)]
pub struct RouletteWheel {
    /// (population index, normalised share), descending by share
    slots: Vec<(usize, f64)>,
}

impl RouletteWheel {
    pub fn new(fitnesses: &[f64]) -> Self {
        let weights: Vec<f64> = fitnesses
            .iter()
            .map(|&f| if f.is_nan() || f <= -1.0 { 0.0 } else { 1.0 / (1.0 + f) })
            .collect();
        let total: f64 = weights.iter().sum();

        let mut slots: Vec<(usize, f64)> = if total > 0.0 && total.is_finite() {
            weights.iter().map(|w| w / total).enumerate().collect()
        } else {
            let share = 1.0 / fitnesses.len().max(1) as f64;
            (0..fitnesses.len()).map(|i| (i, share)).collect()
        };
        slots.sort_by(|a, b| b.1.total_cmp(&a.1));

        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Normalised share of population index `idx`
    pub fn share(&self, idx: usize) -> f64 {
        self.slots
            .iter()
            .find(|(i, _)| *i == idx)
            .map_or(0.0, |(_, share)| *share)
    }

    /// Draw one population index.
    ///
    /// Panics on an empty wheel.
    pub fn spin<R: Rng>(&self, rng: &mut R) -> usize {
        let target = rng.gen::<f64>();
        let mut accumulator = 0.0;
        for &(idx, share) in &self.slots {
            accumulator += share;
            if target <= accumulator {
                return idx;
            }
        }
        // rounding left the accumulator just short of 1.0
        self.slots[self.slots.len() - 1].0
    }

    /// Draw one index other than `excluded`, with the remaining shares
    /// renormalised. Falls back to `excluded` when it is the only slot.
    pub fn spin_excluding<R: Rng>(&self, excluded: usize, rng: &mut R) -> usize {
        let remaining: f64 = self
            .slots
            .iter()
            .filter(|(idx, _)| *idx != excluded)
            .map(|(_, share)| share)
            .sum();
        let candidates = self.slots.iter().filter(|(idx, _)| *idx != excluded);

        if remaining <= 0.0 {
            return candidates.map(|(idx, _)| *idx).next().unwrap_or(excluded);
        }

        let target = rng.gen::<f64>() * remaining;
        let mut accumulator = 0.0;
        let mut last = excluded;
        for &(idx, share) in candidates {
            accumulator += share;
            last = idx;
            if target <= accumulator {
                return idx;
            }
        }
        last
    }

    /// Draw `k` indices with replacement
    pub fn select<R: Rng>(&self, k: usize, rng: &mut R) -> Vec<usize> {
        (0..k).map(|_| self.spin(rng)).collect()
    }

    /// Draw two distinct indices (receiver, contributor) when the wheel has
    /// more than one slot
    pub fn select_pair<R: Rng>(&self, rng: &mut R) -> (usize, usize) {
        let first = self.spin(rng);
        (first, self.spin_excluding(first, rng))
    }
}

/// Select `k` population indices by fitness-proportionate selection
pub fn roulette_selection<R: Rng>(fitnesses: &[f64], k: usize, rng: &mut R) -> Vec<usize> {
    RouletteWheel::new(fitnesses).select(k, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_shares_follow_inverse_fitness() {
        let wheel = RouletteWheel::new(&[0.0, 1.0, 3.0]);
        assert!((wheel.share(0) - 4.0 / 7.0).abs() < 1e-12);
        assert!((wheel.share(1) - 2.0 / 7.0).abs() < 1e-12);
        assert!((wheel.share(2) - 1.0 / 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_negative_fitness_keeps_inverse_law() {
        // weights 2 and 0.5
        let wheel = RouletteWheel::new(&[-0.5, 1.0]);
        assert!((wheel.share(0) - 0.8).abs() < 1e-12);
        assert!((wheel.share(1) - 0.2).abs() < 1e-12);

        let wheel = RouletteWheel::new(&[-1.0, -3.0, 0.0]);
        assert_eq!(wheel.share(0), 0.0);
        assert_eq!(wheel.share(1), 0.0);
        assert_eq!(wheel.share(2), 1.0);
    }

    #[test]
    fn test_nan_gets_no_share() {
        let wheel = RouletteWheel::new(&[f64::NAN, 1.0]);
        assert_eq!(wheel.share(0), 0.0);
        assert_eq!(wheel.share(1), 1.0);

        let uniform = RouletteWheel::new(&[f64::NAN, f64::NAN]);
        assert_eq!(uniform.share(0), 0.5);
    }

    #[test]
    fn test_pair_is_distinct() {
        let wheel = RouletteWheel::new(&[0.0, 100.0, 100.0]);
        let mut rng = StdRng::seed_from_u64(8);
        for _ in 0..1000 {
            let (a, b) = wheel.select_pair(&mut rng);
            assert_ne!(a, b);
        }
    }

    #[test]
    fn test_single_slot_pair_repeats() {
        let wheel = RouletteWheel::new(&[2.0]);
        let mut rng = StdRng::seed_from_u64(8);
        assert_eq!(wheel.select_pair(&mut rng), (0, 0));
    }

    #[test]
    fn test_selection_with_replacement() {
        let mut rng = StdRng::seed_from_u64(1);
        let picks = roulette_selection(&[0.0, 1000.0], 50, &mut rng);
        assert_eq!(picks.len(), 50);
        assert!(picks.iter().filter(|&&i| i == 0).count() > 40);
    }
}
