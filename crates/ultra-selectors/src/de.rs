//! Differential-evolution selection (spec §4.7 "DE selection"): returns
//! four distinct individuals `(target, a, b, c)` sampled from a layer's
//! mate-zone neighborhood, consumed by `ultra-alters`' DE recombination.
//!
//! Grounded on `original_source/src/kernel/evolution_selection.h`'s DE
//! variant and `LayeredPopulation::random_in_mate_zone` (spec §4.5).

use ultra_core::individual::Individual;
use ultra_core::{LayeredPopulation, Layer};
use ultra_error::{Result, ensure};

#[derive(Clone, Copy, Debug)]
pub struct DeSelection {
    pub mate_zone: usize,
}

impl DeSelection {
    pub fn new(mate_zone: usize) -> Self {
        DeSelection { mate_zone }
    }

    /// Picks `target` at `target_index` in `layer_index` plus three
    /// further distinct members `a`, `b`, `c` drawn from the mate-zone
    /// neighborhood around it, none equal to `target_index` or each other.
    pub fn select<I: Individual>(
        &self,
        population: &LayeredPopulation<I>,
        layer_index: usize,
        target_index: usize,
    ) -> Result<(I, I, I, I)> {
        let layer: Layer<I> = population.layer(layer_index);
        let size = layer.size();
        ensure!(size >= 4, InvariantViolation: "DE selection needs >= 4 individuals, layer has {}", size);

        let mut picked = vec![target_index];
        let max_attempts = size.saturating_mul(8).max(32);
        for _ in 0..max_attempts {
            if picked.len() == 4 {
                break;
            }
            if let Some(candidate) = population.random_in_mate_zone(layer_index, target_index, self.mate_zone) {
                if !picked.contains(&candidate) {
                    picked.push(candidate);
                }
            }
        }

        // Mate-zone sampling can stall in small, tightly-wrapped layers;
        // fall back to a plain uniform draw over the whole layer to
        // guarantee three distinct companions exist (size >= 4 above).
        while picked.len() < 4 {
            let candidate = ultra_core::domain::random_provider::range(0..size);
            if !picked.contains(&candidate) {
                picked.push(candidate);
            }
        }

        let target = layer.get(picked[0]);
        let a = layer.get(picked[1]);
        let b = layer.get(picked[2]);
        let c = layer.get(picked[3]);
        Ok((target, a, b, c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultra_core::individual::testing::{RealVector, RealVectorProblem};
    use ultra_core::AgePolicy;

    fn problem() -> RealVectorProblem {
        RealVectorProblem { len: 3, lo: -1.0, hi: 1.0 }
    }

    #[test]
    fn returns_four_distinct_individuals() {
        let population: LayeredPopulation<RealVector> =
            LayeredPopulation::new_random(&problem(), 1, 10, AgePolicy::default());
        let selector = DeSelection::new(20);

        let (target, a, b, c) = selector.select(&population, 0, 2).unwrap();
        let target_snapshot = population.layer(0).get(2);
        assert_eq!(target.values, target_snapshot.values);

        let vectors = [&a, &b, &c];
        for (i, v1) in vectors.iter().enumerate() {
            for v2 in vectors.iter().skip(i + 1) {
                assert_ne!(v1.values, v2.values);
            }
        }
    }

    #[test]
    fn rejects_layers_smaller_than_four() {
        let population: LayeredPopulation<RealVector> =
            LayeredPopulation::new_random(&problem(), 1, 3, AgePolicy::default());
        let selector = DeSelection::new(20);
        assert!(selector.select(&population, 0, 0).is_err());
    }
}
