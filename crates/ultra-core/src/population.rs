//! Component C5: the layered population (spec §4.5).
//!
//! Grounded on `original_source/src/kernel/layered_population.h`: an
//! ordered vector of [`Layer`]s at strictly increasing age-layer index,
//! with structural add/remove and uniform/mate-zone coordinate sampling.

use crate::alps::AgePolicy;
use crate::domain::random_provider;
use crate::individual::{Individual, RandomIndividual};
use crate::layer::Layer;
use std::sync::RwLock;

/// An ordered collection of age-layer [`Layer`]s sharing one [`AgePolicy`].
/// Invariant (spec §3): `max_age[i] < max_age[i+1]` for every `i` except
/// that the last layer's max-age is unbounded — enforced here by deriving
/// every layer's max-age from `policy` and the current layer count rather
/// than letting callers set it directly.
pub struct LayeredPopulation<I: Individual> {
    layers: RwLock<Vec<Layer<I>>>,
    policy: AgePolicy,
    individuals_per_layer: usize,
}

impl<I: Individual> LayeredPopulation<I> {
    /// Constructs `init_layers` sub-populations, each of `individuals`
    /// randomly generated individuals via `I::random(problem)`, assigning
    /// each layer its ALPS-derived max-age (spec §4.5).
    pub fn new_random<P>(problem: &P, init_layers: usize, individuals: usize, policy: AgePolicy) -> Self
    where
        I: RandomIndividual<P>,
    {
        let layers = (0..init_layers.max(1))
            .map(|l| {
                let members = (0..individuals).map(|_| I::random(problem)).collect();
                Layer::with_members(members, individuals, policy.max_age(l, init_layers.max(1)))
            })
            .collect();

        LayeredPopulation {
            layers: RwLock::new(layers),
            policy,
            individuals_per_layer: individuals,
        }
    }

    pub fn policy(&self) -> AgePolicy {
        self.policy
    }

    pub fn individuals_per_layer(&self) -> usize {
        self.individuals_per_layer
    }

    pub fn layers(&self) -> usize {
        self.layers.read().unwrap().len()
    }

    pub fn layer(&self, index: usize) -> Layer<I> {
        self.layers.read().unwrap()[index].clone()
    }

    /// A point-in-time snapshot of every layer handle (cheap: each `Layer`
    /// clone only bumps `Arc` refcounts). Spec §4.5 "range_of_layers".
    pub fn range_of_layers(&self) -> Vec<Layer<I>> {
        self.layers.read().unwrap().clone()
    }

    pub fn size(&self) -> usize {
        self.range_of_layers().iter().map(Layer::size).sum()
    }

    /// Appends a fresh empty layer with the appropriate max-age (spec
    /// §4.5) and recomputes every existing layer's max-age, since the
    /// last-layer-is-unbounded rule depends on the total layer count.
    pub fn add_layer(&self) {
        let mut layers = self.layers.write().unwrap();
        layers.push(Layer::new(self.individuals_per_layer, 0));
        Self::recompute_max_ages(&mut layers, self.policy);
    }

    /// Removes the layer at `index`, preserving the relative order of the
    /// remaining layers, and recomputes max-ages (spec §4.5).
    pub fn erase(&self, index: usize) {
        let mut layers = self.layers.write().unwrap();
        layers.remove(index);
        Self::recompute_max_ages(&mut layers, self.policy);
    }

    fn recompute_max_ages(layers: &mut [Layer<I>], policy: AgePolicy) {
        let total = layers.len();
        for (l, layer) in layers.iter_mut().enumerate() {
            layer.set_max_age(policy.max_age(l, total));
        }
    }

    /// Calls `inc_age()` on every layer (spec §4.5).
    pub fn inc_age(&self) {
        for layer in self.range_of_layers() {
            layer.inc_age();
        }
    }

    /// Discards layer `index`'s contents and refills it with `count` fresh
    /// random individuals at age 0 (spec §4.9 "reseed").
    pub fn reseed<P>(&self, index: usize, problem: &P, count: usize)
    where
        I: RandomIndividual<P>,
    {
        let layer = self.layer(index);
        let members = (0..count).map(|_| I::random(problem)).collect();
        layer.reseed(members);
    }

    /// A uniformly random `(layer, index)` coordinate over every
    /// individual in the population. Returns `None` if the population is
    /// empty.
    pub fn random_coord(&self) -> Option<(usize, usize)> {
        let layers = self.range_of_layers();
        let sizes: Vec<usize> = layers.iter().map(Layer::size).collect();
        let total: usize = sizes.iter().sum();
        if total == 0 {
            return None;
        }

        let mut pick = random_provider::range(0..total);
        for (l, &size) in sizes.iter().enumerate() {
            if pick < size {
                return Some((l, pick));
            }
            pick -= size;
        }
        None
    }

    /// One human-readable line per layer (SPEC_FULL.md §11 "supplemented
    /// feature"): index, member count, max-age bound, and mean member age.
    /// Companion to [`crate::summary::Summary::to_report_lines`], which
    /// reports the run as a whole; this reports the age-layer structure
    /// `Summary` does not retain.
    pub fn layer_report_rows(&self) -> Vec<String> {
        self.range_of_layers()
            .iter()
            .enumerate()
            .map(|(index, layer)| {
                let members = layer.snapshot();
                let mean_age = if members.is_empty() {
                    0.0
                } else {
                    members.iter().map(|m| m.age() as f64).sum::<f64>() / members.len() as f64
                };
                let max_age = layer.max_age();
                let max_age = if max_age == u32::MAX {
                    "unbounded".to_string()
                } else {
                    max_age.to_string()
                };
                format!(
                    "layer={} size={} max_age={} mean_age={:.2}",
                    index,
                    members.len(),
                    max_age,
                    mean_age
                )
            })
            .collect()
    }

    /// A coordinate within a "mate zone" ring of radius `m` around `center`
    /// in layer `layer_index` (spec §4.5). The ring wraps around the
    /// layer's current size so a zone near either end stays well-defined.
    pub fn random_in_mate_zone(&self, layer_index: usize, center: usize, mate_zone: usize) -> Option<usize> {
        let layer = self.layer(layer_index);
        let size = layer.size();
        if size == 0 {
            return None;
        }
        if mate_zone == 0 || mate_zone * 2 + 1 >= size {
            return Some(random_provider::range(0..size));
        }

        let offset = random_provider::range(0..(2 * mate_zone + 1)) as isize - mate_zone as isize;
        let idx = (center as isize + offset).rem_euclid(size as isize) as usize;
        Some(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::individual::testing::{IntGenome, IntGenomeProblem};

    fn problem() -> IntGenomeProblem {
        IntGenomeProblem {
            len: 4,
            lo: 0,
            hi: 10,
        }
    }

    #[test]
    fn construction_assigns_increasing_max_ages() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 4, 10, AgePolicy::default());
        assert_eq!(pop.layers(), 4);
        let ages: Vec<u32> = pop.range_of_layers().iter().map(Layer::max_age).collect();
        for w in ages.windows(2) {
            assert!(w[0] < w[1]);
        }
        assert_eq!(*ages.last().unwrap(), u32::MAX);
    }

    #[test]
    fn single_layer_has_no_age_limit() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 1, 10, AgePolicy::default());
        assert_eq!(pop.layer(0).max_age(), u32::MAX);
    }

    #[test]
    fn add_layer_preserves_unbounded_top_invariant() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 2, 5, AgePolicy::default());
        let old_top = pop.layer(1).max_age();
        pop.add_layer();
        assert_eq!(pop.layers(), 3);
        assert!(pop.layer(1).max_age() < old_top || pop.layer(1).max_age() == old_top);
        assert_eq!(pop.layer(2).max_age(), u32::MAX);
        assert_ne!(pop.layer(1).max_age(), u32::MAX);
    }

    #[test]
    fn erase_preserves_order_of_remaining_layers() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 3, 5, AgePolicy::default());
        pop.layer(0).push_back(IntGenome::new(vec![99, 99, 99, 99]));
        pop.erase(1);
        assert_eq!(pop.layers(), 2);
        assert_eq!(pop.layer(0).size(), 6);
    }

    #[test]
    fn inc_age_touches_every_layer() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 2, 3, AgePolicy::default());
        pop.inc_age();
        for layer in pop.range_of_layers() {
            for ind in layer.snapshot() {
                assert_eq!(ind.age, 1);
            }
        }
    }

    #[test]
    fn random_coord_is_none_when_empty() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 1, 0, AgePolicy::default());
        assert!(pop.random_coord().is_none());
    }

    #[test]
    fn layer_report_rows_count_matches_layer_count() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 3, 5, AgePolicy::default());
        let rows = pop.layer_report_rows();
        assert_eq!(rows.len(), 3);
        assert!(rows[0].contains("layer=0"));
        assert!(rows[2].contains("max_age=unbounded"));
    }

    #[test]
    fn mate_zone_stays_within_small_layer() {
        let pop: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 1, 5, AgePolicy::default());
        for _ in 0..50 {
            let idx = pop.random_in_mate_zone(0, 2, 1).unwrap();
            assert!(idx < 5);
        }
    }
}
