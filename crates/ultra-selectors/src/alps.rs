//! ALPS-aware tournament selection (spec §4.6, §4.7): wraps
//! [`TournamentSelector`] so each parent draw independently picks its
//! source layer per the age policy's probabilities before running its
//! tournament — layer 0 draws only from itself, layer `l > 0` draws from
//! `{l-1, l}` weighted by `p_main_layer`.
//!
//! Grounded on `original_source/src/kernel/evolution_selection.h`'s
//! per-draw layer split, composed with the plain [`TournamentSelector`]
//! the same way the teacher composes selection policies over a shared
//! primitive.

use crate::tournament::{TournamentSelector, tournament_cmp};
use ultra_core::domain::random_provider;
use ultra_core::individual::{Individual, ScoredIndividual};
use ultra_core::{Evaluator, LayeredPopulation};
use ultra_error::Result;

#[derive(Clone, Copy, Debug)]
pub struct AlpsTournamentSelector {
    pub tournament_size: usize,
}

impl AlpsTournamentSelector {
    pub fn new(tournament_size: usize) -> Self {
        AlpsTournamentSelector { tournament_size }
    }

    /// Draws `num_parents` winners for layer `layer_index`, each from an
    /// independently-chosen source layer (spec §4.6 "selection_layers"),
    /// and returns them sorted by descending fitness (spec §4.7).
    pub fn select<I, E>(
        &self,
        population: &LayeredPopulation<I>,
        layer_index: usize,
        num_parents: usize,
        evaluator: &E,
    ) -> Result<Vec<ScoredIndividual<I>>>
    where
        I: Individual,
        E: Evaluator<I>,
    {
        let weights = population.policy().selection_layers(layer_index);
        let tournament = TournamentSelector::new(self.tournament_size);

        let mut parents = Vec::with_capacity(num_parents);
        for _ in 0..num_parents {
            let source = weighted_layer_choice(&weights);
            let layer = population.layer(source);
            let mut drawn = tournament.select(&layer, 1, evaluator)?;
            parents.push(drawn.pop().expect("select(.., 1, ..) returns exactly one winner"));
        }

        parents.sort_by(tournament_cmp);
        Ok(parents)
    }
}

/// Picks one of `weights` (layer index, probability) pairs at random,
/// weighted by the given probabilities. Falls back to the first entry if
/// the weights are degenerate (all zero / not finite).
pub fn weighted_layer_choice(weights: &[(usize, f32)]) -> usize {
    let total: f32 = weights.iter().map(|(_, p)| p.max(0.0)).sum();
    if !total.is_finite() || total <= 0.0 {
        return weights[0].0;
    }

    let mut pick = random_provider::range(0.0..total);
    for &(layer, p) in weights {
        let p = p.max(0.0);
        if pick < p {
            return layer;
        }
        pick -= p;
    }
    weights.last().unwrap().0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ultra_core::individual::testing::{IntGenome, IntGenomeProblem};
    use ultra_core::{AgePolicy, Fitness};

    fn sum_fitness(ind: &IntGenome) -> Result<Fitness> {
        Ok(Fitness::scalar(ind.genes.iter().sum::<i32>() as f32))
    }

    fn problem() -> IntGenomeProblem {
        IntGenomeProblem { len: 1, lo: 0, hi: 1 }
    }

    #[test]
    fn layer_zero_never_draws_from_above() {
        let policy = AgePolicy::new(20, 0.75);
        let population: LayeredPopulation<IntGenome> =
            LayeredPopulation::new_random(&problem(), 2, 5, policy);

        let selector = AlpsTournamentSelector::new(3);
        for _ in 0..20 {
            let winners = selector.select(&population, 0, 1, &sum_fitness).unwrap();
            assert_eq!(winners.len(), 1);
        }
    }

    #[test]
    fn weighted_choice_always_picks_zero_probability_mass_entry() {
        assert_eq!(weighted_layer_choice(&[(3, 0.0), (7, 1.0)]), 7);
    }

    #[test]
    fn weighted_choice_degenerates_to_first_entry() {
        assert_eq!(weighted_layer_choice(&[(5, 0.0), (6, 0.0)]), 5);
    }
}
