//! Plain (non-ALPS) tournament selection (spec §4.7 "Selection (tournament,
//! ALPS-aware)"), operating on a single [`Layer`].
//!
//! Grounded on `radiate-selectors/src/tournament.rs`'s thin-struct shape
//! (`TournamentSelector { num }`), but re-pointed at the spec's actual
//! contract: the teacher's version samples indices and trusts that the
//! population is already kept sorted by fitness, picking the smallest
//! sampled index as the winner. `Layer` carries no such invariant (its
//! members are reordered by replacement), so winners here are determined by
//! evaluating every sampled member through the evaluator (benefiting from
//! its cache) and comparing fitness directly, with the deterministic
//! tie-break spec §4.7 names: higher fitness, then younger age, then
//! lexicographic genotype order.

use std::cmp::Ordering;
use ultra_core::individual::{Individual, ScoredIndividual};
use ultra_core::{Evaluator, Layer};
use ultra_core::domain::random_provider;
use ultra_error::{Result, ensure};

/// Samples a tournament of `tournament_size` members per parent requested
/// and returns the winners, sorted by descending fitness.
#[derive(Clone, Copy, Debug)]
pub struct TournamentSelector {
    pub tournament_size: usize,
}

impl TournamentSelector {
    pub fn new(tournament_size: usize) -> Self {
        TournamentSelector { tournament_size }
    }

    /// Runs `num_parents` independent tournaments within `layer`, each of
    /// size `tournament_size` (clamped to the layer's size), and returns the
    /// winners sorted by descending fitness (spec §4.7).
    pub fn select<I, E>(&self, layer: &Layer<I>, num_parents: usize, evaluator: &E) -> Result<Vec<ScoredIndividual<I>>>
    where
        I: Individual,
        E: Evaluator<I>,
    {
        let size = layer.size();
        ensure!(size > 0, InvariantViolation: "cannot select from an empty layer");

        let t = self.tournament_size.clamp(1, size);
        let mut winners = Vec::with_capacity(num_parents);

        for _ in 0..num_parents {
            let indices = random_provider::sample_indices(0..size, t);
            let mut drawn = Vec::with_capacity(indices.len());
            for idx in indices {
                let individual = layer.get(idx);
                let fitness = evaluator.evaluate(&individual)?;
                drawn.push(ScoredIndividual::new(individual, fitness));
            }
            drawn.sort_by(tournament_cmp);
            winners.push(drawn.into_iter().next().expect("tournament draw is non-empty"));
        }

        winners.sort_by(tournament_cmp);
        Ok(winners)
    }
}

/// Descending fitness, then younger age, then lexicographic genotype order
/// (spec §4.7's deterministic tie-break).
pub fn tournament_cmp<I: Individual>(a: &ScoredIndividual<I>, b: &ScoredIndividual<I>) -> Ordering {
    b.fitness
        .partial_cmp(&a.fitness)
        .unwrap_or(Ordering::Equal)
        .then_with(|| a.individual.age().cmp(&b.individual.age()))
        .then_with(|| a.individual.genotype_cmp(&b.individual))
}
