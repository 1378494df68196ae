//! Per-layer evolution strategies: the select → recombine → replace
//! iteration a worker repeats `individuals_per_layer` times per generation
//! (spec §4.9 step 2).
//!
//! Grounded on `radiate-engines/src/steps/recombine.rs`'s strategy-as-struct
//! shape, generalized over the operator set spec §4.7 names: a GA/GP base
//! strategy (tournament selection, base recombination, ALPS replacement) and
//! a DE strategy (DE selection, DE recombination, ALPS replacement). Spec
//! §4.9's "Operator strategies... function objects / trait implementations
//! keyed by a strategy enum" is realized here as a trait the driver is
//! generic over, rather than an enum dispatch, since the driver already
//! knows its strategy type at construction.

use ultra_alters::de::{DeRecombination, RealValued};
use ultra_alters::ga::BaseRecombination;
use ultra_core::domain::random_provider;
use ultra_core::individual::{Individual, Mutate, Recombine};
use ultra_core::replacement::{AlpsReplacement, ReplacementOutcome};
use ultra_core::{Evaluator, EvolutionStatus, LayeredPopulation};
use ultra_error::Result;
use ultra_selectors::alps::AlpsTournamentSelector;
use ultra_selectors::de::DeSelection;

/// One select/recombine/replace iteration against layer `layer_index` of
/// `population`. Implementations must not block on any layer other than
/// the ones their selection/replacement operators already lock (spec §5).
pub trait EvolutionStrategy<I, P, E>: Send + Sync
where
    I: Individual,
    E: Evaluator<I>,
{
    fn iterate(
        &self,
        population: &LayeredPopulation<I>,
        layer_index: usize,
        problem: &P,
        evaluator: &E,
        status: &EvolutionStatus<I>,
    ) -> Result<ReplacementOutcome>;
}

/// The base GA/GP strategy (spec §4.7): ALPS-aware tournament selection of
/// two parents, base crossover+mutation, ALPS-aware kill-tournament
/// replacement.
pub struct AlpsGaStrategy {
    pub selection: AlpsTournamentSelector,
    pub recombination: BaseRecombination,
    pub replacement: AlpsReplacement,
}

impl AlpsGaStrategy {
    pub fn new(tournament_size: usize, p_cross: f32, p_mutation: f32, elitism: f32) -> Self {
        AlpsGaStrategy {
            selection: AlpsTournamentSelector::new(tournament_size),
            recombination: BaseRecombination::new(p_cross, p_mutation),
            replacement: AlpsReplacement::new(tournament_size, elitism),
        }
    }
}

impl<I, P, E> EvolutionStrategy<I, P, E> for AlpsGaStrategy
where
    I: Individual + Recombine + Mutate<P>,
    E: Evaluator<I>,
{
    fn iterate(
        &self,
        population: &LayeredPopulation<I>,
        layer_index: usize,
        problem: &P,
        evaluator: &E,
        status: &EvolutionStatus<I>,
    ) -> Result<ReplacementOutcome> {
        let parents = self.selection.select(population, layer_index, 2, evaluator)?;
        let offspring = self.recombination.recombine(
            &(parents[0].individual.clone(), parents[1].individual.clone()),
            problem,
            status,
        );
        let fitness = evaluator.evaluate(&offspring)?;
        self.replacement
            .replace(population, layer_index, offspring, fitness, evaluator, status)
    }
}

/// The differential-evolution strategy (spec §4.7): a random target
/// individual within the layer, three companions from its mate-zone, DE
/// recombination, ALPS-aware kill-tournament replacement.
pub struct AlpsDeStrategy {
    pub selection: DeSelection,
    pub recombination: DeRecombination,
    pub replacement: AlpsReplacement,
}

impl AlpsDeStrategy {
    pub fn new(mate_zone: usize, f_lo: f64, f_hi: f64, p_cross: f32, tournament_size: usize, elitism: f32) -> Self {
        AlpsDeStrategy {
            selection: DeSelection::new(mate_zone),
            recombination: DeRecombination::new(f_lo, f_hi, p_cross),
            replacement: AlpsReplacement::new(tournament_size, elitism),
        }
    }
}

impl<I, P, E> EvolutionStrategy<I, P, E> for AlpsDeStrategy
where
    I: RealValued,
    P: Sync,
    E: Evaluator<I>,
{
    fn iterate(
        &self,
        population: &LayeredPopulation<I>,
        layer_index: usize,
        _problem: &P,
        evaluator: &E,
        status: &EvolutionStatus<I>,
    ) -> Result<ReplacementOutcome> {
        let layer = population.layer(layer_index);
        let size = layer.size();
        ultra_error::ensure!(
            size > 0,
            InvariantViolation: "DE iteration on empty layer {}",
            layer_index
        );
        let target_index = random_provider::range(0..size);

        let (target, a, b, c) = self.selection.select(population, layer_index, target_index)?;
        let offspring = self.recombination.recombine(&target, &a, &b, &c);
        let fitness = evaluator.evaluate(&offspring)?;
        let outcome = self
            .replacement
            .replace(population, layer_index, offspring, fitness, evaluator, status)?;
        status.record_crossover();
        Ok(outcome)
    }
}
