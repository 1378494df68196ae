//! Component C10: the multi-run search orchestrator (spec §4.10).
//!
//! Grounded on `radiate-engines/src/engines/standard.rs`'s `GeneticEngine`
//! (the single-run counterpart this orchestrates repeatedly) composed with
//! `original_source/.../kernel/search.h`/`search_stats.h`'s aggregation
//! shape: best-across-runs, a fitness distribution over runs' bests, and
//! "good run" threshold accounting.

use std::sync::atomic::AtomicBool;
use std::time::Instant;

use tracing::info;

use ultra_core::individual::{Individual, RandomIndividual, ScoredIndividual};
use ultra_core::stats::Distribution;
use ultra_core::{Evaluator, Fitness, Summary};

use crate::driver::EvolutionDriver;
use crate::strategy::EvolutionStrategy;

/// Aggregation across `n` independent runs (spec §4.10 "Aggregation"):
/// best across runs, the distribution of each run's best fitness, the set
/// of "good run" indices, the best run's index, run count, and total
/// elapsed wall time.
#[derive(Clone)]
pub struct SearchStatistics<I: Individual> {
    pub best: Option<ScoredIndividual<I>>,
    pub fitness_distribution: Distribution,
    pub good_runs: Vec<usize>,
    pub best_run: Option<usize>,
    pub run_count: usize,
    pub total_elapsed_ms: u64,
    pub skipped_runs: usize,
}

impl<I: Individual> SearchStatistics<I> {
    fn aggregate(summaries: &[Summary<I>], threshold: Option<&Fitness>, total_elapsed_ms: u64) -> Self {
        let mut fitness_distribution = Distribution::default();
        let mut best: Option<ScoredIndividual<I>> = None;
        let mut best_run = None;
        let mut good_runs = Vec::new();
        let mut skipped_runs = 0;

        for (i, summary) in summaries.iter().enumerate() {
            let Some(candidate) = &summary.best else {
                skipped_runs += 1;
                continue;
            };

            fitness_distribution.push(candidate.fitness.as_scalar());

            if best.as_ref().is_none_or(|b| candidate.fitness > b.fitness) {
                best = Some(candidate.clone());
                best_run = Some(i);
            }

            if let Some(threshold) = threshold {
                if candidate.fitness >= *threshold {
                    good_runs.push(i);
                }
            }
        }

        SearchStatistics {
            best,
            fitness_distribution,
            good_runs,
            best_run,
            run_count: summaries.len(),
            total_elapsed_ms,
            skipped_runs,
        }
    }
}

/// Repeats an evolution run `n` times, each from a freshly constructed
/// driver, and aggregates the resulting summaries (spec §4.10 "`run(n) ->
/// SearchStatistics`: for i in 0..n, construct a fresh Evolution Driver
/// over a fresh layered population and fresh status, call run(), push
/// summary into aggregate").
pub struct Search<F> {
    factory: F,
    threshold: Option<Fitness>,
}

impl<F> Search<F> {
    /// `factory` constructs one fresh [`EvolutionDriver`] per run — a new
    /// layered population, evaluator, and status every call, so runs are
    /// statistically independent (spec §4.10).
    pub fn new(factory: F) -> Self {
        Search {
            factory,
            threshold: None,
        }
    }

    /// Sets the "good run" fitness threshold used for aggregation
    /// (spec §4.10 "good_runs are indices whose summary beats a user
    /// threshold").
    pub fn with_threshold(mut self, threshold: Fitness) -> Self {
        self.threshold = Some(threshold);
        self
    }
}

impl<I, P, S, E, F> Search<F>
where
    I: Individual + RandomIndividual<P>,
    P: Sync,
    E: Evaluator<I>,
    S: EvolutionStrategy<I, P, E>,
    F: Fn() -> EvolutionDriver<I, P, S, E>,
{
    /// Runs `n` independent evolutions, aggregating their summaries. Each
    /// run observes the same external stop flag, cleared between runs so
    /// one run's cancellation does not skip subsequent runs.
    pub fn run(&self, n: usize) -> SearchStatistics<I> {
        let start = Instant::now();
        let mut summaries = Vec::with_capacity(n);

        for i in 0..n {
            let driver = (self.factory)();
            let stop = AtomicBool::new(false);
            let summary = driver.run(&stop);
            info!(run = i, status = ?summary.status, "search run complete");
            summaries.push(summary);
        }

        let total_elapsed_ms = start.elapsed().as_millis() as u64;
        SearchStatistics::aggregate(&summaries, self.threshold.as_ref(), total_elapsed_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::AlpsGaStrategy;
    use ultra_core::individual::testing::{IntGenome, IntGenomeProblem};
    use ultra_core::{AgePolicy, LayeredPopulation, Parameters};

    fn sum_fitness(ind: &IntGenome) -> ultra_error::Result<Fitness> {
        Ok(Fitness::scalar(ind.genes.iter().sum::<i32>() as f32))
    }

    #[test]
    fn aggregates_best_across_runs() {
        let problem = IntGenomeProblem { len: 3, lo: 0, hi: 5 };
        let parameters = Parameters::default()
            .with_individuals(8)
            .with_generations(2)
            .with_tournament_size(2);

        let search = Search::new(|| {
            let population: LayeredPopulation<IntGenome> =
                LayeredPopulation::new_random(&problem, 1, 8, AgePolicy::default());
            let strategy = AlpsGaStrategy::new(2, 0.9, 0.1, 1.0);
            EvolutionDriver::new(population, problem, sum_fitness, strategy, parameters.clone())
        });

        let stats = search.run(3);
        assert_eq!(stats.run_count, 3);
        assert!(stats.best.is_some());
        assert_eq!(stats.skipped_runs, 0);
    }
}
