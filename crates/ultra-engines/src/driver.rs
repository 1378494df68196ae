//! Component C9: the evolution driver (spec §4.9).
//!
//! Grounded on `radiate-engines/src/engines/standard.rs`'s generation-loop
//! shape (spawn per-layer workers, join, advance). The teacher joins workers
//! through `domain::thread_pool::WaitGroup` over a shared `ThreadPool`; this
//! driver instead uses `std::thread::scope` (documented in DESIGN.md): the
//! driver borrows its own population/evaluator/strategy/status for the
//! scope's lifetime rather than needing `Arc`-wrapped, `'static` clones for
//! pool submission, which is a better fit for "one worker thread per
//! age-layer within a generation, joined between generations" (spec §5,
//! "no thread pool is required but is permissible").

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Instant;

use tracing::{debug, error, info};

use ultra_core::individual::{Individual, RandomIndividual};
use ultra_core::replacement::AlpsReplacement;
use ultra_core::{Evaluator, EvolutionStatus, LayeredPopulation, Parameters, RunStatus, Summary};
use ultra_error::UltraError;

use crate::strategy::EvolutionStrategy;

/// Holds a layered population, problem context, evaluator, strategy, and
/// status for a single evolution run (spec §4.9: "Holds a layered
/// population, an evaluator proxy, a status, and a summary").
pub struct EvolutionDriver<I, P, S, E>
where
    I: Individual,
    E: Evaluator<I>,
{
    population: LayeredPopulation<I>,
    problem: P,
    evaluator: E,
    strategy: S,
    status: EvolutionStatus<I>,
    generation: Arc<AtomicU32>,
    parameters: Parameters,
}

impl<I, P, S, E> EvolutionDriver<I, P, S, E>
where
    I: Individual + RandomIndividual<P>,
    P: Sync,
    S: EvolutionStrategy<I, P, E>,
    E: Evaluator<I>,
{
    pub fn new(population: LayeredPopulation<I>, problem: P, evaluator: E, strategy: S, parameters: Parameters) -> Self {
        let generation = Arc::new(AtomicU32::new(0));
        let status = EvolutionStatus::new(Arc::clone(&generation));
        EvolutionDriver {
            population,
            problem,
            evaluator,
            strategy,
            status,
            generation,
            parameters,
        }
    }

    pub fn status(&self) -> &EvolutionStatus<I> {
        &self.status
    }

    pub fn population(&self) -> &LayeredPopulation<I> {
        &self.population
    }

    /// Runs the generation loop until one of spec §4.9's stop conditions
    /// fires, returning the final [`Summary`]. `stop` is a cooperative
    /// external cancellation flag (spec §4.9 "stop_source"), checked only
    /// at generation boundaries.
    pub fn run(&self, stop: &AtomicBool) -> Summary<I> {
        let start = Instant::now();
        let mut generation: u32 = 0;

        let run_status = loop {
            self.generation.store(generation, Ordering::Release);

            if self.population.policy().should_reseed(generation) {
                let count = self.population.individuals_per_layer();
                self.population.reseed(0, &self.problem, count);
                debug!(generation, "reseeded layer 0");
            }

            if let Some(failure) = self.run_generation_workers() {
                error!(generation, error = %failure, "worker failed");
                let status = match failure {
                    UltraError::Evaluation { .. } => RunStatus::FailedEvaluator,
                    _ => RunStatus::FailedInvariant,
                };
                break status;
            }

            self.population.inc_age();
            self.move_up_layers(generation);

            let best = self.status.best().map(|b| b.fitness.as_scalar());
            info!(generation, layers = self.population.layers(), ?best, "generation complete");

            if generation >= self.parameters.evolution.generations {
                break RunStatus::GenerationLimit;
            }
            if let Some(max_stuck) = self.parameters.evolution.max_stuck_gen {
                if generation.saturating_sub(self.status.last_improvement()) >= max_stuck {
                    break RunStatus::Stuck;
                }
            }
            if stop.load(Ordering::Acquire) {
                break RunStatus::StoppedExternally;
            }
            if let Some(threshold) = &self.parameters.threshold {
                if let Some(best) = self.status.best() {
                    if best.fitness >= *threshold {
                        break RunStatus::ThresholdReached;
                    }
                }
            }

            generation += 1;
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        Summary::from_status(&self.status, generation, self.population.layers(), elapsed_ms, run_status)
    }

    /// Spawns one worker per layer, each performing `individuals_per_layer`
    /// strategy iterations, and joins them (spec §4.9 steps 2-3). Returns
    /// the first worker error observed, if any; workers that have not yet
    /// reached an error still run to completion (spec §5 "workers within a
    /// generation are not pre-empted").
    fn run_generation_workers(&self) -> Option<UltraError> {
        let layer_count = self.population.layers();
        let iterations = self.population.individuals_per_layer();

        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..layer_count)
                .map(|layer_index| {
                    scope.spawn(move || {
                        for _ in 0..iterations {
                            self.strategy
                                .iterate(&self.population, layer_index, &self.problem, &self.evaluator, &self.status)?;
                        }
                        Ok::<(), UltraError>(())
                    })
                })
                .collect();

            let mut first_error = None;
            for handle in handles {
                let result = handle.join().expect("evolution worker thread panicked");
                if let Err(e) = result {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
            first_error
        })
    }

    /// Migrates aged-out individuals from each layer into the one above it,
    /// top-down (spec §4.9 step 4).
    fn move_up_layers(&self, generation: u32) {
        let replacement = AlpsReplacement::new(self.parameters.evolution.tournament_size, self.parameters.evolution.elitism);
        for to in (1..self.population.layers()).rev() {
            if let Err(e) = replacement.try_move_up_layer(&self.population, to - 1, to, &self.evaluator, &self.status) {
                error!(generation, error = %e, from = to - 1, to, "layer migration failed");
            }
        }
    }
}
