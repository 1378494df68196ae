//! A point-in-time evolution report (spec §4.8, SPEC_FULL.md §11).
//!
//! Grounded on `original_source/src/kernel/evolution_summary.h` and
//! `search_stats.h`: a snapshot of the best individual found, run-ending
//! classification, and the counters an `after_generation` callback or a
//! final report would want. `elapsed` uses `chrono::Duration` for the same
//! reason the teacher keeps `chrono` in its dependency stack: wall-clock
//! durations read better through it than through raw millisecond integers.

use crate::individual::{Individual, ScoredIndividual};
use crate::status::EvolutionStatus;
use chrono::Duration;

/// Why a [`Summary`] stopped being updated (spec §4.9 "stop conditions").
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// `generations` was reached without triggering any other condition.
    GenerationLimit,
    /// The configured fitness `threshold` was met or exceeded.
    ThresholdReached,
    /// `max_stuck_gen` elapsed since the last improvement.
    Stuck,
    /// An external stop signal (spec §4.9 "stop_source") was observed.
    StoppedExternally,
    /// A worker hit an invariant violation (spec §7): the run was
    /// aborted rather than allowed to keep evolving on corrupted state.
    FailedInvariant,
    /// The user-supplied evaluator returned an error (spec §7).
    FailedEvaluator,
}

/// A snapshot of one evolution run's state, independent of the
/// [`EvolutionStatus`] it was built from so it can be cloned, logged, or
/// serialized without holding the run's locks.
#[derive(Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Summary<I: Individual> {
    pub best: Option<ScoredIndividual<I>>,
    pub generation: u32,
    pub last_improvement: u32,
    pub crossovers: u64,
    pub mutations: u64,
    pub elapsed_ms: u64,
    pub layers: usize,
    pub status: RunStatus,
}

impl<I: Individual> Summary<I> {
    pub fn from_status(
        status: &EvolutionStatus<I>,
        generation: u32,
        layers: usize,
        elapsed_ms: u64,
        run_status: RunStatus,
    ) -> Self {
        Summary {
            best: status.best(),
            generation,
            last_improvement: status.last_improvement(),
            crossovers: status.crossovers(),
            mutations: status.mutations(),
            elapsed_ms,
            layers,
            status: run_status,
        }
    }

    pub fn elapsed(&self) -> Duration {
        Duration::milliseconds(self.elapsed_ms as i64)
    }

    /// Generations since the last improvement — what `max_stuck_gen`
    /// compares against (spec §4.9).
    pub fn stuck_for(&self) -> u32 {
        self.generation.saturating_sub(self.last_improvement)
    }

    /// Short human-readable report lines (SPEC_FULL.md §11 "supplemented
    /// feature"): one line summarizing the run, grounded on
    /// `search_log.h`'s plain-text run report. `mean_fitness`/`variance`
    /// come from the caller's own fitness [`crate::stats::Distribution`]
    /// for this generation, since `Summary` itself does not retain the
    /// raw per-generation samples.
    pub fn to_report_lines(&self, mean_fitness: f32, variance: f32) -> Vec<String> {
        let best = self
            .best
            .as_ref()
            .map(|b| format!("{:?}", b.fitness.as_slice()))
            .unwrap_or_else(|| "none".to_string());

        vec![format!(
            "generation={} layers={} best={} mean={:.4} variance={:.4} \
             crossovers={} mutations={} last_improvement={} status={:?}",
            self.generation,
            self.layers,
            best,
            mean_fitness,
            variance,
            self.crossovers,
            self.mutations,
            self.last_improvement,
            self.status
        )]
    }
}
