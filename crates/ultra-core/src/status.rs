//! Component C8: the concurrency-safe evolution status (spec §4.8).
//!
//! Grounded on `original_source/src/kernel/evolution_status.h`; the
//! atomics pattern (lock-free counters alongside a lock-guarded "best")
//! follows `radiate-core/src/domain/sync/group.rs`'s `AtomicUsize` usage.
//!
//! Spec §4.8 describes `generation_` as a non-owning raw pointer into the
//! driver's generation counter. Rust has no sound non-owning pointer that
//! survives across the worker threads this status is shared with, so this
//! holds an `Arc<AtomicU32>` instead: `EvolutionStatus` still does not
//! *own* the generation counter's lifecycle (the driver decides when it
//! advances), it merely shares a reference-counted handle to it, which is
//! the closest safe Rust analogue to "observes the driver's counter
//! without owning it" (spec §9 "Cyclic references").

use crate::individual::{Individual, ScoredIndividual};
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

struct StatusInner<I: Individual> {
    best: Option<ScoredIndividual<I>>,
    last_improvement: u32,
}

/// Shared state among per-layer workers of a single evolution run: best
/// scored individual observed, generation of last improvement, and
/// lock-free crossover/mutation counters.
pub struct EvolutionStatus<I: Individual> {
    inner: RwLock<StatusInner<I>>,
    generation: Arc<AtomicU32>,
    crossovers: AtomicU64,
    mutations: AtomicU64,
}

impl<I: Individual> EvolutionStatus<I> {
    /// `generation` is the driver's shared generation counter; status
    /// reads it (never writes it) to timestamp improvements.
    pub fn new(generation: Arc<AtomicU32>) -> Self {
        EvolutionStatus {
            inner: RwLock::new(StatusInner {
                best: None,
                last_improvement: 0,
            }),
            generation,
            crossovers: AtomicU64::new(0),
            mutations: AtomicU64::new(0),
        }
    }

    /// The best scored individual observed so far. `None` is the "no
    /// fitness yet" state — equivalent to spec §3's `Fitness::lowest()`
    /// sentinel, since any real evaluation is an improvement over it.
    pub fn best(&self) -> Option<ScoredIndividual<I>> {
        self.inner.read().unwrap().best.clone()
    }

    pub fn last_improvement(&self) -> u32 {
        self.inner.read().unwrap().last_improvement
    }

    /// Compares `candidate` against the current best under an exclusive
    /// lock; if strictly better, stores it and records the current
    /// generation as the last improvement. Returns whether it updated.
    pub fn update_if_better(&self, candidate: ScoredIndividual<I>) -> bool {
        let mut inner = self.inner.write().unwrap();
        let better = match &inner.best {
            None => true,
            Some(best) => candidate.fitness > best.fitness,
        };
        if better {
            inner.last_improvement = self.generation.load(Ordering::Acquire);
            inner.best = Some(candidate);
        }
        better
    }

    pub fn record_crossover(&self) {
        self.crossovers.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_mutation(&self) {
        self.mutations.fetch_add(1, Ordering::Relaxed);
    }

    pub fn crossovers(&self) -> u64 {
        self.crossovers.load(Ordering::Relaxed)
    }

    pub fn mutations(&self) -> u64 {
        self.mutations.load(Ordering::Relaxed)
    }

    /// The shared generation counter this status reads from. Re-bind on
    /// load by constructing a new `EvolutionStatus` over the freshly
    /// loaded driver's counter (spec §4.8 "generation pointer re-bound on
    /// load").
    pub fn generation_counter(&self) -> Arc<AtomicU32> {
        Arc::clone(&self.generation)
    }
}

impl<I: Individual> Clone for StatusInner<I> {
    fn clone(&self) -> Self {
        StatusInner {
            best: self.best.clone(),
            last_improvement: self.last_improvement,
        }
    }
}
