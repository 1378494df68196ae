//! Component C3: a memoizing wrapper around a user fitness function.
//!
//! Grounded on `original_source/src/kernel/evaluator_proxy.h`; trait shape
//! (a `Send + Sync` callable plus a batch entry point) follows
//! `radiate-core/src/problem.rs`'s `Problem` trait.

use crate::cache::FitnessCache;
use crate::fingerprint::Fingerprint;
use crate::fitness::Fitness;
use crate::individual::Individual;
use std::marker::PhantomData;
use ultra_error::Result;

/// A callable `Individual -> Fitness` with no observable side effects
/// relevant to correctness; the cache assumes referential transparency
/// (spec §6).
pub trait Evaluator<I: Individual>: Send + Sync {
    fn evaluate(&self, individual: &I) -> Result<Fitness>;

    /// An optional cheap/approximate path. Never consulted by the cache.
    fn fast(&self, _individual: &I) -> Option<Fitness> {
        None
    }
}

impl<I, F> Evaluator<I> for F
where
    I: Individual,
    F: Fn(&I) -> Result<Fitness> + Send + Sync,
{
    fn evaluate(&self, individual: &I) -> Result<Fitness> {
        self(individual)
    }
}

/// Memoizing wrapper around an `Evaluator`: consults the cache before
/// invoking the wrapped evaluator, and inserts the result on a miss (spec
/// §4.3).
pub struct EvaluatorProxy<I: Individual, E: Evaluator<I>> {
    evaluator: E,
    cache: FitnessCache,
    _marker: PhantomData<I>,
}

impl<I: Individual, E: Evaluator<I>> EvaluatorProxy<I, E> {
    pub fn new(evaluator: E, cache_bits: u32) -> Self {
        EvaluatorProxy {
            evaluator,
            cache: FitnessCache::new(cache_bits),
            _marker: PhantomData,
        }
    }

    pub fn evaluate(&self, individual: &I) -> Result<Fitness> {
        let fp = individual.fingerprint();
        if !fp.is_empty() {
            if let Some(cached) = self.cache.find(fp) {
                return Ok(cached);
            }
        }

        let fitness = self.evaluator.evaluate(individual)?;
        if !fp.is_empty() {
            self.cache.insert(fp, fitness.clone());
        }
        Ok(fitness)
    }

    pub fn fast(&self, individual: &I) -> Option<Fitness> {
        self.evaluator.fast(individual)
    }

    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn clear_one(&self, hash: Fingerprint) {
        self.cache.clear_one(hash);
    }

    pub fn cache(&self) -> &FitnessCache {
        &self.cache
    }
}

/// Lets a proxy stand in anywhere an `Evaluator` is expected — selection,
/// replacement, and the driver all take `E: Evaluator<I>` generically and
/// are handed the proxy, never the raw user evaluator, so the cache is
/// always consulted first (spec §4.3, §4.9).
impl<I: Individual, E: Evaluator<I>> Evaluator<I> for EvaluatorProxy<I, E> {
    fn evaluate(&self, individual: &I) -> Result<Fitness> {
        self.evaluate(individual)
    }

    fn fast(&self, individual: &I) -> Option<Fitness> {
        self.fast(individual)
    }
}
