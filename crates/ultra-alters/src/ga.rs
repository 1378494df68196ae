//! Base GP/GA recombination (spec §4.7 "Recombination — base GP/GA").
//!
//! Grounded on `radiate-core/src/alter.rs`'s `Crossover`/`Mutate`
//! default-method trait pattern: an operator struct parameterized by
//! probabilities, delegating the actual genotype transformation to the
//! representation through [`ultra_core::individual::Recombine`]/[`Mutate`].

use ultra_core::domain::random_provider;
use ultra_core::individual::{Individual, Mutate, Recombine};
use ultra_core::EvolutionStatus;

/// With probability `p_cross`, produce an offspring by crossing two
/// parents; otherwise copy parent 0 verbatim. Then, with per-gene
/// probability `p_mutation`, mutate the offspring. Age is set to
/// `max(parents.age)` (spec §4.7, and DESIGN.md's resolution of the
/// "offspring age assignment" open question).
#[derive(Clone, Copy, Debug)]
pub struct BaseRecombination {
    pub p_cross: f32,
    pub p_mutation: f32,
}

impl BaseRecombination {
    pub fn new(p_cross: f32, p_mutation: f32) -> Self {
        BaseRecombination { p_cross, p_mutation }
    }

    /// `parents[0]` and `parents[1]` are the two selected parents (already
    /// sorted by descending fitness by the selection operator; this
    /// operator does not care about the order beyond indices 0 and 1).
    pub fn recombine<I, P>(&self, parents: &(I, I), problem: &P, status: &EvolutionStatus<I>) -> I
    where
        I: Individual + Recombine + Mutate<P>,
    {
        let (p0, p1) = parents;

        let mut offspring = if random_provider::bool(self.p_cross) {
            let child = p0.recombine(p1);
            status.record_crossover();
            child
        } else {
            p0.clone()
        };

        offspring.set_age_at_least(p0.age().max(p1.age()));

        let changed = offspring.mutate(problem, self.p_mutation);
        if changed > 0 {
            status.record_mutation();
        }

        offspring
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::AtomicU32;
    use ultra_core::individual::testing::{IntGenome, IntGenomeProblem};

    fn status() -> EvolutionStatus<IntGenome> {
        EvolutionStatus::new(Arc::new(AtomicU32::new(0)))
    }

    #[test]
    fn p_cross_zero_always_copies_parent_zero() {
        let op = BaseRecombination::new(0.0, 0.0);
        let problem = IntGenomeProblem { len: 3, lo: 0, hi: 100 };
        let p0 = IntGenome::new(vec![1, 1, 1]);
        let p1 = IntGenome::new(vec![9, 9, 9]);
        let offspring = op.recombine(&(p0.clone(), p1), &problem, &status());
        assert_eq!(offspring.genes, p0.genes);
    }

    #[test]
    fn offspring_age_is_max_of_parents() {
        let op = BaseRecombination::new(1.0, 0.0);
        let problem = IntGenomeProblem { len: 2, lo: 0, hi: 10 };
        let p0 = IntGenome { genes: vec![1, 2], age: 3 };
        let p1 = IntGenome { genes: vec![3, 4], age: 7 };
        let offspring = op.recombine(&(p0, p1), &problem, &status());
        assert_eq!(offspring.age, 7);
    }

    #[test]
    fn successful_mutation_is_recorded() {
        let op = BaseRecombination::new(0.0, 1.0);
        let problem = IntGenomeProblem { len: 5, lo: 0, hi: 1000 };
        let p0 = IntGenome::new(vec![0, 0, 0, 0, 0]);
        let p1 = IntGenome::new(vec![0, 0, 0, 0, 0]);
        let status = status();
        op.recombine(&(p0, p1), &problem, &status);
        assert_eq!(status.mutations(), 1);
        assert_eq!(status.crossovers(), 0);
    }

    #[test]
    fn successful_crossover_is_recorded() {
        let op = BaseRecombination::new(1.0, 0.0);
        let problem = IntGenomeProblem { len: 2, lo: 0, hi: 10 };
        let p0 = IntGenome::new(vec![1, 1]);
        let p1 = IntGenome::new(vec![2, 2]);
        let status = status();
        op.recombine(&(p0, p1), &problem, &status);
        assert_eq!(status.crossovers(), 1);
    }
}
