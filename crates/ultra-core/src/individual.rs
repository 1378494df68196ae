//! The `Individual` capability set (spec §3, §6) and the `ScoredIndividual`
//! pair.
//!
//! `Individual` is deliberately thin: the core treats genotypes as opaque
//! and only needs identity (`fingerprint`), age bookkeeping, and ordering
//! for deterministic tie-breaking. Representation-specific behavior
//! (random construction, recombination, mutation) lives in separate
//! capability traits so the core stays generic over whatever concrete
//! genome a caller brings, following the shape of `radiate-core`'s
//! `Chromosome`/`Gene` trait split but collapsed to the single seam spec.md
//! names.

use crate::fingerprint::Fingerprint;
use crate::fitness::Fitness;
use std::cmp::Ordering;

/// Opaque genotype the core engine operates on. Two individuals with equal
/// genotype must have equal fingerprint; the empty individual has
/// fingerprint `Fingerprint::empty()`.
pub trait Individual: Clone + Send + Sync {
    /// Lazily-computed, cached fingerprint. Implementations must recompute
    /// it whenever the genotype mutates and may cache it between calls.
    fn fingerprint(&self) -> Fingerprint;

    fn age(&self) -> u32;

    /// Raises this individual's age to at least `age`, never lowering it.
    fn set_age_at_least(&mut self, age: u32);

    /// Deterministic total order used to break fitness ties: higher
    /// fitness first, then younger age, then lexicographic genotype order
    /// (spec §4.7). This method supplies only the genotype tie-break;
    /// callers compose it with fitness and age comparisons.
    fn genotype_cmp(&self, other: &Self) -> Ordering;
}

/// Representation-specific capability: produce a fresh random individual
/// given a caller-supplied problem context `P`. Not used by the core
/// itself (out of scope per spec §1) but is the seam operator
/// implementations and tests construct populations through.
pub trait RandomIndividual<P>: Individual {
    fn random(problem: &P) -> Self;
}

/// Representation-specific capability: produce an offspring genotype from
/// `self` and `other` (spec §6 "recombine(other, …) -> Individual"). The
/// core's base recombination operator (`ultra-alters`) calls this; it never
/// inspects the genotype itself.
pub trait Recombine: Individual {
    fn recombine(&self, other: &Self) -> Self;
}

/// Representation-specific capability: mutate `self` in place given a
/// problem context `P`, returning the number of loci changed (spec §6
/// "mutate(Problem) -> count").
pub trait Mutate<P>: Individual {
    fn mutate(&mut self, problem: &P, p_mutation: f32) -> usize;
}

/// Pair of (individual, fitness); comparison is by fitness only (spec §3
/// "Scored Individual").
#[derive(Clone, Debug)]
pub struct ScoredIndividual<I: Individual> {
    pub individual: I,
    pub fitness: Fitness,
}

impl<I: Individual> ScoredIndividual<I> {
    pub fn new(individual: I, fitness: Fitness) -> Self {
        ScoredIndividual { individual, fitness }
    }

    /// An empty scored individual pairs a caller-supplied placeholder
    /// individual with `Fitness::lowest()`, so any real evaluation compares
    /// as an improvement.
    pub fn empty(individual: I) -> Self {
        ScoredIndividual {
            individual,
            fitness: Fitness::lowest(),
        }
    }
}

impl<I: Individual> PartialEq for ScoredIndividual<I> {
    fn eq(&self, other: &Self) -> bool {
        self.fitness == other.fitness
    }
}

impl<I: Individual> PartialOrd for ScoredIndividual<I> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.fitness.partial_cmp(&other.fitness)
    }
}

/// Minimal illustrative representations used to exercise the core engine
/// and, in `ultra-selectors`/`ultra-alters`/`ultra-engines`, the operators
/// and driver built on top of it. These are test fixtures, not production
/// representations (those are out of scope per spec §1) — deliberately
/// public (not `#[cfg(test)]`-gated) so sibling crates' tests and doctests
/// can share them instead of re-deriving a genome per crate.
pub mod testing {
    use super::*;
    use crate::domain::random_provider;

    /// A fixed-length integer genome (used by the string-guess and
    /// 8-queens end-to-end scenarios, spec §8).
    #[derive(Clone, Debug, PartialEq, Eq)]
    pub struct IntGenome {
        pub genes: Vec<i32>,
        pub age: u32,
    }

    impl IntGenome {
        pub fn new(genes: Vec<i32>) -> Self {
            IntGenome { genes, age: 0 }
        }
    }

    impl Individual for IntGenome {
        fn fingerprint(&self) -> Fingerprint {
            let bytes: Vec<u8> = self.genes.iter().flat_map(|g| g.to_le_bytes()).collect();
            Fingerprint::of(&bytes)
        }

        fn age(&self) -> u32 {
            self.age
        }

        fn set_age_at_least(&mut self, age: u32) {
            if age > self.age {
                self.age = age;
            }
        }

        fn genotype_cmp(&self, other: &Self) -> Ordering {
            self.genes.cmp(&other.genes)
        }
    }

    /// Bounds a random integer genome: `len` genes, each in `[lo, hi)`.
    #[derive(Clone, Copy, Debug)]
    pub struct IntGenomeProblem {
        pub len: usize,
        pub lo: i32,
        pub hi: i32,
    }

    impl RandomIndividual<IntGenomeProblem> for IntGenome {
        fn random(problem: &IntGenomeProblem) -> Self {
            let genes = (0..problem.len)
                .map(|_| random_provider::range(problem.lo..problem.hi))
                .collect();
            IntGenome { genes, age: 0 }
        }
    }

    impl Recombine for IntGenome {
        fn recombine(&self, other: &Self) -> Self {
            let point = random_provider::range(0..self.genes.len().max(1));
            let mut genes = self.genes.clone();
            genes[point..].clone_from_slice(&other.genes[point..]);
            IntGenome {
                genes,
                age: self.age.max(other.age),
            }
        }
    }

    impl Mutate<IntGenomeProblem> for IntGenome {
        fn mutate(&mut self, problem: &IntGenomeProblem, p_mutation: f32) -> usize {
            let mut changed = 0;
            for gene in &mut self.genes {
                if random_provider::bool(p_mutation) {
                    *gene = random_provider::range(problem.lo..problem.hi);
                    changed += 1;
                }
            }
            changed
        }
    }

    /// A fixed-length real-valued vector (used by the Rastrigin and
    /// knapsack DE scenarios, spec §8).
    #[derive(Clone, Debug, PartialEq)]
    pub struct RealVector {
        pub values: Vec<f64>,
        pub age: u32,
    }

    impl RealVector {
        pub fn new(values: Vec<f64>) -> Self {
            RealVector { values, age: 0 }
        }
    }

    impl Individual for RealVector {
        fn fingerprint(&self) -> Fingerprint {
            let bytes: Vec<u8> = self.values.iter().flat_map(|v| v.to_le_bytes()).collect();
            Fingerprint::of(&bytes)
        }

        fn age(&self) -> u32 {
            self.age
        }

        fn set_age_at_least(&mut self, age: u32) {
            if age > self.age {
                self.age = age;
            }
        }

        fn genotype_cmp(&self, other: &Self) -> Ordering {
            for (a, b) in self.values.iter().zip(other.values.iter()) {
                match a.partial_cmp(b) {
                    Some(Ordering::Equal) | None => continue,
                    Some(o) => return o,
                }
            }
            Ordering::Equal
        }
    }

    /// Bounds a random real vector: `len` components, each in `[lo, hi)`.
    #[derive(Clone, Copy, Debug)]
    pub struct RealVectorProblem {
        pub len: usize,
        pub lo: f64,
        pub hi: f64,
    }

    impl RandomIndividual<RealVectorProblem> for RealVector {
        fn random(problem: &RealVectorProblem) -> Self {
            let values = (0..problem.len)
                .map(|_| random_provider::range(problem.lo..problem.hi))
                .collect();
            RealVector { values, age: 0 }
        }
    }
}
