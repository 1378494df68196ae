//! Configuration (spec §6 Parameters block, SPEC_FULL.md §9).
//!
//! Grounded on the teacher's `GeneticEngineParams` builder pattern
//! (`radiate-engines/src/params.rs`): nested, grouped parameter structs
//! with `with_*` builder methods and a single `validate` entry point that
//! checks every precondition spec.md states, mirroring spec §7's
//! `is_valid(force_defined)`.

use crate::alps::AgePolicy;
use crate::fitness::Fitness;
use ultra_error::{Result, ensure};

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PopulationParams {
    pub individuals: usize,
    pub init_layers: usize,
    pub min_individuals: usize,
}

impl Default for PopulationParams {
    fn default() -> Self {
        PopulationParams {
            individuals: 100,
            init_layers: 1,
            min_individuals: 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EvolutionParams {
    pub generations: u32,
    /// `None` means unbounded (spec §6 default `"unbounded"`).
    pub max_stuck_gen: Option<u32>,
    pub brood_recombination: u32,
    pub elitism: f32,
    pub mate_zone: usize,
    pub tournament_size: usize,
    pub p_cross: f32,
    pub p_mutation: f32,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        EvolutionParams {
            generations: 100,
            max_stuck_gen: None,
            brood_recombination: 1,
            elitism: 1.0,
            mate_zone: 20,
            tournament_size: 5,
            p_cross: 0.9,
            p_mutation: 0.04,
        }
    }
}

/// The differential-evolution scaling interval `[F_lo, F_hi]` (spec §4.7,
/// §6): required only when a DE strategy is run.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeWeight {
    pub lo: f64,
    pub hi: f64,
}

impl DeWeight {
    pub fn new(lo: f64, hi: f64) -> Self {
        DeWeight { lo, hi }
    }
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    pub population: PopulationParams,
    pub evolution: EvolutionParams,
    pub alps: AgePolicy,
    pub de_weight: Option<DeWeight>,
    pub threshold: Option<Fitness>,
}

impl Parameters {
    pub fn with_individuals(mut self, n: usize) -> Self {
        self.population.individuals = n;
        self
    }

    pub fn with_init_layers(mut self, n: usize) -> Self {
        self.population.init_layers = n;
        self
    }

    pub fn with_min_individuals(mut self, n: usize) -> Self {
        self.population.min_individuals = n;
        self
    }

    pub fn with_generations(mut self, n: u32) -> Self {
        self.evolution.generations = n;
        self
    }

    pub fn with_max_stuck_gen(mut self, n: u32) -> Self {
        self.evolution.max_stuck_gen = Some(n);
        self
    }

    pub fn with_elitism(mut self, p: f32) -> Self {
        self.evolution.elitism = p;
        self
    }

    pub fn with_mate_zone(mut self, m: usize) -> Self {
        self.evolution.mate_zone = m;
        self
    }

    pub fn with_tournament_size(mut self, t: usize) -> Self {
        self.evolution.tournament_size = t;
        self
    }

    pub fn with_p_cross(mut self, p: f32) -> Self {
        self.evolution.p_cross = p;
        self
    }

    pub fn with_p_mutation(mut self, p: f32) -> Self {
        self.evolution.p_mutation = p;
        self
    }

    pub fn with_age_gap(mut self, gap: u32) -> Self {
        self.alps.age_gap = gap;
        self
    }

    pub fn with_p_main_layer(mut self, p: f32) -> Self {
        self.alps.p_main_layer = p;
        self
    }

    pub fn with_de_weight(mut self, lo: f64, hi: f64) -> Self {
        self.de_weight = Some(DeWeight::new(lo, hi));
        self
    }

    pub fn with_threshold(mut self, threshold: Fitness) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Rejects misconfiguration before a run starts (spec §7
    /// "`is_valid(force_defined)` at the start of each run"). `force_defined`
    /// additionally requires `de_weight`/`threshold` to be set, for callers
    /// (e.g. a DE search, or a search relying on threshold-based stopping)
    /// that cannot proceed meaningfully without them.
    pub fn validate(&self, force_defined: bool) -> Result<()> {
        ensure!(
            self.population.min_individuals >= 2,
            InvalidParameter: "population.min_individuals must be >= 2, got {}",
            self.population.min_individuals
        );
        ensure!(
            self.population.individuals >= self.population.min_individuals,
            InvalidParameter: "population.individuals ({}) must be >= population.min_individuals ({})",
            self.population.individuals, self.population.min_individuals
        );
        ensure!(
            self.population.init_layers >= 1,
            InvalidParameter: "population.init_layers must be >= 1, got {}",
            self.population.init_layers
        );
        ensure!(
            self.alps.age_gap > 0,
            InvalidParameter: "alps.age_gap must be > 0, got {}",
            self.alps.age_gap
        );
        ensure!(
            (0.0..=1.0).contains(&self.alps.p_main_layer),
            InvalidParameter: "alps.p_main_layer must be in [0,1], got {}",
            self.alps.p_main_layer
        );
        ensure!(
            (0.0..=1.0).contains(&self.evolution.p_cross),
            InvalidParameter: "evolution.p_cross must be in [0,1], got {}",
            self.evolution.p_cross
        );
        ensure!(
            (0.0..=1.0).contains(&self.evolution.p_mutation),
            InvalidParameter: "evolution.p_mutation must be in [0,1], got {}",
            self.evolution.p_mutation
        );
        ensure!(
            (0.0..=1.0).contains(&self.evolution.elitism),
            InvalidParameter: "evolution.elitism must be in [0,1], got {}",
            self.evolution.elitism
        );
        ensure!(
            self.evolution.tournament_size >= 1,
            InvalidParameter: "evolution.tournament_size must be >= 1, got {}",
            self.evolution.tournament_size
        );
        ensure!(
            self.evolution.tournament_size <= self.population.individuals,
            InvalidParameter: "evolution.tournament_size ({}) exceeds population.individuals ({})",
            self.evolution.tournament_size, self.population.individuals
        );
        if let Some(weight) = self.de_weight {
            ensure!(
                weight.lo <= weight.hi,
                InvalidParameter: "de.weight interval [{}, {}] is empty",
                weight.lo, weight.hi
            );
        }
        if force_defined {
            ensure!(
                self.de_weight.is_some(),
                InvalidParameter: "de.weight must be set"
            );
            ensure!(
                self.threshold.is_some(),
                InvalidParameter: "threshold must be set"
            );
        }
        Ok(())
    }
}
