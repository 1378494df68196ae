//! Core data model and mechanics for the parallel ALPS evolutionary engine:
//! fingerprints, the fitness cache, the evaluator proxy, the layered
//! population, the age policy, replacement operators, run status, and
//! search-level aggregation.

pub mod alps;
pub mod cache;
pub mod domain;
pub mod evaluator;
pub mod fingerprint;
pub mod fitness;
pub mod individual;
pub mod layer;
pub mod parameters;
pub mod population;
pub mod replacement;
pub mod stats;
pub mod status;
pub mod summary;

pub use alps::AgePolicy;
pub use cache::FitnessCache;
pub use evaluator::{Evaluator, EvaluatorProxy};
pub use fingerprint::Fingerprint;
pub use fitness::Fitness;
pub use individual::{Individual, Mutate, RandomIndividual, Recombine, ScoredIndividual};
pub use layer::Layer;
pub use parameters::Parameters;
pub use population::LayeredPopulation;
pub use replacement::{AlpsReplacement, KillTournamentReplacement, ReplacementOutcome};
pub use status::EvolutionStatus;
pub use summary::{RunStatus, Summary};

pub mod prelude {
    pub use super::alps::AgePolicy;
    pub use super::cache::FitnessCache;
    pub use super::domain::random_provider;
    pub use super::evaluator::{Evaluator, EvaluatorProxy};
    pub use super::fingerprint::Fingerprint;
    pub use super::fitness::Fitness;
    pub use super::individual::{Individual, Mutate, RandomIndividual, Recombine, ScoredIndividual};
    pub use super::layer::Layer;
    pub use super::parameters::Parameters;
    pub use super::population::LayeredPopulation;
    pub use super::replacement::{AlpsReplacement, KillTournamentReplacement, ReplacementOutcome};
    pub use super::stats::{Distribution, Statistic};
    pub use super::status::EvolutionStatus;
    pub use super::summary::{RunStatus, Summary};
}
