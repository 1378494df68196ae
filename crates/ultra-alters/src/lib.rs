//! Component C7 (recombination half): base crossover+mutation and
//! differential-evolution recombination operators (spec §4.7).

pub mod de;
pub mod ga;

pub use de::{DeRecombination, RealValued};
pub use ga::BaseRecombination;
