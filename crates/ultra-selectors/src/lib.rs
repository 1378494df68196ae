//! Component C7 (selection half): tournament selection and its ALPS-aware
//! and differential-evolution variants (spec §4.7).

pub mod alps;
pub mod de;
pub mod tournament;

pub use alps::{AlpsTournamentSelector, weighted_layer_choice};
pub use de::DeSelection;
pub use tournament::{TournamentSelector, tournament_cmp};
