//! A parallel, age-layered (ALPS) evolutionary-computation engine.
//!
//! This crate re-exports the public surface of the `ultra-*` sub-crates:
//! the core data model and mechanics (layered populations, fitness caching,
//! replacement), selection and recombination operators, and the evolution
//! driver and multi-run search orchestrator.

pub use ultra_alters::*;
pub use ultra_core::*;
pub use ultra_engines::*;
pub use ultra_selectors::*;

pub use ultra_error::{Result, UltraError};
