//! An ordered, arithmetic fitness value (spec §3 "Fitness"): either a scalar
//! or a fixed-length vector with lexicographic ordering, element-wise
//! arithmetic, and dominance.
//!
//! Grounded on `radiate-core/src/objectives/score.rs`'s `Score` struct
//! (`Arc<[f32]>` payload, lexicographic `PartialOrd` via slice comparison,
//! arithmetic trait impls), generalized with the `dominates()` and
//! `lowest()` operations spec.md requires that `Score` does not provide.

use std::cmp::Ordering;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Sub};
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fitness {
    values: Arc<[f32]>,
}

impl Fitness {
    pub fn scalar(value: f32) -> Self {
        Fitness {
            values: Arc::from(vec![value]),
        }
    }

    pub fn vector(values: Vec<f32>) -> Self {
        Fitness {
            values: Arc::from(values),
        }
    }

    /// The sentinel for "no fitness yet": a single component at
    /// `f32::NEG_INFINITY`, which compares below every real fitness value
    /// produced by an evaluator (greater is better, per the glossary).
    pub fn lowest() -> Self {
        Fitness::scalar(f32::NEG_INFINITY)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.values
    }

    pub fn as_scalar(&self) -> f32 {
        self.values.first().copied().unwrap_or(f32::NEG_INFINITY)
    }

    /// True iff `self` is at least as good as `other` in every component and
    /// strictly better in at least one (maximizing Pareto dominance).
    pub fn dominates(&self, other: &Fitness) -> bool {
        if self.values.len() != other.values.len() || self.values.is_empty() {
            return false;
        }

        let mut strictly_better = false;
        for (a, b) in self.values.iter().zip(other.values.iter()) {
            if a < b {
                return false;
            }
            if a > b {
                strictly_better = true;
            }
        }
        strictly_better
    }
}

impl PartialEq for Fitness {
    fn eq(&self, other: &Self) -> bool {
        self.values.as_ref() == other.values.as_ref()
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.values.partial_cmp(&other.values)
    }
}

impl From<f32> for Fitness {
    fn from(v: f32) -> Self {
        Fitness::scalar(v)
    }
}

impl From<Vec<f32>> for Fitness {
    fn from(v: Vec<f32>) -> Self {
        Fitness::vector(v)
    }
}

impl AsRef<[f32]> for Fitness {
    fn as_ref(&self) -> &[f32] {
        &self.values
    }
}

macro_rules! impl_binop {
    ($trait:ident, $method:ident, $op:tt) => {
        impl $trait for Fitness {
            type Output = Fitness;
            fn $method(self, rhs: Fitness) -> Fitness {
                let values = self
                    .values
                    .iter()
                    .zip(rhs.values.iter())
                    .map(|(a, b)| a $op b)
                    .collect::<Vec<_>>();
                Fitness::vector(values)
            }
        }

        impl $trait<f32> for Fitness {
            type Output = Fitness;
            fn $method(self, rhs: f32) -> Fitness {
                let values = self.values.iter().map(|a| a $op rhs).collect::<Vec<_>>();
                Fitness::vector(values)
            }
        }
    };
}

impl_binop!(Add, add, +);
impl_binop!(Sub, sub, -);
impl_binop!(Mul, mul, *);
impl_binop!(Div, div, /);

impl Sum for Fitness {
    fn sum<I: Iterator<Item = Fitness>>(iter: I) -> Self {
        iter.fold(Fitness::scalar(0.0), |acc, x| {
            if acc.is_empty() {
                x
            } else if x.is_empty() {
                acc
            } else {
                acc + x
            }
        })
    }
}
