//! Component C4: a single age-layer sub-population (spec §4.4).
//!
//! Grounded on `original_source/src/kernel/linear_population.h`'s
//! `shared_ptr<shared_mutex>` design: a layer is shared by its own worker
//! and, during ALPS selection, the worker of the layer above it, so the
//! lock lives behind an `Arc` rather than being owned by a single handle.
//! Translated here as `Arc<RwLock<Vec<I>>>`, deliberately NOT the teacher's
//! `MutCell` (a single-threaded interior-mutability cell in `radiate-core`
//! used under the assumption of one writer at a time) — `Layer` is read
//! and written from genuinely concurrent OS threads, so a real `RwLock` is
//! required for soundness.

use crate::individual::Individual;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard, atomic::AtomicU32};
use std::sync::atomic::{AtomicUsize, Ordering};

/// An age-banded sub-population: a sequence of individuals guarded by its
/// own reader-writer lock, with a soft size cap (`allowed_size`) and an
/// age limit (`max_age`) enforced by the ALPS age policy, not by `Layer`
/// itself.
///
/// Cloning a `Layer` is cheap and shares the same underlying members and
/// counters (an `Arc` clone) — this is how the driver hands the same
/// layer to both its own worker and its lower neighbor's worker for
/// concurrent ALPS selection.
pub struct Layer<I: Individual> {
    members: Arc<RwLock<Vec<I>>>,
    allowed_size: Arc<AtomicUsize>,
    max_age: Arc<AtomicU32>,
}

impl<I: Individual> Clone for Layer<I> {
    fn clone(&self) -> Self {
        Layer {
            members: Arc::clone(&self.members),
            allowed_size: Arc::clone(&self.allowed_size),
            max_age: Arc::clone(&self.max_age),
        }
    }
}

impl<I: Individual> Layer<I> {
    pub fn new(allowed_size: usize, max_age: u32) -> Self {
        Layer {
            members: Arc::new(RwLock::new(Vec::with_capacity(allowed_size))),
            allowed_size: Arc::new(AtomicUsize::new(allowed_size)),
            max_age: Arc::new(AtomicU32::new(max_age)),
        }
    }

    pub fn with_members(members: Vec<I>, allowed_size: usize, max_age: u32) -> Self {
        Layer {
            members: Arc::new(RwLock::new(members)),
            allowed_size: Arc::new(AtomicUsize::new(allowed_size)),
            max_age: Arc::new(AtomicU32::new(max_age)),
        }
    }

    pub fn allowed_size(&self) -> usize {
        self.allowed_size.load(Ordering::Acquire)
    }

    pub fn set_allowed_size(&self, size: usize) {
        self.allowed_size.store(size, Ordering::Release);
    }

    pub fn max_age(&self) -> u32 {
        self.max_age.load(Ordering::Acquire)
    }

    pub fn set_max_age(&self, age: u32) {
        self.max_age.store(age, Ordering::Release);
    }

    /// Scoped shared access to the members vector — the shape selection
    /// uses to read a layer without blocking sibling readers (spec §4.4,
    /// §5).
    pub fn read(&self) -> RwLockReadGuard<'_, Vec<I>> {
        self.members.read().unwrap()
    }

    /// Scoped exclusive access — the shape replacement uses to mutate a
    /// layer (spec §4.4, §5).
    pub fn write(&self) -> RwLockWriteGuard<'_, Vec<I>> {
        self.members.write().unwrap()
    }

    pub fn size(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.allowed_size() == 0 || self.size() == 0
    }

    pub fn push_back(&self, individual: I) {
        self.write().push(individual);
    }

    pub fn pop_back(&self) -> Option<I> {
        self.write().pop()
    }

    pub fn get(&self, index: usize) -> I {
        self.read()[index].clone()
    }

    /// Replaces the member at `index`, returning the individual that was
    /// there. Used by kill-tournament replacement under the layer's
    /// exclusive lock.
    pub fn replace_at(&self, index: usize, individual: I) -> I {
        let mut members = self.write();
        std::mem::replace(&mut members[index], individual)
    }

    /// Discards the layer's contents and installs `members` in their
    /// place (spec §4.9 "reseed"): used to refill the bottom layer with
    /// fresh random individuals.
    pub fn reseed(&self, members: Vec<I>) {
        *self.write() = members;
    }

    /// Increments every member's age by exactly one (spec §4.4, tested in
    /// spec §8 "for every generation g: after inc_age(), every
    /// individual's age is exactly one greater than before").
    pub fn inc_age(&self) {
        for member in self.write().iter_mut() {
            let next = member.age() + 1;
            member.set_age_at_least(next);
        }
    }

    /// A point-in-time clone of the layer's members, for reporting and
    /// tests. Takes the shared lock for the duration of the copy only.
    pub fn snapshot(&self) -> Vec<I> {
        self.read().clone()
    }
}

#[cfg(feature = "serde")]
impl<I: Individual + serde::Serialize> Layer<I> {
    pub fn save<W: std::io::Write>(&self, mut w: W) -> ultra_error::Result<()> {
        let members = self.snapshot();
        let payload = (self.allowed_size(), self.max_age(), members);
        serde_json::to_writer(&mut w, &payload).map_err(|e| {
            ultra_error::UltraError::Io {
                message: e.to_string().into(),
            }
        })
    }
}

#[cfg(feature = "serde")]
impl<I: Individual + serde::de::DeserializeOwned> Layer<I> {
    pub fn load<R: std::io::Read>(r: R) -> ultra_error::Result<Self> {
        let (allowed_size, max_age, members): (usize, u32, Vec<I>) = serde_json::from_reader(r)
            .map_err(|e| ultra_error::UltraError::Io {
                message: e.to_string().into(),
            })?;
        Ok(Layer::with_members(members, allowed_size, max_age))
    }
}
