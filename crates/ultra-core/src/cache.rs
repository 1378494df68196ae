//! Component C2: a striped, concurrent, direct-mapped fitness cache.
//!
//! Grounded on `original_source/src/kernel/cache.h`: `2^k` slots, each
//! `(hash, fitness, seal)`, partitioned into fixed-size lock groups (default
//! group size 128 slots, spec §4.2). A slot is valid iff its seal equals
//! the table's current seal, so a global `clear()` invalidates every slot
//! in O(1) by bumping the table seal rather than touching every slot.
//! Locking follows the teacher's `RwLock`-per-shared-structure convention
//! (`radiate-core` uses `RwLock` throughout for concurrently-read state);
//! the C++ original uses one `shared_mutex` per lock group, mirrored here
//! as one `RwLock<Vec<Slot>>` per group.

use crate::fingerprint::Fingerprint;
use crate::fitness::Fitness;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU32, Ordering};
use ultra_error::Result;

/// Number of slots per lock group. A compile-time constant in the C++
/// original (`LOCK_GROUP_SIZE`); kept as a `const` here since the core
/// never needs to vary it at runtime.
pub const LOCK_GROUP_SIZE: usize = 128;

#[derive(Clone, Copy, Default)]
struct Slot {
    hash: Fingerprint,
    fitness: Option<Fitness>,
    seal: u32,
}

/// Direct-mapped, lock-striped fitness cache. `k` address bits select
/// `2^k` slots; slots are grouped into chunks of `LOCK_GROUP_SIZE`, each
/// guarded by its own `RwLock` so unrelated slots never contend.
pub struct FitnessCache {
    bits: u32,
    mask: u64,
    groups: Vec<RwLock<Vec<Slot>>>,
    seal: AtomicU32,
}

impl FitnessCache {
    /// Creates an empty cache with `2^bits` slots.
    pub fn new(bits: u32) -> Self {
        let slots = 1usize << bits;
        let n_groups = slots.div_ceil(LOCK_GROUP_SIZE);
        let groups = (0..n_groups)
            .map(|_| RwLock::new(vec![Slot::default(); LOCK_GROUP_SIZE.min(slots)]))
            .collect();

        FitnessCache {
            bits,
            mask: (slots as u64) - 1,
            groups,
            seal: AtomicU32::new(1),
        }
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    fn slot_index(&self, hash: Fingerprint) -> usize {
        (hash.lo() & self.mask) as usize
    }

    fn group_of(&self, slot: usize) -> (usize, usize) {
        (slot / LOCK_GROUP_SIZE, slot % LOCK_GROUP_SIZE)
    }

    /// Looks up `hash`. Returns the cached fitness iff the slot's stored
    /// hash matches exactly and its seal equals the table's current seal.
    pub fn find(&self, hash: Fingerprint) -> Option<Fitness> {
        let slot = self.slot_index(hash);
        let (group, offset) = self.group_of(slot);
        let current_seal = self.seal.load(Ordering::Acquire);

        let table = self.groups[group].read().unwrap();
        let entry = &table[offset];
        if entry.seal == current_seal && entry.hash == hash {
            entry.fitness.clone()
        } else {
            None
        }
    }

    /// Unconditionally overwrites the slot mapped by `hash` with
    /// `(hash, fitness, current_seal)`. Direct-mapped replacement: a
    /// collision evicts whatever was there, trading bounded memory and a
    /// branchless lookup for occasional eviction (spec §4.2).
    pub fn insert(&self, hash: Fingerprint, fitness: Fitness) {
        let slot = self.slot_index(hash);
        let (group, offset) = self.group_of(slot);
        let current_seal = self.seal.load(Ordering::Acquire);

        let mut table = self.groups[group].write().unwrap();
        table[offset] = Slot {
            hash,
            fitness: Some(fitness),
            seal: current_seal,
        };
    }

    /// Logically invalidates every slot in O(1) by bumping the table seal.
    pub fn clear(&self) {
        self.seal.fetch_add(1, Ordering::AcqRel);
    }

    /// Invalidates only the one slot `hash` maps to.
    pub fn clear_one(&self, hash: Fingerprint) {
        let slot = self.slot_index(hash);
        let (group, offset) = self.group_of(slot);
        let mut table = self.groups[group].write().unwrap();
        table[offset].seal = 0;
    }

    /// Drops and reallocates the table at a new address-bit width. Callers
    /// must ensure there is no concurrent access during a resize (spec
    /// §4.2).
    pub fn resize(&mut self, bits: u32) {
        *self = FitnessCache::new(bits);
    }

    /// Writes `(k, table_seal, [slot...])`. Slots with a stale seal are
    /// written as empty so `load` reconstructs an equivalent cache.
    pub fn save<W: std::io::Write>(&self, mut w: W) -> Result<()> {
        let current_seal = self.seal.load(Ordering::Acquire);
        writeln!(w, "{} {}", self.bits, current_seal)?;
        for group in &self.groups {
            let table = group.read().unwrap();
            for slot in table.iter() {
                if slot.seal == current_seal {
                    if let Some(f) = &slot.fitness {
                        writeln!(
                            w,
                            "{} {} {:?}",
                            slot.hash.lo(),
                            slot.hash.hi(),
                            f.as_slice()
                        )?;
                        continue;
                    }
                }
                writeln!(w, "-")?;
            }
        }
        Ok(())
    }

    /// Reconstructs a cache from the format written by [`Self::save`]. The
    /// table seal is restored verbatim, so a slot written as `-` (stale at
    /// save time) stays stale here too.
    pub fn load<R: std::io::Read>(r: R) -> Result<Self> {
        use std::io::BufRead;

        let mut reader = std::io::BufReader::new(r);
        let mut header = String::new();
        reader.read_line(&mut header)?;
        let mut header_fields = header.trim().split_whitespace();
        let bits: u32 = header_fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ultra_error::err!(Io: "cache snapshot missing bit-width header"))?;
        let seal: u32 = header_fields
            .next()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| ultra_error::err!(Io: "cache snapshot missing seal header"))?;

        let cache = FitnessCache::new(bits);
        cache.seal.store(seal, Ordering::Release);

        let slots = 1usize << bits;
        for slot in 0..slots {
            let mut line = String::new();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let line = line.trim();
            if line == "-" {
                continue;
            }

            let mut fields = line.splitn(3, ' ');
            let lo: u64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| ultra_error::err!(Io: "malformed cache slot at {}", slot))?;
            let hi: u64 = fields
                .next()
                .and_then(|s| s.parse().ok())
                .ok_or_else(|| ultra_error::err!(Io: "malformed cache slot at {}", slot))?;
            let values_str = fields
                .next()
                .unwrap_or("[]")
                .trim()
                .trim_start_matches('[')
                .trim_end_matches(']');
            let values: Vec<f32> = if values_str.is_empty() {
                Vec::new()
            } else {
                values_str
                    .split(", ")
                    .map(|v| {
                        v.parse::<f32>()
                            .map_err(|_| ultra_error::err!(Io: "malformed cache fitness at {}", slot))
                    })
                    .collect::<Result<Vec<_>>>()?
            };

            let (group, offset) = cache.group_of(slot);
            let mut table = cache.groups[group].write().unwrap();
            table[offset] = Slot {
                hash: Fingerprint::new(lo, hi),
                fitness: Some(Fitness::vector(values)),
                seal,
            };
        }
        Ok(cache)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h(n: u64) -> Fingerprint {
        Fingerprint::new(n, n.wrapping_mul(7))
    }

    #[test]
    fn miss_on_empty_cache() {
        let cache = FitnessCache::new(4);
        assert!(cache.find(h(1)).is_none());
    }

    #[test]
    fn hit_after_insert() {
        let cache = FitnessCache::new(4);
        cache.insert(h(1), Fitness::scalar(42.0));
        assert_eq!(cache.find(h(1)), Some(Fitness::scalar(42.0)));
    }

    #[test]
    fn clear_invalidates_every_slot_in_o1() {
        let cache = FitnessCache::new(4);
        for i in 0..16u64 {
            cache.insert(h(i), Fitness::scalar(i as f32));
        }
        cache.clear();
        for i in 0..16u64 {
            assert!(cache.find(h(i)).is_none());
        }
    }

    #[test]
    fn clear_one_only_invalidates_its_slot() {
        let cache = FitnessCache::new(4);
        cache.insert(h(1), Fitness::scalar(1.0));
        cache.insert(h(2), Fitness::scalar(2.0));
        cache.clear_one(h(1));
        assert!(cache.find(h(1)).is_none());
        assert_eq!(cache.find(h(2)), Some(Fitness::scalar(2.0)));
    }

    #[test]
    fn collision_evicts_previous_entry() {
        // bits = 2 => 4 slots; hashes that share the low 2 bits collide.
        let cache = FitnessCache::new(2);
        let a = Fingerprint::new(0b00, 1);
        let b = Fingerprint::new(0b100, 2); // same low 2 bits as `a`
        cache.insert(a, Fitness::scalar(1.0));
        cache.insert(b, Fitness::scalar(2.0));
        assert!(cache.find(a).is_none());
        assert_eq!(cache.find(b), Some(Fitness::scalar(2.0)));
    }

    #[test]
    fn save_then_load_round_trips() {
        let cache = FitnessCache::new(4);
        cache.insert(h(1), Fitness::scalar(1.5));
        cache.insert(h(2), Fitness::vector(vec![1.0, 2.0, 3.0]));

        let mut buf = Vec::new();
        cache.save(&mut buf).unwrap();

        let loaded = FitnessCache::load(buf.as_slice()).unwrap();
        assert_eq!(loaded.bits(), cache.bits());
        assert_eq!(loaded.find(h(1)), Some(Fitness::scalar(1.5)));
        assert_eq!(loaded.find(h(2)), Some(Fitness::vector(vec![1.0, 2.0, 3.0])));
    }

    #[test]
    fn load_preserves_staleness_of_cleared_slots() {
        let cache = FitnessCache::new(4);
        cache.insert(h(1), Fitness::scalar(9.0));
        cache.clear_one(h(1));

        let mut buf = Vec::new();
        cache.save(&mut buf).unwrap();
        let loaded = FitnessCache::load(buf.as_slice()).unwrap();
        assert!(loaded.find(h(1)).is_none());
    }

    #[test]
    fn concurrent_insert_and_find_are_consistent() {
        use std::sync::Arc;
        use std::thread;

        let cache = Arc::new(FitnessCache::new(10));
        let mut handles = Vec::new();

        for t in 0..4u64 {
            let cache = Arc::clone(&cache);
            handles.push(thread::spawn(move || {
                for i in 0..100u64 {
                    let key = h(t * 1000 + i);
                    cache.insert(key, Fitness::scalar((t * 1000 + i) as f32));
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        for t in 0..4u64 {
            for i in 0..100u64 {
                let key = h(t * 1000 + i);
                if let Some(f) = cache.find(key) {
                    assert_eq!(f.as_scalar(), (t * 1000 + i) as f32);
                }
            }
        }
    }
}
