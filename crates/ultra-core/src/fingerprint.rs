//! 128-bit content fingerprinting for individuals (component C1).
//!
//! Grounded on `original_source/src/kernel/hash_t.h`: a MurmurHash3-x64-128
//! implementation with a default seed of 1973, and a non-commutative
//! `combine` used to compose sub-hashes.

const C1: u64 = 0x87c3_7b91_1142_53d5;
const C2: u64 = 0x4cf5_ad43_2745_937f;

/// The default seed ULTRA uses when none is supplied.
pub const DEFAULT_SEED: u32 = 1973;

/// A 128-bit signature uniquely identifying an individual's genotype with
/// overwhelming probability. The all-zero value is reserved for the empty
/// individual.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fingerprint {
    data: [u64; 2],
}

impl Fingerprint {
    pub fn new(a: u64, b: u64) -> Self {
        Fingerprint { data: [a, b] }
    }

    /// The empty fingerprint: both halves zero.
    pub fn empty() -> Self {
        Fingerprint::default()
    }

    pub fn is_empty(&self) -> bool {
        self.data[0] == 0 && self.data[1] == 0
    }

    pub fn lo(&self) -> u64 {
        self.data[0]
    }

    pub fn hi(&self) -> u64 {
        self.data[1]
    }

    /// Mixes `other` into `self` using prime multiplication:
    /// `state = 37 * state + other` applied independently to each half.
    /// Deliberately non-commutative; used by representations that compose
    /// sub-hashes of a compound genotype. Not invoked by the core itself.
    pub fn combine(&mut self, other: Fingerprint) {
        self.data[0] = self.data[0].wrapping_mul(37).wrapping_add(other.data[0]);
        self.data[1] = self.data[1].wrapping_mul(37).wrapping_add(other.data[1]);
    }

    /// Hashes an arbitrary byte span with MurmurHash3-x64-128 using the
    /// default seed (1973).
    pub fn of(bytes: &[u8]) -> Self {
        Self::of_seeded(bytes, DEFAULT_SEED)
    }

    /// Hashes an arbitrary byte span with MurmurHash3-x64-128 using an
    /// explicit 32-bit seed.
    pub fn of_seeded(bytes: &[u8], seed: u32) -> Self {
        let len = bytes.len();
        let n_blocks = len / 16;

        let mut h0 = seed as u64;
        let mut h1 = seed as u64;

        for i in 0..n_blocks {
            let base = i * 16;
            let mut k1 = u64::from_le_bytes(bytes[base..base + 8].try_into().unwrap());
            let mut k2 = u64::from_le_bytes(bytes[base + 8..base + 16].try_into().unwrap());

            k1 = k1.wrapping_mul(C1);
            k1 = k1.rotate_left(31);
            k1 = k1.wrapping_mul(C2);
            h0 ^= k1;

            h0 = h0.rotate_left(27);
            h0 = h0.wrapping_add(h1);
            h0 = h0.wrapping_mul(5).wrapping_add(0x52dc_e729);

            k2 = k2.wrapping_mul(C2);
            k2 = k2.rotate_left(33);
            k2 = k2.wrapping_mul(C1);
            h1 ^= k2;

            h1 = h1.rotate_left(31);
            h1 = h1.wrapping_add(h0);
            h1 = h1.wrapping_mul(5).wrapping_add(0x3849_5ab5);
        }

        let tail = &bytes[n_blocks * 16..];
        let mut k1: u64 = 0;
        let mut k2: u64 = 0;

        for (i, &b) in tail.iter().enumerate().rev() {
            if i >= 8 {
                k2 ^= (b as u64) << (8 * (i - 8));
            } else {
                k1 ^= (b as u64) << (8 * i);
            }
        }

        if tail.len() > 8 {
            k2 = k2.wrapping_mul(C2);
            k2 = k2.rotate_left(33);
            k2 = k2.wrapping_mul(C1);
            h1 ^= k2;
        }
        if !tail.is_empty() {
            k1 = k1.wrapping_mul(C1);
            k1 = k1.rotate_left(31);
            k1 = k1.wrapping_mul(C2);
            h0 ^= k1;
        }

        h0 ^= len as u64;
        h1 ^= len as u64;

        h0 = h0.wrapping_add(h1);
        h1 = h1.wrapping_add(h0);

        h0 = fmix64(h0);
        h1 = fmix64(h1);

        h0 = h0.wrapping_add(h1);
        h1 = h1.wrapping_add(h0);

        Fingerprint::new(h0, h1)
    }
}

fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51_afd7_ed55_8ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    k ^= k >> 33;
    k
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_is_all_zero() {
        assert!(Fingerprint::empty().is_empty());
        assert_eq!(Fingerprint::default(), Fingerprint::new(0, 0));
    }

    #[test]
    fn deterministic_and_sensitive_to_input() {
        let a = Fingerprint::of(b"hello world");
        let b = Fingerprint::of(b"hello world");
        let c = Fingerprint::of(b"hello worle");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(!a.is_empty());
    }

    #[test]
    fn handles_all_tail_lengths() {
        for len in 0..40 {
            let bytes: Vec<u8> = (0..len).map(|i| i as u8).collect();
            let h = Fingerprint::of(&bytes);
            // Overwhelmingly unlikely to collide with the empty sentinel.
            if len > 0 {
                assert!(!h.is_empty());
            }
        }
    }

    #[test]
    fn combine_is_not_commutative() {
        let mut a = Fingerprint::of(b"a");
        let mut b = Fingerprint::of(b"b");
        let base_a = a;
        let base_b = b;

        a.combine(base_b);
        b.combine(base_a);

        assert_ne!(a, b);
    }

    #[test]
    fn seed_changes_output() {
        let a = Fingerprint::of_seeded(b"same input", 1973);
        let b = Fingerprint::of_seeded(b"same input", 42);
        assert_ne!(a, b);
    }
}
