//! Hash scheme for Bloom filters
//!
//! Derives `k` probe positions from two keyed base hashes using double
//! hashing: `probe(i) = (h1 + i * h2) mod m`.

use crate::{BloomError, Parameter, Result};
use fnv::FnvHasher;
use std::hash::{Hash, Hasher};

/// Keys for the two base hash functions; the two keys always differ
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashKeys {
    primary: u64,
    secondary: u64,
}

impl HashKeys {
    /// Create a key pair. Equal keys would make `h1 == h2`, so they are rejected.
    pub fn new(primary: u64, secondary: u64) -> Result<Self> {
        if primary == secondary {
            return Err(BloomError::invalid(
                Parameter::HashKeys,
                "primary and secondary hash keys must differ",
            ));
        }
        Ok(HashKeys { primary, secondary })
    }

    pub fn primary(&self) -> u64 {
        self.primary
    }

    pub fn secondary(&self) -> u64 {
        self.secondary
    }

    /// Create a key pair from a random source
    pub fn random() -> Self {
        use rand::Rng;
        let mut rng = rand::thread_rng();
        let primary: u64 = rng.gen();
        let mut secondary: u64 = rng.gen();
        while secondary == primary {
            secondary = rng.gen();
        }
        HashKeys { primary, secondary }
    }
}

impl Default for HashKeys {
    /// FNV-1a 64-bit offset basis and the golden ratio constant
    fn default() -> Self {
        HashKeys {
            primary: 0xcbf29ce484222325,
            secondary: 0x9e3779b97f4a7c15,
        }
    }
}

/// Double hashing scheme over any `Hash` element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DoubleHasher {
    keys: HashKeys,
}

impl DoubleHasher {
    pub fn new(keys: HashKeys) -> Self {
        DoubleHasher { keys }
    }

    pub fn keys(&self) -> HashKeys {
        self.keys
    }

    /// Compute the two base hashes `(h1, h2)` of an element
    pub fn base_hashes<T: Hash + ?Sized>(&self, item: &T) -> (u64, u64) {
        (
            keyed_hash(item, self.keys.primary),
            keyed_hash(item, self.keys.secondary),
        )
    }

    /// Iterate over the `num_probes` bit positions of `item` in a filter of
    /// `modulus` bits.
    ///
    /// # Panics
    /// Panics if `modulus` is 0.
    pub fn probes<T: Hash + ?Sized>(&self, item: &T, num_probes: usize, modulus: usize) -> Probes {
        assert!(modulus > 0, "modulus must be > 0");
        let (h1, h2) = self.base_hashes(item);
        Probes::new(h1, h2, num_probes, modulus)
    }
}

/// Iterator over double-hashed probe positions, all in `[0, modulus)`
#[derive(Debug, Clone)]
pub struct Probes {
    current: u64,
    step: u64,
    modulus: u64,
    remaining: usize,
}

impl Probes {
    fn new(h1: u64, h2: u64, num_probes: usize, modulus: usize) -> Self {
        let m = modulus as u64;
        let mut step = h2 % m;
        // A zero step would put every probe on the same bit
        if step == 0 && m > 1 {
            step = 1;
        }
        Probes {
            current: h1 % m,
            step,
            modulus: m,
            remaining: num_probes,
        }
    }
}

impl Iterator for Probes {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let index = self.current;
        // current, step < modulus, so the sum cannot overflow in u128
        self.current = ((self.current as u128 + self.step as u128) % self.modulus as u128) as u64;
        Some(index as usize)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Probes {}

fn keyed_hash<T: Hash + ?Sized>(item: &T, key: u64) -> u64 {
    let mut hasher = FnvHasher::with_key(key);
    item.hash(&mut hasher);
    fmix64(hasher.finish())
}

/// MurmurHash3 64-bit finalizer; FNV alone leaves the low bits weakly mixed
fn fmix64(mut k: u64) -> u64 {
    k ^= k >> 33;
    k = k.wrapping_mul(0xff51afd7ed558ccd);
    k ^= k >> 33;
    k = k.wrapping_mul(0xc4ceb9fe1a85ec53);
    k ^ (k >> 33)
}
