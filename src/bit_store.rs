//! Fixed-size bit store
//!
//! Bits are only ever set, never cleared.

use crate::{BloomError, Parameter, Result};
use bit_vec::BitVec;

/// Fixed-size array of bits, all initially unset
#[derive(Clone, PartialEq, Eq)]
pub struct BitStore {
    bits: BitVec,
}

impl BitStore {
    /// Create a store of `len` unset bits
    pub fn new(len: usize) -> Result<Self> {
        if len == 0 {
            return Err(BloomError::invalid(
                Parameter::NumBits,
                "bit store length must be > 0",
            ));
        }
        Ok(BitStore {
            bits: BitVec::from_elem(len, false),
        })
    }

    /// Set bit `index`, returning whether it was already set
    pub fn set_bit(&mut self, index: usize) -> Result<bool> {
        let was_set = self.test_bit(index)?;
        if !was_set {
            self.bits.set(index, true);
        }
        Ok(was_set)
    }

    /// Read bit `index`
    pub fn test_bit(&self, index: usize) -> Result<bool> {
        self.bits.get(index).ok_or(BloomError::IndexOutOfRange {
            index,
            len: self.bits.len(),
        })
    }

    pub fn len(&self) -> usize {
        self.bits.len()
    }

    /// Always false; a store holds at least one bit
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    /// Number of set bits
    pub fn count_ones(&self) -> usize {
        self.bits.iter().filter(|&bit| bit).count()
    }

    /// Packed bits, most significant bit of each byte first
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.to_bytes()
    }
}

impl std::fmt::Debug for BitStore {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BitStore {{ len: {}, ones: {} }}",
            self.len(),
            self.count_ones()
        )
    }
}
