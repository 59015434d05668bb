//! # Twiddle Bloom
//!
//! A Bloom filter sized from an expected capacity, a bits-per-element floor
//! and a target false positive rate. Probe positions are derived by double
//! hashing, so each element costs two hash evaluations regardless of `k`.

pub mod bit_store;
pub mod bloom;
pub mod hash;
pub mod utils;

pub use bit_store::BitStore;
pub use bloom::{BloomFilter, BloomStats};
pub use hash::{DoubleHasher, HashKeys, Probes};
pub use utils::{BloomParameters, MAX_NUM_BITS, MAX_NUM_HASHES};

// Python bindings
#[cfg(feature = "python")]
pub mod python_module;

/// Construction argument that failed validation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    Capacity,
    AuxFactor,
    FalsePositiveTarget,
    NumBits,
    NumHashes,
    HashKeys,
}

impl std::fmt::Display for Parameter {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Parameter::Capacity => "capacity",
            Parameter::AuxFactor => "aux_factor",
            Parameter::FalsePositiveTarget => "false_positive_target",
            Parameter::NumBits => "num_bits",
            Parameter::NumHashes => "num_hashes",
            Parameter::HashKeys => "hash_keys",
        };
        f.write_str(name)
    }
}

/// Common error types for the library
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BloomError {
    #[error("Invalid parameter `{parameter}`: {reason}")]
    InvalidParameter { parameter: Parameter, reason: String },

    #[error("Bit index {index} out of range for {len} bits")]
    IndexOutOfRange { index: usize, len: usize },
}

impl BloomError {
    pub(crate) fn invalid(parameter: Parameter, reason: impl Into<String>) -> Self {
        BloomError::InvalidParameter {
            parameter,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BloomError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_bloom_filter() {
        let mut bloom = BloomFilter::new(1000, 10.0, 0.01).unwrap();

        bloom.insert(&42u64);
        bloom.insert(&1337u64);
        bloom.insert("9999");

        assert!(bloom.contains(&42u64));
        assert!(bloom.contains(&1337u64));
        assert!(bloom.contains("9999"));
    }

    #[test]
    fn test_error_display_names_parameter() {
        let err = BloomFilter::new(0, 8.0, 0.5).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid parameter `capacity`: capacity must be > 0"
        );

        let err = BloomError::IndexOutOfRange { index: 9, len: 8 };
        assert_eq!(err.to_string(), "Bit index 9 out of range for 8 bits");
    }
}
