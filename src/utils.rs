//! Parameter derivation for Bloom filters

use crate::{BloomError, Parameter, Result};
use std::f64::consts::LN_2;

/// Largest bit array a filter may allocate (16 GiB of bits)
pub const MAX_NUM_BITS: u64 = 1 << 37;
/// Upper bound on probes per element
pub const MAX_NUM_HASHES: usize = 32;

/// Structural constants of a Bloom filter
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BloomParameters {
    /// Bit array size (m)
    pub num_bits: usize,
    /// Probes per element (k)
    pub num_hashes: usize,
    /// Theoretical FPR once `capacity` elements are inserted; NaN for `with_size`
    pub expected_fpr: f64,
}

impl BloomParameters {
    /// Derive `m` and `k` from sizing intent
    ///
    /// # Arguments
    /// * `capacity` - Expected number of distinct elements (n)
    /// * `aux_factor` - Minimum bits per element; `m` is at least `aux_factor * n`
    /// * `false_positive_target` - Target FPR, in (0, 1)
    ///
    /// `m = max(ceil(-n * ln(p) / ln(2)^2), ceil(aux_factor * n))` and
    /// `k = clamp(round(m / n * ln(2)), 1, MAX_NUM_HASHES)`.
    ///
    /// Fails when `m` would exceed [`MAX_NUM_BITS`], naming `aux_factor` if the
    /// bits-per-element floor is the larger term and `capacity` otherwise.
    pub fn derive(capacity: usize, aux_factor: f64, false_positive_target: f64) -> Result<Self> {
        if capacity == 0 {
            return Err(BloomError::invalid(
                Parameter::Capacity,
                "capacity must be > 0",
            ));
        }
        if !aux_factor.is_finite() || aux_factor <= 0.0 {
            return Err(BloomError::invalid(
                Parameter::AuxFactor,
                format!("aux_factor must be finite and > 0, got {}", aux_factor),
            ));
        }
        if !false_positive_target.is_finite()
            || false_positive_target <= 0.0
            || false_positive_target >= 1.0
        {
            return Err(BloomError::invalid(
                Parameter::FalsePositiveTarget,
                format!(
                    "false_positive_target must be in (0, 1), got {}",
                    false_positive_target
                ),
            ));
        }

        let n = capacity as f64;
        let bits_for_fpr = bits_for_target(n, false_positive_target);
        let bits_for_aux = (aux_factor * n).ceil();
        let bits = bits_for_fpr.max(bits_for_aux).max(1.0);

        if !bits.is_finite() || bits > MAX_NUM_BITS as f64 || bits > usize::MAX as f64 {
            let parameter = if bits_for_aux >= bits_for_fpr {
                Parameter::AuxFactor
            } else {
                Parameter::Capacity
            };
            return Err(BloomError::invalid(
                parameter,
                format!(
                    "filter would need {:e} bits, more than the maximum of {}",
                    bits, MAX_NUM_BITS
                ),
            ));
        }

        let num_bits = bits as usize;
        let num_hashes = optimal_num_hashes(num_bits, capacity);

        Ok(BloomParameters {
            num_bits,
            num_hashes,
            expected_fpr: false_positive_rate(num_bits, capacity, num_hashes),
        })
    }

    /// Use explicit `m` and `k` without sizing
    pub fn with_size(num_bits: usize, num_hashes: usize) -> Result<Self> {
        if num_bits == 0 {
            return Err(BloomError::invalid(
                Parameter::NumBits,
                "num_bits must be > 0",
            ));
        }
        if num_bits as u64 > MAX_NUM_BITS {
            return Err(BloomError::invalid(
                Parameter::NumBits,
                format!("num_bits must be <= {}", MAX_NUM_BITS),
            ));
        }
        if num_hashes == 0 || num_hashes > MAX_NUM_HASHES {
            return Err(BloomError::invalid(
                Parameter::NumHashes,
                format!("num_hashes must be in 1..={}", MAX_NUM_HASHES),
            ));
        }
        Ok(BloomParameters {
            num_bits,
            num_hashes,
            expected_fpr: f64::NAN,
        })
    }
}

fn bits_for_target(n: f64, p: f64) -> f64 {
    let ln2_squared = LN_2 * LN_2;
    (-n * p.ln() / ln2_squared).ceil()
}

/// Minimum bits for `n` elements at FPR `p`: `ceil(-n * ln(p) / ln(2)^2)`,
/// saturating at `usize::MAX`
pub fn minimum_bits(n: usize, p: f64) -> usize {
    bits_for_target(n as f64, p) as usize
}

/// Optimal probe count `round(m / n * ln(2))`, kept within `1..=MAX_NUM_HASHES`
pub fn optimal_num_hashes(m: usize, n: usize) -> usize {
    if n == 0 {
        return 1;
    }
    let k = ((m as f64 / n as f64) * LN_2).round();
    k.clamp(1.0, MAX_NUM_HASHES as f64) as usize
}

/// FPR after `n` insertions: `(1 - e^(-k * n / m))^k`
pub fn false_positive_rate(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powf(k as f64)
}
