//! Standard Bloom filter implementation
//!
//! A space-efficient probabilistic data structure for membership testing.
//! Inserted elements are always reported present; elements never inserted
//! are reported present with probability close to the configured target.

use crate::{
    bit_store::BitStore,
    hash::{DoubleHasher, HashKeys},
    utils::BloomParameters,
    Result,
};
use std::hash::Hash;
use tracing::{debug, warn};

/// A Bloom filter over any `Hash` element
#[derive(Clone)]
pub struct BloomFilter {
    /// Bit array storing the filter data
    bits: BitStore,
    /// Probe position generator
    hasher: DoubleHasher,
    /// Probes per element (k)
    num_hashes: usize,
    /// Expected number of distinct elements (n)
    capacity: usize,
    aux_factor: f64,
    false_positive_target: f64,
    expected_fpr: f64,
    /// Number of insert calls (for statistics)
    count: usize,
}

impl BloomFilter {
    /// Create a new Bloom filter
    ///
    /// # Arguments
    /// * `capacity` - Expected number of elements to insert
    /// * `aux_factor` - Minimum number of bits per element
    /// * `false_positive_target` - Desired false positive rate, in (0, 1)
    pub fn new(capacity: usize, aux_factor: f64, false_positive_target: f64) -> Result<Self> {
        Self::with_keys(
            capacity,
            aux_factor,
            false_positive_target,
            HashKeys::default(),
        )
    }

    /// Create a new Bloom filter with explicit hash keys
    pub fn with_keys(
        capacity: usize,
        aux_factor: f64,
        false_positive_target: f64,
        keys: HashKeys,
    ) -> Result<Self> {
        let params = BloomParameters::derive(capacity, aux_factor, false_positive_target)?;
        debug!(
            capacity,
            aux_factor,
            false_positive_target,
            num_bits = params.num_bits,
            num_hashes = params.num_hashes,
            expected_fpr = params.expected_fpr,
            "derived bloom filter parameters"
        );

        let mut filter = Self::with_parameters(capacity, params, keys)?;
        filter.aux_factor = aux_factor;
        filter.false_positive_target = false_positive_target;
        Ok(filter)
    }

    /// Create a Bloom filter from already derived parameters
    pub fn with_parameters(
        capacity: usize,
        params: BloomParameters,
        keys: HashKeys,
    ) -> Result<Self> {
        BloomParameters::with_size(params.num_bits, params.num_hashes)?;
        Ok(BloomFilter {
            bits: BitStore::new(params.num_bits)?,
            hasher: DoubleHasher::new(keys),
            num_hashes: params.num_hashes,
            capacity,
            aux_factor: f64::NAN,
            false_positive_target: f64::NAN,
            expected_fpr: params.expected_fpr,
            count: 0,
        })
    }

    /// Insert an element into the filter
    ///
    /// Returns true if every probe bit was already set, i.e. the element
    /// was probably present before this call.
    pub fn insert<T: Hash + ?Sized>(&mut self, item: &T) -> bool {
        let mut already_present = true;
        for index in self.hasher.probes(item, self.num_hashes, self.bits.len()) {
            match self.bits.set_bit(index) {
                Ok(was_set) => already_present &= was_set,
                Err(err) => panic!("probe escaped the bit store: {}", err),
            }
        }

        self.count += 1;
        if self.count == self.capacity.saturating_add(1) {
            warn!(
                capacity = self.capacity,
                "bloom filter capacity exceeded, false positive rate will degrade"
            );
        }

        already_present
    }

    /// Check if an element might be in the filter
    /// Returns true if the element might be present (with possible false positives)
    /// Returns false if the element is definitely not present
    pub fn contains<T: Hash + ?Sized>(&self, item: &T) -> bool {
        self.hasher
            .probes(item, self.num_hashes, self.bits.len())
            .all(|index| match self.bits.test_bit(index) {
                Ok(set) => set,
                Err(err) => panic!("probe escaped the bit store: {}", err),
            })
    }

    /// Get the current load factor (fraction of bits set)
    pub fn load_factor(&self) -> f64 {
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    /// Get the estimated false positive rate from the current fill
    pub fn estimated_fpr(&self) -> f64 {
        self.load_factor().powi(self.num_hashes as i32)
    }

    /// Get statistics about the filter
    pub fn stats(&self) -> BloomStats {
        BloomStats {
            capacity: self.capacity,
            num_bits: self.bits.len(),
            num_hash_functions: self.num_hashes,
            elements_inserted: self.count,
            set_bits: self.bits.count_ones(),
            load_factor: self.load_factor(),
            target_fpr: self.false_positive_target,
            estimated_fpr: self.estimated_fpr(),
        }
    }

    /// Get the number of insert calls
    pub fn len(&self) -> usize {
        self.count
    }

    /// Check if nothing has been inserted
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Get the expected number of elements
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn aux_factor(&self) -> f64 {
        self.aux_factor
    }

    pub fn false_positive_target(&self) -> f64 {
        self.false_positive_target
    }

    /// Get the size of the bit array (m)
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// Get the number of probes per element (k)
    pub fn num_hash_functions(&self) -> usize {
        self.num_hashes
    }

    pub fn parameters(&self) -> BloomParameters {
        BloomParameters {
            num_bits: self.bits.len(),
            num_hashes: self.num_hashes,
            expected_fpr: self.expected_fpr,
        }
    }

    pub fn hash_keys(&self) -> HashKeys {
        self.hasher.keys()
    }

    /// Read-only view of the bit store
    pub fn bit_store(&self) -> &BitStore {
        &self.bits
    }
}

impl std::fmt::Debug for BloomFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter {{ capacity: {}, num_bits: {}, num_hashes: {} }}",
            self.capacity,
            self.bits.len(),
            self.num_hashes
        )
    }
}

/// Statistics about a Bloom filter
#[derive(Debug, Clone)]
pub struct BloomStats {
    pub capacity: usize,
    pub num_bits: usize,
    pub num_hash_functions: usize,
    pub elements_inserted: usize,
    pub set_bits: usize,
    pub load_factor: f64,
    pub target_fpr: f64,
    pub estimated_fpr: f64,
}

impl std::fmt::Display for BloomStats {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "BloomFilter Stats:\n\
             - Capacity: {} elements\n\
             - Size: {} bits\n\
             - Hash functions: {}\n\
             - Elements inserted: {}\n\
             - Load factor: {:.3}\n\
             - Target FPR: {:.6}\n\
             - Estimated FPR: {:.6}",
            self.capacity,
            self.num_bits,
            self.num_hash_functions,
            self.elements_inserted,
            self.load_factor,
            self.target_fpr,
            self.estimated_fpr
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BloomError, Parameter};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer};
    use tracing_subscriber::prelude::*;

    #[test]
    fn test_bloom_filter_basic() {
        let mut bloom = BloomFilter::new(100, 8.0, 0.5).unwrap();
        assert_eq!(bloom.num_bits(), 800);
        assert_eq!(bloom.num_hash_functions(), 6);

        bloom.insert("a");
        assert!(bloom.contains("a"));
        assert!(bloom.load_factor() > 0.0);
    }

    #[test]
    fn test_empty_filter_contains_nothing() {
        let bloom = BloomFilter::new(100, 8.0, 0.5).unwrap();
        assert!(bloom.is_empty());
        for i in 0..1000u32 {
            assert!(!bloom.contains(&i));
        }
        assert_eq!(bloom.estimated_fpr(), 0.0);
    }

    #[test]
    fn test_bloom_filter_false_negatives() {
        let mut bloom = BloomFilter::new(1000, 1.0, 0.01).unwrap();

        for i in 0..2000u64 {
            bloom.insert(&i);
        }
        // Twice the capacity still keeps every inserted element
        assert!((0..2000u64).all(|i| bloom.contains(&i)));
    }

    #[test]
    fn test_insert_reports_probable_presence() {
        let mut bloom = BloomFilter::new(100, 8.0, 0.1).unwrap();

        assert!(!bloom.insert("first"));
        assert!(bloom.insert("first"));
        assert_eq!(bloom.len(), 2);
    }

    #[test]
    fn test_insert_idempotent_on_bits() {
        let mut bloom = BloomFilter::new(100, 8.0, 0.1).unwrap();
        bloom.insert("x");
        let ones = bloom.bit_store().count_ones();
        bloom.insert("x");
        assert_eq!(bloom.bit_store().count_ones(), ones);
    }

    #[test]
    fn test_construction_errors_propagate() {
        for (n, aux, p, expected) in [
            (0, 8.0, 0.5, Parameter::Capacity),
            (100, 0.0, 0.5, Parameter::AuxFactor),
            (100, 8.0, 0.0, Parameter::FalsePositiveTarget),
            (100, 8.0, 1.0, Parameter::FalsePositiveTarget),
        ] {
            match BloomFilter::new(n, aux, p) {
                Err(BloomError::InvalidParameter { parameter, .. }) => {
                    assert_eq!(parameter, expected)
                }
                other => panic!("expected InvalidParameter, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_oversized_filter_rejected() {
        for (n, aux, expected) in [
            (1, 1e30, Parameter::AuxFactor),
            (usize::MAX, 1.0, Parameter::Capacity),
        ] {
            match BloomFilter::new(n, aux, 0.5) {
                Err(BloomError::InvalidParameter { parameter, .. }) => {
                    assert_eq!(parameter, expected)
                }
                other => panic!("expected InvalidParameter, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_with_parameters_checks_bounds() {
        let params = BloomParameters {
            num_bits: usize::MAX,
            num_hashes: 3,
            expected_fpr: 0.0,
        };
        assert!(matches!(
            BloomFilter::with_parameters(10, params, HashKeys::default()),
            Err(BloomError::InvalidParameter {
                parameter: Parameter::NumBits,
                ..
            })
        ));
    }

    #[derive(Clone, Default)]
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    #[test]
    fn test_capacity_warning_fires_once() {
        let warnings = WarnCounter::default();
        let subscriber = tracing_subscriber::registry().with(warnings.clone());

        tracing::subscriber::with_default(subscriber, || {
            let mut bloom = BloomFilter::new(10, 8.0, 0.1).unwrap();
            for i in 0..10u32 {
                bloom.insert(&i);
            }
            assert_eq!(warnings.0.load(Ordering::SeqCst), 0);

            for i in 10..100u32 {
                bloom.insert(&i);
            }
        });

        assert_eq!(warnings.0.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_keys_are_kept() {
        let keys = HashKeys::new(7, 11).unwrap();
        let bloom = BloomFilter::with_keys(10, 4.0, 0.1, keys).unwrap();
        assert_eq!(bloom.hash_keys(), keys);
        assert_eq!(bloom.aux_factor(), 4.0);
        assert_eq!(bloom.false_positive_target(), 0.1);
    }

    #[test]
    fn test_with_parameters() {
        let params = BloomParameters::with_size(64, 3).unwrap();
        let mut bloom = BloomFilter::with_parameters(10, params, HashKeys::default()).unwrap();
        bloom.insert(&5u8);
        assert!(bloom.contains(&5u8));
        assert_eq!(bloom.parameters().num_bits, 64);
        assert!(bloom.bit_store().count_ones() <= 3);
    }

    #[test]
    fn test_bloom_filter_stats() {
        let mut bloom = BloomFilter::new(1000, 10.0, 0.01).unwrap();

        for i in 0..100 {
            bloom.insert(&i);
        }

        let stats = bloom.stats();
        assert_eq!(stats.capacity, 1000);
        assert_eq!(stats.num_bits, 10_000);
        assert_eq!(stats.num_hash_functions, 7);
        assert_eq!(stats.elements_inserted, 100);
        assert!(stats.set_bits > 0 && stats.set_bits <= 700);
        assert!(stats.load_factor > 0.0);
        assert!(stats.estimated_fpr > 0.0);
        assert!(stats.to_string().contains("Hash functions: 7"));
    }

    #[test]
    fn test_debug_omits_bits() {
        let bloom = BloomFilter::new(100, 8.0, 0.5).unwrap();
        assert_eq!(
            format!("{:?}", bloom),
            "BloomFilter { capacity: 100, num_bits: 800, num_hashes: 6 }"
        );
    }
}
