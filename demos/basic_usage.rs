//! Basic usage examples for twiddle-bloom

use twiddle_bloom::{BloomFilter, BloomParameters, HashKeys};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Twiddle Bloom Filter Examples ===\n");

    // Example 1: Sized from capacity, bits-per-element and target FPR
    println!("1. Basic Bloom Filter:");
    let mut bloom = BloomFilter::new(100, 8.0, 0.5)?;

    let test_data = ["apple", "banana", "cherry", "date", "elderberry"];
    for item in &test_data {
        bloom.insert(*item);
    }

    for item in &test_data {
        println!("  {} in filter: {}", item, bloom.contains(*item));
    }

    for item in &["fig", "grape", "kiwi"] {
        println!("  {} in filter: {}", item, bloom.contains(*item));
    }

    println!("  {}", bloom.stats());
    println!();

    // Example 2: Parameter derivation on its own
    println!("2. Derived parameters:");
    for (n, aux, p) in [(100, 8.0, 0.5), (1_000, 1.0, 0.01), (1_000, 1.0, 0.001)] {
        let params = BloomParameters::derive(n, aux, p)?;
        println!(
            "  n={:>5} aux={:>4} p={:<6} -> m={:>6} k={:>2} expected fpr={:.5}",
            n, aux, p, params.num_bits, params.num_hashes, params.expected_fpr
        );
    }
    println!();

    // Example 3: Overfilling degrades the FPR but never loses elements
    println!("3. Exceeding capacity:");
    let mut small = BloomFilter::with_keys(1_000, 1.0, 0.01, HashKeys::random())?;
    for i in 0..5_000u64 {
        small.insert(&i);
    }
    let missing = (0..5_000u64).filter(|i| !small.contains(i)).count();
    let false_positives = (5_000..15_000u64).filter(|i| small.contains(i)).count();
    println!("  false negatives: {}", missing);
    println!(
        "  observed FPR at 5x capacity: {:.4}",
        false_positives as f64 / 10_000.0
    );
    println!("  {}", small.stats());

    // Example 4: Invalid parameters are rejected
    println!("\n4. Invalid parameters:");
    for (n, aux, p) in [(0, 8.0, 0.5), (100, 0.0, 0.5), (100, 8.0, 1.0)] {
        if let Err(e) = BloomFilter::new(n, aux, p) {
            println!("  ({}, {}, {}) -> {}", n, aux, p, e);
        }
    }

    Ok(())
}
