use rand::Rng;
use std::collections::HashSet;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;
use twiddle_bloom::BloomFilter;

const AUX_FACTOR: f64 = 8.0;
const TARGET_FPR: f64 = 0.5;
const QUERIES: usize = 100_000;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("Rust Micro Benchmark - Bloom filter throughput and false positives");
    println!("{}", "=".repeat(66));

    let capacities: Vec<usize> = vec![100, 1_000, 10_000, 100_000];
    let mut rng = rand::thread_rng();
    let mut results = Vec::new();

    for &capacity in &capacities {
        info!(capacity, "running benchmark");

        let start = Instant::now();
        let mut filter = BloomFilter::new(capacity, AUX_FACTOR, TARGET_FPR)?;
        let creation_time = start.elapsed().as_secs_f64();

        let mut inserted = HashSet::with_capacity(capacity);
        while inserted.len() < capacity {
            inserted.insert(rng.gen::<u64>());
        }
        let mut queries = Vec::with_capacity(QUERIES);
        while queries.len() < QUERIES {
            let key = rng.gen::<u64>();
            if !inserted.contains(&key) {
                queries.push(key);
            }
        }

        let start = Instant::now();
        for key in &inserted {
            filter.insert(key);
        }
        let insert_time = start.elapsed().as_secs_f64();

        let missed = inserted.iter().filter(|key| !filter.contains(*key)).count();

        let start = Instant::now();
        let false_positives = queries.iter().filter(|key| filter.contains(*key)).count();
        let query_time = start.elapsed().as_secs_f64();

        let insert_rate = capacity as f64 / insert_time.max(f64::EPSILON);
        let query_rate = QUERIES as f64 / query_time.max(f64::EPSILON);
        let observed_fpr = false_positives as f64 / QUERIES as f64;

        println!(
            "   capacity {}: {:.0} inserts/s, {:.0} queries/s, observed FPR {:.4}",
            capacity, insert_rate, query_rate, observed_fpr
        );

        results.push((
            capacity,
            filter.num_bits(),
            filter.num_hash_functions(),
            creation_time,
            insert_rate,
            query_rate,
            missed,
            observed_fpr,
            filter.parameters().expected_fpr,
        ));
    }

    println!("\nResults (CSV format):");
    println!("capacity,num_bits,num_hashes,creation_time,insert_rate,query_rate,false_negatives,observed_fpr,expected_fpr,target_fpr");

    for (
        capacity,
        num_bits,
        num_hashes,
        creation_time,
        insert_rate,
        query_rate,
        missed,
        observed_fpr,
        expected_fpr,
    ) in &results
    {
        println!(
            "{},{},{},{:.6},{:.0},{:.0},{},{:.6},{:.6},{:.6}",
            capacity,
            num_bits,
            num_hashes,
            creation_time,
            insert_rate,
            query_rate,
            missed,
            observed_fpr,
            expected_fpr,
            TARGET_FPR
        );
    }

    Ok(())
}
