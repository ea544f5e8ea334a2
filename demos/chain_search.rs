//! Compares a linear scan over an array of unique keys with a chain scan in a
//! fixed-size chained table holding the same keys.

use chain_hash::HashSet;
use chain_hash::TableConfig;
use clap::Parser;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

#[derive(Parser, Debug)]
struct Args {
    /// Number of unique keys
    #[arg(short = 'n', long = "keys", default_value_t = 1000)]
    keys: usize,

    /// Smallest key
    #[arg(long = "min", default_value_t = 1000)]
    min: i64,

    /// Largest key
    #[arg(long = "max", default_value_t = 9999)]
    max: i64,

    /// Bucket count, kept fixed for the whole run
    #[arg(short = 'm', long = "buckets", default_value_t = 79)]
    buckets: usize,

    /// Number of lookups
    #[arg(short = 'q', long = "queries", default_value_t = 50)]
    queries: usize,

    #[arg(long = "seed", default_value_t = 20250926)]
    seed: u64,

    /// Print every bucket
    #[arg(long = "show-buckets")]
    show_buckets: bool,
}

fn linear_comparisons(keys: &[i64], key: i64) -> usize {
    match keys.iter().position(|&k| k == key) {
        Some(pos) => pos + 1,
        None => keys.len(),
    }
}

fn main() {
    let args = Args::parse();

    let range = (args.max - args.min + 1).max(0) as usize;
    if args.keys > range {
        eprintln!(
            "cannot draw {} unique keys from [{}, {}]",
            args.keys, args.min, args.max
        );
        std::process::exit(2);
    }

    let mut rng = SmallRng::seed_from_u64(args.seed);
    let mut table = HashSet::with_config(
        TableConfig::new()
            .with_initial_capacity(args.buckets)
            .with_growth(false),
    );

    let mut inserted = Vec::with_capacity(args.keys);
    while inserted.len() < args.keys {
        let key = rng.random_range(args.min..=args.max);
        if table.insert(key) {
            inserted.push(key);
        }
    }

    let mut queries = inserted.clone();
    queries.shuffle(&mut rng);
    queries.truncate(args.queries);

    let mut total_linear = 0usize;
    let mut total_chain = 0usize;
    for &q in &queries {
        total_linear += linear_comparisons(&inserted, q);
        total_chain += table.comparisons(&q);
    }

    let q = queries.len().max(1) as f64;
    let avg_linear = total_linear as f64 / q;
    let avg_chain = total_chain as f64 / q;

    println!("=== SETUP ===");
    println!("Keys (N)      : {}", inserted.len());
    println!("Key range     : [{}, {}] (unique)", args.min, args.max);
    println!("Buckets (m)   : {} (division method, chaining)", table.capacity());
    println!("Queries (Q)   : {}", queries.len());

    println!();
    println!("=== BUCKETS ===");
    println!("Average chain : {:.2}", table.avg_chain_length());
    println!("Longest chain : {}", table.max_chain_length());
    if args.show_buckets {
        print!("{}", table.bucket_snapshot());
    }

    println!();
    println!("=== COMPARISONS ===");
    println!("Total, linear scan : {}", total_linear);
    println!("Total, chain scan  : {}", total_chain);
    println!("Per query, linear  : {:.2}", avg_linear);
    println!("Per query, chain   : {:.2}", avg_chain);

    println!();
    if avg_chain < avg_linear {
        println!("Chain scan needed fewer comparisons than the linear scan.");
    } else if avg_chain > avg_linear {
        println!("Linear scan needed fewer comparisons; the buckets are badly skewed.");
    } else {
        println!("Both scans needed the same number of comparisons.");
    }
}
