use chain_hash::HashCode;
use chain_hash::HashTable;
use chain_hash::TableConfig;
use chain_hash::hash_table::Entry;
use clap::Parser;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short = 'n', long = "entries", default_value_t = 1000)]
    entries: u64,

    #[arg(short = 's', long = "stride", default_value_t = 1)]
    stride: u64,

    #[arg(short = 't', long = "threshold", default_value_t = 0.75)]
    threshold: f64,
}

fn main() {
    let args = Args::parse();

    let mut table: HashTable<u64> =
        HashTable::with_config(TableConfig::new().with_threshold(args.threshold));

    println!(
        "Filling table with {} keys (stride {}, threshold {:.2})...",
        args.entries,
        args.stride,
        table.threshold()
    );

    let mut rehashes = 0;
    for i in 0..args.entries {
        let key = i * args.stride;
        let before = table.capacity();

        match table.entry(key.hash_code(), |&v| v == key) {
            Entry::Vacant(entry) => {
                entry.insert(key);
            }
            Entry::Occupied(_) => {
                panic!("Value already exists in table: {}", key);
            }
        }

        if table.capacity() != before {
            rehashes += 1;
            println!("  rehash {}: {} -> {} buckets", rehashes, before, table.capacity());
        }
    }

    println!("Inserted {} values into table", table.len());
    println!("Final load factor: {:.2}%", table.load_factor() * 100.0);

    table.print_chain_histogram();
    table.chain_stats().print();
}
