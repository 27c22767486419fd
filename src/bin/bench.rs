//! memrep Bench Binary
//!
//! Drives one table representation through a synthetic write buffer
//! lifecycle: concurrent inserts, point lookups, freeze, flush-style scan.

use std::sync::Arc;
use std::time::{Duration, Instant};

use clap::Parser;
use memrep::{
    Config, InternalKeyComparator, LookupKey, ParsedEntry, RepFactory, TableRep, ValueType,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing_subscriber::{fmt, EnvFilter};

/// memrep Bench
#[derive(Parser, Debug)]
#[command(name = "memrep-bench")]
#[command(about = "Exercise a table representation with a synthetic workload")]
#[command(version)]
struct Args {
    /// Representation name (vector, never_sorted_vector, sorted_vector, linklist, serial_linklist)
    #[arg(short, long, default_value = "vector")]
    rep: String,

    /// Number of entries to insert
    #[arg(short, long, default_value = "100000")]
    entries: usize,

    /// Number of inserting threads
    #[arg(short, long, default_value = "4")]
    threads: usize,

    /// Number of point lookups issued while the table is mutable
    #[arg(short, long, default_value = "1000")]
    lookups: usize,

    /// Value size in bytes
    #[arg(short, long, default_value = "64")]
    value_size: usize,

    /// Seed for the key order
    #[arg(short, long, default_value = "42")]
    seed: u64,
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(true)
        .init();

    let args = Args::parse();

    tracing::info!("memrep bench v{}", memrep::VERSION);

    let config = match Config::builder()
        .rep_name(&args.rep)
        .and_then(|b| b.expected_entries(args.entries).build())
    {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let factory = match RepFactory::from_config(&config) {
        Ok(f) => f,
        Err(e) => {
            tracing::error!("Failed to build factory: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!(
        "Representation: {} ({} entries, {} threads)",
        factory.name(),
        args.entries,
        args.threads
    );

    let rep = Arc::new(factory.create_with_new_arena(Arc::new(InternalKeyComparator)));

    let mut rng = StdRng::seed_from_u64(args.seed);
    let mut keys: Vec<u64> = (0..args.entries as u64).collect();
    keys.shuffle(&mut rng);

    let insert_time = insert_all(&rep, &keys, args.threads.max(1), args.value_size);
    tracing::info!(
        "Inserted {} entries in {:?} ({:.0} ns/op)",
        rep.len(),
        insert_time,
        per_op_nanos(insert_time, keys.len())
    );

    let (found, lookup_time) = lookup_some(&rep, args.entries as u64, args.lookups, &mut rng);
    tracing::info!(
        "Point lookups: {}/{} found in {:?} ({:.0} ns/op)",
        found,
        args.lookups,
        lookup_time,
        per_op_nanos(lookup_time, args.lookups)
    );

    rep.mark_read_only();

    let start = Instant::now();
    let scanned = rep.iter().into_entries().count();
    let scan_time = start.elapsed();
    tracing::info!("Flush scan: {} entries in {:?}", scanned, scan_time);

    let stats = rep.stats();
    tracing::info!(
        "Snapshots: {} ({:?}), sorts: {} ({:?})",
        stats.snapshots_created,
        stats.snapshot_time,
        stats.sorts,
        stats.sort_time
    );
    tracing::info!(
        "Index memory: {} bytes, arena memory: {} bytes",
        rep.approximate_memory_usage(),
        rep.arena().memory_usage()
    );
}

/// Split `keys` across `threads` writers; sequence numbers follow key order
fn insert_all(rep: &Arc<TableRep>, keys: &[u64], threads: usize, value_size: usize) -> Duration {
    let chunk = keys.len().div_ceil(threads).max(1);
    let value = vec![b'v'; value_size];
    let start = Instant::now();

    let result = crossbeam::scope(|s| {
        for (t, part) in keys.chunks(chunk).enumerate() {
            let rep = Arc::clone(rep);
            let value = &value;
            s.spawn(move |_| {
                for (i, key) in part.iter().enumerate() {
                    let sequence = (t * chunk + i + 1) as u64;
                    rep.insert_entry(sequence, ValueType::Value, &key.to_be_bytes(), value);
                }
            });
        }
    });
    if result.is_err() {
        tracing::error!("An insert thread panicked");
        std::process::exit(1);
    }

    start.elapsed()
}

fn lookup_some(rep: &TableRep, key_space: u64, lookups: usize, rng: &mut StdRng) -> (usize, Duration) {
    let start = Instant::now();
    let mut found = 0;
    for _ in 0..lookups {
        // Half the probes miss: keys in [key_space, 2 * key_space) were never inserted
        let key: u64 = rng.gen_range(0..key_space.max(1) * 2);
        let user_key = key.to_be_bytes();
        let lookup = LookupKey::latest(&user_key);
        rep.get(&lookup, |entry| {
            if matches!(ParsedEntry::parse(entry), Ok(parsed) if parsed.user_key == &user_key[..]) {
                found += 1;
            }
            false
        });
    }
    (found, start.elapsed())
}

fn per_op_nanos(elapsed: Duration, ops: usize) -> f64 {
    if ops == 0 {
        return 0.0;
    }
    elapsed.as_nanos() as f64 / ops as f64
}
