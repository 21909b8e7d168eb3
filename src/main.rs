use clap::Parser;
use rand::{Rng, SeedableRng, rngs::StdRng};
use rwset::{
    sets::concurrent::ConcurrentSet,
    statistics::{StressStats, worker_key_range},
};
use serde::Serialize;
use std::{ops::Range, sync::Arc, thread};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Stress driver for the concurrent set
#[derive(Parser, Debug)]
#[command(name = "rwset")]
#[command(about = "Hammers a shared concurrent set with randomized operations", long_about = None)]
struct Args {
    /// Number of worker threads (comma-separated list, e.g., "1,2,4,8")
    #[arg(short, long, value_delimiter = ',', default_value = "1,2,4,8")]
    threads: Vec<usize>,

    /// Operations performed by each worker
    #[arg(short, long, default_value_t = 100_000)]
    ops: usize,

    /// Number of distinct keys each worker draws from
    #[arg(short, long, default_value_t = 1024, value_parser = clap::value_parser!(u64).range(1..))]
    key_space: u64,

    /// Base seed for the per-worker random generators
    #[arg(short, long, default_value_t = 42)]
    seed: u64,

    /// All workers contend on the same key range instead of disjoint ones.
    /// Disables the final consistency check.
    #[arg(long)]
    shared: bool,

    /// Print each run's report as a JSON line
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct StressReport {
    threads: usize,
    ops_per_thread: usize,
    shared: bool,
    elapsed_secs: f64,
    ops_per_sec: f64,
    final_size: usize,
    /// Only checked with disjoint key ranges
    consistent: Option<bool>,
    stats: StressStats,
}

fn run_stress_job(args: &Args, key_ranges: Vec<Range<u64>>) -> StressReport {
    let num_threads = key_ranges.len();
    let set: Arc<ConcurrentSet<u64>> = Arc::new(ConcurrentSet::new());
    let start_time = std::time::Instant::now();

    let handles: Vec<_> = key_ranges
        .into_iter()
        .enumerate()
        .map(|(thread_id, keys)| {
            let set = Arc::clone(&set);
            let ops = args.ops;
            let mut rng = StdRng::seed_from_u64(args.seed.wrapping_add(thread_id as u64));

            thread::spawn(move || {
                let mut local_stats = StressStats::new();
                // net membership of this worker's keys, meaningful for disjoint ranges only
                let mut model = hashbrown::HashSet::new();

                for _ in 0..ops {
                    let key = rng.random_range(keys.clone());
                    match rng.random_range(0..3) {
                        0 => {
                            set.insert(key);
                            model.insert(key);
                            local_stats.bump_inserts();
                        }
                        1 => {
                            set.remove(&key);
                            model.remove(&key);
                            local_stats.bump_removes();
                        }
                        _ => {
                            local_stats.bump_lookups(set.contains(&key));
                        }
                    }
                }

                debug!(thread_id, members = model.len(), "worker done");
                (model, local_stats)
            })
        })
        .collect();

    let mut models = Vec::with_capacity(num_threads);
    let mut combined_stats = StressStats::new();
    for handle in handles {
        let (model, local_stats) = handle.join().expect("Thread panicked");
        models.push(model);
        combined_stats = combined_stats.merge(&local_stats)
    }
    let elapsed = start_time.elapsed();

    let final_size = set.len();
    let consistent = (!args.shared).then(|| {
        let expected: usize = models.iter().map(|model| model.len()).sum();
        let all_present = models.iter().flatten().all(|key| set.contains(key));
        if expected != final_size || !all_present {
            error!(expected, final_size, all_present, "set diverged from worker models");
        }
        expected == final_size && all_present
    });

    StressReport {
        threads: num_threads,
        ops_per_thread: args.ops,
        shared: args.shared,
        elapsed_secs: elapsed.as_secs_f64(),
        ops_per_sec: combined_stats.throughput(elapsed),
        final_size,
        consistent,
        stats: combined_stats,
    }
}

fn print_report(report: &StressReport) {
    println!("\n==========");
    println!(
        "threads={}, ops/thread={}, shared={}",
        report.threads, report.ops_per_thread, report.shared
    );
    println!("==========");
    println!(
        "  {} inserts, {} removes, {} lookups ({:.2}% hits)",
        report.stats.get_inserts(),
        report.stats.get_removes(),
        report.stats.get_lookups(),
        report.stats.hit_rate() * 100.0
    );
    println!("  Final size: {}", report.final_size);
    match report.consistent {
        Some(true) => println!("  Consistency check: ok"),
        Some(false) => println!("  Consistency check: FAILED"),
        None => println!("  Consistency check: skipped (shared keys)"),
    }
    println!(
        "Completed {} ops in {:.2}s ({:.2} ops/s)",
        report.stats.total_ops(),
        report.elapsed_secs,
        report.ops_per_sec
    );
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_thread_ids(true)
        .init();

    let args = Args::parse();
    info!(threads = ?args.threads, ops = args.ops, key_space = args.key_space, "starting sweep");

    let mut failures = 0;
    for &num_threads in &args.threads {
        let key_ranges: Option<Vec<_>> = (0..num_threads)
            .map(|thread_id| worker_key_range(thread_id, args.key_space, args.shared))
            .collect();
        let Some(key_ranges) = key_ranges else {
            error!(
                threads = num_threads,
                key_space = args.key_space,
                "disjoint key ranges do not fit in u64, lower --key-space or use --shared"
            );
            std::process::exit(2);
        };

        let report = run_stress_job(&args, key_ranges);
        if report.consistent == Some(false) {
            failures += 1;
        }

        if args.json {
            match serde_json::to_string(&report) {
                Ok(line) => println!("{line}"),
                Err(err) => error!(%err, "could not encode report"),
            }
        } else {
            print_report(&report);
        }
    }

    info!(runs = args.threads.len(), failures, "sweep completed");
    if failures > 0 {
        std::process::exit(1);
    }
}
