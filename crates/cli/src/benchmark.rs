//! Concurrent load generator for the catalog service.
//!
//! Workers share one headless service behind a mutex and issue a random mix
//! of operations against the movies that exist when the run starts. The
//! catalog is never saved afterwards.

use anyhow::{anyhow, bail, Result};
use catalog::{CatalogStore, EntryId};
use colored::Colorize;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use service::{CatalogService, HeadlessSelection, Mode};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::{debug, info};

type SharedService = Arc<Mutex<CatalogService<HeadlessSelection>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Operation {
    AddRating,
    GetAverage,
    GetAllRatings,
    GetTopRated,
}

impl Operation {
    const ALL: [Operation; 4] = [
        Operation::AddRating,
        Operation::GetAverage,
        Operation::GetAllRatings,
        Operation::GetTopRated,
    ];

    fn label(self) -> &'static str {
        match self {
            Operation::AddRating => "add_rating",
            Operation::GetAverage => "get_average",
            Operation::GetAllRatings => "get_all_ratings",
            Operation::GetTopRated => "get_top_rated",
        }
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    succeeded: usize,
    failed: usize,
}

/// What one worker observed
#[derive(Debug, Default)]
struct WorkerReport {
    latencies: Vec<Duration>,
    tallies: BTreeMap<Operation, Tally>,
    first_error: Option<String>,
}

impl WorkerReport {
    fn record(&mut self, op: Operation, latency: Duration, outcome: catalog::Result<()>) {
        self.latencies.push(latency);
        let tally = self.tallies.entry(op).or_default();
        match outcome {
            Ok(()) => tally.succeeded += 1,
            Err(err) => {
                tally.failed += 1;
                self.first_error.get_or_insert_with(|| err.to_string());
            }
        }
    }

    fn merge(&mut self, other: WorkerReport) {
        self.latencies.extend(other.latencies);
        for (op, tally) in other.tallies {
            let mine = self.tallies.entry(op).or_default();
            mine.succeeded += tally.succeeded;
            mine.failed += tally.failed;
        }
        if self.first_error.is_none() {
            self.first_error = other.first_error;
        }
    }
}

/// Split `operations` across `workers`, handing the remainder to the first ones
fn shares(operations: usize, workers: usize) -> Vec<usize> {
    (0..workers)
        .map(|worker| operations / workers + usize::from(worker < operations % workers))
        .collect()
}

/// Latency at quantile `q` of an ascending, non-empty slice
fn percentile(sorted: &[Duration], q: f64) -> Duration {
    let index = ((sorted.len() as f64 * q) as usize).min(sorted.len() - 1);
    sorted[index]
}

fn run_worker(
    service: &Mutex<CatalogService<HeadlessSelection>>,
    ids: &[EntryId],
    operations: usize,
    seed: u64,
) -> Result<WorkerReport> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = WorkerReport::default();

    for _ in 0..operations {
        let op = Operation::ALL[rng.random_range(0..Operation::ALL.len())];
        let id = &ids[rng.random_range(0..ids.len())];
        let rating: i64 = rng.random_range(1..=5);

        let start = Instant::now();
        let outcome = {
            let mut service = service
                .lock()
                .map_err(|_| anyhow!("catalog lock poisoned by another worker"))?;
            match op {
                Operation::AddRating => service.add_rating(id.as_str(), rating, Mode::Headless).map(drop),
                Operation::GetAverage => service.get_average(id.as_str(), Mode::Headless).map(drop),
                Operation::GetAllRatings => service.get_all_ratings(id.as_str(), Mode::Headless).map(drop),
                Operation::GetTopRated => service.get_top_rated().map(drop),
            }
        };
        report.record(op, start.elapsed(), outcome);
    }

    debug!(seed, operations, "worker finished");
    Ok(report)
}

/// Handle the 'benchmark' command
pub async fn handle_benchmark(
    store: CatalogStore,
    operations: usize,
    workers: usize,
    seed: Option<u64>,
) -> Result<()> {
    if workers == 0 {
        bail!("--workers must be at least 1");
    }
    if operations == 0 {
        bail!("--operations must be at least 1");
    }

    let ids: Arc<Vec<EntryId>> = Arc::new(store.all().map(|e| e.id().clone()).collect());
    if ids.is_empty() {
        bail!("The catalog is empty; add a movie before benchmarking");
    }

    let base_seed = seed.unwrap_or_else(rand::random);
    info!(operations, workers, movies = ids.len(), base_seed, "starting benchmark");

    let service: SharedService = Arc::new(Mutex::new(CatalogService::new(store, HeadlessSelection)));

    let start = Instant::now();
    let mut handles = vec![];
    for (worker, share) in shares(operations, workers).into_iter().enumerate() {
        let service = Arc::clone(&service);
        let ids = Arc::clone(&ids);
        let seed = base_seed.wrapping_add(worker as u64);
        handles.push(tokio::task::spawn_blocking(move || {
            run_worker(&service, &ids, share, seed)
        }));
    }

    let mut report = WorkerReport::default();
    for handle in handles {
        report.merge(handle.await??);
    }
    let wall_time = start.elapsed();

    print_report(&mut report, wall_time);
    Ok(())
}

fn print_report(report: &mut WorkerReport, wall_time: Duration) {
    report.latencies.sort();
    let timings = &report.latencies;
    let total: Duration = timings.iter().sum();
    let avg_latency = total / (timings.len() as u32);
    let throughput = timings.len() as f64 / wall_time.as_secs_f64();

    println!("{}", "Benchmark results:".bold().blue());
    println!("Operations: {}", timings.len());
    println!("Total time: {:?}", wall_time);
    println!("Average latency: {:?}", avg_latency);
    println!("P50 latency: {:?}", percentile(timings, 0.50));
    println!("P95 latency: {:?}", percentile(timings, 0.95));
    println!("P99 latency: {:?}", percentile(timings, 0.99));
    println!("Throughput: {:.2} operations/second", throughput);

    println!("{}", "Per operation:".bold());
    for (op, tally) in &report.tallies {
        println!(
            "  {:<16} {} ok, {} failed",
            op.label(),
            tally.succeeded.to_string().green(),
            tally.failed.to_string().red()
        );
    }
    if let Some(err) = &report.first_error {
        println!("First error: {}", err.yellow());
    }
}
