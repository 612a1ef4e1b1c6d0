use catalog::{persistence, CatalogStore};
use std::env;
use std::path::PathBuf;
use std::time::Instant;

fn main() {
    let path = env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("MovieDB.json"));

    println!("Loading catalog from {}...\n", path.display());

    let start = Instant::now();
    let mut store = CatalogStore::new();
    let report = persistence::load_file(&mut store, &path).expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let ratings: u64 = store.all().map(|e| e.rating_count()).sum();

    println!("=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", store.len());
    println!("Ratings: {}", ratings);
    println!("Ids backfilled: {}", report.backfilled_ids.len());
    println!("Movies with dropped ratings: {}", report.dropped.len());
    println!("\nPerformance: {:.0} ratings/second",
             ratings as f64 / elapsed.as_secs_f64());
}
