mod batch;
mod benchmark;
mod display;
mod menu;
mod prompt;

use anyhow::{Context, Result};
use catalog::{persistence, CatalogStore};
use clap::{Parser, Subcommand};
use service::{CatalogService, HeadlessSelection};
use std::path::{Path, PathBuf};
use std::rc::Rc;
use tracing_subscriber::EnvFilter;

use crate::prompt::InteractiveSelection;

/// Movie Ratings - in-memory movie catalog with viewer ratings
#[derive(Parser)]
#[command(name = "movie-ratings")]
#[command(about = "Rate movies, look up averages and find the top-rated title", long_about = None)]
struct Cli {
    /// Path to the JSON catalog file
    #[arg(short, long, default_value = "MovieDB.json")]
    db: PathBuf,

    /// Run one command and exit; without one, the interactive menu starts
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a rating to a movie
    Rate {
        /// Movie id prefix or part of its title
        query: String,

        /// Rating from 1 to 5
        #[arg(allow_negative_numbers = true)]
        rating: i64,
    },

    /// Show a movie's average rating
    Average {
        /// Movie id prefix or part of its title
        query: String,
    },

    /// Show the movie with the highest average rating
    Top,

    /// Show every rating of a movie
    Ratings {
        /// Movie id prefix or part of its title
        query: String,
    },

    /// Add a movie with no ratings
    Add {
        /// Title of the new movie
        title: String,
    },

    /// Delete a movie
    Delete {
        /// Movie id prefix or part of its title
        query: String,
    },

    /// List every movie
    List,

    /// Run a concurrent load test against the loaded catalog (never saved)
    Benchmark {
        /// Total number of operations across all workers
        #[arg(long, default_value = "1000000")]
        operations: usize,

        /// Number of concurrent workers
        #[arg(long, default_value = "4")]
        workers: usize,

        /// Seed for the operation mix (random if omitted)
        #[arg(long)]
        seed: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays clean for the menu and JSON output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut store = CatalogStore::new();
    let report = persistence::load_file(&mut store, &cli.db)
        .with_context(|| format!("Failed to load catalog from {}", cli.db.display()))?;

    let Some(command) = cli.command else {
        display::print_load_report(&report, &cli.db);
        return handle_interactive(store, &cli.db);
    };

    let mut service = CatalogService::new(store, HeadlessSelection);
    match command {
        Commands::Rate { query, rating } => batch::handle_rate(&mut service, &query, rating, &cli.db)?,
        Commands::Average { query } => batch::handle_average(&mut service, &query)?,
        Commands::Top => batch::handle_top(&service)?,
        Commands::Ratings { query } => batch::handle_ratings(&mut service, &query)?,
        Commands::Add { title } => batch::handle_add(&mut service, &title, &cli.db)?,
        Commands::Delete { query } => batch::handle_delete(&mut service, &query, &cli.db)?,
        Commands::List => batch::handle_list(&service)?,
        Commands::Benchmark {
            operations,
            workers,
            seed,
        } => benchmark::handle_benchmark(service.into_store(), operations, workers, seed).await?,
    }

    Ok(())
}

/// Handle the interactive menu
fn handle_interactive(store: CatalogStore, db_path: &Path) -> Result<()> {
    let input = prompt::stdin_input();
    let selector = InteractiveSelection::new(Rc::clone(&input));
    let mut service = CatalogService::new(store, selector);
    menu::run_menu(&mut service, &input, db_path)
}
