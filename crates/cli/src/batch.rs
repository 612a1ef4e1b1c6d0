//! One-shot subcommands for scripts.
//!
//! Every command runs headless: an ambiguous query is an error, never a
//! prompt. Results and errors are printed to stdout as JSON. Commands that
//! change the catalog save it only when they succeed.

use anyhow::{Context, Result};
use catalog::{persistence, CatalogError, ErrorKind};
use serde::Serialize;
use service::{CatalogService, HeadlessSelection, Mode};
use std::path::Path;

pub type HeadlessService = CatalogService<HeadlessSelection>;

#[derive(Debug, Serialize)]
struct ErrorReport {
    error: String,
    kind: ErrorKind,
}

/// Print the outcome of one operation as JSON
///
/// A failed operation is printed as `{"error": ..., "kind": ...}` and then
/// returned so the process exits non-zero.
fn emit<T: Serialize>(outcome: catalog::Result<T>) -> Result<()> {
    match outcome {
        Ok(payload) => {
            println!("{}", serde_json::to_string_pretty(&payload)?);
            Ok(())
        }
        Err(err) => {
            println!("{}", render_error(&err)?);
            Err(anyhow::Error::new(err))
        }
    }
}

fn render_error(err: &CatalogError) -> Result<String> {
    let report = ErrorReport {
        error: err.to_string(),
        kind: err.kind(),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

fn save(service: &HeadlessService, db_path: &Path) -> Result<()> {
    persistence::save_file(service.store(), db_path)
        .with_context(|| format!("Failed to save catalog to {}", db_path.display()))
}

pub fn handle_rate(service: &mut HeadlessService, query: &str, rating: i64, db_path: &Path) -> Result<()> {
    emit(service.add_rating(query, rating, Mode::Headless))?;
    save(service, db_path)
}

pub fn handle_add(service: &mut HeadlessService, title: &str, db_path: &Path) -> Result<()> {
    emit(service.add_entry(title))?;
    save(service, db_path)
}

pub fn handle_delete(service: &mut HeadlessService, query: &str, db_path: &Path) -> Result<()> {
    emit(service.delete_entry(query, Mode::Headless))?;
    save(service, db_path)
}

pub fn handle_average(service: &mut HeadlessService, query: &str) -> Result<()> {
    emit(service.get_average(query, Mode::Headless))
}

pub fn handle_ratings(service: &mut HeadlessService, query: &str) -> Result<()> {
    emit(service.get_all_ratings(query, Mode::Headless))
}

pub fn handle_top(service: &HeadlessService) -> Result<()> {
    emit(service.get_top_rated())
}

pub fn handle_list(service: &HeadlessService) -> Result<()> {
    emit(Ok(service.list_all()))
}
