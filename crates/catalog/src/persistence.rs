//! Loading and saving the catalog file.
//!
//! The file is a JSON array of records:
//!
//! ```text
//! [
//!   {
//!     "id": "A1B2C3D4",
//!     "title": "Matrix",
//!     "ratings": [4, 5],
//!     "ratingCount": 2,
//!     "ratingSum": 9,
//!     "averageRating": 4.5
//!   }
//! ]
//! ```
//!
//! Loading never trusts the stored aggregates. Each record goes through
//! ingestion:
//! 1. Ratings that are not whole numbers in range are dropped (and reported)
//! 2. Count, sum and average are recomputed from what remains
//! 3. A missing or malformed id is replaced with a freshly generated one
//! 4. A record whose id was already loaded replaces the earlier record in place
//!
//! Steps 1 and 2 are independent per record and run in parallel with Rayon;
//! step 3 runs sequentially because it consults the live store.

use crate::error::{CatalogError, Result};
use crate::store::{CatalogStore, MAX_ID_ATTEMPTS};
use crate::types::{Entry, EntryId, Rating};
use rayon::prelude::*;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// One record as found on disk, before validation
///
/// Everything is lenient here: a bad field must not stop the rest of the
/// file from loading. A title that is not a string counts as blank. A
/// missing or `null` `ratings` means no ratings; any other non-array value
/// also loads as no ratings but is reported as dropped. Stored aggregates are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct StoredEntry {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub ratings: Option<Value>,
}

/// Ratings removed from one entry during ingestion
#[derive(Debug, Clone, PartialEq)]
pub struct DroppedRatings {
    pub id: EntryId,
    pub title: String,
    pub values: Vec<Value>,
}

/// What happened while loading a catalog file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// The file did not exist; the catalog starts empty
    pub file_missing: bool,
    pub loaded: usize,
    /// Records skipped because their title was blank
    pub skipped_untitled: usize,
    /// Ids generated for records whose id was missing or malformed
    pub backfilled_ids: Vec<EntryId>,
    /// Ids claimed by more than one record; the later record replaced the earlier
    pub overwritten: Vec<EntryId>,
    pub dropped: Vec<DroppedRatings>,
}

/// Record after the per-record (parallel) part of ingestion
struct PreparedEntry {
    id: Option<EntryId>,
    title: String,
    ratings: Vec<Rating>,
    rejected: Vec<Value>,
}

impl PreparedEntry {
    fn from_record(record: StoredEntry) -> Self {
        let id = record
            .id
            .as_ref()
            .and_then(Value::as_str)
            .and_then(EntryId::parse);

        let title = match record.title {
            Some(Value::String(title)) => title,
            _ => String::new(),
        };

        let values = match record.ratings {
            None => Vec::new(),
            Some(Value::Array(values)) => values,
            Some(other) => {
                return Self {
                    id,
                    title,
                    ratings: Vec::new(),
                    rejected: vec![other],
                };
            }
        };

        let (ratings, rejected): (Vec<_>, Vec<_>) = values
            .into_iter()
            .map(|value| parse_rating(&value).ok_or(value))
            .partition(|parsed| parsed.is_ok());

        Self {
            id,
            title,
            ratings: ratings.into_iter().flatten().collect(),
            rejected: rejected.into_iter().filter_map(|r| r.err()).collect(),
        }
    }
}

/// Accept whole numbers in range, including `4.0`-style floats
fn parse_rating(value: &Value) -> Option<Rating> {
    let whole = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && f.is_finite())
            .map(|f| f as i64)
    })?;
    Rating::new(whole)
}

/// Load `path` into `store`
///
/// A missing file is not an error: the store is left untouched and the
/// report says so.
pub fn load_file(store: &mut CatalogStore, path: &Path) -> Result<LoadReport> {
    if !path.exists() {
        info!(path = %path.display(), "no catalog file found, starting with an empty catalog");
        return Ok(LoadReport {
            file_missing: true,
            ..LoadReport::default()
        });
    }

    let data = fs::read_to_string(path)?;
    let report = load_str(store, &data)?;
    info!(
        path = %path.display(),
        loaded = report.loaded,
        backfilled = report.backfilled_ids.len(),
        "catalog loaded"
    );
    Ok(report)
}

/// Parse a JSON catalog and ingest it into `store`
pub fn load_str(store: &mut CatalogStore, json: &str) -> Result<LoadReport> {
    let records: Vec<StoredEntry> = serde_json::from_str(json)?;
    ingest(store, records)
}

/// Validate records and insert them into `store` in file order
pub fn ingest(store: &mut CatalogStore, records: Vec<StoredEntry>) -> Result<LoadReport> {
    let prepared: Vec<PreparedEntry> = records
        .into_par_iter()
        .map(PreparedEntry::from_record)
        .collect();

    // Ids that later records will claim; a backfilled id must not take one
    let reserved: HashSet<EntryId> = prepared.iter().filter_map(|p| p.id.clone()).collect();

    let mut report = LoadReport::default();
    for entry in prepared {
        if entry.title.trim().is_empty() {
            warn!(id = ?entry.id, "skipping movie record with an empty title");
            report.skipped_untitled += 1;
            continue;
        }

        let id = match entry.id {
            Some(id) => id,
            None => {
                let id = backfill_id(store, &reserved)?;
                warn!(title = %entry.title, %id, "movie record had no valid id, assigned a new one");
                report.backfilled_ids.push(id.clone());
                id
            }
        };

        if !entry.rejected.is_empty() {
            warn!(
                title = %entry.title,
                %id,
                removed = ?entry.rejected,
                "invalid ratings removed"
            );
            report.dropped.push(DroppedRatings {
                id: id.clone(),
                title: entry.title.clone(),
                values: entry.rejected,
            });
        }

        if store.contains(&id) {
            warn!(title = %entry.title, %id, "duplicate movie id, later record replaces the earlier one");
            report.overwritten.push(id.clone());
        } else {
            report.loaded += 1;
        }
        store.put(Entry::with_ratings(id, entry.title, entry.ratings));
    }

    Ok(report)
}

fn backfill_id(store: &mut CatalogStore, reserved: &HashSet<EntryId>) -> Result<EntryId> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let id = store.generate_id()?;
        if !reserved.contains(&id) {
            return Ok(id);
        }
    }
    Err(CatalogError::IdExhaustion {
        attempts: MAX_ID_ATTEMPTS,
    })
}

/// Serialize every entry, in enumeration order, as pretty-printed JSON
pub fn to_json(store: &CatalogStore) -> Result<String> {
    let entries: Vec<&Entry> = store.all().collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

/// Overwrite `path` with the current catalog
pub fn save_file(store: &CatalogStore, path: &Path) -> Result<()> {
    fs::write(path, to_json(store)?)?;

    info!(path = %path.display(), entries = store.len(), "catalog saved");
    Ok(())
}
