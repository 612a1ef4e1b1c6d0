//! # Catalog Service
//!
//! This module implements the public operations of the movie catalog:
//! 1. Add a rating to a movie found by partial id or title
//! 2. Add and delete movies
//! 3. Query a movie's average and full rating history
//! 4. Find the top-rated movie
//! 5. List the whole catalog
//!
//! Every query-taking operation resolves its query the same way:
//! - zero matches → `NotFound`
//! - one match → proceed
//! - several matches → ask the injected `SelectionStrategy` (interactive
//!   mode) or fail with `Ambiguous` (headless mode)
//!
//! Each operation either succeeds completely or leaves the catalog exactly
//! as it was.

use catalog::{
    aggregate, resolve, CatalogError, CatalogStore, Entry, EntryId, Rating, Result,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::selection::{Selection, SelectionStrategy};

/// How ambiguity is handled for one call
///
/// The mode never changes what a given choice does to the catalog; it only
/// decides whether a human is asked to make the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Several matches are offered to the selection strategy
    #[default]
    Interactive,
    /// Several matches are an `Ambiguous` error
    Headless,
}

// =============================================================================
// Operation results
// =============================================================================

/// A rating was recorded
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAdded {
    pub rating: Rating,
    /// The entry as it stands after the rating
    pub entry: Entry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryAdded {
    pub id: EntryId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryDeleted {
    pub id: EntryId,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageRating {
    pub id: EntryId,
    pub title: String,
    pub average_rating: f64,
    pub rating_count: u64,
}

/// Every rating of one movie, untruncated
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingHistory {
    pub id: EntryId,
    pub title: String,
    pub ratings: Vec<Rating>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopRated {
    pub id: EntryId,
    pub title: String,
    pub average_rating: f64,
    pub rating_count: u64,
}

// =============================================================================
// CatalogService
// =============================================================================

/// Orchestrates store, resolver and selection strategy
///
/// Rust concept: generic over the strategy instead of boxing it, so a
/// headless service is `Send` and can sit behind a `Mutex` while an
/// interactive one may hold non-`Send` terminal handles.
pub struct CatalogService<S> {
    store: CatalogStore,
    selector: S,
}

impl<S: SelectionStrategy> CatalogService<S> {
    pub fn new(store: CatalogStore, selector: S) -> Self {
        Self { store, selector }
    }

    pub fn store(&self) -> &CatalogStore {
        &self.store
    }

    pub fn into_store(self) -> CatalogStore {
        self.store
    }

    /// Add `value` to the movie matching `query`
    ///
    /// Resolution happens before validation, so an unknown movie reports
    /// `NotFound` even when the rating is also out of range.
    pub fn add_rating(&mut self, query: &str, value: i64, mode: Mode) -> Result<RatingAdded> {
        let id = self.resolve_one(query, mode)?;
        let rating = Rating::new(value).ok_or(CatalogError::InvalidRating { value })?;
        let entry = self.store.get_mut(&id).ok_or_else(|| CatalogError::NotFound {
            query: query.trim().to_string(),
        })?;

        aggregate::record_rating(entry, rating);
        info!(
            id = %entry.id(),
            title = entry.title(),
            rating = %rating,
            average = entry.average_rating(),
            "rating added"
        );

        Ok(RatingAdded {
            rating,
            entry: entry.clone(),
        })
    }

    /// Create a movie with no ratings under a fresh id
    ///
    /// The title is stored trimmed.
    pub fn add_entry(&mut self, title: &str) -> Result<EntryAdded> {
        let title = title.trim();
        if title.is_empty() {
            return Err(CatalogError::InvalidTitle);
        }

        let id = self.store.generate_id()?;
        self.store.put(Entry::new(id.clone(), title));
        info!(%id, title, "movie added");

        Ok(EntryAdded {
            id,
            title: title.to_string(),
        })
    }

    /// Remove the movie matching `query` (and its cache entry)
    pub fn delete_entry(&mut self, query: &str, mode: Mode) -> Result<EntryDeleted> {
        let id = self.resolve_one(query, mode)?;
        let title = self
            .store
            .get(&id)
            .map(|entry| entry.title().to_string())
            .ok_or_else(|| CatalogError::NotFound {
                query: query.trim().to_string(),
            })?;

        self.store.delete(&id);
        info!(%id, title, "movie deleted");

        Ok(EntryDeleted { id, title })
    }

    pub fn get_average(&mut self, query: &str, mode: Mode) -> Result<AverageRating> {
        let entry = self.resolve_entry(query, mode)?;
        Ok(AverageRating {
            id: entry.id().clone(),
            title: entry.title().to_string(),
            average_rating: entry.average_rating(),
            rating_count: entry.rating_count(),
        })
    }

    /// Full rating history; truncation for display is the caller's business
    pub fn get_all_ratings(&mut self, query: &str, mode: Mode) -> Result<RatingHistory> {
        let entry = self.resolve_entry(query, mode)?;
        Ok(RatingHistory {
            id: entry.id().clone(),
            title: entry.title().to_string(),
            ratings: entry.ratings().to_vec(),
        })
    }

    /// Highest average among rated movies; the earliest enumerated wins a tie
    pub fn get_top_rated(&self) -> Result<TopRated> {
        let mut best: Option<&Entry> = None;
        for entry in self.store.all().filter(|e| e.is_rated()) {
            match best {
                Some(current) if entry.average_rating() <= current.average_rating() => {}
                _ => best = Some(entry),
            }
        }

        let top = best.ok_or(CatalogError::NoRatedEntries)?;
        Ok(TopRated {
            id: top.id().clone(),
            title: top.title().to_string(),
            average_rating: top.average_rating(),
            rating_count: top.rating_count(),
        })
    }

    /// Every movie in enumeration order
    pub fn list_all(&self) -> Vec<&Entry> {
        self.store.all().collect()
    }

    fn resolve_entry(&mut self, query: &str, mode: Mode) -> Result<&Entry> {
        let id = self.resolve_one(query, mode)?;
        self.store.get(&id).ok_or_else(|| CatalogError::NotFound {
            query: query.trim().to_string(),
        })
    }

    /// Narrow `query` down to exactly one id
    fn resolve_one(&mut self, query: &str, mode: Mode) -> Result<EntryId> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }

        let matches = resolve(query, self.store.all());
        debug!(query, matches = matches.len(), ?mode, "resolved query");

        match matches.as_slice() {
            [] => Err(CatalogError::NotFound {
                query: query.to_string(),
            }),
            [only] => Ok(only.id().clone()),
            _ if mode == Mode::Headless => Err(CatalogError::Ambiguous {
                query: query.to_string(),
                count: matches.len(),
            }),
            _ => {
                let selection = self.selector.choose_one(query, &matches);
                debug!(strategy = self.selector.name(), ?selection, "disambiguation finished");
                match selection {
                    Selection::Chosen(index) => matches
                        .get(index)
                        .map(|entry| entry.id().clone())
                        .ok_or_else(|| CatalogError::SelectionCancelled {
                            query: query.to_string(),
                        }),
                    Selection::Cancelled => Err(CatalogError::SelectionCancelled {
                        query: query.to_string(),
                    }),
                    Selection::Declined => Err(CatalogError::Ambiguous {
                        query: query.to_string(),
                        count: matches.len(),
                    }),
                }
            }
        }
    }
}
