//! Core domain types for the movie catalog.
//!
//! Key Rust concepts demonstrated here:
//! - Newtypes (`EntryId`, `Rating`) that can only hold valid values
//! - Private fields with getters so aggregates cannot drift from the ratings
//! - serde derives that double as the persisted file format

use crate::aggregate;
use crate::validator;
use serde::Serialize;
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Length of every movie id
pub const ID_LEN: usize = 8;

/// Alphabet ids are drawn from (canonical upper case)
pub const ID_ALPHABET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Opaque, fixed-length movie identifier
///
/// Stored upper case; `parse` accepts either case so "a1b2c3d4" and
/// "A1B2C3D4" name the same entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct EntryId(pub(crate) String);

impl EntryId {
    /// Parse a raw id, returning `None` unless it is exactly `ID_LEN`
    /// ASCII alphanumerics.
    pub fn parse(raw: &str) -> Option<Self> {
        let well_formed = raw.len() == ID_LEN && raw.bytes().all(|b| b.is_ascii_alphanumeric());
        well_formed.then(|| Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Ratings
// =============================================================================

/// A single validated rating
///
/// Rust concept: the only constructor goes through the validator, so a
/// `Rating` that exists is always in range. Code that records ratings takes
/// this type instead of re-checking an integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Rating(u8);

impl Rating {
    pub fn new(value: i64) -> Option<Self> {
        // Range check guarantees the narrowing cast is lossless
        validator::is_valid(value).then(|| Self(value as u8))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Entry
// =============================================================================

/// One movie in the catalog together with its rating history
///
/// Invariants, upheld by keeping the fields crate-private:
/// - `rating_count == ratings.len()`
/// - `rating_sum == sum(ratings)`
/// - `average_rating == round1(rating_sum / rating_count)`, or `0.0` when empty
///
/// The serialized form is the persisted record:
/// `{id, title, ratings, ratingCount, ratingSum, averageRating}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Entry {
    pub(crate) id: EntryId,
    pub(crate) title: String,
    pub(crate) ratings: Vec<Rating>,
    pub(crate) rating_count: u64,
    pub(crate) rating_sum: u64,
    pub(crate) average_rating: f64,
}

impl Entry {
    /// Creates an entry with no ratings
    pub fn new(id: EntryId, title: impl Into<String>) -> Self {
        Self::with_ratings(id, title, Vec::new())
    }

    /// Creates an entry from an existing rating history, computing the
    /// aggregates in one batch.
    pub fn with_ratings(id: EntryId, title: impl Into<String>, ratings: Vec<Rating>) -> Self {
        let rating_count = ratings.len() as u64;
        let rating_sum = ratings.iter().map(|r| u64::from(r.value())).sum();
        Self {
            id,
            title: title.into(),
            average_rating: aggregate::compute_average(&ratings),
            ratings,
            rating_count,
            rating_sum,
        }
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Full rating history in acceptance order
    pub fn ratings(&self) -> &[Rating] {
        &self.ratings
    }

    pub fn rating_count(&self) -> u64 {
        self.rating_count
    }

    pub fn rating_sum(&self) -> u64 {
        self.rating_sum
    }

    pub fn average_rating(&self) -> f64 {
        self.average_rating
    }

    pub fn is_rated(&self) -> bool {
        self.rating_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_id_canonical_case() {
        let id = EntryId::parse("a1b2c3d4").unwrap();
        assert_eq!(id.as_str(), "A1B2C3D4");
        assert_eq!(id, EntryId::parse("A1B2C3D4").unwrap());
    }

    #[test]
    fn test_entry_id_rejects_malformed() {
        assert!(EntryId::parse("").is_none());
        assert!(EntryId::parse("A1B2C3D").is_none());
        assert!(EntryId::parse("A1B2C3D45").is_none());
        assert!(EntryId::parse("A1B2-3D4").is_none());
        assert!(EntryId::parse("ÄÖB2C3D4").is_none());
    }

    #[test]
    fn test_rating_construction() {
        assert_eq!(Rating::new(3).map(Rating::value), Some(3));
        assert!(Rating::new(0).is_none());
        assert!(Rating::new(6).is_none());
    }

    #[test]
    fn test_entry_with_ratings_aggregates() {
        let ratings = [4, 5].iter().map(|&v| Rating::new(v).unwrap()).collect();
        let entry = Entry::with_ratings(EntryId::parse("A1B2C3D4").unwrap(), "Matrix", ratings);

        assert_eq!(entry.rating_count(), 2);
        assert_eq!(entry.rating_sum(), 9);
        assert_eq!(entry.average_rating(), 4.5);
        assert!(entry.is_rated());
    }

    #[test]
    fn test_new_entry_is_unrated() {
        let entry = Entry::new(EntryId::parse("00000000").unwrap(), "Heat");
        assert_eq!(entry.rating_count(), 0);
        assert_eq!(entry.average_rating(), 0.0);
        assert!(!entry.is_rated());
    }

    #[test]
    fn test_entry_serializes_as_record() {
        let entry = Entry::with_ratings(
            EntryId::parse("A1B2C3D4").unwrap(),
            "Matrix",
            vec![Rating::new(4).unwrap()],
        );
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(json["id"], "A1B2C3D4");
        assert_eq!(json["title"], "Matrix");
        assert_eq!(json["ratings"], serde_json::json!([4]));
        assert_eq!(json["ratingCount"], 1);
        assert_eq!(json["ratingSum"], 4);
        assert_eq!(json["averageRating"], 4.0);
    }
}
