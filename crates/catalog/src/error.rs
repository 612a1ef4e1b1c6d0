//! Error types for the catalog crate.
//!
//! Every failure a catalog operation can produce lives in one enum so that
//! callers match on it exhaustively instead of inspecting message strings.
//! Persistence failures share the enum with domain failures because loading
//! and saving are part of the same public surface.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur while querying, mutating, loading or saving a catalog
///
/// Rust concept: `#[derive(Error)]` from thiserror implements
/// `std::error::Error` and `Display` from the `#[error(...)]` attributes.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The query matched no entry
    #[error("No matches found for '{query}'.")]
    NotFound { query: String },

    /// The query matched several entries and no choice could be made
    #[error("Multiple matches found for '{query}' ({count} movies).")]
    Ambiguous { query: String, count: usize },

    /// A rating outside the accepted range was supplied
    #[error("Rating must be between 1 and 5 (got {value}).")]
    InvalidRating { value: i64 },

    /// A new entry was given an empty or whitespace-only title
    #[error("Movie title cannot be empty.")]
    InvalidTitle,

    /// Top-rated was requested while no entry has a rating
    #[error("No movies have ratings yet.")]
    NoRatedEntries,

    /// An interactive disambiguation received an unusable answer
    #[error("Invalid selection for '{query}'. Nothing was changed.")]
    SelectionCancelled { query: String },

    /// A blank query was supplied where a partial id or title is required
    #[error("Search query cannot be empty.")]
    EmptyQuery,

    /// Every generated id candidate collided with an existing entry
    #[error("Could not generate a unique movie id after {attempts} attempts")]
    IdExhaustion { attempts: usize },

    /// I/O error while reading or writing the catalog file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The catalog file is not a valid JSON array of records
    #[error("Malformed catalog file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Stable, payload-free classification of a [`CatalogError`]
///
/// Headless callers (batch commands, load harnesses) report this alongside
/// the message so scripts can branch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Ambiguous,
    InvalidRating,
    InvalidTitle,
    NoRatedEntries,
    SelectionCancelled,
    EmptyQuery,
    IdExhaustion,
    Io,
    Json,
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound { .. } => ErrorKind::NotFound,
            CatalogError::Ambiguous { .. } => ErrorKind::Ambiguous,
            CatalogError::InvalidRating { .. } => ErrorKind::InvalidRating,
            CatalogError::InvalidTitle => ErrorKind::InvalidTitle,
            CatalogError::NoRatedEntries => ErrorKind::NoRatedEntries,
            CatalogError::SelectionCancelled { .. } => ErrorKind::SelectionCancelled,
            CatalogError::EmptyQuery => ErrorKind::EmptyQuery,
            CatalogError::IdExhaustion { .. } => ErrorKind::IdExhaustion,
            CatalogError::Io(_) => ErrorKind::Io,
            CatalogError::Json(_) => ErrorKind::Json,
        }
    }
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_carry_context() {
        let err = CatalogError::NotFound {
            query: "matrix".to_string(),
        };
        assert_eq!(err.to_string(), "No matches found for 'matrix'.");

        let err = CatalogError::InvalidRating { value: 6 };
        assert!(err.to_string().contains("got 6"));
    }

    #[test]
    fn test_kind_serializes_as_snake_case() {
        let kind = CatalogError::NoRatedEntries.kind();
        assert_eq!(kind, ErrorKind::NoRatedEntries);
        assert_eq!(
            serde_json::to_string(&kind).unwrap(),
            "\"no_rated_entries\""
        );
    }
}
