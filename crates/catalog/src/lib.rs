//! # Catalog Crate
//!
//! This crate holds the movie catalog and the logic that keeps its rating
//! aggregates honest.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (EntryId, Rating, Entry)
//! - **validator**: The accepted rating range
//! - **aggregate**: Incremental and batch rating statistics
//! - **store**: CatalogStore, the id → entry map with its lookup cache
//! - **resolver**: Partial id / title matching
//! - **persistence**: Load and save the JSON catalog file
//! - **error**: Error types for the whole crate
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{persistence, resolver, CatalogStore};
//! use std::path::Path;
//!
//! let mut store = CatalogStore::new();
//! persistence::load_file(&mut store, Path::new("MovieDB.json"))?;
//!
//! for entry in resolver::resolve("matrix", store.all()) {
//!     println!("{} {} {:.1}", entry.id(), entry.title(), entry.average_rating());
//! }
//! ```

// Public modules
pub mod aggregate;
pub mod error;
pub mod persistence;
pub mod resolver;
pub mod store;
pub mod types;
pub mod validator;

// Re-export commonly used types for convenience
pub use error::{CatalogError, ErrorKind, Result};
pub use persistence::{DroppedRatings, LoadReport};
pub use resolver::resolve;
pub use store::{CatalogStore, IdSource, RandomIdSource};
pub use types::{Entry, EntryId, Rating};

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> EntryId {
        EntryId::parse(raw).unwrap()
    }

    #[test]
    fn test_store_creation() {
        let store = CatalogStore::new();
        assert!(store.is_empty());
        assert_eq!(store.all().count(), 0);
    }

    #[test]
    fn test_insert_and_rate() {
        let mut store = CatalogStore::with_id_source(RandomIdSource::seeded(5));
        store.put(Entry::new(id("A1B2C3D4"), "Matrix"));

        let entry = store.get_mut(&id("A1B2C3D4")).unwrap();
        aggregate::record_rating(entry, Rating::new(5).unwrap());

        let entry = store.get(&id("a1b2c3d4")).unwrap();
        assert_eq!(entry.ratings(), &[Rating::new(5).unwrap()]);
        assert_eq!(entry.average_rating(), 5.0);
    }

    #[test]
    fn test_empty_queries() {
        let store = CatalogStore::new();

        // Querying an empty catalog yields nothing
        assert!(store.get(&id("A1B2C3D4")).is_none());
        assert!(resolve("matrix", store.all()).is_empty());
        assert!(resolve("", store.all()).is_empty());
    }
}
