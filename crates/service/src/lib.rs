//! Service crate for the movie ratings catalog.
//!
//! This crate contains the service that turns partial queries into catalog
//! operations, plus the strategies it uses when a query is ambiguous.
//!
//! ## Example Usage
//! ```ignore
//! use catalog::CatalogStore;
//! use service::{CatalogService, HeadlessSelection, Mode};
//!
//! let mut service = CatalogService::new(CatalogStore::new(), HeadlessSelection);
//! let added = service.add_entry("Inception")?;
//! service.add_rating(added.id.as_str(), 5, Mode::Headless)?;
//! let top = service.get_top_rated()?;
//! ```

pub mod selection;
pub mod service;

pub use selection::{HeadlessSelection, Selection, SelectionStrategy};
pub use service::{
    AverageRating, CatalogService, EntryAdded, EntryDeleted, Mode, RatingAdded, RatingHistory,
    TopRated,
};
