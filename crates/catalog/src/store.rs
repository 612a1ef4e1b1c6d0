//! The canonical id → entry mapping.
//!
//! Entries live in insertion-ordered slots. The canonical index maps each id
//! to its slot; a lazily populated lookup cache maps ids to the same slots.
//! Because the cache stores slot positions rather than copies, a cached
//! lookup always yields the exact entry the canonical map holds.
//!
//! Rust concepts demonstrated:
//! - `RefCell` for a cache that fills during `&self` lookups
//! - Trait objects (`Box<dyn IdSource>`) for a swappable random source
//! - Returning `impl Iterator` to enumerate without exposing storage

use crate::error::{CatalogError, Result};
use crate::types::{Entry, EntryId, ID_ALPHABET, ID_LEN};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, trace, warn};

/// How many fresh candidates `generate_id` draws before giving up
pub const MAX_ID_ATTEMPTS: usize = 16;

/// Deleted slots are compacted away once they reach the live count and exceed this
const COMPACT_THRESHOLD: usize = 64;

// =============================================================================
// Id sources
// =============================================================================

/// Supplies candidate ids to [`CatalogStore::generate_id`]
///
/// Candidates are not required to be unique; the store checks each one
/// against the live catalog.
pub trait IdSource: Send {
    fn candidate(&mut self) -> EntryId;
}

/// Draws `ID_LEN` characters uniformly from `ID_ALPHABET`
pub struct RandomIdSource {
    rng: StdRng,
}

impl RandomIdSource {
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Reproducible sequence, used by tests and benchmarks
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl IdSource for RandomIdSource {
    fn candidate(&mut self) -> EntryId {
        let raw: String = (0..ID_LEN)
            .map(|_| ID_ALPHABET[self.rng.random_range(0..ID_ALPHABET.len())] as char)
            .collect();
        // Already canonical: fixed length, upper-case alphabet
        EntryId(raw)
    }
}

// =============================================================================
// CatalogStore
// =============================================================================

/// Owns every entry of the catalog
pub struct CatalogStore {
    /// Insertion-ordered storage; `None` marks a deleted entry
    slots: Vec<Option<Entry>>,
    /// Canonical id → slot mapping
    index: HashMap<EntryId, usize>,
    /// Lookup cache, filled on first `get`
    cache: RefCell<HashMap<EntryId, usize>>,
    deleted: usize,
    ids: Box<dyn IdSource>,
}

impl CatalogStore {
    pub fn new() -> Self {
        Self::with_id_source(RandomIdSource::from_os_rng())
    }

    pub fn with_id_source(ids: impl IdSource + 'static) -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            cache: RefCell::new(HashMap::new()),
            deleted: 0,
            ids: Box::new(ids),
        }
    }

    /// Insert an entry, overwriting any entry with the same id
    ///
    /// An overwrite keeps the original enumeration position.
    pub fn put(&mut self, entry: Entry) {
        match self.index.get(&entry.id) {
            Some(&slot) => {
                trace!(id = %entry.id, "overwriting entry");
                self.slots[slot] = Some(entry);
            }
            None => {
                self.index.insert(entry.id.clone(), self.slots.len());
                self.slots.push(Some(entry));
            }
        }
    }

    /// Exact-id lookup through the cache
    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        let slot = self.lookup_slot(id)?;
        self.slots[slot].as_ref()
    }

    /// Mutable exact-id lookup through the cache
    pub fn get_mut(&mut self, id: &EntryId) -> Option<&mut Entry> {
        let slot = self.lookup_slot(id)?;
        self.slots[slot].as_mut()
    }

    /// Remove an entry from the canonical map and the cache
    ///
    /// Returns whether the entry existed.
    pub fn delete(&mut self, id: &EntryId) -> bool {
        let Some(slot) = self.index.remove(id) else {
            return false;
        };
        self.cache.get_mut().remove(id);
        self.slots[slot] = None;
        self.deleted += 1;

        if self.deleted > COMPACT_THRESHOLD && self.deleted >= self.index.len() {
            self.compact();
        }
        true
    }

    /// All entries in insertion order
    pub fn all(&self) -> impl Iterator<Item = &Entry> {
        self.slots.iter().flatten()
    }

    pub fn contains(&self, id: &EntryId) -> bool {
        self.index.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Whether `id` currently has a lookup-cache entry
    pub fn is_cached(&self, id: &EntryId) -> bool {
        self.cache.borrow().contains_key(id)
    }

    /// Produce an id not used by any live entry
    ///
    /// Draws up to `MAX_ID_ATTEMPTS` candidates from the id source and fails
    /// with `IdExhaustion` if every one collides.
    pub fn generate_id(&mut self) -> Result<EntryId> {
        for attempt in 1..=MAX_ID_ATTEMPTS {
            let candidate = self.ids.candidate();
            if !self.index.contains_key(&candidate) {
                return Ok(candidate);
            }
            warn!(%candidate, attempt, "generated id collides with an existing movie");
        }
        Err(CatalogError::IdExhaustion {
            attempts: MAX_ID_ATTEMPTS,
        })
    }

    fn lookup_slot(&self, id: &EntryId) -> Option<usize> {
        let cached = self.cache.borrow().get(id).copied();
        if let Some(slot) = cached {
            trace!(%id, "cache hit");
            return Some(slot);
        }
        let slot = *self.index.get(id)?;
        trace!(%id, "cache miss");
        self.cache.borrow_mut().insert(id.clone(), slot);
        Some(slot)
    }

    /// Drop deleted slots; positions shift so the cache is reset
    fn compact(&mut self) {
        debug!(deleted = self.deleted, live = self.index.len(), "compacting catalog slots");
        self.slots.retain(Option::is_some);
        self.index = self
            .slots
            .iter()
            .flatten()
            .enumerate()
            .map(|(slot, entry)| (entry.id.clone(), slot))
            .collect();
        self.cache.get_mut().clear();
        self.deleted = 0;
    }
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CatalogStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogStore")
            .field("entries", &self.index.len())
            .field("cached", &self.cache.borrow().len())
            .field("deleted_slots", &self.deleted)
            .finish_non_exhaustive()
    }
}
