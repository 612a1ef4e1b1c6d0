//! Partial-query resolution.
//!
//! A query matches an entry when, ignoring case, the entry id starts with
//! the query or the title contains it. Matches come back in the order the
//! entries were supplied (catalog enumeration order); there is no scoring.
//!
//! Blank queries are not special here: the empty string is contained in
//! every title, so it matches everything. Callers that treat a blank query
//! as user error reject it before resolving.

use crate::types::Entry;

/// Resolve `query` against `entries`, preserving their order
pub fn resolve<'a>(query: &str, entries: impl IntoIterator<Item = &'a Entry>) -> Vec<&'a Entry> {
    let needle = query.to_lowercase();
    entries
        .into_iter()
        .filter(|entry| is_match(entry, &needle))
        .collect()
}

/// `needle` must already be lower case
fn is_match(entry: &Entry, needle: &str) -> bool {
    entry.id().as_str().to_lowercase().starts_with(needle)
        || entry.title().to_lowercase().contains(needle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{CatalogStore, RandomIdSource};
    use crate::types::EntryId;

    fn catalog() -> CatalogStore {
        let mut store = CatalogStore::with_id_source(RandomIdSource::seeded(3));
        for (raw, title) in [
            ("A1B2C3D4", "The Matrix"),
            ("A1FF0000", "Heat"),
            ("B7C8D9E0", "The Matrix Reloaded"),
            ("C0FFEE00", "Amélie"),
        ] {
            store.put(Entry::new(EntryId::parse(raw).unwrap(), title));
        }
        store
    }

    fn titles<'a>(matches: &[&'a Entry]) -> Vec<&'a str> {
        matches.iter().map(|e| e.title()).collect()
    }

    #[test]
    fn test_title_substring_is_case_insensitive() {
        let store = catalog();
        let matches = resolve("MATRIX", store.all());
        assert_eq!(titles(&matches), vec!["The Matrix", "The Matrix Reloaded"]);
    }

    #[test]
    fn test_id_prefix_is_case_insensitive() {
        let store = catalog();
        assert_eq!(titles(&resolve("a1b2", store.all())), vec!["The Matrix"]);
        assert_eq!(titles(&resolve("A1", store.all())), vec!["The Matrix", "Heat"]);
    }

    #[test]
    fn test_id_must_match_as_prefix() {
        let store = catalog();
        // "B2C3" sits inside an id but starts none and is in no title
        assert!(resolve("B2C3", store.all()).is_empty());
    }

    #[test]
    fn test_unicode_titles() {
        let store = catalog();
        assert_eq!(titles(&resolve("AMÉLIE", store.all())), vec!["Amélie"]);
    }

    #[test]
    fn test_no_matches() {
        let store = catalog();
        assert!(resolve("casablanca", store.all()).is_empty());
    }

    #[test]
    fn test_empty_query_matches_everything() {
        let store = catalog();
        assert_eq!(resolve("", store.all()).len(), store.len());
    }

    #[test]
    fn test_resolution_is_idempotent_and_ordered() {
        let store = catalog();
        let first: Vec<&EntryId> = resolve("e", store.all()).iter().map(|e| e.id()).collect();
        let second: Vec<&EntryId> = resolve("e", store.all()).iter().map(|e| e.id()).collect();
        assert_eq!(first, second);

        let enumeration: Vec<&EntryId> = store
            .all()
            .map(Entry::id)
            .filter(|id| first.contains(id))
            .collect();
        assert_eq!(first, enumeration);
    }
}
