//! Integration tests for the catalog service.
//!
//! These tests drive the public operations end to end against a small
//! catalog, checking results and that failed operations leave no trace.

use catalog::{CatalogError, CatalogStore, Entry, EntryId, ErrorKind, RandomIdSource, Rating};
use service::{CatalogService, HeadlessSelection, Mode};

fn id(raw: &str) -> EntryId {
    EntryId::parse(raw).unwrap()
}

fn ratings(values: &[i64]) -> Vec<Rating> {
    values.iter().map(|&v| Rating::new(v).unwrap()).collect()
}

fn rating_values(entry: &Entry) -> Vec<u8> {
    entry.ratings().iter().map(|r| r.value()).collect()
}

fn matrix_catalog() -> CatalogService<HeadlessSelection> {
    let mut store = CatalogStore::with_id_source(RandomIdSource::seeded(17));
    store.put(Entry::with_ratings(id("A1B2C3D4"), "Matrix", ratings(&[4, 5])));
    CatalogService::new(store, HeadlessSelection)
}

#[test]
fn test_matrix_scenario() {
    let mut service = matrix_catalog();

    let err = service.add_rating("matrix", 6, Mode::Headless).unwrap_err();
    assert!(matches!(err, CatalogError::InvalidRating { value: 6 }));
    let entry = service.store().get(&id("A1B2C3D4")).unwrap();
    assert_eq!(rating_values(entry), vec![4, 5]);

    let added = service.add_rating("matrix", 3, Mode::Headless).unwrap();
    assert_eq!(rating_values(&added.entry), vec![4, 5, 3]);
    assert_eq!(added.entry.average_rating(), 4.0);

    let average = service.get_average("A1B2", Mode::Headless).unwrap();
    assert_eq!(average.title, "Matrix");
    assert_eq!(average.average_rating, 4.0);
    assert_eq!(average.rating_count, 3);
}

#[test]
fn test_invalid_ratings_leave_entry_untouched() {
    let mut service = matrix_catalog();
    let before = service.store().get(&id("A1B2C3D4")).unwrap().clone();

    for value in [0, 6, -1, 100, i64::MIN, i64::MAX] {
        let err = service.add_rating("Matrix", value, Mode::Headless).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidRating);
    }

    let after = service.store().get(&id("A1B2C3D4")).unwrap();
    assert_eq!(&before, after);
    assert_eq!(after.rating_count(), 2);
    assert_eq!(after.rating_sum(), 9);
    assert_eq!(after.average_rating(), 4.5);
}

#[test]
fn test_top_rated_first_maximum_wins() {
    let mut store = CatalogStore::with_id_source(RandomIdSource::seeded(4));
    // A: 3.5, B: 4.2, C: 4.2 with B enumerated before C
    store.put(Entry::with_ratings(id("AAAAAAAA"), "A", ratings(&[3, 4])));
    store.put(Entry::with_ratings(id("BBBBBBBB"), "B", ratings(&[4, 4, 4, 5, 4])));
    store.put(Entry::with_ratings(id("CCCCCCCC"), "C", ratings(&[5, 4, 4, 4, 4])));
    let service = CatalogService::new(store, HeadlessSelection);

    let top = service.get_top_rated().unwrap();
    assert_eq!(top.title, "B");
    assert_eq!(top.average_rating, 4.2);
    assert_eq!(top.rating_count, 5);
}

#[test]
fn test_top_rated_ignores_unrated() {
    let mut service = CatalogService::new(
        CatalogStore::with_id_source(RandomIdSource::seeded(5)),
        HeadlessSelection,
    );
    assert_eq!(
        service.get_top_rated().unwrap_err().kind(),
        ErrorKind::NoRatedEntries
    );

    service.add_entry("Unrated").unwrap();
    assert_eq!(
        service.get_top_rated().unwrap_err().kind(),
        ErrorKind::NoRatedEntries
    );

    let added = service.add_entry("Rated Once").unwrap();
    service.add_rating(added.id.as_str(), 1, Mode::Headless).unwrap();
    assert_eq!(service.get_top_rated().unwrap().title, "Rated Once");
}

#[test]
fn test_add_entry_validation_and_fresh_ids() {
    let mut service = matrix_catalog();

    assert_eq!(service.add_entry("").unwrap_err().kind(), ErrorKind::InvalidTitle);
    assert_eq!(service.add_entry("   ").unwrap_err().kind(), ErrorKind::InvalidTitle);
    assert_eq!(service.store().len(), 1);

    let added = service.add_entry("Inception").unwrap();
    assert_ne!(added.id, id("A1B2C3D4"));
    assert_eq!(service.store().len(), 2);

    let entry = service.store().get(&added.id).unwrap();
    assert_eq!(entry.title(), "Inception");
    assert_eq!(entry.rating_count(), 0);
    assert_eq!(entry.average_rating(), 0.0);

    let mut seen = std::collections::HashSet::new();
    for n in 0..100 {
        let added = service.add_entry(&format!("Sequel {n}")).unwrap();
        assert!(seen.insert(added.id));
    }
}

#[test]
fn test_delete_removes_from_store_cache_and_results() {
    let mut service = matrix_catalog();
    service.add_entry("Heat").unwrap();
    let matrix = id("A1B2C3D4");

    // Warm the cache first
    service.get_average("A1B2C3D4", Mode::Headless).unwrap();
    assert!(service.store().get(&matrix).is_some());
    assert!(service.store().is_cached(&matrix));

    let deleted = service.delete_entry("matrix", Mode::Headless).unwrap();
    assert_eq!(deleted.id, matrix);
    assert_eq!(deleted.title, "Matrix");

    assert!(service.store().get(&matrix).is_none());
    assert!(!service.store().is_cached(&matrix));
    assert!(service.list_all().iter().all(|e| e.id() != &matrix));
    assert_eq!(
        service.get_average("A1B2", Mode::Headless).unwrap_err().kind(),
        ErrorKind::NotFound
    );
}

#[test]
fn test_all_ratings_are_not_truncated() {
    let mut service = matrix_catalog();
    for n in 0..25 {
        service.add_rating("matrix", n % 5 + 1, Mode::Headless).unwrap();
    }

    let history = service.get_all_ratings("matrix", Mode::Headless).unwrap();
    assert_eq!(history.ratings.len(), 27);

    let listed = service.list_all();
    assert_eq!(listed[0].ratings().len(), 27);
}

#[test]
fn test_list_all_in_insertion_order() {
    let mut service = matrix_catalog();
    service.add_entry("Heat").unwrap();
    service.add_entry("Alien").unwrap();

    let titles: Vec<&str> = service.list_all().iter().map(|e| e.title()).collect();
    assert_eq!(titles, vec!["Matrix", "Heat", "Alien"]);
}

#[test]
fn test_error_results_serialize_for_headless_callers() {
    let mut service = matrix_catalog();
    service.add_entry("Matrix Reloaded").unwrap();

    let err = service.get_average("matrix", Mode::Headless).unwrap_err();
    let kind = serde_json::to_value(err.kind()).unwrap();
    assert_eq!(kind, "ambiguous");
    assert!(err.to_string().contains("Multiple matches"));
}
