//! Test that one query can drive many scans at once.

use std::sync::Arc;
use std::thread;

use crate::e2e_tests::helpers::*;
use crate::query::Query;

#[test]
fn test_shared_query_across_threads() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=60);

    let mut query = Query::paged(-1, 0);
    query.key_contains = b"5".to_vec();
    let query = Arc::new(query);
    let expected = search_items(&db, "items", Some(query.as_ref()));
    assert!(!expected.is_empty());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let db = db.clone();
            let query = Arc::clone(&query);
            thread::spawn(move || search_items(&db, "items", Some(query.as_ref())))
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), expected);
    }
    assert_eq!(query.page, -1);
    assert_eq!(query.per_page, 0);
}

#[test]
fn test_scans_see_writes_between_calls() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=3);
    assert_eq!(search_items(&db, "items", None).len(), 3);

    seed_node(&db, "items", 4..=6);
    assert_eq!(search_items(&db, "items", None).len(), 6);
}
