//! Test key substring filtering.

use crate::e2e_tests::helpers::*;
use crate::query::Query;

#[test]
fn test_key_filter_matches_anywhere_in_key() {
    let db = new_test_db();
    seed_node(&db, "items", [1, 12, 21, 112, 5]);

    let mut query = Query::all();
    query.key_contains = b"12".to_vec();
    assert_eq!(ids(&search_items(&db, "items", Some(&query))), vec![112, 12]);
}

#[test]
fn test_key_filter_sees_node_prefix() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=3);

    let mut query = Query::all();
    query.key_contains = b"items_".to_vec();
    assert_eq!(search_items(&db, "items", Some(&query)).len(), 3);

    query.key_contains = b"missing".to_vec();
    assert!(search_items(&db, "items", Some(&query)).is_empty());
}
