//! Test that reverse scans mirror forward scans.

use crate::e2e_tests::helpers::*;
use crate::query::Query;

#[test]
fn test_reverse_select_all_is_forward_reversed() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=40);

    let mut forward = Query::all();
    forward.key_contains = b"2".to_vec();
    let mut reverse = forward.clone();
    reverse.reverse = true;

    let forward_items = search_items(&db, "items", Some(&forward));
    let mut reverse_items = search_items(&db, "items", Some(&reverse));
    assert!(!forward_items.is_empty());

    reverse_items.reverse();
    assert_eq!(reverse_items, forward_items);
}

#[test]
fn test_reverse_first_page_holds_highest_keys() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=9);

    let mut query = Query::paged(0, 3);
    query.reverse = true;
    assert_eq!(ids(&search_items(&db, "items", Some(&query))), vec![9, 8, 7]);

    query.page = 2;
    assert_eq!(ids(&search_items(&db, "items", Some(&query))), vec![3, 2, 1]);
}
