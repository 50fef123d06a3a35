//! Test field filters in both filter modes.

use crate::config::ValueFilterMode;
use crate::e2e_tests::helpers::*;
use crate::query::Query;

#[test]
fn test_string_filter_substring_mode() {
    let db = new_test_db();
    seed_node(&db, "NODE-1", 1..=30);

    let mut query = Query::all();
    query.set_filter("a", "VALUE OF NODE NODE-1 - 2");
    // Prefix match on the string: 2, 20..=29.
    let items = search_items(&db, "NODE-1", Some(&query));
    assert_eq!(items.len(), 11);
    assert!(items.iter().all(|item| item.n.to_string().starts_with('2')));
}

#[test]
fn test_string_filter_exact_mode() {
    let db = new_test_db();
    seed_node(&db, "NODE-1", 1..=30);

    let mut query = Query::all();
    query.set_filter("a", "VALUE OF NODE NODE-1 - 2");
    query.set_filter_mode(ValueFilterMode::Exact);
    assert_eq!(ids(&search_items(&db, "NODE-1", Some(&query))), vec![2]);
}

#[test]
fn test_number_filter_and_pagination() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=30);

    let mut query = Query::paged(0, 5);
    query.set_filter("n", 7);
    assert_eq!(ids(&search_items(&db, "items", Some(&query))), vec![7]);

    query.set_filter("n", 1);
    // Substring mode: 1, 10..=19 all begin with `"n":1`.
    assert_eq!(ids(&search_items(&db, "items", Some(&query))), vec![1, 10, 11, 12, 13]);
    query.page = 2;
    assert_eq!(ids(&search_items(&db, "items", Some(&query))), vec![19]);
}
