//! Test searches that match nothing.

use crate::e2e_tests::helpers::*;
use crate::query::Query;
use crate::scan::SearchOutcome;

#[test]
fn test_empty_node_is_success_with_untouched_output() {
    let db = new_test_db();
    seed_node(&db, "other", 1..=3);

    let sentinel = Item::new("sentinel", 0);
    let mut out = vec![sentinel.clone()];
    let outcome = db.search_in_node(Some("items"), &mut out, None).unwrap();
    assert_eq!(outcome, SearchOutcome::NoResults);
    assert_eq!(out, vec![sentinel]);
}

#[test]
fn test_empty_store() {
    let db = new_test_db();
    let mut out: Vec<Item> = Vec::new();
    assert_eq!(
        db.search_in_node(None, &mut out, Some(&Query::all())).unwrap(),
        SearchOutcome::NoResults
    );
    assert!(out.is_empty());
    assert!(db.list_keys_by_suffix("", "").unwrap().is_empty());
}

#[tokio::test]
async fn test_empty_stream_sends_only_end() {
    let db = new_test_db();
    let records = db.read(Some("items"), None).unwrap().collect_records().await.unwrap();
    assert!(records.is_empty());
}
