//! Test that cursor faults reach the caller on every read path.

use crate::e2e_tests::helpers::*;
use crate::error::QueryError;
use crate::scan::StreamEvent;
use crate::storage::{FaultConfig, StoreError};

#[test]
fn test_search_reports_fault_with_range() {
    let db = new_faulty_db(FaultConfig::fail_after(4));
    seed_node(&db, "items", 1..=10);

    let mut out: Vec<Item> = Vec::new();
    let err = db.search_in_node(Some("items"), &mut out, None).unwrap_err();
    match err {
        QueryError::Iterator { range, source } => {
            assert!(range.to_string().contains("items_"));
            assert!(matches!(source, StoreError::InjectedFault(_)));
        }
        other => panic!("expected iterator fault, got {other}"),
    }
    assert!(out.is_empty());
    assert_eq!(db.store().open_cursors(), 0);
}

#[test]
fn test_fault_after_page_filled_is_not_seen() {
    let db = new_faulty_db(FaultConfig::fail_after(4));
    seed_node(&db, "items", 1..=10);

    // Three records plus the step that fills the page fit in four steps.
    let items = search_items(&db, "items", Some(&crate::query::Query::paged(0, 3)));
    assert_eq!(items.len(), 3);
}

#[test]
fn test_suffix_listing_reports_fault() {
    let db = new_faulty_db(FaultConfig::fail_after(2));
    seed_node(&db, "items", 1..=10);

    assert!(matches!(
        db.list_keys_by_suffix("items_", "1"),
        Err(QueryError::Iterator { .. })
    ));
}

#[tokio::test]
async fn test_stream_reports_fault_then_end() {
    let db = new_faulty_db(FaultConfig::fail_after(4));
    seed_node(&db, "items", 1..=10);

    let mut stream = db.read(Some("items"), None).unwrap();
    let mut records = 0;
    let mut errors = 0;
    loop {
        match stream.recv().await {
            StreamEvent::Record(_) => records += 1,
            StreamEvent::Error(_) => errors += 1,
            StreamEvent::End => break,
        }
    }
    assert_eq!((records, errors), (4, 1));
}

#[test]
fn test_random_faults_never_yield_partial_results() {
    for seed in 0..20 {
        let db = new_faulty_db(FaultConfig::random(0.05, seed));
        seed_node(&db, "items", 1..=50);

        let mut out: Vec<Item> = Vec::new();
        match db.search_in_node(Some("items"), &mut out, None) {
            Ok(outcome) => assert_eq!(outcome.count(), 50),
            Err(QueryError::Iterator { .. }) => assert!(out.is_empty()),
            Err(other) => panic!("unexpected error {other}"),
        }
        assert_eq!(db.store().open_cursors(), 0);
    }
}
