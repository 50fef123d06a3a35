//! Test that streaming reads and bulk searches agree.

use crate::e2e_tests::helpers::*;
use crate::query::Query;

fn queries() -> Vec<Query> {
    let mut queries = vec![Query::all(), Query::new(), Query::paged(1, 7), Query::paged(9, 7)];

    let mut reverse = Query::paged(1, 4);
    reverse.reverse = true;
    queries.push(reverse);

    let mut keyed = Query::all();
    keyed.key_contains = b"1".to_vec();
    queries.push(keyed);

    let mut valued = Query::paged(0, 3);
    valued.set_filter("sku", "SKU-002");
    queries.push(valued);

    queries
}

#[tokio::test]
async fn test_stream_matches_search() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=40);
    seed_node(&db, "noise", 1..=10);

    for query in queries() {
        let searched = search_items(&db, "items", Some(&query));
        let streamed = stream_items(&db, "items", Some(&query)).await;
        assert_eq!(streamed, searched, "query {query:?}");
    }

    assert_eq!(
        stream_items(&db, "items", None).await,
        search_items(&db, "items", None)
    );
    assert_eq!(db.store().open_cursors(), 0);
}

#[tokio::test]
async fn test_stream_with_larger_capacity() {
    let db = crate::db::NodeDb::with_config(
        crate::storage::MemoryStore::new(),
        crate::config::QueryConfig {
            stream_capacity: 64,
            ..crate::config::QueryConfig::default()
        },
    );
    seed_node(&db, "items", 1..=20);

    let streamed = stream_items(&db, "items", Some(&Query::all())).await;
    assert_eq!(streamed, search_items(&db, "items", Some(&Query::all())));
}
