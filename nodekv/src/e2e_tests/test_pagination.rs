//! Test that pages of a filtered scan partition the filtered sequence.

use crate::e2e_tests::helpers::*;
use crate::query::Query;

fn filtered(page: i64, per_page: i64) -> Query {
    let mut query = Query::paged(page, per_page);
    query.key_contains = b"3".to_vec();
    query
}

#[test]
fn test_pages_concatenate_to_filtered_sequence() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=37);
    seed_node(&db, "noise", 1..=37);

    let mut everything = filtered(0, 0);
    everything.select_all();
    let full = search_items(&db, "items", Some(&everything));
    // 3, 13, 23, 30..=37
    assert_eq!(full.len(), 11);
    assert!(full.iter().all(|item| item.n.to_string().contains('3')));

    let n = full.len();
    for per_page in [1usize, 2, 3, 4, 5, 10, 11, 12] {
        let mut joined = Vec::new();
        let pages = n.div_ceil(per_page);
        for page in 0..=pages {
            let query = filtered(
                i64::try_from(page).unwrap(),
                i64::try_from(per_page).unwrap(),
            );
            let items = search_items(&db, "items", Some(&query));
            let expected_len = per_page.min(n.saturating_sub(page * per_page));
            assert_eq!(items.len(), expected_len, "page {page} of size {per_page}");
            joined.extend(items);
        }
        assert_eq!(joined, full, "pages of size {per_page}");
    }
}
