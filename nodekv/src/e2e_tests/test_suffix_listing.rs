//! Test listing keys by suffix, highest first.

use crate::e2e_tests::helpers::*;

#[test]
fn test_suffix_listing_descending() {
    let db = new_test_db();
    for key in ["P_a1", "P_a2", "P_b1"] {
        db.save(key, b"{}").unwrap();
    }
    db.save("Q_z1", b"{}").unwrap();

    assert_eq!(
        db.list_keys_by_suffix("P_", "1").unwrap(),
        vec![b"P_b1".to_vec(), b"P_a1".to_vec()]
    );
}

#[test]
fn test_suffix_listing_over_node() {
    let db = new_test_db();
    seed_node(&db, "items", 1..=12);

    let keys = db.list_keys_by_suffix("items_", "1").unwrap();
    assert_eq!(keys, vec![b"items_11".to_vec(), b"items_1".to_vec()]);
}
