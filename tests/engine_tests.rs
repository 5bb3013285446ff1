//! Tests for the AVL engine
//!
//! These tests verify:
//! - BST and AVL balance invariants after every insert
//! - Rotation behavior (single, double, root replacement)
//! - Search, delete, and range query semantics
//! - Persistence of the tree across reopen

use avlstore::record::NIL;
use avlstore::{Engine, Record, StoreError};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_engine() -> (TempDir, Engine) {
    let temp_dir = TempDir::new().unwrap();
    let engine = Engine::open_path(&temp_dir.path().join("store.dat")).unwrap();
    (temp_dir, engine)
}

fn record(id: i32) -> Record {
    Record::new(id, format!("item {}", id), id * 2, id as f32 * 1.5, "2024-06-01")
}

fn insert_all(engine: &Engine, keys: &[i32]) {
    for &key in keys {
        engine.insert(record(key)).unwrap();
    }
}

/// Walk the reachable tree, asserting BST order and (optionally) that
/// every stored balance factor matches the recomputed height difference
/// and stays within {-1,0,1}. Returns the subtree height.
fn check_subtree(
    engine: &Engine,
    slot: i32,
    low: Option<i32>,
    high: Option<i32>,
    check_balance: bool,
) -> i32 {
    if slot == NIL {
        return 0;
    }
    let node = engine.node(slot).unwrap();
    let key = node.record.id;

    if let Some(low) = low {
        assert!(key > low, "BST violated: key {} under lower bound {}", key, low);
    }
    if let Some(high) = high {
        assert!(key < high, "BST violated: key {} over upper bound {}", key, high);
    }

    let lh = check_subtree(engine, node.left, low, Some(key), check_balance);
    let rh = check_subtree(engine, node.right, Some(key), high, check_balance);

    if check_balance {
        assert!(
            (rh - lh).abs() <= 1,
            "AVL violated at key {}: heights {}/{}",
            key,
            lh,
            rh
        );
        assert_eq!(
            node.balance,
            rh - lh,
            "stored balance factor wrong at key {}",
            key
        );
    }

    1 + lh.max(rh)
}

fn assert_avl(engine: &Engine) {
    let head = engine.head_slot().unwrap();
    check_subtree(engine, head, None, None, true);
}

fn assert_bst(engine: &Engine) {
    let head = engine.head_slot().unwrap();
    check_subtree(engine, head, None, None, false);
}

fn reachable_keys(engine: &Engine) -> Vec<i32> {
    engine
        .range_search(i32::MIN + 1, i32::MAX)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect()
}

fn root_key(engine: &Engine) -> i32 {
    let head = engine.head_slot().unwrap();
    engine.node(head).unwrap().record.id
}

// =============================================================================
// Basic Operations Tests
// =============================================================================

#[test]
fn test_search_on_empty_store_is_empty_tree() {
    let (_dir, engine) = setup_temp_engine();

    assert!(matches!(engine.search(1), Err(StoreError::EmptyTree)));
    assert!(matches!(engine.delete(1), Err(StoreError::EmptyTree)));
}

#[test]
fn test_insert_then_search_returns_payload() {
    let (_dir, engine) = setup_temp_engine();

    engine
        .insert(Record::new(5, "Keyboard", 3, 49.9, "2024-02-11"))
        .unwrap();

    let found = engine.search(5).unwrap();
    assert_eq!(found.name, "Keyboard");
    assert_eq!(found.quantity, 3);
    assert_eq!(found.date, "2024-02-11");
}

#[test]
fn test_search_missing_key_is_not_found() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 5, 15]);

    assert!(matches!(
        engine.search(7),
        Err(StoreError::NotFound { key: 7 })
    ));
}

#[test]
fn test_duplicate_insert_is_rejected_and_tree_unchanged() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 5, 15]);

    let result = engine.insert(Record::new(5, "impostor", 0, 0.0, "2030-01-01"));
    assert!(matches!(result, Err(StoreError::DuplicateKey { key: 5 })));

    // Reachable set and original payload untouched.
    assert_eq!(reachable_keys(&engine), vec![5, 10, 15]);
    assert_eq!(engine.search(5).unwrap().name, "item 5");
    assert_avl(&engine);
}

// =============================================================================
// Balance Invariant Tests
// =============================================================================

#[test]
fn test_invariants_hold_after_every_insert() {
    let (_dir, engine) = setup_temp_engine();

    for key in [20, 10, 30, 5, 15, 25, 35, 1] {
        engine.insert(record(key)).unwrap();
        assert_avl(&engine);
    }

    // Hand-computed shape: no rotation fires for this sequence; 20 stays
    // the root, leaning left after key 1 lands under 5.
    assert_eq!(root_key(&engine), 20);
    let root = engine.node(engine.head_slot().unwrap()).unwrap();
    assert_eq!(root.balance, -1);
    assert_eq!(reachable_keys(&engine), vec![1, 5, 10, 15, 20, 25, 30, 35]);
}

#[test]
fn test_ascending_inserts_stay_balanced() {
    let (_dir, engine) = setup_temp_engine();

    for key in 1..=32 {
        engine.insert(record(key)).unwrap();
        assert_avl(&engine);
    }
    assert_eq!(reachable_keys(&engine), (1..=32).collect::<Vec<i32>>());
}

#[test]
fn test_descending_inserts_stay_balanced() {
    let (_dir, engine) = setup_temp_engine();

    for key in (1..=32).rev() {
        engine.insert(record(key)).unwrap();
        assert_avl(&engine);
    }
    assert_eq!(reachable_keys(&engine), (1..=32).collect::<Vec<i32>>());
}

#[test]
fn test_mixed_order_inserts_stay_balanced() {
    let (_dir, engine) = setup_temp_engine();

    for key in [50, 17, 72, 12, 23, 54, 76, 9, 14, 19, 67, 64, 18, 20, 21] {
        engine.insert(record(key)).unwrap();
        assert_avl(&engine);
    }
}

// =============================================================================
// Rotation Tests
// =============================================================================

#[test]
fn test_single_rotation_replaces_root() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 20, 30]);

    // RR case: 20 is promoted, 10 and 30 become its children.
    assert_eq!(root_key(&engine), 20);
    let root = engine.node(engine.head_slot().unwrap()).unwrap();
    assert_eq!(engine.node(root.left).unwrap().record.id, 10);
    assert_eq!(engine.node(root.right).unwrap().record.id, 30);
    assert_avl(&engine);
}

#[test]
fn test_double_rotation_replaces_root() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 30, 20]);

    // RL case: the inner child 20 is promoted above both.
    assert_eq!(root_key(&engine), 20);
    assert_avl(&engine);
}

#[test]
fn test_rotation_below_root_relinks_parent() {
    let (_dir, engine) = setup_temp_engine();

    // 40 stays the root; inserting 10 then 20 forces an LR double
    // rotation inside 40's left subtree, whose new root 20 must be
    // re-linked as 40's left child.
    insert_all(&engine, &[40, 30, 50, 10, 60, 20]);

    assert_eq!(root_key(&engine), 40);
    let root = engine.node(engine.head_slot().unwrap()).unwrap();
    assert_eq!(engine.node(root.left).unwrap().record.id, 20);
    assert_avl(&engine);
}

// =============================================================================
// Range Search Tests
// =============================================================================

#[test]
fn test_range_search_on_balanced_tree() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[4, 2, 6, 1, 3, 5, 7]);

    let ids: Vec<i32> = engine
        .range_search(3, 6)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![3, 4, 5, 6]);
}

#[test]
fn test_range_search_bounds_are_inclusive() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[4, 2, 6, 1, 3, 5, 7]);

    let ids: Vec<i32> = engine
        .range_search(1, 7)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6, 7]);

    let single: Vec<i32> = engine
        .range_search(4, 4)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(single, vec![4]);
}

#[test]
fn test_range_search_no_matches_is_empty() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 20, 30]);

    assert!(engine.range_search(11, 19).unwrap().is_empty());
    assert!(engine.range_search(-50, 5).unwrap().is_empty());
    assert!(engine.range_search(40, 90).unwrap().is_empty());
}

#[test]
fn test_range_search_on_empty_tree_is_empty() {
    let (_dir, engine) = setup_temp_engine();

    assert!(engine.range_search(0, 100).unwrap().is_empty());
}

#[test]
fn test_range_search_returns_keys_sorted_regardless_of_insert_order() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[42, 7, 99, 3, 58, 21, 88, 14]);

    let ids: Vec<i32> = engine
        .range_search(5, 60)
        .unwrap()
        .iter()
        .map(|r| r.id)
        .collect();
    assert_eq!(ids, vec![7, 14, 21, 42, 58]);
}

// =============================================================================
// Delete Tests
// =============================================================================

#[test]
fn test_delete_leaf() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[4, 2, 6, 1, 3, 5, 7]);

    engine.delete(1).unwrap();

    assert!(matches!(engine.search(1), Err(StoreError::NotFound { .. })));
    assert_eq!(reachable_keys(&engine), vec![2, 3, 4, 5, 6, 7]);
    assert_bst(&engine);
}

#[test]
fn test_delete_node_with_one_child() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 5, 20, 3]);

    // 5 has a single left child 3, which takes its place under 10.
    engine.delete(5).unwrap();

    assert_eq!(reachable_keys(&engine), vec![3, 10, 20]);
    let root = engine.node(engine.head_slot().unwrap()).unwrap();
    assert_eq!(engine.node(root.left).unwrap().record.id, 3);
    assert_bst(&engine);
}

#[test]
fn test_delete_root_with_two_children_promotes_successor() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[4, 2, 6, 1, 3, 5, 7]);

    engine.delete(4).unwrap();

    // The in-order successor 5 occupies the vacated position.
    assert_eq!(root_key(&engine), 5);
    assert!(matches!(engine.search(4), Err(StoreError::NotFound { .. })));
    assert_eq!(reachable_keys(&engine), vec![1, 2, 3, 5, 6, 7]);
    assert_bst(&engine);
}

#[test]
fn test_delete_with_deep_successor() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[50, 30, 70, 20, 40, 60, 80, 65]);

    // 50's successor is 60, two levels down in the right subtree; its
    // own right child 65 must be re-linked under 70.
    engine.delete(50).unwrap();

    assert_eq!(root_key(&engine), 60);
    assert_eq!(reachable_keys(&engine), vec![20, 30, 40, 60, 65, 70, 80]);
    assert_bst(&engine);
}

#[test]
fn test_delete_root_leaf_empties_tree() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[9]);

    engine.delete(9).unwrap();

    assert_eq!(engine.head_slot().unwrap(), NIL);
    assert!(matches!(engine.search(9), Err(StoreError::EmptyTree)));
}

#[test]
fn test_delete_missing_key_is_not_found() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[10, 5]);

    assert!(matches!(
        engine.delete(99),
        Err(StoreError::NotFound { key: 99 })
    ));
    assert_eq!(reachable_keys(&engine), vec![5, 10]);
}

#[test]
fn test_delete_does_not_shrink_record_count() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[4, 2, 6]);

    engine.delete(2).unwrap();

    // The slot stays on disk, detached from the tree.
    assert_eq!(engine.record_count().unwrap(), 3);
    let scanned: Vec<i32> = engine.scan_all().unwrap().iter().map(|r| r.id).collect();
    assert_eq!(scanned, vec![4, 2, 6]);
    assert_eq!(reachable_keys(&engine), vec![4, 6]);
}

#[test]
fn test_reinsert_after_delete_appends_new_slot() {
    let (_dir, engine) = setup_temp_engine();
    insert_all(&engine, &[4, 2, 6]);

    engine.delete(2).unwrap();
    engine.insert(record(2)).unwrap();

    // Vacated slots are never reused.
    assert_eq!(engine.record_count().unwrap(), 4);
    assert_eq!(reachable_keys(&engine), vec![2, 4, 6]);
    assert_eq!(engine.search(2).unwrap().name, "item 2");
}

// =============================================================================
// Persistence Tests
// =============================================================================

#[test]
fn test_tree_survives_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.dat");

    {
        let engine = Engine::open_path(&path).unwrap();
        insert_all(&engine, &[20, 10, 30, 5, 15, 25, 35]);
    }

    // Slot references are file-relative, so no rebuild happens on open.
    let engine = Engine::open_path(&path).unwrap();
    assert_eq!(reachable_keys(&engine), vec![5, 10, 15, 20, 25, 30, 35]);
    assert_eq!(engine.search(15).unwrap().name, "item 15");
    assert_avl(&engine);
}

#[test]
fn test_operations_continue_after_reopen() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("store.dat");

    {
        let engine = Engine::open_path(&path).unwrap();
        insert_all(&engine, &[10, 5, 15]);
    }

    let engine = Engine::open_path(&path).unwrap();
    engine.insert(record(12)).unwrap();
    engine.delete(5).unwrap();

    assert_eq!(reachable_keys(&engine), vec![10, 12, 15]);
    assert_bst(&engine);
}
