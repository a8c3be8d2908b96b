//! Concurrency tests for the cart store.
//!
//! The store's contract: every mutation commits to the single authoritative
//! in-memory state synchronously, before any suspension point, so overlapping
//! operations never both compute from the same stale snapshot.

use std::sync::Arc;

use gomarket_cart::{CartConfig, CartStore, MemoryStore};
use gomarket_core::ProductId;

use gomarket_integration_tests::candidate;

async fn open_store() -> (Arc<MemoryStore>, CartStore) {
    let storage = Arc::new(MemoryStore::new());
    let store = CartStore::open(storage.clone(), &CartConfig::default())
        .await
        .expect("open store");
    (storage, store)
}

/// Decode whatever is currently persisted into a list of (id, quantity).
async fn persisted_state(storage: &MemoryStore) -> Vec<(String, u32)> {
    use gomarket_cart::KeyValueStore;

    let payload = storage
        .get(&CartConfig::default().storage_key)
        .await
        .expect("storage read")
        .expect("record present");

    let value: serde_json::Value = serde_json::from_str(&payload).expect("valid json");
    value["items"]
        .as_array()
        .expect("items array")
        .iter()
        .map(|item| {
            (
                item["id"].as_str().expect("id").to_owned(),
                u32::try_from(item["quantity"].as_u64().expect("quantity")).expect("fits u32"),
            )
        })
        .collect()
}

#[tokio::test]
async fn overlapping_adds_do_not_lose_updates() {
    // Regression test for the stale-snapshot race: add(A) then add(B) issued
    // back-to-back, neither awaiting persistence. The persisted record must
    // contain both items, not just B.
    let (storage, store) = open_store().await;

    store.add_item(candidate("A"));
    store.add_item(candidate("B"));
    store.flush().await.expect("flush");

    let persisted = persisted_state(&storage).await;
    assert_eq!(
        persisted,
        vec![("A".to_owned(), 1), ("B".to_owned(), 1)]
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_adds_from_many_tasks_all_land() {
    let (storage, store) = open_store().await;

    let mut handles = Vec::new();
    for i in 0..16 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            store.add_item(candidate(&format!("p{i}")));
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }
    store.flush().await.expect("flush");

    assert_eq!(store.len(), 16);

    let mut persisted = persisted_state(&storage).await;
    persisted.sort();
    assert_eq!(persisted.len(), 16);
    assert!(persisted.iter().all(|(_, qty)| *qty == 1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_on_one_item_all_count() {
    let (_, store) = open_store().await;
    let id = ProductId::parse("p1").expect("valid id");

    store.add_item(candidate("p1"));

    let mut handles = Vec::new();
    for _ in 0..32 {
        let store = store.clone();
        let id = id.clone();
        handles.push(tokio::spawn(async move {
            store.increment(&id);
        }));
    }
    for handle in handles {
        handle.await.expect("task");
    }

    let items = store.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].quantity.get(), 33);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn flush_tracks_heavy_concurrent_increments() {
    // Commits and their write jobs must hit the channel in the same order.
    // If a thread could commit, get preempted, and enqueue after a later
    // commit's job, the writer would treat the stale snapshot as newest and
    // ack a sequence below the flush target - hanging flush and persisting
    // the wrong quantity.
    let (storage, store) = open_store().await;
    let id = ProductId::parse("p1").expect("valid id");

    store.add_item(candidate("p1"));

    for _ in 0..10 {
        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let id = id.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..25 {
                    store.increment(&id);
                }
            }));
        }
        for handle in handles {
            handle.await.expect("task");
        }

        tokio::time::timeout(std::time::Duration::from_secs(5), store.flush())
            .await
            .expect("flush must not hang")
            .expect("flush");

        let expected = store.items()[0].quantity.get();
        let persisted = persisted_state(&storage).await;
        assert_eq!(persisted, vec![("p1".to_owned(), expected)]);
    }
}

#[tokio::test]
async fn storage_sees_the_latest_commit_last() {
    // Commit order must be preserved in storage: after a burst of mutations,
    // the persisted record matches the final in-memory state exactly.
    let (storage, store) = open_store().await;
    let id = ProductId::parse("A").expect("valid id");

    store.add_item(candidate("A"));
    store.add_item(candidate("B"));
    store.increment(&id);
    store.increment(&id);
    store.decrement(&id);
    store.flush().await.expect("flush");

    let persisted = persisted_state(&storage).await;
    assert_eq!(
        persisted,
        vec![("A".to_owned(), 2), ("B".to_owned(), 1)]
    );
}
