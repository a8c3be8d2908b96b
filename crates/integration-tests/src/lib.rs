//! Integration tests for GoMarket.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p gomarket-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_concurrency` - lost-update regression and concurrent-mutation tests
//! - `cart_persistence` - storage round trips, hydration, and write-failure
//!   behavior
//!
//! This crate also provides shared test fixtures: a [`FlakyStore`] backend
//! that fails a configurable number of writes, and line-item builders.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use gomarket_cart::{KeyValueStore, MemoryStore, NewLineItem, StorageError};
use gomarket_core::ProductId;

/// A backend whose first `failures` writes fail, then behaves like
/// [`MemoryStore`]. Reads always succeed.
pub struct FlakyStore {
    inner: MemoryStore,
    remaining_failures: AtomicUsize,
    attempted_sets: AtomicUsize,
}

impl FlakyStore {
    /// Create a store that fails the first `failures` calls to `set`.
    #[must_use]
    pub fn failing_first(failures: usize) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryStore::new(),
            remaining_failures: AtomicUsize::new(failures),
            attempted_sets: AtomicUsize::new(0),
        })
    }

    /// Number of `set` calls observed so far, including failed ones.
    #[must_use]
    pub fn attempted_sets(&self) -> usize {
        self.attempted_sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeyValueStore for FlakyStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.attempted_sets.fetch_add(1, Ordering::SeqCst);

        let should_fail = self
            .remaining_failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if should_fail {
            return Err(StorageError::Backend("injected write failure".to_owned()));
        }

        self.inner.set(key, value).await
    }
}

/// Build a candidate line item with synthetic attributes.
///
/// # Panics
///
/// Panics if `id` is empty.
#[must_use]
pub fn candidate(id: &str) -> NewLineItem {
    NewLineItem {
        id: ProductId::parse(id).expect("test ids are non-empty"),
        title: format!("Product {id}"),
        image_url: format!("https://img.example/{id}.png"),
        price: "9.99".parse().expect("valid price"),
    }
}
