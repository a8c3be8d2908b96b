//! GoMarket Cart - the cart line-item store.
//!
//! This crate owns an ordered list of cart line items that mirrors a single
//! persisted key-value record. Consumers read the current list and issue
//! add/increment/decrement operations; every mutation commits to a single
//! authoritative in-memory copy synchronously and re-serializes the full list
//! to storage in the background.
//!
//! # Architecture
//!
//! - [`store::CartStore`] - the state container; the only mutable surface
//! - [`storage`] - the `get(key)`/`set(key, value)` persistence seam with
//!   in-memory, JSON-file, and (feature `postgres`) database backends
//! - [`codec`] - the versioned on-disk JSON format, tolerant of the legacy
//!   unversioned array form
//! - [`model`] - line-item value types and pure list transforms
//!
//! The store is constructed once with a backend injected and handed by
//! reference (or clone - it is `Arc`-shared) to whatever layer needs it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod codec;
pub mod config;
pub mod error;
pub mod model;
pub mod storage;
pub mod store;

pub use config::CartConfig;
pub use error::CartError;
pub use model::{LineItem, NewLineItem};
pub use storage::{JsonFileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::CartStore;
