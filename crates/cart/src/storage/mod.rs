//! Key-value persistence seam.
//!
//! The cart store does not own a storage engine; it is constructed with any
//! backend that can read and write one opaque string value per key. Backends:
//!
//! - [`MemoryStore`] - in-process `HashMap`, used in tests and as a default
//! - [`JsonFileStore`] - one JSON file per key under a base directory
//! - `PgKeyValueStore` - `PostgreSQL` table (requires the `postgres` feature)

use async_trait::async_trait;
use thiserror::Error;

mod file;
mod memory;
#[cfg(feature = "postgres")]
mod postgres;

pub use file::JsonFileStore;
pub use memory::MemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::{PgKeyValueStore, create_pool};

/// Errors surfaced by a persistence backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem I/O failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// Database operation failed.
    #[cfg(feature = "postgres")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Backend-specific failure that fits no other variant.
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A generic key-value persistence service.
///
/// Values are opaque UTF-8 strings; the cart stores its entire serialized
/// list as one value under one fixed key. Implementations must be safe to
/// call from the store's background writer task.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend read fails.
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Write `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the backend write fails.
    async fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}
