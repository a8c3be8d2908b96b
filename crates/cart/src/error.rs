//! Cart store error type.
//!
//! Only conditions the caller can act on become errors. Recoverable
//! conditions - a malformed stored payload, a mutation naming an unknown id,
//! a failed background write - are logged as warnings at the point they
//! occur and never cross the store boundary (see [`crate::store`]).

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by [`crate::store::CartStore`].
#[derive(Debug, Error)]
pub enum CartError {
    /// The persistence backend failed during initial hydration. Surfaced
    /// loudly at construction because it usually means a wiring defect
    /// (wrong path, unreachable database) rather than a runtime condition.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// The background persistence writer stopped; `flush` can no longer
    /// observe writes completing.
    #[error("persistence writer task stopped")]
    WriterStopped,
}

/// Result type alias for [`CartError`].
pub type Result<T> = std::result::Result<T, CartError>;
