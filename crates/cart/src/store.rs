//! The cart store: a single authoritative in-memory line-item list mirrored
//! to a persisted key-value record.
//!
//! # Consistency contract
//!
//! Every mutation locks the committed state, computes the next list as a
//! value copy, and installs it - synchronously, before any suspension point.
//! Two operations issued back-to-back therefore never both read the same
//! "before" state; the second always sees the first's commit. The serialized
//! snapshot of each commit is handed to a single background writer task that
//! coalesces queued snapshots to the newest before writing, so storage sees
//! commits in order with last-commit-wins and a retry always carries the
//! latest committed snapshot, never a stale one.
//!
//! Callers fire and forget: mutating operations return once the in-memory
//! commit is done. [`CartStore::flush`] exists for shutdown paths and tests
//! that need to observe the persisted copy catching up.

use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, instrument, warn};

use gomarket_core::{ProductId, Quantity};

use crate::codec;
use crate::config::CartConfig;
use crate::error::{CartError, Result};
use crate::model::{self, LineItem, NewLineItem};
use crate::storage::KeyValueStore;

/// The committed, authoritative cart state.
struct Committed {
    items: Vec<LineItem>,
    /// Monotonic counter of queued snapshots; backs `flush`.
    seq: u64,
}

/// One serialized snapshot queued for the writer task.
struct WriteJob {
    seq: u64,
    payload: String,
}

struct Inner {
    state: Mutex<Committed>,
    jobs: mpsc::UnboundedSender<WriteJob>,
    persisted: watch::Receiver<u64>,
}

/// The cart line-item store.
///
/// Cheaply cloneable - clones share the same authoritative state. Construct
/// it once with [`CartStore::open`] and hand it (or clones) to whatever
/// layer needs cart access; there is no ambient global to look up.
#[derive(Clone)]
pub struct CartStore {
    inner: Arc<Inner>,
}

impl CartStore {
    /// Open the store over a persistence backend and hydrate it from the
    /// configured storage key.
    ///
    /// An absent record yields an empty cart. A present but malformed record
    /// also yields an empty cart, with a warning - a corrupt payload must
    /// never take the store down. Hydration completes before the handle is
    /// returned, so no mutation can ever race the initial read.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::Storage`] if the backend read itself fails;
    /// failing loudly at construction beats silently discarding a cart that
    /// is actually still there.
    #[instrument(skip(storage, config), fields(key = %config.storage_key))]
    pub async fn open(storage: Arc<dyn KeyValueStore>, config: &CartConfig) -> Result<Self> {
        let items = hydrate(storage.as_ref(), &config.storage_key).await?;

        let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
        let (persisted_tx, persisted_rx) = watch::channel(0);
        tokio::spawn(write_loop(
            storage,
            config.storage_key.clone(),
            jobs_rx,
            persisted_tx,
        ));

        Ok(Self {
            inner: Arc::new(Inner {
                state: Mutex::new(Committed { items, seq: 0 }),
                jobs: jobs_tx,
                persisted: persisted_rx,
            }),
        })
    }

    /// A snapshot of the current line items, in insertion order.
    #[must_use]
    pub fn items(&self) -> Vec<LineItem> {
        self.lock_state().items.clone()
    }

    /// Number of distinct line items in the cart.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock_state().items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock_state().items.is_empty()
    }

    /// Add a product to the cart.
    ///
    /// If no line item has the candidate's id, one is appended with quantity
    /// 1. Otherwise the existing item's quantity is bumped by one and its
    /// stored attributes win - the candidate's title/price/image are not
    /// used to overwrite them.
    pub fn add_item(&self, candidate: NewLineItem) {
        debug!(id = %candidate.id, "add to cart");
        self.commit(|items| Some(model::with_added(items, candidate)));
    }

    /// Increase the quantity of the line item with `id` by one.
    ///
    /// Unknown ids are a caller logic error: the call is a no-op and logs a
    /// warning naming the id.
    pub fn increment(&self, id: &ProductId) {
        self.adjust(id, "increment", Quantity::saturating_increment);
    }

    /// Decrease the quantity of the line item with `id` by one, stopping at
    /// 1. The quantity never reaches 0 and the item is never removed.
    ///
    /// Unknown ids are a caller logic error: the call is a no-op and logs a
    /// warning naming the id.
    pub fn decrement(&self, id: &ProductId) {
        self.adjust(id, "decrement", Quantity::saturating_decrement);
    }

    /// Wait until the writer task has processed every snapshot queued before
    /// this call.
    ///
    /// Mutations are fire-and-forget; call this on shutdown (and in tests)
    /// to observe the persisted copy catching up. A failed write still
    /// counts as processed - persistence failures are non-fatal warnings and
    /// the in-memory state stays authoritative.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::WriterStopped`] if the writer task is gone.
    pub async fn flush(&self) -> Result<()> {
        let target = self.lock_state().seq;
        let mut persisted = self.inner.persisted.clone();
        while *persisted.borrow_and_update() < target {
            persisted
                .changed()
                .await
                .map_err(|_| CartError::WriterStopped)?;
        }
        Ok(())
    }

    /// Commit a state transition and enqueue its snapshot for persistence.
    ///
    /// `apply` sees the committed list and returns the next one, or `None`
    /// for no change. The snapshot is enqueued while the state lock is still
    /// held: channel order must match commit order, and the unbounded send
    /// never blocks. The lock is never held across an await point.
    fn commit<F>(&self, apply: F) -> bool
    where
        F: FnOnce(&[LineItem]) -> Option<Vec<LineItem>>,
    {
        let mut state = self.lock_state();
        let Some(next) = apply(&state.items) else {
            return false;
        };
        state.items = next;

        match codec::encode(&state.items) {
            Ok(payload) => {
                state.seq += 1;
                let job = WriteJob {
                    seq: state.seq,
                    payload,
                };
                if self.inner.jobs.send(job).is_err() {
                    warn!("persistence writer task stopped; cart changes are in-memory only");
                }
            }
            Err(e) => {
                // Commit stands; only the persisted mirror falls behind. The
                // sequence is not bumped: no job carries this state, so it
                // must not become a flush target.
                warn!(error = %e, "failed to serialize cart snapshot");
            }
        }
        true
    }

    fn adjust(&self, id: &ProductId, op: &'static str, f: impl Fn(Quantity) -> Quantity) {
        let changed = self.commit(|items| model::with_adjusted(items, id, &f));
        if !changed {
            warn!(%id, "cart {op} ignored: no line item with this id");
        }
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, Committed> {
        // A poisoned lock only means another thread panicked mid-commit; the
        // state itself is always a complete value, so keep serving it.
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read and decode the stored cart record.
async fn hydrate(storage: &dyn KeyValueStore, key: &str) -> Result<Vec<LineItem>> {
    match storage.get(key).await? {
        None => {
            debug!("no stored cart record; starting empty");
            Ok(Vec::new())
        }
        Some(payload) => match codec::decode(&payload) {
            Ok(items) => {
                info!(count = items.len(), "hydrated cart from storage");
                Ok(items)
            }
            Err(e) => {
                warn!(error = %e, "stored cart record is malformed; starting empty");
                Ok(Vec::new())
            }
        },
    }
}

/// Background writer: persists committed snapshots in commit order.
async fn write_loop(
    storage: Arc<dyn KeyValueStore>,
    key: String,
    mut jobs: mpsc::UnboundedReceiver<WriteJob>,
    persisted: watch::Sender<u64>,
) {
    while let Some(mut job) = jobs.recv().await {
        // Coalesce to the newest committed snapshot. Every snapshot carries
        // the full list, so intermediate writes are skippable.
        while let Ok(newer) = jobs.try_recv() {
            job = newer;
        }

        let mut result = storage.set(&key, &job.payload).await;
        if result.is_err() {
            result = storage.set(&key, &job.payload).await;
        }

        match result {
            Ok(()) => debug!(seq = job.seq, "cart snapshot persisted"),
            Err(e) => {
                warn!(
                    error = %e,
                    seq = job.seq,
                    "cart persistence failed; in-memory state remains authoritative"
                );
            }
        }

        // Advance even on failure so flush() reports "processed", not
        // "succeeded"; the next commit carries the full state anyway.
        let _ = persisted.send(job.seq);
    }
}
