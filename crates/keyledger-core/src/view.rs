//! Live, read-only view of the account collection.

use std::sync::Arc;

use tokio::sync::watch;

use crate::account::Account;

/// An immutable snapshot of the collection.
pub type Snapshot = Arc<[Account]>;

/// Observer handle returned by [`AccountStore::subscribe`](crate::AccountStore::subscribe).
///
/// The store publishes a fresh snapshot after every mutation. A view can
/// be cloned, moved to another thread, and outlive the store; once the
/// store is dropped it keeps returning the last snapshot.
#[derive(Debug, Clone)]
pub struct AccountsView {
    rx: watch::Receiver<Snapshot>,
}

impl AccountsView {
    pub(crate) fn new(rx: watch::Receiver<Snapshot>) -> Self {
        Self { rx }
    }

    /// The latest published snapshot.
    #[must_use]
    pub fn current(&self) -> Snapshot {
        Arc::clone(&self.rx.borrow())
    }

    /// Whether a snapshot newer than the last one seen through
    /// [`changed`](Self::changed) has been published.
    #[must_use]
    pub fn has_changed(&self) -> bool {
        self.rx.has_changed().unwrap_or(false)
    }

    /// Wait for the next mutation and return the snapshot it produced.
    ///
    /// Returns `None` once the store has been dropped and no unseen
    /// snapshot remains.
    pub async fn changed(&mut self) -> Option<Snapshot> {
        self.rx.changed().await.ok()?;
        Some(Arc::clone(&self.rx.borrow_and_update()))
    }
}
