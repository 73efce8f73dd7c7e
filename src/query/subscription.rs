//! Subscriber handles.

use crate::query::entry::{FetchTrigger, QueryEntry};
use crate::query::options::RefreshInterval;
use crate::query::snapshot::QuerySnapshot;
use crate::query::QueryKey;

use futures_util::Stream;
use std::sync::Arc;
use tokio::sync::watch;

/// A live view of one cache entry.
///
/// Every subscriber to the same key observes the same snapshots. Dropping
/// the handle unsubscribes; once the last subscriber is gone the entry is
/// evicted after its `gc_time`.
pub struct Subscription<T: Send + Sync + 'static> {
    entry: Arc<QueryEntry<T>>,
    observer_id: u64,
    rx: watch::Receiver<QuerySnapshot<T>>,
}

impl<T: Send + Sync + 'static> Subscription<T> {
    pub(crate) fn new(entry: Arc<QueryEntry<T>>, observer_id: u64) -> Self {
        let rx = entry.receiver();
        Self {
            entry,
            observer_id,
            rx,
        }
    }

    pub fn key(&self) -> &QueryKey {
        self.entry.key()
    }

    /// The latest snapshot.
    pub fn snapshot(&self) -> QuerySnapshot<T> {
        self.rx.borrow().clone()
    }

    /// Whether a fetch for this key is currently running.
    pub fn is_fetching(&self) -> bool {
        self.entry.is_fetching()
    }

    /// Wait for the next snapshot change and return it.
    pub async fn changed(&mut self) -> QuerySnapshot<T> {
        // The sender lives as long as the entry, which we hold.
        let _ = self.rx.changed().await;
        self.rx.borrow_and_update().clone()
    }

    /// Wait until a snapshot satisfies `predicate`, checking the current one first.
    pub async fn wait_for(
        &mut self,
        mut predicate: impl FnMut(&QuerySnapshot<T>) -> bool,
    ) -> QuerySnapshot<T> {
        let found = self
            .rx
            .wait_for(|snap| predicate(snap))
            .await
            .map(|snap| snap.clone());
        match found {
            Ok(snap) => snap,
            Err(_) => self.snapshot(),
        }
    }

    /// Stream of snapshots, one per change after this call.
    pub fn updates(&self) -> impl Stream<Item = QuerySnapshot<T>> + Send + 'static {
        let mut rx = self.rx.clone();
        rx.mark_unchanged();
        async_stream::stream! {
            while rx.changed().await.is_ok() {
                let snap = rx.borrow_and_update().clone();
                yield snap;
            }
        }
    }

    /// Force a fetch now, superseding any fetch in flight.
    ///
    /// Returns false when the query is disabled or evicted.
    pub fn refetch(&self) -> bool {
        self.entry.fetch(FetchTrigger::Manual)
    }

    /// Enable or disable this subscriber. Enabling a stale entry fetches it.
    pub fn set_enabled(&self, enabled: bool) {
        self.entry.set_observer_enabled(self.observer_id, enabled);
    }

    /// Swap the refresh policy; the timer is re-armed against it immediately.
    pub fn set_refresh_interval(&self, interval: RefreshInterval) {
        self.entry.set_refresh_interval(interval);
    }
}

impl<T: Send + Sync + 'static> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.entry.detach(self.observer_id);
    }
}

impl<T: Send + Sync + 'static> std::fmt::Debug for Subscription<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", self.entry.key())
            .field("observer_id", &self.observer_id)
            .field("snapshot", &*self.rx.borrow())
            .finish()
    }
}
