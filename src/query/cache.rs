//! The shared query cache.

use crate::clock::MarketClock;
use crate::error::SdkError;
use crate::query::entry::{ErasedEntry, Fetcher, QueryEntry};
use crate::query::options::QueryOptions;
use crate::query::snapshot::QuerySnapshot;
use crate::query::subscription::Subscription;
use crate::query::QueryKey;

use futures_util::FutureExt;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};

/// Key → entry map. Lock order is always registry first, then entry.
pub(crate) struct Registry {
    entries: Mutex<HashMap<QueryKey, Arc<dyn ErasedEntry>>>,
}

impl Registry {
    fn lock(&self) -> MutexGuard<'_, HashMap<QueryKey, Arc<dyn ErasedEntry>>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Removes `entry` if it is still the one registered under `key` and
    /// nobody re-subscribed during the grace period.
    pub(crate) fn remove_if_idle(&self, key: &QueryKey, entry: &Arc<dyn ErasedEntry>) {
        let mut entries = self.lock();
        let Some(current) = entries.get(key) else {
            entry.evict();
            return;
        };
        if !same_entry(current, entry) {
            entry.evict();
            return;
        }
        if current.observer_count() > 0 {
            return;
        }
        if let Some(removed) = entries.remove(key) {
            removed.evict();
        }
    }
}

fn same_entry(a: &Arc<dyn ErasedEntry>, b: &Arc<dyn ErasedEntry>) -> bool {
    std::ptr::eq(
        Arc::as_ptr(a) as *const (),
        Arc::as_ptr(b) as *const (),
    )
}

/// Process-wide, keyed cache of server data.
///
/// Cloning is cheap; clones share the same entries.
#[derive(Clone)]
pub struct QueryCache {
    registry: Arc<Registry>,
    market: MarketClock,
}

impl QueryCache {
    pub fn new(market: MarketClock) -> Self {
        Self {
            registry: Arc::new(Registry {
                entries: Mutex::new(HashMap::new()),
            }),
            market,
        }
    }

    /// The market clock refresh policies are evaluated against.
    pub fn market(&self) -> &MarketClock {
        &self.market
    }

    /// Subscribe to `key`, creating the entry if needed.
    ///
    /// If the entry is enabled and its data is stale, a fetch is issued (or
    /// joined if one is already in flight). The returned handle unsubscribes
    /// on drop. Must be called from within a Tokio runtime.
    pub fn subscribe<T, F, Fut>(
        &self,
        key: QueryKey,
        fetch: F,
        options: QueryOptions,
    ) -> Result<Subscription<T>, SdkError>
    where
        T: Send + Sync + 'static,
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, SdkError>> + Send + 'static,
    {
        if tokio::runtime::Handle::try_current().is_err() {
            return Err(SdkError::Other(
                "query subscriptions require a Tokio runtime".to_string(),
            ));
        }

        let fetcher: Fetcher<T> = Arc::new(move || fetch().boxed());
        let mut entries = self.registry.lock();

        let entry = match entries.get(&key) {
            Some(existing) => existing
                .clone()
                .into_any()
                .downcast::<QueryEntry<T>>()
                .map_err(|_| {
                    SdkError::Validation(format!(
                        "query key {} is registered with a different payload type",
                        key
                    ))
                })?,
            None => {
                let entry = QueryEntry::new(
                    key.clone(),
                    self.market.clone(),
                    Arc::downgrade(&self.registry),
                    fetcher.clone(),
                    options.clone(),
                );
                entries.insert(key.clone(), entry.clone() as Arc<dyn ErasedEntry>);
                tracing::debug!(key = %key, "query entry created");
                entry
            }
        };

        // Attach while holding the map so a pending eviction cannot race us.
        let observer_id = entry.attach(fetcher, options);
        drop(entries);

        Ok(Subscription::new(entry, observer_id))
    }

    /// Current snapshot for `key`, if an entry of payload type `T` exists.
    pub fn snapshot<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<QuerySnapshot<T>> {
        let entry = self.registry.lock().get(key).cloned()?;
        entry
            .into_any()
            .downcast::<QueryEntry<T>>()
            .ok()
            .map(|entry| entry.snapshot())
    }

    /// Mark `key` stale and refetch it if anyone is subscribed and enabled.
    ///
    /// Returns whether a fetch was started.
    pub fn invalidate(&self, key: &QueryKey) -> bool {
        let entry = self.registry.lock().get(key).cloned();
        match entry {
            Some(entry) => entry.invalidate(),
            None => false,
        }
    }

    /// Invalidate every entry whose key has the given name, regardless of
    /// parameters. Returns the number of fetches started.
    pub fn invalidate_matching(&self, name: &str) -> usize {
        let matching: Vec<_> = self
            .registry
            .lock()
            .iter()
            .filter(|(key, _)| key.name() == name)
            .map(|(_, entry)| entry.clone())
            .collect();
        matching
            .into_iter()
            .filter(|entry| entry.clone().invalidate())
            .count()
    }

    /// Evict `key` immediately. Existing subscriptions receive a final
    /// `Error` snapshot (prior data kept) and no further updates; subscribe
    /// again to get a live entry.
    pub fn remove(&self, key: &QueryKey) -> bool {
        let removed = self.registry.lock().remove(key);
        match removed {
            Some(entry) => {
                entry.evict();
                true
            }
            None => false,
        }
    }

    /// Evict every entry.
    pub fn clear(&self) {
        let drained: Vec<_> = self.registry.lock().drain().map(|(_, e)| e).collect();
        for entry in drained {
            entry.evict();
        }
    }

    /// Re-arm every refresh timer against the current market clock.
    ///
    /// Call after a session boundary to resume refreshing entries whose
    /// policy suspended them while the market was closed.
    pub fn reschedule_all(&self) {
        let entries: Vec<_> = self.registry.lock().values().cloned().collect();
        for entry in entries {
            entry.reschedule();
        }
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.registry.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(MarketClock::default())
    }
}

impl std::fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.len())
            .field("market", &self.market)
            .finish()
    }
}
