//! Per-key query state: fetch deduplication, generation gating, refresh and
//! eviction timers.
//!
//! The state mutex is never held across an `.await`. All suspension happens
//! inside spawned fetch/timer tasks, which re-enter through [`QueryEntry::settle`]
//! or [`QueryEntry::fetch`].

use crate::clock::MarketClock;
use crate::error::SdkError;
use crate::query::cache::Registry;
use crate::query::options::{QueryOptions, RefreshInterval};
use crate::query::retry::RetryPolicy;
use crate::query::snapshot::{QuerySnapshot, QueryStatus};
use crate::query::QueryKey;

use futures_util::future::BoxFuture;
use std::any::Any;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

pub(crate) type Fetcher<T> =
    Arc<dyn Fn() -> BoxFuture<'static, Result<T, SdkError>> + Send + Sync>;

/// What asked for a fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FetchTrigger {
    /// A subscriber arrived (or was enabled) and the data is stale.
    Mount,
    /// The refresh timer fired.
    Interval,
    /// A consumer forced a refresh; supersedes any in-flight fetch.
    Manual,
}

struct InFlight {
    generation: u64,
    handle: JoinHandle<()>,
}

struct EntryState<T> {
    fetcher: Fetcher<T>,
    options: QueryOptions,
    /// Bumped for every issued fetch and on eviction.
    generation: u64,
    in_flight: Option<InFlight>,
    /// observer id → enabled
    observers: HashMap<u64, bool>,
    next_observer_id: u64,
    refresh_timer: Option<JoinHandle<()>>,
    /// Bumped whenever the refresh timer is replaced or cancelled; a timer
    /// task only fires while its captured value is current.
    timer_seq: u64,
    eviction: Option<JoinHandle<()>>,
    fetched_at: Option<Instant>,
    evicted: bool,
}

impl<T> EntryState<T> {
    fn is_enabled(&self) -> bool {
        self.observers.values().any(|enabled| *enabled)
    }

    fn is_stale(&self) -> bool {
        match self.fetched_at {
            Some(at) => at.elapsed() >= self.options.stale_time,
            None => true,
        }
    }

    fn cancel_refresh(&mut self) {
        self.timer_seq += 1;
        if let Some(timer) = self.refresh_timer.take() {
            timer.abort();
        }
    }
}

fn spawn<F>(future: F) -> Option<JoinHandle<()>>
where
    F: Future<Output = ()> + Send + 'static,
{
    match tokio::runtime::Handle::try_current() {
        Ok(handle) => Some(handle.spawn(future)),
        Err(_) => {
            tracing::warn!("no Tokio runtime available; query task not started");
            None
        }
    }
}

/// Type-erased view of an entry, stored in the cache registry.
pub(crate) trait ErasedEntry: Send + Sync {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
    fn observer_count(&self) -> usize;
    fn evict(&self);
    fn reschedule(self: Arc<Self>);
    fn invalidate(self: Arc<Self>) -> bool;
}

pub(crate) struct QueryEntry<T> {
    key: QueryKey,
    market: MarketClock,
    registry: Weak<Registry>,
    state: Mutex<EntryState<T>>,
    tx: watch::Sender<QuerySnapshot<T>>,
}

impl<T: Send + Sync + 'static> QueryEntry<T> {
    pub(crate) fn new(
        key: QueryKey,
        market: MarketClock,
        registry: Weak<Registry>,
        fetcher: Fetcher<T>,
        options: QueryOptions,
    ) -> Arc<Self> {
        let (tx, _) = watch::channel(QuerySnapshot::initial(options.enabled));
        Arc::new(Self {
            key,
            market,
            registry,
            state: Mutex::new(EntryState {
                fetcher,
                options,
                generation: 0,
                in_flight: None,
                observers: HashMap::new(),
                next_observer_id: 0,
                refresh_timer: None,
                timer_seq: 0,
                eviction: None,
                fetched_at: None,
                evicted: false,
            }),
            tx,
        })
    }

    fn lock(&self) -> MutexGuard<'_, EntryState<T>> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub(crate) fn key(&self) -> &QueryKey {
        &self.key
    }

    pub(crate) fn receiver(&self) -> watch::Receiver<QuerySnapshot<T>> {
        self.tx.subscribe()
    }

    pub(crate) fn snapshot(&self) -> QuerySnapshot<T> {
        self.tx.borrow().clone()
    }

    pub(crate) fn is_fetching(&self) -> bool {
        self.lock().in_flight.is_some()
    }

    // ── Observers ────────────────────────────────────────────────────────

    /// Registers an observer; the latest subscriber's fetcher and options win.
    pub(crate) fn attach(self: &Arc<Self>, fetcher: Fetcher<T>, options: QueryOptions) -> u64 {
        let (id, enabled, stale) = {
            let mut state = self.lock();
            if let Some(eviction) = state.eviction.take() {
                eviction.abort();
                tracing::debug!(key = %self.key, "eviction cancelled by new subscriber");
            }
            let id = state.next_observer_id;
            state.next_observer_id += 1;
            state.observers.insert(id, options.enabled);
            state.fetcher = fetcher;
            state.options = options;
            (id, state.is_enabled(), state.is_stale())
        };

        if enabled {
            if stale {
                self.fetch(FetchTrigger::Mount);
            } else {
                self.ensure_scheduled();
            }
        }
        id
    }

    /// Removes an observer. The last one out starts the eviction countdown.
    pub(crate) fn detach(self: &Arc<Self>, id: u64) {
        let mut state = self.lock();
        state.observers.remove(&id);
        if !state.is_enabled() {
            state.cancel_refresh();
        }
        if !state.observers.is_empty() || state.evicted {
            return;
        }

        let gc_time = state.options.gc_time;
        let weak = Arc::downgrade(self);
        let eviction = spawn(async move {
            tokio::time::sleep(gc_time).await;
            if let Some(entry) = weak.upgrade() {
                entry.evict_if_idle();
            }
        });
        match eviction {
            Some(handle) => state.eviction = Some(handle),
            None => {
                drop(state);
                self.evict_if_idle();
            }
        }
    }

    pub(crate) fn set_observer_enabled(self: &Arc<Self>, id: u64, enabled: bool) {
        let (now_enabled, stale) = {
            let mut state = self.lock();
            if let Some(flag) = state.observers.get_mut(&id) {
                *flag = enabled;
            }
            if !state.is_enabled() {
                state.cancel_refresh();
            }
            (state.is_enabled(), state.is_stale())
        };

        if now_enabled {
            if stale {
                self.fetch(FetchTrigger::Mount);
            } else {
                self.ensure_scheduled();
            }
        }
    }

    pub(crate) fn set_refresh_interval(self: &Arc<Self>, interval: RefreshInterval) {
        let mut state = self.lock();
        state.options.refresh_interval = interval;
        if state.in_flight.is_none() && state.fetched_at.is_some() {
            self.schedule_refresh(&mut state);
        }
    }

    fn evict_if_idle(self: &Arc<Self>) {
        match self.registry.upgrade() {
            Some(registry) => {
                let this: Arc<dyn ErasedEntry> = self.clone();
                registry.remove_if_idle(&self.key, &this);
            }
            None => ErasedEntry::evict(self.as_ref()),
        }
    }

    // ── Fetching ─────────────────────────────────────────────────────────

    /// Issues a fetch unless one is already running.
    ///
    /// Returns whether a new fetch was started. Manual triggers cancel the
    /// in-flight fetch and supersede it.
    pub(crate) fn fetch(self: &Arc<Self>, trigger: FetchTrigger) -> bool {
        let mut state = self.lock();
        self.start_fetch(&mut state, trigger)
    }

    /// Entry point for refresh timer tasks. A timer that was replaced or
    /// cancelled after it woke up does nothing.
    pub(crate) fn on_refresh_timer(self: &Arc<Self>, token: u64) -> bool {
        let mut state = self.lock();
        if state.timer_seq != token {
            tracing::debug!(
                key = %self.key,
                token,
                current = state.timer_seq,
                "superseded refresh timer ignored"
            );
            return false;
        }
        state.refresh_timer = None;
        self.start_fetch(&mut state, FetchTrigger::Interval)
    }

    fn start_fetch(self: &Arc<Self>, state: &mut EntryState<T>, trigger: FetchTrigger) -> bool {
        if state.evicted {
            return false;
        }
        if !state.is_enabled() {
            tracing::debug!(key = %self.key, ?trigger, "query disabled; fetch skipped");
            return false;
        }
        if let Some(in_flight) = state.in_flight.take() {
            if trigger != FetchTrigger::Manual {
                tracing::debug!(
                    key = %self.key,
                    ?trigger,
                    generation = in_flight.generation,
                    "fetch already in flight; coalesced"
                );
                state.in_flight = Some(in_flight);
                return false;
            }
            tracing::debug!(
                key = %self.key,
                generation = in_flight.generation,
                "superseding in-flight fetch"
            );
            in_flight.handle.abort();
        }

        if trigger != FetchTrigger::Interval {
            state.cancel_refresh();
        }

        state.generation += 1;
        let generation = state.generation;
        let fetcher = state.fetcher.clone();
        let retry = state.options.retry.clone();

        self.tx.send_modify(|snap| snap.status = QueryStatus::Loading);

        let entry = Arc::clone(self);
        let handle = spawn(async move {
            let result = run_with_retry(&fetcher, &retry, &entry.key).await;
            entry.settle(generation, result);
        });

        match handle {
            Some(handle) => {
                state.in_flight = Some(InFlight { generation, handle });
                true
            }
            None => false,
        }
    }

    /// Applies a completed fetch if it is still the latest one for this key.
    pub(crate) fn settle(self: &Arc<Self>, generation: u64, result: Result<T, SdkError>) {
        let mut state = self.lock();
        if state.evicted || generation != state.generation {
            tracing::debug!(
                key = %self.key,
                generation,
                latest = state.generation,
                evicted = state.evicted,
                "discarding stale fetch result"
            );
            return;
        }

        state.in_flight = None;
        state.fetched_at = Some(Instant::now());
        let now = self.market.now();

        match result {
            Ok(data) => self.tx.send_modify(|snap| {
                snap.status = QueryStatus::Success;
                snap.data = Some(Arc::new(data));
                snap.error = None;
                snap.data_updated_at = Some(now);
            }),
            Err(err) => {
                tracing::warn!(key = %self.key, error = %err, "query fetch failed");
                self.tx.send_modify(|snap| {
                    snap.status = QueryStatus::Error;
                    snap.error = Some(Arc::new(err));
                    snap.error_updated_at = Some(now);
                });
            }
        }

        self.schedule_refresh(&mut state);
    }

    // ── Refresh timer ────────────────────────────────────────────────────

    /// Arms the delay-after-completion timer, consulting the market clock now.
    fn schedule_refresh(self: &Arc<Self>, state: &mut EntryState<T>) {
        state.cancel_refresh();
        if state.evicted || state.in_flight.is_some() || !state.is_enabled() {
            return;
        }

        let Some(delay) = state.options.refresh_interval.resolve(&self.market) else {
            tracing::debug!(key = %self.key, "automatic refresh suspended");
            return;
        };

        let token = state.timer_seq;
        let weak = Arc::downgrade(self);
        state.refresh_timer = spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(entry) = weak.upgrade() {
                entry.on_refresh_timer(token);
            }
        });
    }

    fn ensure_scheduled(self: &Arc<Self>) {
        let mut state = self.lock();
        if state.refresh_timer.is_none() && state.in_flight.is_none() && state.fetched_at.is_some()
        {
            self.schedule_refresh(&mut state);
        }
    }
}

impl<T: Send + Sync + 'static> ErasedEntry for QueryEntry<T> {
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }

    fn observer_count(&self) -> usize {
        self.lock().observers.len()
    }

    /// Marks the entry dead: pending work is cancelled and every later
    /// completion is discarded. Live subscribers get a final `Error` snapshot.
    fn evict(&self) {
        let mut state = self.lock();
        if state.evicted {
            return;
        }
        state.evicted = true;
        state.generation += 1;
        if let Some(in_flight) = state.in_flight.take() {
            in_flight.handle.abort();
        }
        state.cancel_refresh();
        if let Some(eviction) = state.eviction.take() {
            eviction.abort();
        }
        if !state.observers.is_empty() {
            let now = self.market.now();
            self.tx.send_modify(|snap| {
                snap.status = QueryStatus::Error;
                snap.error = Some(Arc::new(SdkError::Other(format!(
                    "query {} was removed from the cache",
                    self.key
                ))));
                snap.error_updated_at = Some(now);
            });
        }
        tracing::info!(key = %self.key, observers = state.observers.len(), "query evicted");
    }

    fn reschedule(self: Arc<Self>) {
        let mut state = self.lock();
        if state.in_flight.is_none() && state.fetched_at.is_some() {
            self.schedule_refresh(&mut state);
        }
    }

    fn invalidate(self: Arc<Self>) -> bool {
        self.lock().fetched_at = None;
        self.fetch(FetchTrigger::Manual)
    }
}

async fn run_with_retry<T>(
    fetcher: &Fetcher<T>,
    retry: &RetryPolicy,
    key: &QueryKey,
) -> Result<T, SdkError> {
    let Some(config) = retry.config() else {
        return fetcher().await;
    };

    let mut attempt = 0;
    loop {
        match fetcher().await {
            Ok(data) => return Ok(data),
            Err(e) if attempt < config.max_retries && e.is_transient(&config.retryable_statuses) => {
                let delay = config.delay_for_attempt(attempt);
                tracing::debug!(
                    key = %key,
                    attempt = attempt + 1,
                    max = config.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "retrying query fetch"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn counting_fetcher(calls: Arc<AtomicUsize>) -> Fetcher<u32> {
        Arc::new(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst) as u32 + 1;
            async move { Ok(n) }.boxed()
        })
    }

    fn entry(calls: Arc<AtomicUsize>, options: QueryOptions) -> Arc<QueryEntry<u32>> {
        QueryEntry::new(
            QueryKey::new("test"),
            MarketClock::system(),
            Weak::new(),
            counting_fetcher(calls),
            options,
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_generation_is_discarded() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entry = entry(calls, QueryOptions::default());
        let id = entry.attach(counting_fetcher(Arc::new(AtomicUsize::new(0))), QueryOptions::default());

        // Generation 1 was issued by attach; pretend two more were issued.
        {
            let mut state = entry.lock();
            state.generation = 3;
        }
        entry.settle(2, Ok(99));
        assert_ne!(entry.snapshot().data(), Some(&99));

        entry.settle(3, Ok(42));
        assert_eq!(entry.snapshot().data(), Some(&42));
        assert_eq!(entry.snapshot().status, QueryStatus::Success);
        entry.detach(id);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evicted_entry_discards_completion() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entry = entry(calls.clone(), QueryOptions::default());
        let _id = entry.attach(counting_fetcher(calls), QueryOptions::default());
        let generation = entry.lock().generation;

        ErasedEntry::evict(entry.as_ref());
        entry.settle(generation, Ok(5));
        assert!(entry.snapshot().data.is_none());
        assert!(!entry.fetch(FetchTrigger::Manual));
    }

    #[tokio::test(start_paused = true)]
    async fn test_interval_trigger_coalesces_with_in_flight() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entry = entry(calls.clone(), QueryOptions::default());
        let _id = entry.attach(counting_fetcher(calls.clone()), QueryOptions::default());
        assert!(entry.is_fetching());
        assert!(!entry.fetch(FetchTrigger::Interval));
        assert!(!entry.fetch(FetchTrigger::Mount));
        assert!(entry.fetch(FetchTrigger::Manual));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_timer_cannot_fire_or_orphan_its_successor() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::default()
            .refresh_interval(RefreshInterval::Fixed(Duration::from_secs(10)));
        let entry = entry(calls.clone(), options.clone());
        let _id = entry.attach(counting_fetcher(calls.clone()), options);
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // A timer that already woke up races with a re-arm.
        let stale = entry.lock().timer_seq;
        entry.set_refresh_interval(RefreshInterval::Fixed(Duration::from_secs(10)));
        assert!(!entry.on_refresh_timer(stale));
        assert!(entry.lock().refresh_timer.is_some());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // Only the current timer drives polling.
        tokio::time::sleep(Duration::from_millis(10_010)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_current_timer_token_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::default()
            .refresh_interval(RefreshInterval::Fixed(Duration::from_secs(60)));
        let entry = entry(calls.clone(), options.clone());
        let _id = entry.attach(counting_fetcher(calls.clone()), options);
        tokio::time::sleep(Duration::from_millis(1)).await;

        let token = entry.lock().timer_seq;
        assert!(entry.on_refresh_timer(token));
        assert!(entry.lock().refresh_timer.is_none());
        tokio::time::sleep(Duration::from_millis(1)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_evict_with_live_observer_publishes_error() {
        let calls = Arc::new(AtomicUsize::new(0));
        let entry = entry(calls.clone(), QueryOptions::default());
        let _id = entry.attach(counting_fetcher(calls), QueryOptions::default());
        assert_eq!(entry.snapshot().status, QueryStatus::Loading);

        ErasedEntry::evict(entry.as_ref());
        let snap = entry.snapshot();
        assert_eq!(snap.status, QueryStatus::Error);
        assert!(snap.error().unwrap().to_string().contains("removed"));
        assert!(!entry.fetch(FetchTrigger::Manual));
    }

    #[tokio::test(start_paused = true)]
    async fn test_disabled_entry_never_fetches() {
        let calls = Arc::new(AtomicUsize::new(0));
        let options = QueryOptions::default().enabled(false);
        let entry = entry(calls.clone(), options.clone());
        let _id = entry.attach(counting_fetcher(calls.clone()), options);
        assert!(!entry.fetch(FetchTrigger::Manual));
        tokio::task::yield_now().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(entry.snapshot().status, QueryStatus::Idle);
    }
}
