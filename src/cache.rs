//! Keyed request cache with a deduplication window.
//!
//! Each key maps to a single in-flight-or-resolved fetch. Callers asking for the
//! same key inside the window share that fetch instead of issuing a new one.
//! Resolved values stay readable through [`KeyedCache::peek`] after the window
//! expires, until a newer fetch for the key replaces them or the entry ages out
//! of the retention horizon (two windows) and is pruned.

use anyhow::Result;
use dashmap::mapref::entry::Entry as MapEntry;
use dashmap::DashMap;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::debug;

/// Default deduplication window for repeated fetches of the same key.
pub const DEFAULT_DEDUP_WINDOW: Duration = Duration::from_secs(60);

/// Entries untouched for this many windows are dropped on the next fetch.
const RETAIN_WINDOWS: u32 = 2;

struct Slot<V> {
    started: Instant,
    cell: Arc<OnceCell<V>>,
    // Last resolved value, kept readable while a refetch is in flight.
    stale: Option<V>,
    // Callers currently awaiting `cell`.
    waiters: Arc<AtomicUsize>,
}

impl<V> Slot<V> {
    fn new(stale: Option<V>) -> Self {
        Self {
            started: Instant::now(),
            cell: Arc::new(OnceCell::new()),
            stale,
            waiters: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Nobody resolved the cell and nobody is still trying to.
    fn abandoned(&self) -> bool {
        !self.cell.initialized() && self.waiters.load(Ordering::SeqCst) == 0
    }
}

/// Counts a caller as waiting on a slot until dropped, including on cancellation.
struct Waiting(Arc<AtomicUsize>);

impl Waiting {
    fn register(waiters: &Arc<AtomicUsize>) -> Self {
        waiters.fetch_add(1, Ordering::SeqCst);
        Self(Arc::clone(waiters))
    }
}

impl Drop for Waiting {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct KeyedCache<V> {
    entries: DashMap<String, Slot<V>>,
    window: Duration,
}

impl<V: Clone + Send + Sync + 'static> KeyedCache<V> {
    pub fn new(window: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            window,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Return the value for `key`, running `fetch` only when no entry exists,
    /// the existing one is older than the window, or every earlier attempt failed.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, fetch: F) -> Result<V>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V>>,
    {
        self.prune_except(Some(key));

        // The map guard must be released before awaiting.
        let (cell, waiting) = {
            let slot = match self.entries.entry(key.to_string()) {
                MapEntry::Vacant(vacant) => vacant.insert(Slot::new(None)),
                MapEntry::Occupied(occupied) => {
                    let mut slot = occupied.into_ref();
                    let expired = slot.started.elapsed() >= self.window;
                    if expired || slot.abandoned() {
                        debug!(key, expired, "Refetching");
                        let stale = slot.cell.get().cloned().or_else(|| slot.stale.take());
                        *slot = Slot::new(stale);
                    }
                    slot
                }
            };
            (Arc::clone(&slot.cell), Waiting::register(&slot.waiters))
        };

        let result = cell.get_or_try_init(fetch).await.cloned();
        drop(waiting);

        if result.is_err() {
            // Failures are not cached; the next caller retries.
            self.entries.remove_if(key, |_, slot| {
                Arc::ptr_eq(&slot.cell, &cell) && slot.stale.is_none() && slot.abandoned()
            });
        }
        result
    }

    /// Drop every entry older than the retention horizon that nobody is
    /// waiting on. Returns how many were removed.
    pub fn prune_expired(&self) -> usize {
        self.prune_except(None)
    }

    fn prune_except(&self, keep: Option<&str>) -> usize {
        let horizon = self.window * RETAIN_WINDOWS;
        let before = self.entries.len();
        self.entries.retain(|key, slot| {
            Some(key.as_str()) == keep
                || slot.started.elapsed() < horizon
                || slot.waiters.load(Ordering::SeqCst) > 0
        });
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Pruned expired cache entries");
        }
        removed
    }

    /// Last resolved value for `key`, if any.
    pub fn peek(&self, key: &str) -> Option<V> {
        let slot = self.entries.get(key)?;
        slot.cell.get().cloned().or_else(|| slot.stale.clone())
    }

    /// True while a fetch for `key` has been started and not yet resolved.
    pub fn is_pending(&self, key: &str) -> bool {
        self.entries.get(key).map_or(false, |slot| {
            !slot.cell.initialized() && slot.waiters.load(Ordering::SeqCst) > 0
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V: Clone + Send + Sync + 'static> Default for KeyedCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_DEDUP_WINDOW)
    }
}
