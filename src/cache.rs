//! Keyed response cache with stale-while-revalidate semantics.
//!
//! Each key owns one slot. A slot holds at most one in-flight load at a time
//! (concurrent callers for the same key share it — exactly one loader runs),
//! the resolved outcome with its fetch timestamp, and the previous resolved
//! value as last-known-good while a revalidation is in flight. All mutation
//! goes through `fetch`/`invalidate`; there is no external way to poke a slot.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use tokio::sync::OnceCell;

use crate::error::FetchError;

/// A resolved load: outcome plus when it completed.
///
/// Errors resolve too — a failed load occupies the slot until it goes stale,
/// so the next retry happens on the next revalidation tick, not immediately.
#[derive(Debug, Clone)]
pub struct Resolved<T> {
    pub outcome: Result<T, FetchError>,
    pub fetched_at: Instant,
}

/// Synchronous snapshot of a slot, for rendering without side effects.
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// Most recent resolved outcome, falling back to the previous one while
    /// a revalidation is in flight.
    pub resolved: Option<Resolved<T>>,
    /// True while a load for this key has started but not completed.
    pub in_flight: bool,
}

struct Slot<T> {
    cell: Arc<OnceCell<Resolved<T>>>,
    prev: Option<Resolved<T>>,
}

impl<T> Slot<T> {
    fn new() -> Self {
        Slot {
            cell: Arc::new(OnceCell::new()),
            prev: None,
        }
    }
}

/// Shared response cache keyed by canonical request string.
///
/// Generic over the cached value; the application instantiates it with raw
/// JSON (`serde_json::Value`) so every view shares one store, like the
/// original ambient fetch cache — but as an explicit, testable type.
pub struct CacheStore<T> {
    slots: DashMap<String, Slot<T>>,
}

/// The cache the page orchestrators share: raw JSON keyed by request.
pub type JsonCache = CacheStore<serde_json::Value>;

impl<T: Clone> CacheStore<T> {
    pub fn new() -> Self {
        CacheStore {
            slots: DashMap::new(),
        }
    }

    /// Look up a key without side effects.
    pub fn peek(&self, key: &str) -> Option<CacheEntry<T>> {
        let slot = self.slots.get(key)?;
        let current = slot.cell.get().cloned();
        let in_flight = current.is_none();
        Some(CacheEntry {
            resolved: current.or_else(|| slot.prev.clone()),
            in_flight,
        })
    }

    /// Fetch the value for `key`, deduplicating and honoring freshness.
    ///
    /// - A load already in flight for this key is joined, not repeated.
    /// - A resolved outcome younger than `ttl` is returned without invoking
    ///   `loader`.
    /// - A stale outcome rotates into last-known-good (still visible through
    ///   `peek` so the view keeps rendering it) and a single new load starts.
    pub async fn fetch<F, Fut>(&self, key: &str, ttl: Duration, loader: F) -> Result<T, FetchError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, FetchError>>,
    {
        let cell = {
            let mut slot = self
                .slots
                .entry(key.to_string())
                .or_insert_with(Slot::new);
            if let Some(resolved) = slot.cell.get() {
                if resolved.fetched_at.elapsed() < ttl {
                    return resolved.outcome.clone();
                }
                // Stale: rotate under the map lock so exactly one caller
                // starts the revalidation.
                slot.prev = Some(resolved.clone());
                slot.cell = Arc::new(OnceCell::new());
                log::debug!("cache: revalidating {}", key);
            }
            slot.cell.clone()
        };

        let resolved = cell
            .get_or_init(|| async {
                Resolved {
                    outcome: loader().await,
                    fetched_at: Instant::now(),
                }
            })
            .await;
        resolved.outcome.clone()
    }

    /// Drop a key entirely, forcing the next `fetch` to re-run its loader.
    pub fn invalidate(&self, key: &str) {
        self.slots.remove(key);
    }

    /// Number of keys currently held.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<T: Clone> Default for CacheStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
