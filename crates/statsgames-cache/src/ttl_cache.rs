//! Concurrent TTL cache with background sweeping
//!
//! Entries expire at an absolute instant fixed when they are written. Reads
//! check that instant themselves, so the sweeper only reclaims memory and is
//! never needed for correctness.

use crate::{
    clock::{Clock, SystemClock},
    config::CacheConfig,
    error::CacheResult,
    stats::{AtomicCounters, CacheStats},
};
use dashmap::DashMap;
use std::{
    fmt,
    hash::Hash,
    sync::{Arc, Weak},
    time::{Duration, Instant},
};
use tokio::{task::JoinHandle, time::MissedTickBehavior};

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// In-memory cache mapping keys to values with a fixed time-to-live
///
/// Every stored value is replaced wholesale by the next `set` for the same
/// key. Values are cloned out on read, so `V` should be cheap to clone
/// (`bytes::Bytes`, `Arc<T>`).
pub struct TtlCache<K, V> {
    storage: DashMap<K, Entry<V>>,
    config: CacheConfig,
    clock: Arc<dyn Clock>,
    counters: AtomicCounters,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    /// Create a cache that reads the system clock
    pub fn new(config: CacheConfig) -> CacheResult<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(config: CacheConfig, clock: Arc<dyn Clock>) -> CacheResult<Self> {
        config.validate()?;

        Ok(Self {
            storage: DashMap::new(),
            config,
            clock,
            counters: AtomicCounters::default(),
        })
    }

    /// Configuration this cache was built with
    pub const fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Returns the value if present and not yet expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = self.clock.now();

        if let Some(entry) = self.storage.get(key) {
            if !entry.is_expired_at(now) {
                self.counters.record_hit();
                return Some(entry.value.clone());
            }
            // Release the shard read lock before taking the write lock
            drop(entry);

            if self
                .storage
                .remove_if(key, |_, entry| entry.is_expired_at(now))
                .is_some()
            {
                self.counters.record_expirations(1);
            }
        }

        self.counters.record_miss();
        None
    }

    /// Store a value that expires one TTL from now, replacing any prior entry.
    pub fn set(&self, key: K, value: V) {
        let expires_at = self.clock.now() + self.config.ttl;
        self.storage.insert(key, Entry { value, expires_at });
        self.counters.record_insert();
    }

    /// Remaining lifetime of a live entry
    pub fn time_to_live(&self, key: &K) -> Option<Duration> {
        let now = self.clock.now();
        self.storage
            .get(key)
            .filter(|entry| !entry.is_expired_at(now))
            .map(|entry| entry.expires_at.saturating_duration_since(now))
    }

    /// Returns true if the key was present and removed.
    pub fn remove(&self, key: &K) -> bool {
        self.storage.remove(key).is_some()
    }

    /// Drop every entry and reset statistics
    pub fn clear(&self) {
        self.storage.clear();
        self.counters.reset();
    }

    /// Entry count, including expired entries not yet swept.
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    /// True when no entries are stored
    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }

    /// Remove every entry whose TTL has elapsed, returning how many were removed.
    ///
    /// Each shard is locked only while it is scanned, and an entry is judged
    /// under that lock, so a value re-set concurrently is never swept.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut removed = 0usize;

        self.storage.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });

        if removed > 0 {
            self.counters.record_expirations(removed as u64);
        }

        removed
    }

    /// Current statistics
    pub fn stats(&self) -> CacheStats {
        self.counters.snapshot(self.storage.len())
    }

    /// Start the background sweeper on the current tokio runtime.
    ///
    /// The task holds only a weak reference; it stops once the cache is
    /// dropped or the returned handle is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>) -> SweeperHandle {
        let cache = Arc::downgrade(self);
        let period = self.config.sweep_interval;

        let task = tokio::spawn(sweep_loop(cache, period));

        tracing::debug!("Cache sweeper started with interval {:?}", period);

        SweeperHandle { task }
    }
}

async fn sweep_loop<K, V>(cache: Weak<TtlCache<K, V>>, period: Duration)
where
    K: Eq + Hash + Clone + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        ticker.tick().await;

        let Some(cache) = cache.upgrade() else {
            break;
        };

        let removed = cache.purge_expired();
        if removed > 0 {
            tracing::debug!(
                "Cache sweep removed {} expired entries, {} remain",
                removed,
                cache.len()
            );
        }
    }
}

impl<K, V> fmt::Debug for TtlCache<K, V>
where
    K: Eq + Hash,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("entries", &self.storage.len())
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}

/// Owns the background sweep task, aborting it on drop
#[derive(Debug)]
pub struct SweeperHandle {
    task: JoinHandle<()>,
}

impl SweeperHandle {
    /// True once the sweep loop has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
