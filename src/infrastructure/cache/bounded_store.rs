//! Capacity-bounded, TTL-expiring, LRU-evicting key/value store

use std::fmt;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

use lru::LruCache;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::domain::cache::CacheKey;
use crate::infrastructure::observability::metrics;

/// Capacity used when a store is created with capacity 0
pub const DEFAULT_CAPACITY: usize = 1000;

/// TTL used when a store is created with a zero TTL
pub const DEFAULT_STORE_TTL: Duration = Duration::from_secs(5 * 60);

const WILDCARD: char = '*';

// Far enough ahead to never expire in practice.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

#[derive(Debug)]
struct Entry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> Entry<V> {
    fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .unwrap_or_else(|| now + FAR_FUTURE);

        Self { value, expires_at }
    }

    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// Generic key/value store with a maximum entry count, per-entry expiry and
/// least-recently-used eviction
///
/// - A successful `get` or any `set` marks an entry as used; `contains`,
///   `invalidate` and scans do not.
/// - Expired entries are dropped lazily by `get`, or in bulk by
///   `cleanup_expired`.
/// - All operations take the single internal lock; `get` holds it
///   exclusively for its whole duration since it may reorder or remove.
pub struct OrderedBoundedStore<K, V> {
    entries: RwLock<LruCache<K, Entry<V>>>,
    capacity: usize,
    default_ttl: Duration,
    name: &'static str,
}

/// String-keyed store of raw bytes
pub type ByteStore = OrderedBoundedStore<String, Vec<u8>>;

/// String-keyed store of strings
pub type StringStore = OrderedBoundedStore<String, String>;

/// Creates a [`ByteStore`]
pub fn byte_store(capacity: usize, default_ttl: Duration) -> ByteStore {
    OrderedBoundedStore::new(capacity, default_ttl)
}

/// Creates a [`StringStore`]
pub fn string_store(capacity: usize, default_ttl: Duration) -> StringStore {
    OrderedBoundedStore::new(capacity, default_ttl)
}

impl<K: CacheKey, V> OrderedBoundedStore<K, V> {
    /// Creates a store; a zero capacity or TTL falls back to the defaults
    pub fn new(capacity: usize, default_ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity)
            .or_else(|| NonZeroUsize::new(DEFAULT_CAPACITY))
            .unwrap_or(NonZeroUsize::MIN);

        let default_ttl = if default_ttl.is_zero() {
            DEFAULT_STORE_TTL
        } else {
            default_ttl
        };

        Self {
            entries: RwLock::new(LruCache::new(capacity)),
            capacity: capacity.get(),
            default_ttl,
            name: "store",
        }
    }

    /// Sets the name used in logs and metric labels
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns a live value and marks it most recently used
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let mut entries = self.entries.write();

        if entries.peek(key)?.is_expired(Instant::now()) {
            entries.pop(key);
            metrics::record_expired(self.name, 1);
            trace!(store = self.name, ?key, "Dropped expired entry on access");
            return None;
        }

        entries.get(key).map(|entry| entry.value.clone())
    }

    /// Inserts or refreshes an entry; a zero TTL means the default TTL
    pub fn set(&self, key: K, value: V, ttl: Duration) {
        let ttl = if ttl.is_zero() { self.default_ttl } else { ttl };
        let entry = Entry::new(value, ttl);
        let mut entries = self.entries.write();

        if let Some(existing) = entries.get_mut(&key) {
            *existing = entry;
            return;
        }

        // A new key only displaces something when the store is full
        if entries.push(key, entry).is_some() {
            metrics::record_eviction(self.name);
            trace!(store = self.name, "Evicted least recently used entry");
        }
    }

    /// Inserts or refreshes an entry with the default TTL
    pub fn set_with_default_ttl(&self, key: K, value: V) {
        self.set(key, value, self.default_ttl);
    }

    /// Removes an entry, reporting whether it was present
    pub fn remove(&self, key: &K) -> bool {
        self.entries.write().pop(key).is_some()
    }

    /// Removes entries matching a pattern, returning how many were removed
    ///
    /// `"user:1"` removes that key only; `"user:*"` removes every key starting
    /// with `"user:"`. Only a trailing `*` is special. Keys that are not
    /// string-like never match.
    pub fn invalidate(&self, pattern: &str) -> usize {
        let mut entries = self.entries.write();

        let removed = match pattern.strip_suffix(WILDCARD) {
            None => match K::from_pattern(pattern) {
                Some(key) => usize::from(entries.pop(&key).is_some()),
                None => 0,
            },
            Some(prefix) => {
                let matching: Vec<K> = entries
                    .iter()
                    .filter(|(key, _)| key.pattern_str().is_some_and(|key| key.starts_with(prefix)))
                    .map(|(key, _)| key.clone())
                    .collect();

                matching
                    .iter()
                    .filter(|key| entries.pop(*key).is_some())
                    .count()
            }
        };

        if removed > 0 {
            debug!(store = self.name, pattern, removed, "Invalidated entries");
        }

        removed
    }

    /// Reports whether a key is present and unexpired
    ///
    /// Neither reorders nor removes anything, so a following `get` may still
    /// miss if the entry expires in between.
    pub fn contains(&self, key: &K) -> bool {
        let now = Instant::now();

        self.entries
            .read()
            .peek(key)
            .is_some_and(|entry| !entry.is_expired(now))
    }

    /// Number of entries held, including expired ones not yet dropped
    pub fn size(&self) -> usize {
        self.entries.read().len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drops every expired entry, returning how many were removed
    pub fn cleanup_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let now = Instant::now();

        let expired: Vec<K> = entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();

        let removed = expired
            .iter()
            .filter(|key| entries.pop(*key).is_some())
            .count();

        if removed > 0 {
            metrics::record_expired(self.name, removed);
            debug!(store = self.name, removed, "Removed expired entries");
        }

        removed
    }

    /// Visits every unexpired entry, most recently used first
    ///
    /// Runs under the shared lock and leaves recency untouched.
    pub fn scan_live<F>(&self, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        let entries = self.entries.read();
        let now = Instant::now();

        for (key, entry) in entries.iter() {
            if !entry.is_expired(now) {
                visit(key, &entry.value);
            }
        }
    }
}

impl<K: CacheKey, V> fmt::Debug for OrderedBoundedStore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrderedBoundedStore")
            .field("name", &self.name)
            .field("capacity", &self.capacity)
            .field("default_ttl", &self.default_ttl)
            .field("size", &self.entries.read().len())
            .finish()
    }
}
