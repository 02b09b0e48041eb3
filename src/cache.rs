//! Expiring in-memory cache and timestamped snapshots for persisted predictions.
//!
//! Neither type reads the clock; callers pass `now` so that expiry is reproducible.

use chrono::{DateTime, Duration, Utc};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

pub const DEFAULT_MAX_AGE_SECS: i64 = 3600;

pub fn default_max_age() -> Duration {
    Duration::seconds(DEFAULT_MAX_AGE_SECS)
}

/// Cache key for an endpoint and its query string.
pub fn cache_key(endpoint: &str, query: &str) -> String {
    format!("{endpoint}?{query}")
}

#[derive(Debug, Clone)]
struct Entry<V> {
    inserted: DateTime<Utc>,
    value: V,
}

/// A map whose entries lapse `ttl` after insertion.
#[derive(Debug, Clone)]
pub struct TtlCache<V> {
    ttl: Duration,
    entries: FxHashMap<String, Entry<V>>,
}
impl<V> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: FxHashMap::default(),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn get(&self, key: &str, now: DateTime<Utc>) -> Option<&V> {
        let entry = self.entries.get(key)?;
        if now - entry.inserted < self.ttl {
            Some(&entry.value)
        } else {
            trace!("cache entry {key} has lapsed");
            None
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V, now: DateTime<Utc>) {
        self.entries.insert(
            key.into(),
            Entry {
                inserted: now,
                value,
            },
        );
    }

    /// Drops lapsed entries, returning the number removed.
    pub fn purge(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.inserted < ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new(default_max_age())
    }
}

/// A persisted value stamped with the time it was produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    pub last_updated: DateTime<Utc>,
    pub value: T,
}
impl<T> Snapshot<T> {
    pub fn new(value: T, now: DateTime<Utc>) -> Self {
        Self {
            last_updated: now,
            value,
        }
    }

    pub fn age(&self, now: DateTime<Utc>) -> Duration {
        now - self.last_updated
    }

    pub fn is_stale(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        self.age(now) > max_age
    }
}
