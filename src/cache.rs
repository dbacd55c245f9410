//! Named values with a time-to-live, persisted through a [`Store`].
//!
//! Each name holds at most one entry. Entries are replaced or deleted as a
//! whole; a read at or after the expiry instant is a miss.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use crate::error::Result;
use crate::store::Store;

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> SystemTime;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A cached value and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub value: T,
    pub expires_at: SystemTime,
}

impl<T> CacheEntry<T> {
    pub fn is_expired(&self, now: SystemTime) -> bool {
        now >= self.expires_at
    }
}

/// TTL cache with single-flight computation per name within a process.
pub struct TtlCache {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TtlCache {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self::with_clock(store, Arc::new(SystemClock))
    }

    pub fn with_clock(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            clock,
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached value for `name`, or compute and store it.
    ///
    /// The boolean is `true` when the value came from the cache.
    pub fn get_or_compute<T, F>(&self, name: &str, ttl: Duration, compute: F) -> (T, bool)
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> T,
    {
        match self.try_get_or_compute(name, ttl, || Ok::<T, Infallible>(compute())) {
            Ok(hit) => hit,
            Err(never) => match never {},
        }
    }

    /// Fallible [`get_or_compute`](Self::get_or_compute). A failed
    /// computation stores nothing.
    ///
    /// `compute` must not call back into the cache for the same name.
    pub fn try_get_or_compute<T, E, F>(
        &self,
        name: &str,
        ttl: Duration,
        compute: F,
    ) -> std::result::Result<(T, bool), E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> std::result::Result<T, E>,
    {
        let lock = self.lock_for(name);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        if let Some(entry) = self.lookup::<T>(name) {
            tracing::debug!(name, "Cache hit");
            return Ok((entry.value, true));
        }

        tracing::debug!(name, ?ttl, "Cache miss, computing");
        let value = compute()?;
        self.insert(name, &value, ttl);
        Ok((value, false))
    }

    /// Fetch an unexpired value without computing anything.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Option<T> {
        self.lookup(name).map(|entry| entry.value)
    }

    /// Time left before `name` expires, if it holds a live entry.
    pub fn remaining(&self, name: &str) -> Option<Duration> {
        let entry = self.lookup::<serde_json::Value>(name)?;
        entry.expires_at.duration_since(self.clock.now()).ok()
    }

    /// Delete `name` regardless of its expiry.
    pub fn invalidate(&self, name: &str) -> Result<()> {
        self.store.remove(name)?;
        tracing::debug!(name, "Cache entry invalidated");
        Ok(())
    }

    fn lock_for(&self, name: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(name.to_string()).or_default().clone()
    }

    fn lookup<T: DeserializeOwned>(&self, name: &str) -> Option<CacheEntry<T>> {
        let raw = match self.store.get(name) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                tracing::warn!(name, "Cache read failed, treating as miss: {}", err);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_value(raw) {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(name, "Discarding undecodable cache entry: {}", err);
                return None;
            }
        };

        if entry.is_expired(self.clock.now()) {
            tracing::debug!(name, "Cache entry expired");
            return None;
        }
        Some(entry)
    }

    fn insert<T: Serialize>(&self, name: &str, value: &T, ttl: Duration) {
        let Some(expires_at) = self.clock.now().checked_add(ttl) else {
            tracing::warn!(name, ?ttl, "TTL out of range, not caching");
            return;
        };

        let entry = CacheEntry { value, expires_at };
        let stored = serde_json::to_value(&entry)
            .map_err(Into::into)
            .and_then(|raw| self.store.put(name, &raw));

        if let Err(err) = stored {
            tracing::warn!(name, "Cache write failed: {}", err);
        }
    }
}
