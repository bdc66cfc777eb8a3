//! Process-local cache doubles.

use super::CacheInterface;
use async_trait::async_trait;
use emporium_core::{EmporiumError, EmporiumResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

struct Entry {
    value: String,
    expires_at: Instant,
    last_used: u64,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, Entry>,
    clock: u64,
}

impl Entries {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn purge_expired(&mut self, now: Instant) {
        self.map.retain(|_, entry| entry.expires_at > now);
    }

    fn evict_least_recent(&mut self) {
        let oldest = self
            .map
            .iter()
            .min_by_key(|(_, entry)| entry.last_used)
            .map(|(key, _)| key.clone());
        if let Some(key) = oldest {
            self.map.remove(&key);
        }
    }
}

/// Bounded in-memory cache with per-entry TTL and LRU eviction.
pub struct InMemoryCache {
    entries: Mutex<Entries>,
    capacity: usize,
    sets: AtomicUsize,
}

impl InMemoryCache {
    pub const DEFAULT_CAPACITY: usize = 1024;

    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Mutex::new(Entries::default()),
            capacity: capacity.max(1),
            sets: AtomicUsize::new(0),
        }
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let mut entries = self.entries.lock();
        entries.purge_expired(Instant::now());
        entries.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether a live entry exists, without touching its recency.
    pub fn contains(&self, key: &str) -> bool {
        let entries = self.entries.lock();
        entries
            .map
            .get(key)
            .is_some_and(|entry| entry.expires_at > Instant::now())
    }

    /// Number of successful writes so far.
    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, key: &str) -> EmporiumResult<Option<String>> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        let stamp = entries.tick();
        let expired = matches!(entries.map.get(key), Some(entry) if entry.expires_at <= now);
        if expired {
            entries.map.remove(key);
            return Ok(None);
        }
        Ok(entries.map.get_mut(key).map(|entry| {
            entry.last_used = stamp;
            entry.value.clone()
        }))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> EmporiumResult<()> {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        if !entries.map.contains_key(key) {
            entries.purge_expired(now);
            if entries.map.len() >= self.capacity {
                entries.evict_least_recent();
            }
        }
        let last_used = entries.tick();
        entries.map.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
                last_used,
            },
        );
        self.sets.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> EmporiumResult<bool> {
        Ok(self.entries.lock().map.remove(key).is_some())
    }

    async fn delete_pattern(&self, pattern: &str) -> EmporiumResult<u64> {
        let mut entries = self.entries.lock();
        let before = entries.map.len();
        entries.map.retain(|key, _| !glob_match(pattern, key));
        Ok((before - entries.map.len()) as u64)
    }
}

/// Redis-style glob supporting `*` only.
fn glob_match(pattern: &str, key: &str) -> bool {
    let mut parts = pattern.split('*');
    let Some(first) = parts.next() else {
        return key.is_empty();
    };
    let Some(mut rest) = key.strip_prefix(first) else {
        return false;
    };
    let parts: Vec<&str> = parts.collect();
    let Some((last, middle)) = parts.split_last() else {
        return rest.is_empty();
    };
    for part in middle {
        match rest.find(part) {
            Some(at) => rest = &rest[at + part.len()..],
            None => return false,
        }
    }
    rest.len() >= last.len() && rest.ends_with(last)
}

/// A cache whose every call fails, standing in for an unreachable Redis.
#[derive(Default)]
pub struct UnavailableCache {
    calls: AtomicUsize,
}

impl UnavailableCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn fail<T>(&self) -> EmporiumResult<T> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EmporiumError::cache("connection refused"))
    }
}

#[async_trait]
impl CacheInterface for UnavailableCache {
    fn is_enabled(&self) -> bool {
        true
    }

    async fn get_raw(&self, _key: &str) -> EmporiumResult<Option<String>> {
        self.fail()
    }

    async fn set_raw(&self, _key: &str, _value: &str, _ttl: Duration) -> EmporiumResult<()> {
        self.fail()
    }

    async fn delete(&self, _key: &str) -> EmporiumResult<bool> {
        self.fail()
    }

    async fn delete_pattern(&self, _pattern: &str) -> EmporiumResult<u64> {
        self.fail()
    }
}
