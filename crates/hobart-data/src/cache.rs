//! In-process memoization cache.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// Bounded or unbounded key-value memoization cache.
///
/// Construction is explicit about the eviction policy: `Some(bound)`
/// evicts the least recently used entry once `bound` entries are held,
/// `None` never evicts. Values are cloned out on hits. Nothing is
/// persisted across processes.
#[derive(Debug, Clone)]
pub struct MemoCache<K, V> {
    entries: HashMap<K, V>,
    recency: VecDeque<K>,
    bound: Option<usize>,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Create a cache with an explicit bound.
    ///
    /// A bound of `Some(0)` is treated as `Some(1)`.
    #[must_use]
    pub fn new(bound: Option<usize>) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            bound: bound.map(|b| b.max(1)),
        }
    }

    /// Cache that never evicts.
    #[must_use]
    pub fn unbounded() -> Self {
        Self::new(None)
    }

    /// Cache evicting least recently used entries beyond `bound`.
    #[must_use]
    pub fn bounded(bound: usize) -> Self {
        Self::new(Some(bound))
    }

    /// Look up a key, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        if let Some(value) = self.entries.get(key) {
            let value = value.clone();
            self.touch(key);
            debug!("Cache hit");
            Some(value)
        } else {
            debug!("Cache miss");
            None
        }
    }

    /// Insert a value, evicting the least recently used entry if the
    /// bound would be exceeded.
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_some() {
            self.touch(&key);
            return;
        }
        if let Some(bound) = self.bound {
            while self.entries.len() > bound {
                if let Some(oldest) = self.recency.pop_front() {
                    self.entries.remove(&oldest);
                    debug!("Evicted least recently used entry");
                } else {
                    break;
                }
            }
        }
        self.recency.push_back(key);
    }

    /// Return the cached value for `key`, or compute, store and return
    /// it. The closure runs at most once per distinct key while the
    /// entry stays resident.
    pub fn get_or_insert_with(&mut self, key: K, f: impl FnOnce() -> V) -> V {
        if let Some(value) = self.get(&key) {
            return value;
        }
        let value = f();
        self.insert(key, value.clone());
        value
    }

    /// Number of resident entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The configured bound, if any.
    #[must_use]
    pub const fn bound(&self) -> Option<usize> {
        self.bound
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }
}

impl<K, V> Default for MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::unbounded()
    }
}
