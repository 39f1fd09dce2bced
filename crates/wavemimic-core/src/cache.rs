//! Bounded least-recently-used memo cache for the proxy computations.
//!
//! Numeric arguments are not usable as map keys directly (`f64` is neither
//! `Eq` nor `Hash`), so every argument is first normalised into an exact,
//! immutable [`MatrixKey`] built from the IEEE-754 bit patterns of its
//! elements. Two inputs share a cache entry only if every element compares
//! bit-equal after `-0.0` is folded into `0.0`.

use std::collections::VecDeque;

use nalgebra::DMatrix;
use serde::Serialize;

/// Capacity of each proxy cache.
pub const PROXY_CACHE_CAPACITY: usize = 128;

/// Bit pattern of a scalar with `-0.0` folded into `0.0`.
pub fn scalar_bits(x: f64) -> u64 {
    // `-0.0 + 0.0 == +0.0` under round-to-nearest.
    (x + 0.0).to_bits()
}

/// Exact cache key for a vector or matrix argument (column-major).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatrixKey {
    rows: usize,
    cols: usize,
    bits: Box<[u64]>,
}

impl MatrixKey {
    /// Key a column vector of `values.len()` rows.
    pub fn from_slice(values: &[f64]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            bits: values.iter().copied().map(scalar_bits).collect(),
        }
    }

    /// Key a matrix by shape and column-major values.
    pub fn from_matrix(m: &DMatrix<f64>) -> Self {
        Self {
            rows: m.nrows(),
            cols: m.ncols(),
            bits: m.iter().copied().map(scalar_bits).collect(),
        }
    }

    /// `(rows, cols)` of the keyed input.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }
}

/// Hit/miss/eviction counters for one cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub len: usize,
    pub capacity: usize,
}

/// Fixed-capacity memo table with LRU eviction.
///
/// Entries are kept most-recent-first; a hit rotates the entry to the front
/// and an insert beyond capacity drops the back.
#[derive(Debug, Clone)]
pub struct ProxyCache<K, V> {
    name: &'static str,
    cap: usize,
    entries: VecDeque<(K, V)>,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<K: Eq, V: Clone> ProxyCache<K, V> {
    /// Empty cache named `name` holding at most `cap` entries (minimum 1).
    pub fn new(name: &'static str, cap: usize) -> Self {
        Self {
            name,
            cap: cap.max(1),
            entries: VecDeque::with_capacity(cap.max(1)),
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Number of resident entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entry is resident.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Maximum number of resident entries.
    pub fn capacity(&self) -> usize {
        self.cap
    }

    /// Whether `key` is resident, without touching recency.
    pub fn contains(&self, key: &K) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Look up `key`, refreshing its recency on a hit.
    pub fn get(&mut self, key: &K) -> Option<V> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        if pos != 0 {
            let entry = self.entries.remove(pos)?;
            self.entries.push_front(entry);
        }
        self.entries.front().map(|(_, v)| v.clone())
    }

    /// Insert `value` under `key` as the most recent entry.
    ///
    /// An existing entry for the same key is replaced, so a key is resident
    /// at most once.
    pub fn insert(&mut self, key: K, value: V) {
        if let Some(pos) = self.entries.iter().position(|(k, _)| *k == key) {
            self.entries.remove(pos);
        }
        self.entries.push_front((key, value));
        while self.entries.len() > self.cap {
            self.entries.pop_back();
            self.evictions += 1;
            log::debug!("{} cache evicted its least recent entry", self.name);
        }
    }

    /// Return the cached value for `key`, computing and storing it on a miss.
    ///
    /// A failed computation is not cached.
    pub fn get_or_try_insert_with<E>(
        &mut self,
        key: K,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(v) = self.get(&key) {
            self.hits += 1;
            log::trace!("{} cache hit", self.name);
            return Ok(v);
        }
        self.misses += 1;
        log::trace!("{} cache miss", self.name);
        let value = compute()?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Snapshot of the hit, miss and eviction counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            len: self.entries.len(),
            capacity: self.cap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_zero_shares_key_with_zero() {
        assert_eq!(
            MatrixKey::from_slice(&[0.0, 1.0]),
            MatrixKey::from_slice(&[-0.0, 1.0])
        );
    }

    #[test]
    fn key_distinguishes_shape() {
        let row = DMatrix::from_row_slice(1, 2, &[1.0, 2.0]);
        let col = DMatrix::from_row_slice(2, 1, &[1.0, 2.0]);
        assert_ne!(MatrixKey::from_matrix(&row), MatrixKey::from_matrix(&col));
        assert_eq!(MatrixKey::from_matrix(&col), MatrixKey::from_slice(&[1.0, 2.0]));
    }

    #[test]
    fn hit_does_not_recompute() {
        let mut cache: ProxyCache<u32, f64> = ProxyCache::new("test", 4);
        let mut calls = 0;
        for _ in 0..3 {
            let v = cache
                .get_or_try_insert_with::<()>(7, || {
                    calls += 1;
                    Ok(1.5)
                })
                .unwrap();
            assert_eq!(v, 1.5);
        }
        assert_eq!(calls, 1);
        let stats = cache.stats();
        assert_eq!(stats.hits, 2);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.len, 1);
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache: ProxyCache<u32, u32> = ProxyCache::new("test", 2);
        cache.insert(1, 10);
        cache.insert(2, 20);
        // Touch 1 so 2 becomes the eviction candidate.
        assert_eq!(cache.get(&1), Some(10));
        cache.insert(3, 30);
        assert!(cache.contains(&1));
        assert!(!cache.contains(&2));
        assert!(cache.contains(&3));
        assert_eq!(cache.stats().evictions, 1);
    }

    #[test]
    fn never_exceeds_capacity() {
        let mut cache: ProxyCache<u32, u32> = ProxyCache::new("test", PROXY_CACHE_CAPACITY);
        for i in 0..500 {
            cache.insert(i, i);
        }
        assert_eq!(cache.len(), PROXY_CACHE_CAPACITY);
        assert!(cache.contains(&499));
        assert!(!cache.contains(&0));
    }

    #[test]
    fn reinsert_keeps_single_entry() {
        let mut cache: ProxyCache<u32, u32> = ProxyCache::new("test", 4);
        cache.insert(1, 10);
        cache.insert(1, 11);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&1), Some(11));
    }

    #[test]
    fn errors_are_not_cached() {
        let mut cache: ProxyCache<u32, u32> = ProxyCache::new("test", 4);
        let r: Result<u32, &str> = cache.get_or_try_insert_with(1, || Err("boom"));
        assert!(r.is_err());
        assert!(cache.is_empty());
    }
}
