// ─────────────────────────────────────────────────────────────────────
// Backreaction Kernel — Result Cache
// Mirrors: dynamic_backreaction_factor.py
// ─────────────────────────────────────────────────────────────────────
//! Bounded mapping from quantized state to computed results.
//!
//! Eviction is FIFO by first insertion, not LRU: a hit does not refresh
//! an entry's position, so under load the oldest inserted state is the
//! one that goes.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::time::Instant;

use backreaction_types::{Diagnostics, StateSnapshot};

/// State dimensions rounded to multiples of the cache tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey([i64; 4]);

impl CacheKey {
    /// Quantize the four result-determining dimensions of `state`.
    ///
    /// Out-of-range quotients saturate; NaN quantizes to 0.
    pub fn quantize(state: &StateSnapshot, tolerance: f64) -> Self {
        Self(state.dimensions().map(|x| (x / tolerance).round() as i64))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d] = self.0;
        write!(f, "{a}_{b}_{c}_{d}")
    }
}

/// A stored result.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub value: f64,
    pub diagnostics: Diagnostics,
    pub inserted_at: Instant,
}

/// FIFO-evicting result cache.
#[derive(Debug)]
pub struct ResultCache {
    capacity: usize,
    entries: HashMap<CacheKey, CacheEntry>,
    order: VecDeque<CacheKey>,
}

impl ResultCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn get(&self, key: &CacheKey) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    /// Store a result, evicting the oldest entry first when full.
    ///
    /// Re-inserting an existing key replaces its value but keeps its
    /// original position in the eviction order.
    pub fn insert(&mut self, key: CacheKey, value: f64, diagnostics: Diagnostics) {
        if self.capacity == 0 {
            return;
        }
        let entry = CacheEntry {
            value,
            diagnostics,
            inserted_at: Instant::now(),
        };
        if let Some(slot) = self.entries.get_mut(&key) {
            *slot = entry;
            return;
        }
        while self.entries.len() >= self.capacity {
            match self.order.pop_front() {
                Some(oldest) => {
                    self.entries.remove(&oldest);
                    log::debug!("cache full ({}), evicted {oldest}", self.capacity);
                }
                None => break,
            }
        }
        self.order.push_back(key);
        self.entries.insert(key, entry);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(x: f64) -> CacheKey {
        CacheKey::quantize(&StateSnapshot::new(x, 0.0, 0.0, 0.0), 1e-6)
    }

    fn diag(v: f64) -> Diagnostics {
        Diagnostics::baseline_only(v)
    }

    #[test]
    fn test_quantize_merges_close_states() {
        let a = StateSnapshot::new(1.0, 2.0, 3.0, 0.5);
        let b = StateSnapshot::new(1.0 + 1e-8, 2.0, 3.0 - 1e-8, 0.5);
        assert_eq!(CacheKey::quantize(&a, 1e-6), CacheKey::quantize(&b, 1e-6));
    }

    #[test]
    fn test_quantize_separates_distinct_states() {
        let a = StateSnapshot::new(1.0, 2.0, 3.0, 0.5);
        let b = StateSnapshot::new(1.0, 2.0, 3.0, 0.6);
        assert_ne!(CacheKey::quantize(&a, 1e-6), CacheKey::quantize(&b, 1e-6));
    }

    #[test]
    fn test_key_display() {
        let k = CacheKey::quantize(&StateSnapshot::new(1.0, -2.0, 0.0, 0.5), 0.5);
        assert_eq!(k.to_string(), "2_-4_0_1");
    }

    #[test]
    fn test_insert_and_get() {
        let mut cache = ResultCache::new(4);
        cache.insert(key(1.0), 2.5, diag(2.5));
        let entry = cache.get(&key(1.0)).unwrap();
        assert_eq!(entry.value, 2.5);
        assert!(cache.get(&key(2.0)).is_none());
    }

    #[test]
    fn test_capacity_never_exceeded() {
        let mut cache = ResultCache::new(3);
        for i in 0..10 {
            cache.insert(key(i as f64), i as f64, diag(i as f64));
            assert!(cache.len() <= 3);
        }
        assert_eq!(cache.len(), 3);
    }

    #[test]
    fn test_fifo_eviction_order() {
        let mut cache = ResultCache::new(2);
        cache.insert(key(1.0), 1.0, diag(1.0));
        cache.insert(key(2.0), 2.0, diag(2.0));
        // Reading key 1 does not protect it from eviction.
        assert!(cache.get(&key(1.0)).is_some());
        cache.insert(key(3.0), 3.0, diag(3.0));
        assert!(cache.get(&key(1.0)).is_none());
        assert!(cache.get(&key(2.0)).is_some());
        assert!(cache.get(&key(3.0)).is_some());
    }

    #[test]
    fn test_reinsert_keeps_position() {
        let mut cache = ResultCache::new(2);
        cache.insert(key(1.0), 1.0, diag(1.0));
        cache.insert(key(2.0), 2.0, diag(2.0));
        cache.insert(key(1.0), 1.5, diag(1.5));
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get(&key(1.0)).unwrap().value, 1.5);
        cache.insert(key(3.0), 3.0, diag(3.0));
        assert!(cache.get(&key(1.0)).is_none());
    }

    #[test]
    fn test_zero_capacity_stores_nothing() {
        let mut cache = ResultCache::new(0);
        cache.insert(key(1.0), 1.0, diag(1.0));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache = ResultCache::new(2);
        cache.insert(key(1.0), 1.0, diag(1.0));
        cache.clear();
        assert!(cache.is_empty());
        cache.insert(key(2.0), 2.0, diag(2.0));
        cache.insert(key(3.0), 3.0, diag(3.0));
        assert_eq!(cache.len(), 2);
    }
}
