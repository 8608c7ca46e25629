//! Memoization of coefficient computations.
//!
//! Entries are keyed by the structural [`FunctionKey`] of the function plus
//! the period, harmonic count and quadrature resolution, never by reference
//! identity. Functions without a key bypass the cache.
//!
//! A cache built with [`CoefficientCache::new`] only grows until
//! [`clear`](CoefficientCache::clear) is called. [`with_capacity`](CoefficientCache::with_capacity)
//! bounds it, evicting the oldest entry first.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use fourier_signal::{FunctionKey, PeriodicFunction};
use parking_lot::RwLock;

use crate::coefficients::{CoefficientOptions, FourierCoefficients, compute_coefficients_with};
use crate::error::Result;
use crate::quadrature::QuadratureConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    function: FunctionKey,
    period_bits: u64,
    harmonic_count: usize,
    quadrature: QuadratureConfig,
}

/// Counters reported by [`CoefficientCache::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

#[derive(Debug, Default)]
struct Entries {
    map: HashMap<CacheKey, Arc<FourierCoefficients>>,
    /// Insertion order, oldest first.
    order: VecDeque<CacheKey>,
}

impl Entries {
    fn insert(&mut self, key: CacheKey, value: Arc<FourierCoefficients>, capacity: Option<usize>) {
        if capacity == Some(0) {
            return;
        }
        if self.map.insert(key.clone(), value).is_none() {
            self.order.push_back(key);
        }
        let Some(capacity) = capacity else {
            return;
        };
        while self.map.len() > capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.map.remove(&oldest);
        }
    }

    fn clear(&mut self) {
        self.map.clear();
        self.order.clear();
    }
}

/// Thread-safe coefficient cache.
///
/// Lookups take the read lock; computation runs outside any lock and the
/// result is inserted under the write lock, last writer wins. Two threads
/// racing on the same key may both compute; both results are identical.
#[derive(Debug, Default)]
pub struct CoefficientCache {
    entries: RwLock<Entries>,
    capacity: Option<usize>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CoefficientCache {
    /// Unbounded cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cache holding at most `max_entries`; 0 disables storage.
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            capacity: Some(max_entries),
            ..Self::default()
        }
    }

    pub fn capacity(&self) -> Option<usize> {
        self.capacity
    }

    /// Cached equivalent of [`compute_coefficients`](crate::compute_coefficients).
    pub fn get_or_compute<F>(
        &self,
        function: &F,
        period: f64,
        harmonic_count: usize,
    ) -> Result<Arc<FourierCoefficients>>
    where
        F: PeriodicFunction + ?Sized,
    {
        self.get_or_compute_with(function, period, harmonic_count, &CoefficientOptions::default())
    }

    /// Cached equivalent of [`compute_coefficients_with`].
    ///
    /// The budget is not part of the key; a hit returns immediately even
    /// under a budget that would have aborted the computation.
    pub fn get_or_compute_with<F>(
        &self,
        function: &F,
        period: f64,
        harmonic_count: usize,
        options: &CoefficientOptions,
    ) -> Result<Arc<FourierCoefficients>>
    where
        F: PeriodicFunction + ?Sized,
    {
        let Some(function_key) = function.cache_key() else {
            log::trace!("{} has no cache key, computing directly", function.describe());
            return compute_coefficients_with(function, period, harmonic_count, options).map(Arc::new);
        };
        let key = CacheKey {
            function: function_key,
            period_bits: period.to_bits(),
            harmonic_count,
            quadrature: options.quadrature,
        };

        if let Some(hit) = self.entries.read().map.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(Arc::clone(hit));
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let computed = Arc::new(compute_coefficients_with(
            function,
            period,
            harmonic_count,
            options,
        )?);
        self.entries
            .write()
            .insert(key, Arc::clone(&computed), self.capacity);
        Ok(computed)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.read().map.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().map.is_empty()
    }

    /// Drop every entry. Counters are kept.
    pub fn clear(&self) {
        self.entries.write().clear();
    }
}
