use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use crate::foundation::core::{Basis, f32_key_bits};
use crate::foundation::error::AutoSizeResult;
use crate::metrics::snapshot::MetricsSnapshot;
use crate::scale::compute::{AdaptationRequest, ScaleResult, restore_original};
use crate::units::policy::UnitPolicy;

/// Exact identity of one computation.
///
/// Floats are stored as canonical bit patterns so equal inputs always hash equally, without
/// going through any textual formatting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    design_size: u32,
    subunit_design_size: u32,
    basis: Basis,
    use_device_size: bool,
    exclude_font_scale: bool,
    initial_scaled_density: u32,
    base_size: i32,
    screen_width_px: i32,
    screen_height_px: i32,
}

impl CacheKey {
    /// Key for `request` evaluated against `baseline`.
    ///
    /// The subunit design size is keyed after its fallback and the base size after any window
    /// override, so requests that compute the same numbers share one entry. Both screen
    /// dimensions are keyed because the logical size always covers the full screen.
    pub fn new(request: &AdaptationRequest, baseline: &MetricsSnapshot) -> Self {
        Self {
            design_size: f32_key_bits(request.design_size),
            subunit_design_size: f32_key_bits(request.effective_subunit_design_size()),
            basis: request.basis,
            use_device_size: request.use_device_size,
            exclude_font_scale: request.exclude_font_scale,
            initial_scaled_density: f32_key_bits(baseline.initial_scaled_density),
            base_size: baseline.base_size(request.basis),
            screen_width_px: baseline.screen_width_px,
            screen_height_px: baseline.screen_height_px,
        }
    }

    /// Resolved ratio denominator in pixels.
    pub fn base_size(&self) -> i32 {
        self.base_size
    }
}

/// Outcome of a cache lookup.
#[derive(Clone, Debug)]
pub struct CacheLookup {
    /// Shared, immutable result stored for the key.
    pub result: Arc<ScaleResult>,
    /// `true` when the result was already present.
    pub hit: bool,
}

/// Lookup counters, for diagnostics only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered from the map.
    pub hits: u64,
    /// Lookups that ran the computation.
    pub misses: u64,
    /// Distinct keys stored.
    pub entries: usize,
}

/// Concurrent memo of [`ScaleResult`] values.
///
/// Entries are never evicted: the key space is bounded by the design sizes an app declares.
/// The first value published for a key wins and every later reader gets the same `Arc`.
/// Two racing misses may both compute, which is harmless because the computation is pure.
#[derive(Debug, Default)]
pub struct ResultCache {
    entries: DashMap<CacheKey, Arc<ScaleResult>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl ResultCache {
    /// Empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored result for `key`, computing and publishing it on a miss.
    ///
    /// Errors from `compute` are returned as-is and leave the cache untouched.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> AutoSizeResult<CacheLookup>
    where
        F: FnOnce() -> AutoSizeResult<ScaleResult>,
    {
        if let Some(entry) = self.entries.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return Ok(CacheLookup {
                result: Arc::clone(entry.value()),
                hit: true,
            });
        }

        // Computed outside any shard lock.
        let computed = Arc::new(compute()?);
        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = Arc::clone(self.entries.entry(key).or_insert(computed).value());
        Ok(CacheLookup { result, hit: false })
    }

    /// Stored result for `key`, if any.
    pub fn get(&self, key: &CacheKey) -> Option<Arc<ScaleResult>> {
        self.entries.get(key).map(|e| Arc::clone(e.value()))
    }

    /// Baseline result for cancellation. Never stored.
    pub fn restore_original(
        &self,
        baseline: &MetricsSnapshot,
        policy: &UnitPolicy,
    ) -> AutoSizeResult<ScaleResult> {
        restore_original(baseline, policy)
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// `true` when nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    /// Snapshot of the lookup counters.
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.entries.len(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scale/cache.rs"]
mod tests;
