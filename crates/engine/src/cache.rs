//! Single-entry memo store keyed by upload identity.
//!
//! Holds the derived value for the most recent upload only. Asking for the
//! same `UploadId` again is a hit; a different one evicts the old entry once
//! the new value has been computed successfully.

use std::sync::Arc;

use orderdesk_core::upload::UploadId;

/// Hit/miss counters, mostly for tests and `status` output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Successful computations (misses that produced a value).
    pub computations: u64,
    pub evictions: u64,
}

#[derive(Debug)]
pub struct UploadCache<T> {
    entry: Option<(UploadId, Arc<T>)>,
    stats: CacheStats,
}

impl<T> UploadCache<T> {
    pub fn new() -> Self {
        Self {
            entry: None,
            stats: CacheStats::default(),
        }
    }

    /// Return the cached value for `id`, or compute and store it.
    ///
    /// A failed computation leaves the current entry in place.
    pub fn get_or_try_insert_with<E, F>(&mut self, id: &UploadId, compute: F) -> Result<Arc<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
    {
        if let Some((cached_id, value)) = &self.entry {
            if cached_id == id {
                self.stats.hits += 1;
                tracing::debug!(upload = %id.short(), "Cache hit");
                return Ok(Arc::clone(value));
            }
        }

        self.stats.misses += 1;
        let value = Arc::new(compute()?);
        self.stats.computations += 1;

        if let Some((old_id, _)) = self.entry.take() {
            self.stats.evictions += 1;
            tracing::debug!(evicted = %old_id.short(), upload = %id.short(), "Cache entry replaced");
        }
        self.entry = Some((id.clone(), Arc::clone(&value)));
        Ok(value)
    }

    /// Drop the entry; the next lookup for any id recomputes.
    pub fn clear(&mut self) {
        if self.entry.take().is_some() {
            self.stats.evictions += 1;
        }
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

impl<T> Default for UploadCache<T> {
    fn default() -> Self {
        Self::new()
    }
}
