//! Cache Statistics Module
//!
//! Tracks which tier answered each lookup.

// == Cache Stats ==
/// Lookup counters for the layered cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups answered by the remote tier
    pub remote_hits: u64,
    /// Lookups answered by the disk tier after a remote miss
    pub disk_hits: u64,
    /// Lookups neither tier could answer
    pub misses: u64,
}

impl CacheStats {
    // == Constructor ==
    /// Creates a new CacheStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of lookups recorded.
    pub fn lookups(&self) -> u64 {
        self.remote_hits + self.disk_hits + self.misses
    }

    // == Hit Rate ==
    /// Fraction of lookups answered by either tier, or 0.0 with no lookups.
    pub fn hit_rate(&self) -> f64 {
        let total = self.lookups();
        if total == 0 {
            0.0
        } else {
            (self.remote_hits + self.disk_hits) as f64 / total as f64
        }
    }

    pub fn record_remote_hit(&mut self) {
        self.remote_hits += 1;
    }

    pub fn record_disk_hit(&mut self) {
        self.disk_hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }
}
