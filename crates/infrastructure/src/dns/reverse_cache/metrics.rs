use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

#[derive(Default)]
pub struct CacheMetrics {
    pub hits: AtomicU64,
    pub misses: AtomicU64,
    pub expirations: AtomicU64,
}

/// Point-in-time view of the reverse DNS cache counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub cache_hit: u64,
    pub cache_miss: u64,
    pub cache_expire: u64,
    pub size: usize,
}

impl CacheMetrics {
    pub fn snapshot(&self, size: usize) -> CacheStats {
        CacheStats {
            cache_hit: self.hits.load(AtomicOrdering::Relaxed),
            cache_miss: self.misses.load(AtomicOrdering::Relaxed),
            cache_expire: self.expirations.load(AtomicOrdering::Relaxed),
            size,
        }
    }

    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits.load(AtomicOrdering::Relaxed) as f64;
        let total = hits + self.misses.load(AtomicOrdering::Relaxed) as f64;

        if total > 0.0 {
            (hits / total) * 100.0
        } else {
            0.0
        }
    }
}
