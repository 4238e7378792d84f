use crate::metrics::recorder::CacheMetrics;

/// Counter values plus gauges captured at snapshot time.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CacheMetricsSnapshot {
    pub get_calls: u64,
    pub get_hits: u64,
    pub get_misses: u64,

    pub insert_calls: u64,
    pub insert_new: u64,
    pub insert_updates: u64,

    pub evict_calls: u64,
    pub evicted_entries: u64,
    pub over_budget_kept: u64,

    pub remove_calls: u64,
    pub remove_found: u64,
    pub remove_oldest_calls: u64,
    pub remove_oldest_found: u64,
    pub clear_calls: u64,

    // gauges
    pub len: usize,
    pub used_bytes: usize,
    pub capacity_bytes: usize,
}

impl CacheMetricsSnapshot {
    pub(crate) fn capture(
        metrics: &CacheMetrics,
        len: usize,
        used_bytes: usize,
        capacity_bytes: usize,
    ) -> Self {
        Self {
            get_calls: metrics.get_calls,
            get_hits: metrics.get_hits,
            get_misses: metrics.get_misses,
            insert_calls: metrics.insert_calls,
            insert_new: metrics.insert_new,
            insert_updates: metrics.insert_updates,
            evict_calls: metrics.evict_calls,
            evicted_entries: metrics.evicted_entries,
            over_budget_kept: metrics.over_budget_kept,
            remove_calls: metrics.remove_calls,
            remove_found: metrics.remove_found,
            remove_oldest_calls: metrics.remove_oldest_calls,
            remove_oldest_found: metrics.remove_oldest_found,
            clear_calls: metrics.clear_calls,
            len,
            used_bytes,
            capacity_bytes,
        }
    }

    /// Fraction of `get` calls that hit, or `0.0` before any call.
    pub fn hit_rate(&self) -> f64 {
        if self.get_calls == 0 {
            0.0
        } else {
            self.get_hits as f64 / self.get_calls as f64
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_rate_handles_zero_calls() {
        let snap = CacheMetricsSnapshot::default();
        assert_eq!(snap.hit_rate(), 0.0);
    }

    #[test]
    fn capture_copies_counters_and_gauges() {
        let metrics = CacheMetrics {
            get_calls: 4,
            get_hits: 3,
            get_misses: 1,
            ..CacheMetrics::default()
        };
        let snap = CacheMetricsSnapshot::capture(&metrics, 2, 10, 64);
        assert_eq!(snap.get_calls, 4);
        assert_eq!(snap.len, 2);
        assert_eq!(snap.used_bytes, 10);
        assert_eq!(snap.capacity_bytes, 64);
        assert!((snap.hit_rate() - 0.75).abs() < f64::EPSILON);
    }
}
