use crate::metrics::traits::CoreMetricsRecorder;

/// Plain counters owned by a single cache instance.
///
/// Mutated only through `&mut` cache methods, so no atomics are needed; the
/// concurrent wrapper serializes access with its lock.
#[derive(Debug, Default, Clone)]
pub struct CacheMetrics {
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
}

impl CoreMetricsRecorder for CacheMetrics {
    fn record_get_hit(&mut self) {
        self.get_calls += 1;
        self.get_hits += 1;
    }

    fn record_get_miss(&mut self) {
        self.get_calls += 1;
        self.get_misses += 1;
    }

    fn record_insert_call(&mut self) {
        self.insert_calls += 1;
    }

    fn record_insert_new(&mut self) {
        self.insert_new += 1;
    }

    fn record_insert_update(&mut self) {
        self.insert_updates += 1;
    }

    fn record_evict_call(&mut self) {
        self.evict_calls += 1;
    }

    fn record_evicted_entry(&mut self) {
        self.evicted_entries += 1;
    }

    fn record_over_budget_kept(&mut self) {
        self.over_budget_kept += 1;
    }

    fn record_remove_call(&mut self) {
        self.remove_calls += 1;
    }

    fn record_remove_found(&mut self) {
        self.remove_found += 1;
    }

    fn record_remove_oldest_call(&mut self) {
        self.remove_oldest_calls += 1;
    }

    fn record_remove_oldest_found(&mut self) {
        self.remove_oldest_found += 1;
    }

    fn record_clear(&mut self) {
        self.clear_calls += 1;
    }
}
