//! Recording and snapshot traits.

/// Counters shared by every cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    /// The byte total exceeded the budget after an insert.
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    /// Over budget, but the written entry was the only candidate.
    fn record_over_budget_kept(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_remove_oldest_call(&mut self);
    fn record_remove_oldest_found(&mut self);
    fn record_clear(&mut self);
}

/// Produce a point-in-time snapshot (tests, benches, monitoring).
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}
