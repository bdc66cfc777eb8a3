//! Cache-aside metrics.
//!
//! Counters are labelled by keyspace so hit ratios can be read per entity.

use metrics::{counter, describe_counter};

/// Metric names of the cache layer.
pub mod names {
    /// Reads answered from the cache.
    pub const CACHE_HITS_TOTAL: &str = "emporium_cache_hits_total";
    /// Reads that fell through to the store.
    pub const CACHE_MISSES_TOTAL: &str = "emporium_cache_misses_total";
    /// Cache reads that failed or returned undecodable data.
    pub const CACHE_READ_ERRORS_TOTAL: &str = "emporium_cache_read_errors_total";
    /// Background writes after a miss that did not land.
    pub const CACHE_POPULATE_FAILURES_TOTAL: &str = "emporium_cache_populate_failures_total";
    /// Keys or patterns deleted after a mutation.
    pub const CACHE_INVALIDATIONS_TOTAL: &str = "emporium_cache_invalidations_total";
    /// Deletions after a mutation that did not land.
    pub const CACHE_INVALIDATION_FAILURES_TOTAL: &str =
        "emporium_cache_invalidation_failures_total";
}

/// Registers metric descriptions with the installed recorder.
pub fn register_metrics() {
    describe_counter!(names::CACHE_HITS_TOTAL, "Reads answered from the cache");
    describe_counter!(names::CACHE_MISSES_TOTAL, "Reads that fell through to the store");
    describe_counter!(
        names::CACHE_READ_ERRORS_TOTAL,
        "Cache reads that failed or could not be decoded"
    );
    describe_counter!(
        names::CACHE_POPULATE_FAILURES_TOTAL,
        "Cache populations after a miss that failed"
    );
    describe_counter!(
        names::CACHE_INVALIDATIONS_TOTAL,
        "Cache keys or patterns deleted after a mutation"
    );
    describe_counter!(
        names::CACHE_INVALIDATION_FAILURES_TOTAL,
        "Cache invalidations that failed"
    );
}

/// Cache metrics recorder.
#[derive(Clone, Copy, Debug)]
pub struct CacheMetrics;

impl CacheMetrics {
    pub fn hit(keyspace: &'static str) {
        counter!(names::CACHE_HITS_TOTAL, "keyspace" => keyspace).increment(1);
    }

    pub fn miss(keyspace: &'static str) {
        counter!(names::CACHE_MISSES_TOTAL, "keyspace" => keyspace).increment(1);
    }

    pub fn read_error(keyspace: &'static str) {
        counter!(names::CACHE_READ_ERRORS_TOTAL, "keyspace" => keyspace).increment(1);
    }

    pub fn populate_failed(keyspace: &'static str) {
        counter!(names::CACHE_POPULATE_FAILURES_TOTAL, "keyspace" => keyspace).increment(1);
    }

    pub fn invalidated(keyspace: &'static str) {
        counter!(names::CACHE_INVALIDATIONS_TOTAL, "keyspace" => keyspace).increment(1);
    }

    pub fn invalidation_failed(keyspace: &'static str) {
        counter!(names::CACHE_INVALIDATION_FAILURES_TOTAL, "keyspace" => keyspace).increment(1);
    }
}
