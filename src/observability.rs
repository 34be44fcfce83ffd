//! Metrics hooks and TTL policies for the page cache.
//!
//! - **Metrics (`CacheMetrics`)**: hits, misses, writes, namespace clears, errors.
//! - **TTL Policies (`TtlPolicy`)**: how long remembered results stay in the backend.
//!
//! ```ignore
//! use page_cache::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("page_cache_hits").inc();
//!     }
//! }
//!
//! let cache = NamespacedCache::new(backend, CacheConfig::default())?
//!     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! | Policy | Use Case |
//! |--------|----------|
//! | `Default` | Let the backend decide |
//! | `Fixed` | Every remembered result expires after the same duration |
//! | `Infinite` | Results live until the next write clears the namespace |
//! | `PerType` | Duration chosen per namespace |

use std::time::Duration;

/// Trait for cache metrics collection.
///
/// Default method bodies only log, so implementors override what they export.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a remembered result being stored.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a single key being forgotten.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record a namespace-wide clear.
    fn record_clear(&self, namespace: &str, removed: usize, duration: Duration) {
        debug!(
            "Cache CLEAR: {} ({} entries) took {:?}",
            namespace, removed, duration
        );
    }

    /// Record an error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_clear(&self, _namespace: &str, _removed: usize, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}

/// TTL (Time-to-Live) policy for remembered results.
#[derive(Clone, Debug, Default)]
pub enum TtlPolicy {
    /// Use backend's default TTL
    #[default]
    Default,

    /// Fixed duration for all entries
    Fixed(Duration),

    /// No TTL (entries live until cleared)
    Infinite,

    /// Custom per-namespace policy
    PerType(fn(&str) -> Duration),
}

impl TtlPolicy {
    /// Get TTL for a namespace.
    pub fn get_ttl(&self, namespace: &str) -> Option<Duration> {
        match self {
            TtlPolicy::Default => None,
            TtlPolicy::Fixed(d) => Some(*d),
            TtlPolicy::Infinite => None,
            TtlPolicy::PerType(f) => Some(f(namespace)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_hit("pages:en:count_all:[]", Duration::from_secs(1));
        metrics.record_clear("pages", 3, Duration::from_millis(2));
    }

    #[test]
    fn test_ttl_policy_default() {
        assert_eq!(TtlPolicy::Default.get_ttl("pages"), None);
        assert_eq!(TtlPolicy::Infinite.get_ttl("pages"), None);
    }

    #[test]
    fn test_ttl_policy_fixed() {
        let policy = TtlPolicy::Fixed(Duration::from_secs(300));
        assert_eq!(policy.get_ttl("pages"), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_ttl_policy_per_type() {
        let policy = TtlPolicy::PerType(|namespace| match namespace {
            "pages" => Duration::from_secs(3600),
            _ => Duration::from_secs(600),
        });

        assert_eq!(policy.get_ttl("pages"), Some(Duration::from_secs(3600)));
        assert_eq!(policy.get_ttl("menus"), Some(Duration::from_secs(600)));
    }
}
