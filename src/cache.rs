//! Namespaced cache client: the `remember` / `clear` primitives the repository
//! decorator is built on.

use crate::backend::CacheBackend;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::key::{namespace_prefix, CacheKey, CacheKeyBuilder};
use crate::observability::{CacheMetrics, NoOpMetrics};
use crate::serialization::{deserialize_from_cache, serialize_for_cache};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Cache client scoped to one namespace.
///
/// Every key it derives starts with `"{namespace}:"`, and [`NamespacedCache::clear`]
/// removes exactly those keys. Several clients with different namespaces may share
/// one backend. Clones share the backend and the metrics handler.
///
/// # Example
///
/// ```ignore
/// use page_cache::{backend::InMemoryBackend, CacheConfig, NamespacedCache};
///
/// let cache = NamespacedCache::new(InMemoryBackend::new(), CacheConfig::default())?;
/// let key = cache.key("count_all").build()?;
/// let count = cache.remember(&key, || async { Ok(12u64) }).await?;
/// cache.clear().await?;
/// ```
pub struct NamespacedCache<B: CacheBackend> {
    backend: B,
    config: CacheConfig,
    metrics: Arc<dyn CacheMetrics>,
}

impl<B: CacheBackend> Clone for NamespacedCache<B> {
    fn clone(&self) -> Self {
        NamespacedCache {
            backend: self.backend.clone(),
            config: self.config.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<B: CacheBackend> NamespacedCache<B> {
    /// Create a client over `backend`.
    ///
    /// # Errors
    /// `Error::ConfigError` if the configuration does not validate.
    pub fn new(backend: B, config: CacheConfig) -> Result<Self> {
        config.validate()?;
        Ok(NamespacedCache {
            backend,
            config,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn CacheMetrics>) -> Self {
        self.metrics = Arc::from(metrics);
        self
    }

    pub fn namespace(&self) -> &str {
        &self.config.namespace
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Start a key for `operation` in this namespace and locale.
    pub fn key(&self, operation: &'static str) -> CacheKeyBuilder {
        CacheKeyBuilder::new(&self.config.namespace, &self.config.locale, operation)
    }

    /// Return the value cached under `key`, or compute it with `producer` and store it.
    ///
    /// Nothing is stored when the producer fails. A failed store after a successful
    /// producer is logged and the computed value is still returned.
    ///
    /// # Errors
    ///
    /// - `Error::BackendError`: the lookup itself failed
    /// - `Error::InvalidCacheEntry` / `Error::VersionMismatch` / `Error::DeserializationError`:
    ///   the cached entry cannot be decoded
    /// - `Error::SerializationError`: the computed value cannot be encoded
    /// - any error returned by `producer`
    pub async fn remember<T, F, Fut>(&self, key: &CacheKey, producer: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let timer = Instant::now();

        let cached = self.backend.get(key.as_str()).await.map_err(|e| {
            self.metrics.record_error(key.as_str(), &e.to_string());
            e
        })?;

        if let Some(bytes) = cached {
            let value = deserialize_from_cache(&bytes).map_err(|e| {
                self.metrics.record_error(key.as_str(), &e.to_string());
                e
            })?;
            self.metrics.record_hit(key.as_str(), timer.elapsed());
            debug!("✓ Cache hit for {}", key);
            return Ok(value);
        }

        self.metrics.record_miss(key.as_str(), timer.elapsed());
        debug!("Cache miss for {}, calling repository", key);

        let value = producer().await?;

        let bytes = serialize_for_cache(&value)?;
        let set_timer = Instant::now();
        match self.backend.set(key.as_str(), bytes, self.config.ttl()).await {
            Ok(()) => self.metrics.record_set(key.as_str(), set_timer.elapsed()),
            Err(e) => {
                warn!("Failed to store {}: {}", key, e);
                self.metrics.record_error(key.as_str(), &e.to_string());
            }
        }

        Ok(value)
    }

    /// Drop a single entry.
    ///
    /// # Errors
    /// Returns `Err` if the backend delete fails.
    pub async fn forget(&self, key: &CacheKey) -> Result<()> {
        let timer = Instant::now();
        self.backend.delete(key.as_str()).await?;
        self.metrics.record_delete(key.as_str(), timer.elapsed());
        Ok(())
    }

    /// Drop every entry of this namespace, in all locales.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot clear by prefix.
    pub async fn clear(&self) -> Result<()> {
        let timer = Instant::now();
        let prefix = namespace_prefix(&self.config.namespace);

        let removed = self.backend.clear_prefix(&prefix).await.map_err(|e| {
            self.metrics.record_error(&prefix, &e.to_string());
            e
        })?;

        self.metrics
            .record_clear(&self.config.namespace, removed, timer.elapsed());
        debug!(
            "✓ Cleared namespace {} ({} entries)",
            self.config.namespace, removed
        );
        Ok(())
    }
}
