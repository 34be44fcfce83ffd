//! Page cache configuration.
//!
//! ```
//! use page_cache::config::CacheConfig;
//! use page_cache::observability::TtlPolicy;
//! use std::time::Duration;
//!
//! let config = CacheConfig::default()
//!     .with_locale("fr")
//!     .with_ttl_policy(TtlPolicy::Fixed(Duration::from_secs(3600)));
//! assert_eq!(config.namespace, "pages");
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};
use crate::key::validate_segment;
use crate::observability::TtlPolicy;
use std::time::Duration;

/// Namespace used by the page repository decorator.
pub const DEFAULT_NAMESPACE: &str = "pages";

/// Locale used when none is configured.
pub const DEFAULT_LOCALE: &str = "en";

pub const ENV_NAMESPACE: &str = "PAGE_CACHE_NAMESPACE";
pub const ENV_LOCALE: &str = "PAGE_CACHE_LOCALE";
/// Seconds; `0` keeps entries until the namespace is cleared.
pub const ENV_TTL_SECS: &str = "PAGE_CACHE_TTL_SECS";

/// Settings of one namespaced cache.
#[derive(Clone, Debug)]
pub struct CacheConfig {
    /// Prefix shared by every key, and the unit of invalidation.
    pub namespace: String,
    /// Request locale baked into every key.
    pub locale: String,
    pub ttl: TtlPolicy,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            namespace: DEFAULT_NAMESPACE.to_string(),
            locale: DEFAULT_LOCALE.to_string(),
            ttl: TtlPolicy::Default,
        }
    }
}

impl CacheConfig {
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = locale.into();
        self
    }

    pub fn with_ttl_policy(mut self, policy: TtlPolicy) -> Self {
        self.ttl = policy;
        self
    }

    /// Read overrides from `PAGE_CACHE_*` environment variables.
    ///
    /// # Errors
    /// `Error::ConfigError` when a variable is present but invalid.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Same as [`CacheConfig::from_env`] with a custom variable source.
    ///
    /// # Errors
    /// `Error::ConfigError` when a variable is present but invalid.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = CacheConfig::default();

        if let Some(namespace) = lookup(ENV_NAMESPACE) {
            config.namespace = namespace.trim().to_string();
        }
        if let Some(locale) = lookup(ENV_LOCALE) {
            config.locale = locale.trim().to_string();
        }
        if let Some(raw) = lookup(ENV_TTL_SECS) {
            let secs = raw.trim().parse::<u64>().map_err(|e| {
                Error::ConfigError(format!("{}={:?} is not a number of seconds: {}", ENV_TTL_SECS, raw, e))
            })?;
            config.ttl = if secs == 0 {
                TtlPolicy::Infinite
            } else {
                TtlPolicy::Fixed(Duration::from_secs(secs))
            };
        }

        config.validate()?;
        Ok(config)
    }

    /// # Errors
    /// `Error::ConfigError` for an empty namespace or locale, or one containing `:`.
    pub fn validate(&self) -> Result<()> {
        validate_segment("namespace", &self.namespace)?;
        validate_segment("locale", &self.locale)?;
        if let TtlPolicy::Fixed(d) = self.ttl {
            if d.is_zero() {
                return Err(Error::ConfigError(
                    "fixed TTL must be greater than zero".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// TTL applied to entries of this namespace.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl.get_ttl(&self.namespace)
    }
}
