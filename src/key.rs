//! Cache key derivation.
//!
//! Keys have the shape `{namespace}:{locale}:{operation}:{params}` where `params` is
//! the canonical JSON array of the operation's arguments. Namespace, locale and
//! operation never contain `:`, and the JSON array is self-delimiting, so distinct
//! argument tuples always yield distinct keys. Every key of a namespace starts with
//! [`namespace_prefix`], which is what namespace-wide invalidation clears.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Separator between key segments.
pub const SEPARATOR: char = ':';

/// Prefix shared by every key of `namespace`.
pub fn namespace_prefix(namespace: &str) -> String {
    format!("{}{}", namespace, SEPARATOR)
}

/// Validate a namespace or locale segment.
pub fn validate_segment(kind: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::ConfigError(format!("{} must not be empty", kind)));
    }
    if value.contains(SEPARATOR) || value.chars().any(char::is_whitespace) {
        return Err(Error::ConfigError(format!(
            "{} {:?} must not contain '{}' or whitespace",
            kind, value, SEPARATOR
        )));
    }
    Ok(())
}

/// A fully derived cache key.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Whether this key belongs to `namespace`.
    pub fn is_in_namespace(&self, namespace: &str) -> bool {
        self.0.starts_with(&namespace_prefix(namespace))
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Builder for cache keys.
///
/// ```
/// use page_cache::key::CacheKeyBuilder;
///
/// let key = CacheKeyBuilder::new("pages", "en", "find_by_slug_in_locale")
///     .param(&"about")
///     .param(&"en")
///     .build()
///     .unwrap();
/// assert_eq!(key.as_str(), r#"pages:en:find_by_slug_in_locale:["about","en"]"#);
/// ```
#[derive(Debug)]
pub struct CacheKeyBuilder {
    namespace: String,
    locale: String,
    operation: &'static str,
    params: Vec<serde_json::Result<serde_json::Value>>,
}

impl CacheKeyBuilder {
    pub fn new(namespace: impl Into<String>, locale: impl Into<String>, operation: &'static str) -> Self {
        CacheKeyBuilder {
            namespace: namespace.into(),
            locale: locale.into(),
            operation,
            params: Vec::new(),
        }
    }

    /// Append one operation argument. Order matters.
    pub fn param<P: Serialize + ?Sized>(mut self, value: &P) -> Self {
        self.params.push(serde_json::to_value(value));
        self
    }

    /// Encode the key.
    ///
    /// # Errors
    ///
    /// `Error::ConfigError` for an invalid namespace, locale or operation,
    /// `Error::SerializationError` when an argument cannot be encoded.
    pub fn build(self) -> Result<CacheKey> {
        validate_segment("namespace", &self.namespace)?;
        validate_segment("locale", &self.locale)?;
        validate_segment("operation", self.operation)?;

        let params = self
            .params
            .into_iter()
            .collect::<serde_json::Result<Vec<_>>>()
            .map_err(|e| Error::SerializationError(format!("cache key argument: {}", e)))?;
        let encoded = serde_json::to_string(&params)
            .map_err(|e| Error::SerializationError(format!("cache key arguments: {}", e)))?;

        Ok(CacheKey(format!(
            "{ns}{sep}{locale}{sep}{op}{sep}{params}",
            ns = self.namespace,
            locale = self.locale,
            op = self.operation,
            params = encoded,
            sep = SEPARATOR,
        )))
    }
}
