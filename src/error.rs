//! Error types for the page cache.

use std::fmt;

/// Result type for cache and repository operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the page cache.
///
/// The decorator never creates errors of its own: every variant below is raised by
/// a collaborator (cache backend, serialization envelope, inner repository) and
/// propagated unchanged.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Serialization failed when converting a result to cache bytes.
    SerializationError(String),

    /// Deserialization failed when converting cache bytes back to a result.
    ///
    /// This indicates corrupted or malformed data in cache.
    DeserializationError(String),

    /// Invalid cache entry: corrupted envelope or bad magic.
    ///
    /// Returned when the magic header is not `b"PGCH"` or the envelope itself
    /// cannot be decoded.
    InvalidCacheEntry(String),

    /// Schema version mismatch between code and cached data.
    ///
    /// Expected during deployments that change the shape of `Page`.
    VersionMismatch {
        /// Expected schema version (from compiled code)
        expected: u32,
        /// Found schema version (from cached entry)
        found: u32,
    },

    /// Backend storage error (Redis, in-memory, etc).
    ///
    /// Common causes:
    /// - Redis connection lost
    /// - Network timeout
    /// - Backend protocol error
    BackendError(String),

    /// Data repository error (database, etc).
    ///
    /// Raised by the inner repository when the authoritative store fails.
    RepositoryError(String),

    /// The inner repository could not find the targeted page.
    NotFound(String),

    /// Invalid configuration (namespace, locale, TTL, connection string).
    ConfigError(String),

    /// Feature not implemented by this backend.
    NotImplemented(String),

    /// Generic error with custom message.
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::DeserializationError(msg) => write!(f, "Deserialization error: {}", msg),
            Error::InvalidCacheEntry(msg) => write!(f, "Invalid cache entry: {}", msg),
            Error::VersionMismatch { expected, found } => {
                write!(
                    f,
                    "Cache version mismatch: expected {}, found {}",
                    expected, found
                )
            }
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::RepositoryError(msg) => write!(f, "Repository error: {}", msg),
            Error::NotFound(msg) => write!(f, "Not found: {}", msg),
            Error::ConfigError(msg) => write!(f, "Config error: {}", msg),
            Error::NotImplemented(msg) => write!(f, "Not implemented: {}", msg),
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

// ============================================================================
// Conversions from other error types
// ============================================================================

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::BackendError(e.to_string())
    }
}

impl From<String> for Error {
    fn from(e: String) -> Self {
        Error::Other(e)
    }
}

impl From<&str> for Error {
    fn from(e: &str) -> Self {
        Error::Other(e.to_string())
    }
}

#[cfg(feature = "redis")]
impl From<redis::RedisError> for Error {
    fn from(e: redis::RedisError) -> Self {
        Error::BackendError(format!("Redis error: {}", e))
    }
}
