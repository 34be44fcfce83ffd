//! # page-cache
//!
//! A read-through, invalidate-on-write cache decorator for a CMS page repository.
//!
//! ## Features
//!
//! - **Transparent:** [`CacheKeyedRepository`] implements the same [`PageRepository`]
//!   trait as the repository it wraps
//! - **Read-through:** finders are served from cache, populated on miss
//! - **Invalidate-on-write:** every mutation clears the `pages` namespace first
//! - **Unambiguous keys:** arguments are encoded as canonical JSON, never naively joined
//! - **Backend Agnostic:** in-memory (default) and Redis (`redis` feature)
//! - **Versioned entries:** Postcard envelopes reject stale or foreign data
//!
//! ## Quick Start
//!
//! ```ignore
//! use page_cache::{
//!     backend::InMemoryBackend, CacheConfig, CacheKeyedRepository, NamespacedCache,
//!     PageData, PageRepository,
//! };
//!
//! // 1. Build the namespaced cache client (namespace "pages", locale "en")
//! let cache = NamespacedCache::new(InMemoryBackend::new(), CacheConfig::from_env()?)?;
//!
//! // 2. Wrap the authoritative repository
//! let pages = CacheKeyedRepository::new(SqlPageRepository::new(pool), cache);
//!
//! // 3. Use it exactly like the inner repository
//! let home = pages.find_homepage().await?;          // miss -> repository
//! let home = pages.find_homepage().await?;          // hit
//! pages.create(PageData::titled("en", "New")).await?; // clears "pages:*"
//! ```

#[macro_use]
extern crate log;

pub mod backend;
pub mod cache;
pub mod config;
pub mod decorator;
pub mod error;
pub mod key;
pub mod observability;
pub mod page;
pub mod params;
pub mod repository;
pub mod serialization;

// Re-exports for convenience
pub use backend::CacheBackend;
pub use cache::NamespacedCache;
pub use config::CacheConfig;
pub use decorator::CacheKeyedRepository;
pub use error::{Error, Result};
pub use key::{CacheKey, CacheKeyBuilder};
pub use page::{Page, PageData, PageStatus, PageTranslation, Paginated};
pub use params::{ItemCriteria, ItemOrder, ItemParams, OrderWay, PageFilter, PaginationRequest};
pub use repository::{InMemoryPageRepository, PageRepository};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
