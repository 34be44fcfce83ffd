//! Read-through, invalidate-on-write decorator over a [`PageRepository`].
//!
//! Reads derive a key from the operation name and its arguments and go through
//! [`NamespacedCache::remember`]. Writes clear the whole namespace first and then
//! delegate, so the cache is emptied even when the write itself fails.
//!
//! ```ignore
//! use page_cache::{
//!     backend::InMemoryBackend, CacheConfig, CacheKeyedRepository, InMemoryPageRepository,
//!     NamespacedCache, PageRepository,
//! };
//!
//! let cache = NamespacedCache::new(InMemoryBackend::new(), CacheConfig::default())?;
//! let pages = CacheKeyedRepository::new(InMemoryPageRepository::new(), cache);
//!
//! let about = pages.find_by_slug_in_locale("about", "en").await?; // repository
//! let about = pages.find_by_slug_in_locale("about", "en").await?; // cache
//! ```

use crate::backend::CacheBackend;
use crate::cache::NamespacedCache;
use crate::error::Result;
use crate::page::{Page, PageData, Paginated};
use crate::params::{ItemCriteria, ItemParams, PaginationRequest};
use crate::repository::PageRepository;

const FIND_HOMEPAGE: &str = "find_homepage";
const COUNT_ALL: &str = "count_all";
const FIND_BY_SLUG_IN_LOCALE: &str = "find_by_slug_in_locale";
const SERVER_PAGINATION_FILTERING_FOR: &str = "server_pagination_filtering_for";
const GET_ITEMS_BY: &str = "get_items_by";
const GET_ITEM: &str = "get_item";

/// Caching decorator implementing [`PageRepository`] by delegation to `R`.
pub struct CacheKeyedRepository<R, B: CacheBackend> {
    inner: R,
    cache: NamespacedCache<B>,
}

impl<R: PageRepository, B: CacheBackend> CacheKeyedRepository<R, B> {
    pub fn new(inner: R, cache: NamespacedCache<B>) -> Self {
        CacheKeyedRepository { inner, cache }
    }

    /// The wrapped repository.
    pub fn inner(&self) -> &R {
        &self.inner
    }

    pub fn cache(&self) -> &NamespacedCache<B> {
        &self.cache
    }

    pub fn into_inner(self) -> R {
        self.inner
    }

    /// Drop every cached page result, e.g. after out-of-band data changes.
    ///
    /// # Errors
    /// Returns `Err` if the backend cannot clear the namespace.
    pub async fn flush(&self) -> Result<()> {
        info!("Flushing page cache namespace {}", self.cache.namespace());
        self.cache.clear().await
    }
}

impl<R: PageRepository, B: CacheBackend> PageRepository for CacheKeyedRepository<R, B> {
    async fn find_homepage(&self) -> Result<Option<Page>> {
        let key = self.cache.key(FIND_HOMEPAGE).build()?;
        self.cache
            .remember(&key, || self.inner.find_homepage())
            .await
    }

    async fn count_all(&self) -> Result<u64> {
        let key = self.cache.key(COUNT_ALL).build()?;
        self.cache.remember(&key, || self.inner.count_all()).await
    }

    async fn find_by_slug_in_locale(&self, slug: &str, locale: &str) -> Result<Option<Page>> {
        let key = self
            .cache
            .key(FIND_BY_SLUG_IN_LOCALE)
            .param(slug)
            .param(locale)
            .build()?;
        self.cache
            .remember(&key, || self.inner.find_by_slug_in_locale(slug, locale))
            .await
    }

    async fn server_pagination_filtering_for(
        &self,
        request: &PaginationRequest,
    ) -> Result<Paginated<Page>> {
        let key = self
            .cache
            .key(SERVER_PAGINATION_FILTERING_FOR)
            .param(&request.page)
            .param(&request.order)
            .param(&request.order_by)
            .param(&request.per_page)
            .param(&request.search)
            .build()?;
        self.cache
            .remember(&key, || self.inner.server_pagination_filtering_for(request))
            .await
    }

    async fn get_items_by(&self, params: &ItemParams) -> Result<Vec<Page>> {
        let key = self.cache.key(GET_ITEMS_BY).param(params).build()?;
        self.cache
            .remember(&key, || self.inner.get_items_by(params))
            .await
    }

    async fn get_item(
        &self,
        criteria: &ItemCriteria,
        params: Option<&ItemParams>,
    ) -> Result<Option<Page>> {
        let key = self
            .cache
            .key(GET_ITEM)
            .param(criteria)
            .param(&params)
            .build()?;
        self.cache
            .remember(&key, || self.inner.get_item(criteria, params))
            .await
    }

    async fn mark_as_online_in_all_locales(&self, page: &Page) -> Result<Page> {
        self.cache.clear().await?;
        self.inner.mark_as_online_in_all_locales(page).await
    }

    async fn mark_as_offline_in_all_locales(&self, page: &Page) -> Result<Page> {
        self.cache.clear().await?;
        self.inner.mark_as_offline_in_all_locales(page).await
    }

    async fn mark_multiple_as_online_in_all_locales(&self, ids: &[u64]) -> Result<u64> {
        self.cache.clear().await?;
        self.inner.mark_multiple_as_online_in_all_locales(ids).await
    }

    async fn mark_multiple_as_offline_in_all_locales(&self, ids: &[u64]) -> Result<u64> {
        self.cache.clear().await?;
        self.inner.mark_multiple_as_offline_in_all_locales(ids).await
    }

    async fn create(&self, data: PageData) -> Result<Page> {
        self.cache.clear().await?;
        self.inner.create(data).await
    }

    async fn update_by(
        &self,
        criteria: &ItemCriteria,
        data: PageData,
        params: Option<&ItemParams>,
    ) -> Result<Page> {
        self.cache.clear().await?;
        self.inner.update_by(criteria, data, params).await
    }

    async fn delete_by(&self, criteria: &ItemCriteria, params: Option<&ItemParams>) -> Result<()> {
        self.cache.clear().await?;
        self.inner.delete_by(criteria, params).await
    }
}
