//! Page repository contract and an in-memory implementation.
//!
//! `PageRepository` is the capability set shared by the authoritative data source
//! and the caching decorator wrapped around it. Implement it with your database
//! client; use `InMemoryPageRepository` in tests and demos.

use crate::error::{Error, Result};
use crate::page::{Page, PageData, PageStatus, Paginated};
use crate::params::{ItemCriteria, ItemParams, OrderWay, PaginationRequest};
use std::collections::BTreeMap;
use tokio::sync::RwLock;

/// Trait for page repository implementations.
///
/// Finders return `Ok(None)` for a missing page; targeted mutations return
/// `Error::NotFound`. Any other failure of the data source is an `Err`.
#[allow(async_fn_in_trait)]
pub trait PageRepository: Send + Sync {
    /// The page flagged as homepage.
    async fn find_homepage(&self) -> Result<Option<Page>>;

    /// Number of pages.
    async fn count_all(&self) -> Result<u64>;

    /// The page whose `locale` translation has `slug`.
    async fn find_by_slug_in_locale(&self, slug: &str, locale: &str) -> Result<Option<Page>>;

    /// Paginated, ordered and searched listing for the admin index table.
    async fn server_pagination_filtering_for(
        &self,
        request: &PaginationRequest,
    ) -> Result<Paginated<Page>>;

    /// Pages matching `params`.
    async fn get_items_by(&self, params: &ItemParams) -> Result<Vec<Page>>;

    /// A single page by id or slug.
    async fn get_item(
        &self,
        criteria: &ItemCriteria,
        params: Option<&ItemParams>,
    ) -> Result<Option<Page>>;

    async fn mark_as_online_in_all_locales(&self, page: &Page) -> Result<Page>;

    async fn mark_as_offline_in_all_locales(&self, page: &Page) -> Result<Page>;

    /// Returns the number of pages updated. Unknown ids are skipped.
    async fn mark_multiple_as_online_in_all_locales(&self, ids: &[u64]) -> Result<u64>;

    /// Returns the number of pages updated. Unknown ids are skipped.
    async fn mark_multiple_as_offline_in_all_locales(&self, ids: &[u64]) -> Result<u64>;

    async fn create(&self, data: PageData) -> Result<Page>;

    async fn update_by(
        &self,
        criteria: &ItemCriteria,
        data: PageData,
        params: Option<&ItemParams>,
    ) -> Result<Page>;

    async fn delete_by(&self, criteria: &ItemCriteria, params: Option<&ItemParams>) -> Result<()>;
}

// ============================================================================
// In-Memory Repository
// ============================================================================

/// Column a criteria is resolved against.
enum Lookup<'a> {
    Id(u64),
    Slug(&'a str),
}

fn resolve<'a>(criteria: &'a ItemCriteria, params: Option<&ItemParams>) -> Result<Lookup<'a>> {
    let field = params.and_then(|p| p.filter.field.as_deref());
    match (field, criteria) {
        (None, ItemCriteria::Id(id)) | (Some("id"), ItemCriteria::Id(id)) => Ok(Lookup::Id(*id)),
        (None, ItemCriteria::Slug(slug)) | (Some("slug"), ItemCriteria::Slug(slug)) => {
            Ok(Lookup::Slug(slug))
        }
        (Some("id"), ItemCriteria::Slug(raw)) => raw
            .parse()
            .map(Lookup::Id)
            .map_err(|_| Error::RepositoryError(format!("{:?} is not a page id", raw))),
        (Some("slug"), ItemCriteria::Id(id)) => Err(Error::RepositoryError(format!(
            "numeric criteria {} cannot be matched against slug",
            id
        ))),
        (Some(other), _) => Err(Error::RepositoryError(format!(
            "unsupported lookup field {:?}",
            other
        ))),
    }
}

fn matches_lookup(page: &Page, lookup: &Lookup<'_>, locale: Option<&str>) -> bool {
    match lookup {
        Lookup::Id(id) => page.id == *id,
        Lookup::Slug(slug) => match locale {
            Some(locale) => page.translation(locale).is_some_and(|t| t.slug == *slug),
            None => page.translations.values().any(|t| t.slug == *slug),
        },
    }
}

fn matches_search(page: &Page, term: &str, locale: Option<&str>) -> bool {
    let term = term.to_lowercase();
    page.translations
        .iter()
        .filter(|(l, _)| locale.map_or(true, |wanted| wanted == l.as_str()))
        .any(|(_, t)| {
            t.title.to_lowercase().contains(&term) || t.slug.to_lowercase().contains(&term)
        })
}

fn sort_pages(pages: &mut [Page], field: &str, way: OrderWay, locale: Option<&str>) {
    match field {
        "title" => pages.sort_by(|a, b| a.sort_title(locale).cmp(b.sort_title(locale))),
        "slug" => pages.sort_by(|a, b| a.sort_slug(locale).cmp(b.sort_slug(locale))),
        "template" => pages.sort_by(|a, b| a.template.cmp(&b.template)),
        _ => pages.sort_by_key(|p| p.id),
    }
    if way == OrderWay::Desc {
        pages.reverse();
    }
}

/// In-memory page repository.
///
/// Keeps pages in id order behind an async `RwLock`; ids are assigned
/// sequentially starting at 1 unless seeded otherwise.
pub struct InMemoryPageRepository {
    pages: RwLock<BTreeMap<u64, Page>>,
}

impl InMemoryPageRepository {
    pub fn new() -> Self {
        InMemoryPageRepository {
            pages: RwLock::new(BTreeMap::new()),
        }
    }

    /// Repository pre-filled with `pages`, keyed by their own ids.
    pub fn with_pages(pages: impl IntoIterator<Item = Page>) -> Self {
        InMemoryPageRepository {
            pages: RwLock::new(pages.into_iter().map(|p| (p.id, p)).collect()),
        }
    }

    /// Insert or replace a page without going through `create`.
    pub async fn insert(&self, page: Page) {
        self.pages.write().await.insert(page.id, page);
    }

    pub async fn len(&self) -> usize {
        self.pages.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.pages.read().await.is_empty()
    }

    async fn set_status(&self, id: u64, status: PageStatus) -> Result<Page> {
        let mut pages = self.pages.write().await;
        let page = pages
            .get_mut(&id)
            .ok_or_else(|| Error::NotFound(format!("page {}", id)))?;
        page.set_status_in_all_locales(status);
        Ok(page.clone())
    }

    async fn set_status_many(&self, ids: &[u64], status: PageStatus) -> u64 {
        let mut pages = self.pages.write().await;
        let mut updated = 0;
        for id in ids {
            if let Some(page) = pages.get_mut(id) {
                page.set_status_in_all_locales(status);
                updated += 1;
            }
        }
        updated
    }

    fn find_id(
        pages: &BTreeMap<u64, Page>,
        criteria: &ItemCriteria,
        params: Option<&ItemParams>,
    ) -> Result<Option<u64>> {
        let lookup = resolve(criteria, params)?;
        let locale = params.and_then(|p| p.filter.locale.as_deref());
        Ok(pages
            .values()
            .find(|p| matches_lookup(p, &lookup, locale))
            .map(|p| p.id))
    }
}

impl Default for InMemoryPageRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRepository for InMemoryPageRepository {
    async fn find_homepage(&self) -> Result<Option<Page>> {
        Ok(self
            .pages
            .read()
            .await
            .values()
            .find(|p| p.is_home)
            .cloned())
    }

    async fn count_all(&self) -> Result<u64> {
        Ok(self.pages.read().await.len() as u64)
    }

    async fn find_by_slug_in_locale(&self, slug: &str, locale: &str) -> Result<Option<Page>> {
        Ok(self
            .pages
            .read()
            .await
            .values()
            .find(|p| p.translation(locale).is_some_and(|t| t.slug == slug))
            .cloned())
    }

    async fn server_pagination_filtering_for(
        &self,
        request: &PaginationRequest,
    ) -> Result<Paginated<Page>> {
        let mut matching: Vec<Page> = self
            .pages
            .read()
            .await
            .values()
            .filter(|p| request.search_term().map_or(true, |term| matches_search(p, term, None)))
            .cloned()
            .collect();

        sort_pages(
            &mut matching,
            request.order_by_field(),
            request.order_way(),
            None,
        );

        let per_page = request.per_page_number();
        let current_page = request.page_number();
        let total = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip((current_page - 1).saturating_mul(per_page))
            .take(per_page)
            .collect();

        Ok(Paginated::new(items, total, per_page, current_page))
    }

    async fn get_items_by(&self, params: &ItemParams) -> Result<Vec<Page>> {
        let filter = &params.filter;
        let locale = filter.locale.as_deref();

        let mut items: Vec<Page> = self
            .pages
            .read()
            .await
            .values()
            .filter(|p| filter.is_home.map_or(true, |home| p.is_home == home))
            .filter(|p| {
                filter.status.map_or(true, |status| match locale {
                    Some(l) => p.translation(l).is_some_and(|t| t.status == status),
                    None => p.translations.values().any(|t| t.status == status),
                })
            })
            .filter(|p| locale.map_or(true, |l| p.translation(l).is_some()))
            .filter(|p| {
                filter
                    .search
                    .as_deref()
                    .map_or(true, |term| matches_search(p, term, locale))
            })
            .cloned()
            .collect();

        if let Some(order) = &params.order {
            sort_pages(&mut items, &order.field, order.way, locale);
        }

        let items = match (params.take, params.page) {
            (Some(take), Some(page)) => items
                .into_iter()
                .skip(page.saturating_sub(1).saturating_mul(take))
                .take(take)
                .collect(),
            (Some(take), None) => items.into_iter().take(take).collect(),
            _ => items,
        };

        Ok(items)
    }

    async fn get_item(
        &self,
        criteria: &ItemCriteria,
        params: Option<&ItemParams>,
    ) -> Result<Option<Page>> {
        let pages = self.pages.read().await;
        let id = Self::find_id(&pages, criteria, params)?;
        Ok(id.and_then(|id| pages.get(&id).cloned()))
    }

    async fn mark_as_online_in_all_locales(&self, page: &Page) -> Result<Page> {
        self.set_status(page.id, PageStatus::Online).await
    }

    async fn mark_as_offline_in_all_locales(&self, page: &Page) -> Result<Page> {
        self.set_status(page.id, PageStatus::Offline).await
    }

    async fn mark_multiple_as_online_in_all_locales(&self, ids: &[u64]) -> Result<u64> {
        Ok(self.set_status_many(ids, PageStatus::Online).await)
    }

    async fn mark_multiple_as_offline_in_all_locales(&self, ids: &[u64]) -> Result<u64> {
        Ok(self.set_status_many(ids, PageStatus::Offline).await)
    }

    async fn create(&self, data: PageData) -> Result<Page> {
        let mut pages = self.pages.write().await;
        let id = match pages.keys().next_back() {
            None => 1,
            Some(last) => last
                .checked_add(1)
                .ok_or_else(|| Error::RepositoryError("page id space exhausted".to_string()))?,
        };

        if data.is_home {
            for other in pages.values_mut() {
                other.is_home = false;
            }
        }

        let page = Page::from_data(id, data);
        pages.insert(id, page.clone());
        Ok(page)
    }

    async fn update_by(
        &self,
        criteria: &ItemCriteria,
        data: PageData,
        params: Option<&ItemParams>,
    ) -> Result<Page> {
        let mut pages = self.pages.write().await;
        let id = Self::find_id(&pages, criteria, params)?
            .ok_or_else(|| Error::NotFound(format!("page {}", criteria)))?;

        if data.is_home {
            for other in pages.values_mut() {
                other.is_home = false;
            }
        }

        let page = Page::from_data(id, data);
        pages.insert(id, page.clone());
        Ok(page)
    }

    async fn delete_by(&self, criteria: &ItemCriteria, params: Option<&ItemParams>) -> Result<()> {
        let mut pages = self.pages.write().await;
        let id = Self::find_id(&pages, criteria, params)?
            .ok_or_else(|| Error::NotFound(format!("page {}", criteria)))?;
        pages.remove(&id);
        Ok(())
    }
}
