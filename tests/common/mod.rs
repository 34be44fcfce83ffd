//! Shared fixtures for the integration tests.
//!
//! `RecordingRepository` and `RecordingBackend` write to one shared event log so
//! tests can assert the order of cache invalidation and repository calls.

#![allow(dead_code)]

use page_cache::backend::{CacheBackend, InMemoryBackend};
use page_cache::{
    CacheConfig, CacheKeyedRepository, Error, InMemoryPageRepository, ItemCriteria, ItemParams,
    NamespacedCache, Page, PageData, PageRepository, PageStatus, PageTranslation, Paginated,
    PaginationRequest, Result,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub type EventLog = Arc<Mutex<Vec<String>>>;

pub fn events(log: &EventLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn page(id: u64, title: &str, slug: &str, status: PageStatus) -> Page {
    Page::new(id, "default").with_translation("en", PageTranslation::new(title, slug, "", status))
}

/// Home, About (en + fr), Contact and an archived page with id 41.
pub fn seeded_pages() -> Vec<Page> {
    vec![
        page(1, "Home", "home", PageStatus::Online).as_homepage(),
        page(2, "About", "about", PageStatus::Online).with_translation(
            "fr",
            PageTranslation::new("A propos", "a-propos", "", PageStatus::Online),
        ),
        page(3, "Contact", "contact", PageStatus::Offline),
        page(41, "Archive", "archive", PageStatus::Offline),
    ]
}

/// In-memory repository that counts calls and can be told to fail.
#[derive(Clone)]
pub struct RecordingRepository {
    inner: Arc<InMemoryPageRepository>,
    calls: Arc<Mutex<HashMap<&'static str, usize>>>,
    failing: Arc<Mutex<Option<&'static str>>>,
    last_params: Arc<Mutex<Option<ItemParams>>>,
    last_data: Arc<Mutex<Option<PageData>>>,
    events: EventLog,
}

impl RecordingRepository {
    pub fn new(events: EventLog) -> Self {
        RecordingRepository {
            inner: Arc::new(InMemoryPageRepository::with_pages(seeded_pages())),
            calls: Arc::new(Mutex::new(HashMap::new())),
            failing: Arc::new(Mutex::new(None)),
            last_params: Arc::new(Mutex::new(None)),
            last_data: Arc::new(Mutex::new(None)),
            events,
        }
    }

    /// Number of times `op` reached this repository.
    pub fn calls(&self, op: &str) -> usize {
        self.calls.lock().unwrap().get(op).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().values().sum()
    }

    /// Make `op` return `Error::RepositoryError` until reset with `None`.
    pub fn fail_on(&self, op: Option<&'static str>) {
        *self.failing.lock().unwrap() = op;
    }

    pub fn last_params(&self) -> Option<ItemParams> {
        self.last_params.lock().unwrap().clone()
    }

    pub fn last_data(&self) -> Option<PageData> {
        self.last_data.lock().unwrap().clone()
    }

    pub fn store(&self) -> &InMemoryPageRepository {
        &self.inner
    }

    fn enter(&self, op: &'static str) -> Result<()> {
        self.events.lock().unwrap().push(format!("repo:{}", op));
        *self.calls.lock().unwrap().entry(op).or_insert(0) += 1;
        if *self.failing.lock().unwrap() == Some(op) {
            return Err(Error::RepositoryError(format!("{} failed", op)));
        }
        Ok(())
    }

    fn remember_params(&self, params: Option<&ItemParams>) {
        *self.last_params.lock().unwrap() = params.cloned();
    }
}

impl PageRepository for RecordingRepository {
    async fn find_homepage(&self) -> Result<Option<Page>> {
        self.enter("find_homepage")?;
        self.inner.find_homepage().await
    }

    async fn count_all(&self) -> Result<u64> {
        self.enter("count_all")?;
        self.inner.count_all().await
    }

    async fn find_by_slug_in_locale(&self, slug: &str, locale: &str) -> Result<Option<Page>> {
        self.enter("find_by_slug_in_locale")?;
        self.inner.find_by_slug_in_locale(slug, locale).await
    }

    async fn server_pagination_filtering_for(
        &self,
        request: &PaginationRequest,
    ) -> Result<Paginated<Page>> {
        self.enter("server_pagination_filtering_for")?;
        self.inner.server_pagination_filtering_for(request).await
    }

    async fn get_items_by(&self, params: &ItemParams) -> Result<Vec<Page>> {
        self.enter("get_items_by")?;
        self.remember_params(Some(params));
        self.inner.get_items_by(params).await
    }

    async fn get_item(
        &self,
        criteria: &ItemCriteria,
        params: Option<&ItemParams>,
    ) -> Result<Option<Page>> {
        self.enter("get_item")?;
        self.remember_params(params);
        self.inner.get_item(criteria, params).await
    }

    async fn mark_as_online_in_all_locales(&self, page: &Page) -> Result<Page> {
        self.enter("mark_as_online_in_all_locales")?;
        self.inner.mark_as_online_in_all_locales(page).await
    }

    async fn mark_as_offline_in_all_locales(&self, page: &Page) -> Result<Page> {
        self.enter("mark_as_offline_in_all_locales")?;
        self.inner.mark_as_offline_in_all_locales(page).await
    }

    async fn mark_multiple_as_online_in_all_locales(&self, ids: &[u64]) -> Result<u64> {
        self.enter("mark_multiple_as_online_in_all_locales")?;
        self.inner.mark_multiple_as_online_in_all_locales(ids).await
    }

    async fn mark_multiple_as_offline_in_all_locales(&self, ids: &[u64]) -> Result<u64> {
        self.enter("mark_multiple_as_offline_in_all_locales")?;
        self.inner.mark_multiple_as_offline_in_all_locales(ids).await
    }

    async fn create(&self, data: PageData) -> Result<Page> {
        self.enter("create")?;
        *self.last_data.lock().unwrap() = Some(data.clone());
        self.inner.create(data).await
    }

    async fn update_by(
        &self,
        criteria: &ItemCriteria,
        data: PageData,
        params: Option<&ItemParams>,
    ) -> Result<Page> {
        self.enter("update_by")?;
        self.remember_params(params);
        *self.last_data.lock().unwrap() = Some(data.clone());
        self.inner.update_by(criteria, data, params).await
    }

    async fn delete_by(&self, criteria: &ItemCriteria, params: Option<&ItemParams>) -> Result<()> {
        self.enter("delete_by")?;
        self.remember_params(params);
        self.inner.delete_by(criteria, params).await
    }
}

/// In-memory backend that logs namespace clears and can refuse them.
#[derive(Clone)]
pub struct RecordingBackend {
    inner: InMemoryBackend,
    fail_clear: Arc<AtomicBool>,
    events: EventLog,
}

impl RecordingBackend {
    pub fn new(inner: InMemoryBackend, events: EventLog) -> Self {
        RecordingBackend {
            inner,
            fail_clear: Arc::new(AtomicBool::new(false)),
            events,
        }
    }

    pub fn fail_clear(&self, fail: bool) {
        self.fail_clear.store(fail, Ordering::SeqCst);
    }

    pub fn clears(&self) -> usize {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.starts_with("cache:clear"))
            .count()
    }
}

impl CacheBackend for RecordingBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.inner.set(key, value, ttl).await
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.inner.delete(key).await
    }

    async fn clear_prefix(&self, prefix: &str) -> Result<usize> {
        self.events
            .lock()
            .unwrap()
            .push(format!("cache:clear {}", prefix));
        if self.fail_clear.load(Ordering::SeqCst) {
            return Err(Error::BackendError("clear refused".to_string()));
        }
        self.inner.clear_prefix(prefix).await
    }
}

pub type Decorated = CacheKeyedRepository<RecordingRepository, RecordingBackend>;

/// A decorated recording repository plus handles on its parts.
pub struct Fixture {
    pub pages: Decorated,
    pub repo: RecordingRepository,
    pub backend: RecordingBackend,
    pub store: InMemoryBackend,
    pub events: EventLog,
}

pub fn fixture() -> Fixture {
    fixture_with(CacheConfig::default())
}

pub fn fixture_with(config: CacheConfig) -> Fixture {
    let _ = env_logger::builder().is_test(true).try_init();

    let events: EventLog = Arc::new(Mutex::new(Vec::new()));
    let store = InMemoryBackend::new();
    let backend = RecordingBackend::new(store.clone(), events.clone());
    let repo = RecordingRepository::new(events.clone());
    let cache = NamespacedCache::new(backend.clone(), config).expect("valid config");

    Fixture {
        pages: CacheKeyedRepository::new(repo.clone(), cache),
        repo,
        backend,
        store,
        events,
    }
}
