//! Benchmarks for the caching page repository.
//!
//! - key derivation for simple and structured arguments
//! - decorated reads on a hit and on a miss, against a bare repository
//! - namespace invalidation with a growing number of entries
//!
//! Run with: cargo bench
//! View results: open target/criterion/report/index.html

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use page_cache::backend::{CacheBackend, InMemoryBackend};
use page_cache::{
    CacheConfig, CacheKeyedRepository, InMemoryPageRepository, ItemParams, NamespacedCache, Page,
    PageRepository, PageStatus, PageTranslation, PaginationRequest,
};
use std::hint::black_box;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

// ============================================================================
// Fixtures
// ============================================================================

fn seeded_repository(count: u64) -> InMemoryPageRepository {
    InMemoryPageRepository::with_pages((1..=count).map(|id| {
        Page::new(id, "default").with_translation(
            "en",
            PageTranslation::new(
                format!("Page {}", id),
                format!("page-{}", id),
                "x".repeat(512),
                PageStatus::Online,
            ),
        )
    }))
}

fn decorated(count: u64) -> CacheKeyedRepository<InMemoryPageRepository, InMemoryBackend> {
    let cache = NamespacedCache::new(InMemoryBackend::new(), CacheConfig::default())
        .expect("Failed to build cache");
    CacheKeyedRepository::new(seeded_repository(count), cache)
}

// ============================================================================
// Group 1: Key Derivation
// ============================================================================

fn key_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("key_derivation");
    let cache = NamespacedCache::new(InMemoryBackend::new(), CacheConfig::default())
        .expect("Failed to build cache");

    group.bench_function("slug_and_locale", |b| {
        b.iter(|| {
            cache
                .key("find_by_slug_in_locale")
                .param(black_box("about"))
                .param(black_box("en"))
                .build()
        })
    });

    let params = ItemParams::new()
        .with_field("slug")
        .with_locale("en")
        .with_status(PageStatus::Online)
        .with_include("translations")
        .with_take(20);
    group.bench_function("item_params", |b| {
        b.iter(|| cache.key("get_items_by").param(black_box(&params)).build())
    });

    group.finish();
}

// ============================================================================
// Group 2: Decorated Reads
// ============================================================================

fn read_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("decorated_reads");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    for count in [10u64, 100, 1_000].iter() {
        // Bare repository, the baseline a miss pays on top of
        group.bench_with_input(BenchmarkId::new("repository", count), count, |b, &count| {
            let repo = seeded_repository(count);
            b.to_async(&rt)
                .iter(|| async { repo.find_by_slug_in_locale(black_box("page-5"), "en").await });
        });

        // Hit: key derivation + lookup + decode
        group.bench_with_input(BenchmarkId::new("hit", count), count, |b, &count| {
            let pages = decorated(count);
            rt.block_on(async {
                pages
                    .find_by_slug_in_locale("page-5", "en")
                    .await
                    .expect("Failed to warm cache");
            });
            b.to_async(&rt)
                .iter(|| async { pages.find_by_slug_in_locale(black_box("page-5"), "en").await });
        });

        // Miss: key derivation + lookup + repository + encode + store
        group.bench_with_input(BenchmarkId::new("miss", count), count, |b, &count| {
            let pages = Arc::new(decorated(count));
            let counter = Arc::new(AtomicU64::new(0));
            b.to_async(&rt).iter(|| {
                let pages = pages.clone();
                let counter = counter.clone();
                async move {
                    // Unique slug per iteration forces a miss
                    let n = counter.fetch_add(1, Ordering::Relaxed);
                    let slug = format!("page-{}", n % count + 1);
                    let locale = format!("l{}", n);
                    pages.find_by_slug_in_locale(black_box(&slug), &locale).await
                }
            });
        });
    }

    // Paginated listing hit, the largest payload served from cache
    group.bench_function("pagination_hit", |b| {
        let pages = decorated(1_000);
        let request = PaginationRequest::new().with_page("3").with_per_page("25");
        rt.block_on(async {
            pages
                .server_pagination_filtering_for(&request)
                .await
                .expect("Failed to warm cache");
        });
        b.to_async(&rt)
            .iter(|| async { pages.server_pagination_filtering_for(black_box(&request)).await });
    });

    group.finish();
}

// ============================================================================
// Group 3: Namespace Invalidation
// ============================================================================

fn clear_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("namespace_clear");
    let rt = tokio::runtime::Runtime::new().expect("Failed to create Tokio runtime");

    for entries in [10usize, 100, 1_000].iter() {
        group
            .throughput(Throughput::Elements(*entries as u64))
            .bench_with_input(BenchmarkId::new("clear", entries), entries, |b, &entries| {
                let backend = InMemoryBackend::new();
                let cache = NamespacedCache::new(backend.clone(), CacheConfig::default())
                    .expect("Failed to build cache");
                b.to_async(&rt).iter(|| async {
                    // Setup: refill the namespace before each clear
                    for i in 0..entries {
                        backend
                            .set(&format!("pages:en:count_all:[{}]", i), vec![1u8; 64], None)
                            .await
                            .expect("Failed to set");
                    }
                    cache.clear().await
                });
            });
    }

    group.finish();
}

criterion_group!(benches, key_benchmarks, read_benchmarks, clear_benchmarks);
criterion_main!(benches);
