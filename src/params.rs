//! Typed inputs of the page repository queries.
//!
//! All of these derive `Serialize` because they take part in cache key derivation.

use crate::page::PageStatus;
use serde::{Deserialize, Serialize};

const DEFAULT_PAGE: usize = 1;
const DEFAULT_PER_PAGE: usize = 10;
const DEFAULT_ORDER_BY: &str = "id";

/// Sort direction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderWay {
    #[default]
    Asc,
    Desc,
}

impl OrderWay {
    /// Parse a query-string value; anything but "desc" sorts ascending.
    pub fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("desc") {
            OrderWay::Desc
        } else {
            OrderWay::Asc
        }
    }
}

/// Pagination, ordering and search parameters of the admin index table.
///
/// Fields hold the raw query-string values; the five of them form the cache key
/// and the whole request is forwarded unmodified to the inner repository.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationRequest {
    pub page: Option<String>,
    pub order: Option<String>,
    pub order_by: Option<String>,
    pub per_page: Option<String>,
    pub search: Option<String>,
}

impl PaginationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from decoded query pairs. Unknown names are ignored.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let mut request = PaginationRequest::default();
        for (name, value) in pairs {
            let slot = match name.as_ref() {
                "page" => &mut request.page,
                "order" => &mut request.order,
                "order_by" => &mut request.order_by,
                "per_page" => &mut request.per_page,
                "search" => &mut request.search,
                _ => continue,
            };
            *slot = Some(value.into());
        }
        request
    }

    pub fn with_page(mut self, page: impl Into<String>) -> Self {
        self.page = Some(page.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_order_by(mut self, order_by: impl Into<String>) -> Self {
        self.order_by = Some(order_by.into());
        self
    }

    pub fn with_per_page(mut self, per_page: impl Into<String>) -> Self {
        self.per_page = Some(per_page.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Requested page number, at least 1.
    pub fn page_number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PAGE)
    }

    /// Requested page size, at least 1.
    pub fn per_page_number(&self) -> usize {
        self.per_page
            .as_deref()
            .and_then(|p| p.trim().parse::<usize>().ok())
            .filter(|p| *p > 0)
            .unwrap_or(DEFAULT_PER_PAGE)
    }

    pub fn order_by_field(&self) -> &str {
        self.order_by
            .as_deref()
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_ORDER_BY)
    }

    pub fn order_way(&self) -> OrderWay {
        self.order.as_deref().map(OrderWay::parse).unwrap_or_default()
    }

    /// Search term, `None` when absent or blank.
    pub fn search_term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Filters recognized by `get_items_by` and `get_item`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageFilter {
    /// Column the `get_item` criteria is matched against ("id" or "slug").
    pub field: Option<String>,
    pub status: Option<PageStatus>,
    pub is_home: Option<bool>,
    /// Case-insensitive match on title or slug.
    pub search: Option<String>,
    /// Restrict slug, status and search matching to one locale.
    pub locale: Option<String>,
}

/// Explicit ordering for `get_items_by`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemOrder {
    pub field: String,
    pub way: OrderWay,
}

/// Optional query configuration shared by the generic item operations.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemParams {
    pub filter: PageFilter,
    /// Relations to eager-load. Repositories without relations ignore it.
    pub include: Vec<String>,
    pub take: Option<usize>,
    pub page: Option<usize>,
    pub order: Option<ItemOrder>,
}

impl ItemParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: PageFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.filter.field = Some(field.into());
        self
    }

    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.filter.locale = Some(locale.into());
        self
    }

    pub fn with_status(mut self, status: PageStatus) -> Self {
        self.filter.status = Some(status);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.filter.search = Some(search.into());
        self
    }

    pub fn with_include(mut self, relation: impl Into<String>) -> Self {
        self.include.push(relation.into());
        self
    }

    pub fn with_take(mut self, take: usize) -> Self {
        self.take = Some(take);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn with_order(mut self, field: impl Into<String>, way: OrderWay) -> Self {
        self.order = Some(ItemOrder {
            field: field.into(),
            way,
        });
        self
    }
}

/// Identifies the page targeted by `get_item`, `update_by` and `delete_by`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemCriteria {
    Id(u64),
    Slug(String),
}

impl From<u64> for ItemCriteria {
    fn from(id: u64) -> Self {
        ItemCriteria::Id(id)
    }
}

impl From<&str> for ItemCriteria {
    fn from(slug: &str) -> Self {
        ItemCriteria::Slug(slug.to_string())
    }
}

impl std::fmt::Display for ItemCriteria {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ItemCriteria::Id(id) => write!(f, "id={}", id),
            ItemCriteria::Slug(slug) => write!(f, "slug={}", slug),
        }
    }
}
