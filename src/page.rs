//! The page entity and the shapes the page repository returns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Publication status of a page translation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    Online,
    #[default]
    Offline,
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PageStatus::Online => write!(f, "online"),
            PageStatus::Offline => write!(f, "offline"),
        }
    }
}

/// Locale-specific content of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageTranslation {
    pub title: String,
    pub slug: String,
    pub body: String,
    pub status: PageStatus,
}

impl PageTranslation {
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        body: impl Into<String>,
        status: PageStatus,
    ) -> Self {
        PageTranslation {
            title: title.into(),
            slug: slug.into(),
            body: body.into(),
            status,
        }
    }
}

/// A CMS page with one translation per locale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub id: u64,
    pub is_home: bool,
    pub template: String,
    /// Keyed by locale code ("en", "fr", ...).
    pub translations: BTreeMap<String, PageTranslation>,
}

impl Page {
    pub fn new(id: u64, template: impl Into<String>) -> Self {
        Page {
            id,
            is_home: false,
            template: template.into(),
            translations: BTreeMap::new(),
        }
    }

    pub fn with_translation(mut self, locale: impl Into<String>, translation: PageTranslation) -> Self {
        self.translations.insert(locale.into(), translation);
        self
    }

    pub fn as_homepage(mut self) -> Self {
        self.is_home = true;
        self
    }

    /// Build a page from creation/update data.
    pub fn from_data(id: u64, data: PageData) -> Self {
        Page {
            id,
            is_home: data.is_home,
            template: data.template,
            translations: data.translations,
        }
    }

    pub fn translation(&self, locale: &str) -> Option<&PageTranslation> {
        self.translations.get(locale)
    }

    pub fn is_online_in(&self, locale: &str) -> bool {
        self.translation(locale)
            .is_some_and(|t| t.status == PageStatus::Online)
    }

    /// Set the same status on every translation.
    pub fn set_status_in_all_locales(&mut self, status: PageStatus) {
        for translation in self.translations.values_mut() {
            translation.status = status;
        }
    }

    /// Title used for sorting: the given locale's, else the first available.
    pub fn sort_title(&self, locale: Option<&str>) -> &str {
        locale
            .and_then(|l| self.translation(l))
            .or_else(|| self.translations.values().next())
            .map(|t| t.title.as_str())
            .unwrap_or("")
    }

    pub fn sort_slug(&self, locale: Option<&str>) -> &str {
        locale
            .and_then(|l| self.translation(l))
            .or_else(|| self.translations.values().next())
            .map(|t| t.slug.as_str())
            .unwrap_or("")
    }
}

/// Input for `create` and `update_by`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageData {
    pub is_home: bool,
    pub template: String,
    pub translations: BTreeMap<String, PageTranslation>,
}

impl PageData {
    pub fn new(template: impl Into<String>) -> Self {
        PageData {
            template: template.into(),
            ..Default::default()
        }
    }

    /// Single-locale page data with the slug derived from the title.
    pub fn titled(locale: impl Into<String>, title: impl Into<String>) -> Self {
        let title = title.into();
        let slug = slugify(&title);
        PageData::new("default").with_translation(
            locale,
            PageTranslation::new(title, slug, "", PageStatus::Offline),
        )
    }

    pub fn with_translation(mut self, locale: impl Into<String>, translation: PageTranslation) -> Self {
        self.translations.insert(locale.into(), translation);
        self
    }

    pub fn as_homepage(mut self) -> Self {
        self.is_home = true;
        self
    }
}

fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// One page of a length-aware listing.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub items: Vec<T>,
    /// Number of matching records across all pages.
    pub total: u64,
    pub per_page: usize,
    pub current_page: usize,
}

impl<T> Paginated<T> {
    pub fn new(items: Vec<T>, total: u64, per_page: usize, current_page: usize) -> Self {
        Paginated {
            items,
            total,
            per_page,
            current_page,
        }
    }

    pub fn last_page(&self) -> usize {
        if self.per_page == 0 {
            return 1;
        }
        let pages = (self.total as usize).div_ceil(self.per_page);
        pages.max(1)
    }

    pub fn has_more_pages(&self) -> bool {
        self.current_page < self.last_page()
    }
}
