//! Catalog query engine: search, category filtering and popularity ranking.

use crate::models::AppTemplate;
use crate::normalize::{normalize, DisplayApp};
use crate::source::CatalogSource;
use crate::Result;
use nexent_core::AppId;
use tracing::debug;

/// Category selector that matches every app.
pub const ALL_CATEGORIES: &str = "All";

/// Number of apps shown in the featured strip.
pub const DEFAULT_FEATURED_COUNT: usize = 8;

/// A normalized collection of apps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    apps: Vec<DisplayApp>,
}

impl Catalog {
    /// Wrap already-normalized apps.
    #[must_use]
    pub const fn new(apps: Vec<DisplayApp>) -> Self {
        Self { apps }
    }

    /// Normalize raw templates into a catalog.
    #[must_use]
    pub fn from_templates(templates: &[AppTemplate]) -> Self {
        Self::new(templates.iter().map(normalize).collect())
    }

    /// Fetch from a source and normalize.
    pub async fn load<S>(source: &S, featured_only: bool) -> Result<Self>
    where
        S: CatalogSource + ?Sized,
    {
        let templates = source.fetch(featured_only).await?;
        debug!(count = templates.len(), featured_only, "Normalizing catalog");
        Ok(Self::from_templates(&templates))
    }

    /// Apps in source order.
    #[must_use]
    pub fn apps(&self) -> &[DisplayApp] {
        &self.apps
    }

    /// Number of apps.
    #[must_use]
    pub fn len(&self) -> usize {
        self.apps.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apps.is_empty()
    }

    /// Look an app up by identifier.
    #[must_use]
    pub fn find(&self, id: &AppId) -> Option<&DisplayApp> {
        self.apps.iter().find(|app| &app.id == id)
    }

    /// Apps in `category` (or any, for [`ALL_CATEGORIES`]) whose name, short
    /// description or tags contain `query`, case-insensitively.
    #[must_use]
    pub fn filter(&self, query: &str, category: &str) -> Vec<DisplayApp> {
        let needle = query.to_lowercase();
        self.apps
            .iter()
            .filter(|app| category == ALL_CATEGORIES || app.category == category)
            .filter(|app| needle.is_empty() || matches_query(app, &needle))
            .cloned()
            .collect()
    }

    /// Filtered apps, most popular first.
    #[must_use]
    pub fn search(&self, query: &str, category: &str) -> Vec<DisplayApp> {
        sort_by_popularity(&self.filter(query, category))
    }

    /// [`ALL_CATEGORIES`] followed by each distinct category, first seen first.
    #[must_use]
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for app in &self.apps {
            if !categories.contains(&app.category) {
                categories.push(app.category.clone());
            }
        }
        categories
    }

    /// The `count` most popular apps.
    #[must_use]
    pub fn featured(&self, count: usize) -> Vec<DisplayApp> {
        top_n(&sort_by_popularity(&self.apps), count)
    }
}

fn matches_query(app: &DisplayApp, needle: &str) -> bool {
    app.name.to_lowercase().contains(needle)
        || app.description.to_lowercase().contains(needle)
        || app.tags.iter().any(|tag| tag.to_lowercase().contains(needle))
}

/// Stable descending sort by popularity.
#[must_use]
pub fn sort_by_popularity(apps: &[DisplayApp]) -> Vec<DisplayApp> {
    let mut sorted = apps.to_vec();
    sorted.sort_by(|a, b| b.popularity.cmp(&a.popularity));
    sorted
}

/// The first `n` apps.
#[must_use]
pub fn top_n(apps: &[DisplayApp], n: usize) -> Vec<DisplayApp> {
    apps.iter().take(n).cloned().collect()
}
