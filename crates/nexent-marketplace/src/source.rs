//! Catalog sources and the freshness-cached wrapper around them.

use crate::models::AppTemplate;
use crate::Result;
use async_trait::async_trait;
use nexent_core::cache::TimedCache;
use nexent_core::config::CatalogCacheConfig;
use nexent_core::Error;
use std::sync::RwLock;
use tracing::{debug, info};

/// Uniform access to raw app-template records.
///
/// Implementations fail with [`Error::SourceUnavailable`] when the records
/// cannot be fetched or decoded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSource: Send + Sync {
    /// Fetch every template, or only the provider-curated featured subset.
    async fn fetch(&self, featured_only: bool) -> Result<Vec<AppTemplate>>;
}

/// A [`CatalogSource`] that reuses fetched results for a bounded window.
///
/// The full catalog and the featured subset are cached independently.
pub struct CachedCatalog<S> {
    source: S,
    all: RwLock<TimedCache<Vec<AppTemplate>>>,
    featured: RwLock<TimedCache<Vec<AppTemplate>>>,
    refresh_on_focus: bool,
}

impl<S: CatalogSource> CachedCatalog<S> {
    /// Wrap a source using the given cache settings.
    #[must_use]
    pub fn new(source: S, config: CatalogCacheConfig) -> Self {
        Self {
            source,
            all: RwLock::new(TimedCache::new(config.ttl())),
            featured: RwLock::new(TimedCache::new(config.ttl())),
            refresh_on_focus: config.refresh_on_focus,
        }
    }

    /// Borrow the wrapped source.
    #[must_use]
    pub const fn source(&self) -> &S {
        &self.source
    }

    fn slot(&self, featured_only: bool) -> &RwLock<TimedCache<Vec<AppTemplate>>> {
        if featured_only {
            &self.featured
        } else {
            &self.all
        }
    }

    fn fresh(&self, featured_only: bool) -> Result<Option<Vec<AppTemplate>>> {
        let cache = self
            .slot(featured_only)
            .read()
            .map_err(|_| Error::CacheError("catalog cache lock poisoned".to_string()))?;
        Ok(cache.get().cloned())
    }

    fn store(&self, featured_only: bool, templates: Vec<AppTemplate>) -> Result<()> {
        let mut cache = self
            .slot(featured_only)
            .write()
            .map_err(|_| Error::CacheError("catalog cache lock poisoned".to_string()))?;
        cache.store(templates);
        Ok(())
    }

    /// Whether the next fetch for this subset will hit the source.
    #[must_use]
    pub fn is_stale(&self, featured_only: bool) -> bool {
        self.slot(featured_only)
            .read()
            .map_or(true, |cache| cache.is_stale())
    }

    /// Drop both cached subsets.
    pub fn invalidate(&self) {
        for slot in [&self.all, &self.featured] {
            if let Ok(mut cache) = slot.write() {
                cache.invalidate();
            }
        }
    }

    /// Window-focus hook: drops cached results when refresh-on-focus is enabled.
    ///
    /// Returns whether the cache was invalidated.
    pub fn on_focus(&self) -> bool {
        if self.refresh_on_focus {
            debug!("Focus regained, invalidating catalog cache");
            self.invalidate();
        }
        self.refresh_on_focus
    }
}

#[async_trait]
impl<S: CatalogSource> CatalogSource for CachedCatalog<S> {
    async fn fetch(&self, featured_only: bool) -> Result<Vec<AppTemplate>> {
        if let Some(templates) = self.fresh(featured_only)? {
            debug!(featured_only, count = templates.len(), "Catalog cache hit");
            return Ok(templates);
        }

        let templates = self.source.fetch(featured_only).await?;
        info!(featured_only, count = templates.len(), "Catalog refreshed");
        self.store(featured_only, templates.clone())?;
        Ok(templates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::predicate::eq;
    use nexent_core::AppId;

    fn template(id: &str) -> AppTemplate {
        serde_json::from_value(serde_json::json!({ "uid": id, "name": id })).unwrap()
    }

    #[tokio::test]
    async fn second_fetch_is_served_from_cache() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch()
            .with(eq(false))
            .times(1)
            .returning(|_| Ok(vec![template("wordpress")]));

        let cached = CachedCatalog::new(source, CatalogCacheConfig::new());
        assert!(cached.is_stale(false));

        let first = cached.fetch(false).await.unwrap();
        let second = cached.fetch(false).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(second[0].uid, AppId::new("wordpress"));
        assert!(!cached.is_stale(false));
    }

    #[tokio::test]
    async fn featured_and_full_catalog_cached_separately() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch()
            .with(eq(true))
            .times(1)
            .returning(|_| Ok(vec![template("ghost")]));
        source
            .expect_fetch()
            .with(eq(false))
            .times(1)
            .returning(|_| Ok(vec![template("ghost"), template("n8n")]));

        let cached = CachedCatalog::new(source, CatalogCacheConfig::new());
        assert_eq!(cached.fetch(true).await.unwrap().len(), 1);
        assert_eq!(cached.fetch(false).await.unwrap().len(), 2);
        assert_eq!(cached.fetch(true).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let mut source = MockCatalogSource::new();
        let mut calls = 0;
        source.expect_fetch().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(Error::SourceUnavailable("offline".to_string()))
            } else {
                Ok(vec![template("grafana")])
            }
        });

        let cached = CachedCatalog::new(source, CatalogCacheConfig::new());
        let err = cached.fetch(false).await.unwrap_err();
        assert!(matches!(err, Error::SourceUnavailable(_)));
        assert!(cached.is_stale(false));

        assert_eq!(cached.fetch(false).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn focus_invalidates_only_when_enabled() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch()
            .times(2)
            .returning(|_| Ok(vec![template("jenkins")]));

        let cached = CachedCatalog::new(
            source,
            CatalogCacheConfig::new().with_refresh_on_focus(true),
        );
        cached.fetch(false).await.unwrap();
        assert!(cached.on_focus());
        assert!(cached.is_stale(false));
        cached.fetch(false).await.unwrap();
    }

    #[tokio::test]
    async fn focus_keeps_cache_by_default() {
        let mut source = MockCatalogSource::new();
        source
            .expect_fetch()
            .times(1)
            .returning(|_| Ok(vec![template("odoo")]));

        let cached = CachedCatalog::new(source, CatalogCacheConfig::new());
        cached.fetch(false).await.unwrap();
        assert!(!cached.on_focus());
        cached.fetch(false).await.unwrap();
    }
}
