//! App marketplace catalog for the Nexent cloud.
//!
//! Provides typed app-template records, an asynchronous client for the remote
//! catalog API, a bundled static catalog, the normalizer that turns templates
//! into [`DisplayApp`]s and the query engine used by listing pages.

#![deny(missing_docs)]

pub mod catalog;
pub mod client;
pub mod models;
pub mod normalize;
pub mod source;
pub mod static_catalog;

pub use catalog::{sort_by_popularity, top_n, Catalog, ALL_CATEGORIES, DEFAULT_FEATURED_COUNT};
pub use client::{MarketplaceClient, MarketplaceClientBuilder};
pub use models::{AppTemplate, AppTemplateListParams, BillingCycle, Feature, MinimumRequirement};
pub use normalize::{minimum_resources, normalize, DisplayApp, Icon};
pub use source::{CachedCatalog, CatalogSource};
pub use static_catalog::StaticCatalog;

/// Convenient result alias that reuses the shared marketplace error type.
pub type Result<T> = nexent_core::Result<T>;
