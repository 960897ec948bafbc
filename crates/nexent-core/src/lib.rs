//! # nexent-core
//!
//! Core types and utilities for the Nexent cloud marketplace.
//!
//! This crate provides the shared error taxonomy, client configuration, HTTP
//! service client and the resource/money types used by the catalog and
//! deployment crates.
//!
//! ## Modules
//!
//! - [`error`] - Error taxonomy and serializable error reports
//! - [`types`] - Resource quantities, money and identifiers
//! - [`config`] - Configuration structures for marketplace clients
//! - [`client`] - HTTP client utilities and retry logic
//! - [`cache`] - Time-boxed value cache
//! - [`query`] - Query parameter builder

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod query;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::{AppId, Money, ResourceKind, ResourceSpec};
