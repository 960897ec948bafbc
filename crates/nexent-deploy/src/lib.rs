//! Deployment configuration for the Nexent marketplace.
//!
//! - [`pricing`] - rate tables, cost breakdowns and slider bounds
//! - [`route`] - the `action=deploy&id=...` query-string contract
//! - [`session`] - the per-app deployment configuration state machine

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod pricing;
pub mod route;
pub mod session;

pub use pricing::{
    calculator_slider_bounds, clamp, deploy_slider_bounds, price, CostBreakdown, CostLine,
    PriceCalculator, RateTable, SliderBounds,
};
pub use route::DeployRoute;
pub use session::{
    Adjustment, DeploymentConfig, DeploymentSession, EnvVarField, EnvironmentVariable,
    MAX_APP_NAME_LEN,
};

/// Result alias over the shared error type.
pub type Result<T> = nexent_core::Result<T>;
