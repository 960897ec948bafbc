//! Core marketplace domain types.
//!
//! This module provides the identifiers, resource quantities and monetary
//! amounts shared by the catalog, pricing and deployment crates.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Opaque identifier of an app template, as issued by the catalog source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    /// Wrap a raw identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AppId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The four billable resources of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    /// Virtual CPU cores
    Vcpu,
    /// Memory in GB
    Ram,
    /// Disk storage in GB
    Storage,
    /// Monthly transfer in GB
    Bandwidth,
}

impl ResourceKind {
    /// All resources in display order.
    pub const ALL: [Self; 4] = [Self::Vcpu, Self::Ram, Self::Storage, Self::Bandwidth];

    /// Name used by minimum-requirement entries of the catalog source.
    #[must_use]
    pub const fn requirement_name(&self) -> &'static str {
        match self {
            Self::Vcpu => "cpu",
            Self::Ram => "memory",
            Self::Storage => "storage",
            Self::Bandwidth => "bandwidth",
        }
    }

    /// Short human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Vcpu => "vCPU",
            Self::Ram => "RAM",
            Self::Storage => "Storage",
            Self::Bandwidth => "Bandwidth",
        }
    }

    /// Unit the quantity is expressed in.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::Vcpu => "cores",
            Self::Ram | Self::Storage => "GB",
            Self::Bandwidth => "GB/month",
        }
    }

    /// Minimum assumed when a template does not declare one.
    #[must_use]
    pub const fn default_minimum(&self) -> u32 {
        match self {
            Self::Vcpu | Self::Ram => 1,
            Self::Storage => 5,
            Self::Bandwidth => 50,
        }
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "vcpu" | "cpu" => Ok(Self::Vcpu),
            "ram" | "memory" => Ok(Self::Ram),
            "storage" => Ok(Self::Storage),
            "bandwidth" => Ok(Self::Bandwidth),
            _ => Err(Error::InvalidRequest(format!("Unknown resource: {s}"))),
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A quadruple of compute, memory, storage and bandwidth quantities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// vCPU cores
    pub vcpu: u32,
    /// RAM in GB
    pub ram: u32,
    /// Storage in GB
    pub storage: u32,
    /// Bandwidth in GB per month
    pub bandwidth: u32,
}

impl ResourceSpec {
    /// Minimums used for any resource a template leaves undeclared.
    pub const DEFAULT_MINIMUMS: Self = Self::new(
        ResourceKind::Vcpu.default_minimum(),
        ResourceKind::Ram.default_minimum(),
        ResourceKind::Storage.default_minimum(),
        ResourceKind::Bandwidth.default_minimum(),
    );

    /// Create a spec from explicit quantities.
    #[must_use]
    pub const fn new(vcpu: u32, ram: u32, storage: u32, bandwidth: u32) -> Self {
        Self {
            vcpu,
            ram,
            storage,
            bandwidth,
        }
    }

    /// Quantity of a single resource.
    #[must_use]
    pub const fn get(&self, kind: ResourceKind) -> u32 {
        match kind {
            ResourceKind::Vcpu => self.vcpu,
            ResourceKind::Ram => self.ram,
            ResourceKind::Storage => self.storage,
            ResourceKind::Bandwidth => self.bandwidth,
        }
    }

    /// Overwrite a single resource.
    pub fn set(&mut self, kind: ResourceKind, value: u32) {
        match kind {
            ResourceKind::Vcpu => self.vcpu = value,
            ResourceKind::Ram => self.ram = value,
            ResourceKind::Storage => self.storage = value,
            ResourceKind::Bandwidth => self.bandwidth = value,
        }
    }

    /// Return a copy with one resource replaced.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, value: u32) -> Self {
        self.set(kind, value);
        self
    }

    /// Raise every resource to at least the corresponding minimum.
    #[must_use]
    pub fn clamped_to(&self, minimums: &Self) -> Self {
        Self {
            vcpu: self.vcpu.max(minimums.vcpu),
            ram: self.ram.max(minimums.ram),
            storage: self.storage.max(minimums.storage),
            bandwidth: self.bandwidth.max(minimums.bandwidth),
        }
    }

    /// Whether every resource meets the corresponding minimum.
    #[must_use]
    pub fn satisfies(&self, minimums: &Self) -> bool {
        ResourceKind::ALL
            .iter()
            .all(|kind| self.get(*kind) >= minimums.get(*kind))
    }
}

impl Default for ResourceSpec {
    fn default() -> Self {
        Self::DEFAULT_MINIMUMS
    }
}

/// An exact amount of US dollars, stored in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero dollars.
    pub const ZERO: Self = Self(0);

    /// Create an amount from whole cents.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Create an amount from a dollar figure, rounded to the nearest cent.
    ///
    /// Negative and non-finite inputs yield zero.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() || dollars <= 0.0 {
            return Self::ZERO;
        }
        Self((dollars * 100.0).round() as u64)
    }

    /// Amount in cents.
    #[must_use]
    pub const fn cents(&self) -> u64 {
        self.0
    }

    /// Amount in dollars.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_dollars(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Multiply a per-unit amount by a quantity.
    #[must_use]
    pub const fn times(&self, quantity: u32) -> Self {
        Self(self.0.saturating_mul(quantity as u64))
    }
}

impl Add for Money {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}.{:02}", self.0 / 100, self.0 % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_kind_requirement_names() {
        assert_eq!(ResourceKind::Vcpu.requirement_name(), "cpu");
        assert_eq!(ResourceKind::Ram.requirement_name(), "memory");
        assert_eq!(ResourceKind::Storage.requirement_name(), "storage");
        assert_eq!(ResourceKind::Bandwidth.requirement_name(), "bandwidth");
    }

    #[test]
    fn test_resource_kind_from_str() {
        assert_eq!("cpu".parse::<ResourceKind>().unwrap(), ResourceKind::Vcpu);
        assert_eq!("VCPU".parse::<ResourceKind>().unwrap(), ResourceKind::Vcpu);
        assert_eq!("memory".parse::<ResourceKind>().unwrap(), ResourceKind::Ram);
        assert!("gpu".parse::<ResourceKind>().is_err());
    }

    #[test]
    fn test_default_minimums() {
        assert_eq!(ResourceSpec::default(), ResourceSpec::new(1, 1, 5, 50));
    }

    #[test]
    fn test_spec_get_set() {
        let mut spec = ResourceSpec::new(1, 2, 3, 4);
        spec.set(ResourceKind::Storage, 30);
        assert_eq!(spec.get(ResourceKind::Storage), 30);
        assert_eq!(spec.with(ResourceKind::Vcpu, 8).vcpu, 8);
    }

    #[test]
    fn test_spec_clamped_to_raises_only() {
        let minimums = ResourceSpec::new(2, 4, 20, 100);
        let spec = ResourceSpec::new(1, 8, 10, 500);

        let clamped = spec.clamped_to(&minimums);
        assert_eq!(clamped, ResourceSpec::new(2, 8, 20, 500));
        assert!(clamped.satisfies(&minimums));
        assert!(!spec.satisfies(&minimums));
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_cents(2000).to_string(), "$20.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(12345).to_string(), "$123.45");
    }

    #[test]
    fn test_money_from_dollars() {
        assert_eq!(Money::from_dollars(12.0), Money::from_cents(1200));
        assert_eq!(Money::from_dollars(0.125), Money::from_cents(13));
        assert_eq!(Money::from_dollars(-3.0), Money::ZERO);
        assert_eq!(Money::from_dollars(f64::NAN), Money::ZERO);
    }

    #[test]
    fn test_money_arithmetic() {
        let total: Money = [Money::from_cents(150), Money::from_cents(50)]
            .into_iter()
            .sum();
        assert_eq!(total, Money::from_cents(200));
        assert_eq!(Money::from_cents(5).times(1000), Money::from_cents(5000));
    }

    #[test]
    fn test_app_id_serializes_transparently() {
        let id = AppId::new("wordpress");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"wordpress\"");
        assert_eq!(id.to_string(), "wordpress");
    }
}
