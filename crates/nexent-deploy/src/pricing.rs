//! Linear resource pricing.
//!
//! Two tariffs exist side by side: the one behind catalog cards and the
//! deploy dialog, and the cheaper one used by the standalone calculator.
//! Callers always name the table they price against.

use nexent_core::{Error, Money, ResourceKind, ResourceSpec, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Per-unit monthly rates for each resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateTable {
    /// Table name.
    pub name: &'static str,
    /// Per vCPU core.
    pub vcpu: Money,
    /// Per GB of RAM.
    pub ram: Money,
    /// Per GB of storage.
    pub storage: Money,
    /// Per GB of monthly bandwidth.
    pub bandwidth: Money,
}

impl RateTable {
    /// Rates used by catalog cards and the deploy dialog.
    pub const CATALOG: Self = Self {
        name: "catalog",
        vcpu: Money::from_cents(1000),
        ram: Money::from_cents(500),
        storage: Money::from_cents(50),
        bandwidth: Money::from_cents(5),
    };

    /// Rates used by the standalone pricing calculator.
    pub const CALCULATOR: Self = Self {
        name: "calculator",
        vcpu: Money::from_cents(800),
        ram: Money::from_cents(400),
        storage: Money::from_cents(10),
        bandwidth: Money::from_cents(1),
    };

    /// Rate for one unit of `kind`.
    #[must_use]
    pub const fn rate(&self, kind: ResourceKind) -> Money {
        match kind {
            ResourceKind::Vcpu => self.vcpu,
            ResourceKind::Ram => self.ram,
            ResourceKind::Storage => self.storage,
            ResourceKind::Bandwidth => self.bandwidth,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::CATALOG
    }
}

impl FromStr for RateTable {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "catalog" => Ok(Self::CATALOG),
            "calculator" => Ok(Self::CALCULATOR),
            _ => Err(Error::InvalidRequest(format!("Unknown rate table: {s}"))),
        }
    }
}

/// Monthly cost of `spec` under `rates`.
#[must_use]
pub fn price(spec: &ResourceSpec, rates: &RateTable) -> Money {
    ResourceKind::ALL
        .iter()
        .map(|kind| rates.rate(*kind).times(spec.get(*kind)))
        .sum()
}

/// Raise each resource of `spec` to at least its minimum.
#[must_use]
pub fn clamp(spec: &ResourceSpec, minimums: &ResourceSpec) -> ResourceSpec {
    spec.clamped_to(minimums)
}

/// One priced resource of a [`CostBreakdown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CostLine {
    /// Resource priced.
    pub kind: ResourceKind,
    /// Quantity requested.
    pub quantity: u32,
    /// Rate per unit.
    pub rate: Money,
    /// `quantity * rate`.
    pub amount: Money,
}

impl fmt::Display for CostLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} {} × {} = {}",
            self.kind.label(),
            self.quantity,
            self.kind.unit(),
            self.rate,
            self.amount
        )
    }
}

/// Per-resource costs plus their total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CostBreakdown {
    /// Line items in display order.
    pub lines: Vec<CostLine>,
    /// Sum of all line amounts.
    pub total: Money,
}

impl CostBreakdown {
    /// Price every resource of `spec` under `rates`.
    #[must_use]
    pub fn compute(spec: &ResourceSpec, rates: &RateTable) -> Self {
        let lines: Vec<CostLine> = ResourceKind::ALL
            .iter()
            .map(|kind| {
                let quantity = spec.get(*kind);
                let rate = rates.rate(*kind);
                CostLine {
                    kind: *kind,
                    quantity,
                    rate,
                    amount: rate.times(quantity),
                }
            })
            .collect();
        let total = lines.iter().map(|line| line.amount).sum();
        Self { lines, total }
    }

    /// Line for a single resource.
    #[must_use]
    pub fn line(&self, kind: ResourceKind) -> Option<&CostLine> {
        self.lines.iter().find(|line| line.kind == kind)
    }
}

impl fmt::Display for CostBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in &self.lines {
            writeln!(f, "{line}")?;
        }
        write!(f, "Total: {}/month", self.total)
    }
}

/// Range and step of a resource slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SliderBounds {
    /// Lowest selectable value.
    pub min: u32,
    /// Highest selectable value.
    pub max: u32,
    /// Increment between selectable values.
    pub step: u32,
}

impl SliderBounds {
    /// Bounds with the given range and step.
    #[must_use]
    pub const fn new(min: u32, max: u32, step: u32) -> Self {
        Self { min, max, step }
    }

    /// Whether `value` lies within the range.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Bring `value` into range, then snap it down onto the step grid.
    #[must_use]
    pub fn constrain(&self, value: u32) -> u32 {
        let value = value.clamp(self.min, self.max.max(self.min));
        if self.step <= 1 {
            return value;
        }
        self.min + (value - self.min) / self.step * self.step
    }
}

/// Slider range for `kind` in the deploy dialog given the app's minimum.
///
/// The upper bound is a presentation hint; only the lower bound is enforced.
#[must_use]
pub fn deploy_slider_bounds(kind: ResourceKind, minimum: u32) -> SliderBounds {
    let (scale, floor) = match kind {
        ResourceKind::Vcpu => (4, 16),
        ResourceKind::Ram => (8, 64),
        ResourceKind::Storage => (10, 500),
        ResourceKind::Bandwidth => (20, 1000),
    };
    SliderBounds::new(minimum, minimum.saturating_mul(scale).max(floor), 1)
}

/// Fixed slider range for `kind` in the standalone calculator.
#[must_use]
pub const fn calculator_slider_bounds(kind: ResourceKind) -> SliderBounds {
    match kind {
        ResourceKind::Vcpu => SliderBounds::new(1, 16, 1),
        ResourceKind::Ram => SliderBounds::new(1, 64, 1),
        ResourceKind::Storage => SliderBounds::new(20, 1000, 10),
        ResourceKind::Bandwidth => SliderBounds::new(1000, 10000, 100),
    }
}

/// The standalone pricing surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceCalculator {
    spec: ResourceSpec,
    rates: RateTable,
}

impl PriceCalculator {
    /// Starting configuration.
    pub const INITIAL: ResourceSpec = ResourceSpec::new(1, 1, 20, 1000);

    /// Calculator at its starting configuration with calculator rates.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            spec: Self::INITIAL,
            rates: RateTable::CALCULATOR,
        }
    }

    /// Price against a different table.
    #[must_use]
    pub const fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }

    /// Set one resource; returns the value actually stored.
    pub fn set(&mut self, kind: ResourceKind, value: u32) -> u32 {
        let stored = calculator_slider_bounds(kind).constrain(value);
        self.spec.set(kind, stored);
        stored
    }

    /// Current configuration.
    #[must_use]
    pub const fn spec(&self) -> &ResourceSpec {
        &self.spec
    }

    /// Rate table in use.
    #[must_use]
    pub const fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Monthly total.
    #[must_use]
    pub fn total(&self) -> Money {
        price(&self.spec, &self.rates)
    }

    /// Monthly cost per resource.
    #[must_use]
    pub fn breakdown(&self) -> CostBreakdown {
        CostBreakdown::compute(&self.spec, &self.rates)
    }
}

impl Default for PriceCalculator {
    fn default() -> Self {
        Self::new()
    }
}
