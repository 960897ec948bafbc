//! Mapping from raw app templates to the display model.

use crate::models::AppTemplate;
use nexent_core::{AppId, Money, ResourceKind, ResourceSpec};
use serde::Serialize;
use std::fmt;

/// Glyph shown for apps without a usable icon.
pub const FALLBACK_ICON: &str = "📦";

/// Category used when a template carries no category labels.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Install-time label when the template gives no estimate.
pub const UNKNOWN_INSTALL_TIME: &str = "Varies";

/// How an app is represented visually.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Icon {
    /// Image URL or path.
    Image(String),
    /// Inline glyph such as an emoji.
    Glyph(String),
}

impl Icon {
    /// Classify a raw `logo_url` value.
    #[must_use]
    pub fn from_logo(logo: Option<&str>) -> Self {
        match logo.map(str::trim) {
            Some(value) if value.is_empty() => Self::fallback(),
            Some(value) if looks_like_image_ref(value) => Self::Image(value.to_string()),
            Some(value) => Self::Glyph(value.to_string()),
            None => Self::fallback(),
        }
    }

    fn fallback() -> Self {
        Self::Glyph(FALLBACK_ICON.to_string())
    }
}

impl fmt::Display for Icon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Image(url) | Self::Glyph(url) => f.write_str(url),
        }
    }
}

fn looks_like_image_ref(value: &str) -> bool {
    value.contains('/') || value.starts_with("data:")
}

/// Canonical, display-ready view of an app template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayApp {
    /// Template identifier.
    pub id: AppId,
    /// Display name.
    pub name: String,
    /// Icon reference.
    pub icon: Icon,
    /// Short description.
    pub description: String,
    /// Long description.
    pub long_description: String,
    /// Primary category.
    pub category: String,
    /// Search tags.
    pub tags: Vec<String>,
    /// Install-time label such as `< 3 min`.
    pub install_time: String,
    /// Minimum resources.
    pub specs: ResourceSpec,
    /// Feature names.
    pub features: Vec<String>,
    /// Base monthly price.
    pub monthly_price: Money,
    /// Ranking score.
    pub popularity: u32,
}

/// Normalize a template into its display model.
#[must_use]
pub fn normalize(template: &AppTemplate) -> DisplayApp {
    let description = template
        .short_description
        .clone()
        .or_else(|| template.description.clone())
        .unwrap_or_default();
    let long_description = template
        .description
        .clone()
        .unwrap_or_else(|| description.clone());

    let category = template
        .categories
        .first()
        .cloned()
        .unwrap_or_else(|| FALLBACK_CATEGORY.to_string());

    let tags = if template.tags.is_empty() {
        template
            .categories
            .iter()
            .map(|label| label.to_lowercase())
            .collect()
    } else {
        template.tags.clone()
    };

    DisplayApp {
        id: template.uid.clone(),
        name: template.name.clone(),
        icon: Icon::from_logo(template.logo_url.as_deref()),
        description,
        long_description,
        category,
        tags,
        install_time: install_time_label(template.setup_time_minutes),
        specs: minimum_resources(template),
        features: template.features.iter().map(|f| f.name.clone()).collect(),
        monthly_price: template.price.map_or(Money::ZERO, Money::from_dollars),
        popularity: template.popularity.unwrap_or(0),
    }
}

/// Minimum resources a template declares, with defaults for absent entries.
#[must_use]
pub fn minimum_resources(template: &AppTemplate) -> ResourceSpec {
    let mut spec = ResourceSpec::DEFAULT_MINIMUMS;
    for kind in ResourceKind::ALL {
        if let Some(req) = template.requirement(kind.requirement_name()) {
            spec.set(kind, whole_units(req.quantity));
        }
    }
    spec
}

/// Format a setup-time estimate as shown on catalog cards.
#[must_use]
pub fn install_time_label(minutes: Option<u32>) -> String {
    match minutes {
        Some(minutes) => format!("< {} min", minutes.max(1)),
        None => UNKNOWN_INSTALL_TIME.to_string(),
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_units(quantity: f64) -> u32 {
    if !quantity.is_finite() || quantity <= 0.0 {
        return 0;
    }
    let rounded = quantity.ceil();
    if rounded >= f64::from(u32::MAX) {
        u32::MAX
    } else {
        rounded as u32
    }
}
