//! Catalog models as delivered by the remote app-template API.

use chrono::{DateTime, Utc};
use nexent_core::query::QueryParams;
use nexent_core::AppId;
use serde::{Deserialize, Serialize};

/// An app template as returned by the catalog API.
///
/// Fields the source may omit are optional; defaults are applied by the
/// normalizer, never during parsing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppTemplate {
    /// Template identifier.
    pub uid: AppId,
    /// Display name.
    pub name: String,
    /// Logo URL or inline glyph.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    /// Full description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One-line description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    /// Whether the template is active.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Whether the template is publicly listed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    /// Estimated setup time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setup_time_minutes: Option<u32>,
    /// Source repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository: Option<String>,
    /// Billing cycle of the base price.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_cycle: Option<BillingCycle>,
    /// Base price in dollars.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Creation timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Last update timestamp.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Minimum resource requirements.
    #[serde(default)]
    pub minimum_requirements: Vec<MinimumRequirement>,
    /// Category labels; the first one is the primary category.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Named features.
    #[serde(default)]
    pub features: Vec<Feature>,
    /// Search tags, when the source provides them.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Popularity score used only for ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub popularity: Option<u32>,
}

impl AppTemplate {
    /// First requirement entry with exactly the given name.
    #[must_use]
    pub fn requirement(&self, name: &str) -> Option<&MinimumRequirement> {
        self.minimum_requirements.iter().find(|req| req.name == name)
    }
}

/// A named minimum resource requirement.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MinimumRequirement {
    /// Resource name (`cpu`, `memory`, `storage`, `bandwidth`).
    pub name: String,
    /// Required quantity.
    pub quantity: f64,
    /// Unit of the quantity.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Human-readable name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Cost per unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
}

/// A named feature of an app.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Feature {
    /// Feature name.
    pub name: String,
    /// Longer description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Billing cycle for a template's base price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    /// Billed hourly.
    Hourly,
    /// Billed monthly.
    Monthly,
    /// Billed yearly.
    Yearly,
    /// Any cycle this client does not know.
    #[serde(other)]
    Other,
}

/// `{ "data": [...] }` envelope used by the catalog API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataEnvelope<T> {
    /// Wrapped payload.
    pub data: T,
}

/// Query parameters for listing app templates.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AppTemplateListParams {
    /// Restrict to the provider-curated featured subset.
    pub featured: bool,
}

impl AppTemplateListParams {
    /// Parameters for the featured subset.
    #[must_use]
    pub const fn featured() -> Self {
        Self { featured: true }
    }

    /// Convert the parameters into URL query pairs.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut params = QueryParams::new();
        params.push("featured-apps", self.featured);
        params.into_pairs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_params_always_send_featured_flag() {
        assert_eq!(
            AppTemplateListParams::default().to_pairs(),
            vec![("featured-apps", "false".to_string())]
        );
        assert_eq!(
            AppTemplateListParams::featured().to_pairs(),
            vec![("featured-apps", "true".to_string())]
        );
    }

    #[test]
    fn minimal_template_parses_without_optional_fields() {
        let template: AppTemplate =
            serde_json::from_value(json!({ "uid": "tpl-1", "name": "Bare" })).unwrap();

        assert_eq!(template.uid, AppId::new("tpl-1"));
        assert!(template.logo_url.is_none());
        assert!(template.price.is_none());
        assert!(template.minimum_requirements.is_empty());
        assert!(template.categories.is_empty());
        assert!(template.popularity.is_none());
    }

    #[test]
    fn unknown_billing_cycle_maps_to_other() {
        let template: AppTemplate = serde_json::from_value(json!({
            "uid": "tpl-2",
            "name": "Odd",
            "billing_cycle": "fortnightly"
        }))
        .unwrap();
        assert_eq!(template.billing_cycle, Some(BillingCycle::Other));
    }

    #[test]
    fn requirement_lookup_takes_first_match() {
        let template: AppTemplate = serde_json::from_value(json!({
            "uid": "tpl-3",
            "name": "Dup",
            "minimum_requirements": [
                { "name": "cpu", "quantity": 2 },
                { "name": "cpu", "quantity": 8 }
            ]
        }))
        .unwrap();

        assert_eq!(template.requirement("cpu").map(|r| r.quantity), Some(2.0));
        assert!(template.requirement("CPU").is_none());
    }
}
