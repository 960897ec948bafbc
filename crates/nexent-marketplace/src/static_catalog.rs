//! Bundled catalog used when no remote catalog API is configured.

use crate::catalog::DEFAULT_FEATURED_COUNT;
use crate::models::{AppTemplate, BillingCycle, Feature, MinimumRequirement};
use crate::source::CatalogSource;
use crate::Result;
use async_trait::async_trait;
use nexent_core::{AppId, ResourceKind, ResourceSpec};

/// In-memory catalog of app templates.
///
/// Popularity scores are curated with the bundled data. The featured subset
/// is the most popular entries, in popularity order.
#[derive(Debug, Clone)]
pub struct StaticCatalog {
    templates: Vec<AppTemplate>,
    featured_count: usize,
}

impl StaticCatalog {
    /// Catalog over arbitrary templates.
    #[must_use]
    pub const fn new(templates: Vec<AppTemplate>) -> Self {
        Self {
            templates,
            featured_count: DEFAULT_FEATURED_COUNT,
        }
    }

    /// Catalog over the bundled app templates.
    #[must_use]
    pub fn bundled() -> Self {
        Self::new(bundled_templates())
    }

    /// Override how many entries the featured subset holds.
    #[must_use]
    pub const fn with_featured_count(mut self, count: usize) -> Self {
        self.featured_count = count;
        self
    }

    /// All templates in catalog order.
    #[must_use]
    pub fn templates(&self) -> &[AppTemplate] {
        &self.templates
    }

    fn featured(&self) -> Vec<AppTemplate> {
        let mut ranked = self.templates.clone();
        ranked.sort_by_key(|template| std::cmp::Reverse(template.popularity.unwrap_or(0)));
        ranked.truncate(self.featured_count);
        ranked
    }
}

impl Default for StaticCatalog {
    fn default() -> Self {
        Self::bundled()
    }
}

#[async_trait]
impl CatalogSource for StaticCatalog {
    async fn fetch(&self, featured_only: bool) -> Result<Vec<AppTemplate>> {
        if featured_only {
            Ok(self.featured())
        } else {
            Ok(self.templates.clone())
        }
    }
}

struct Entry {
    id: &'static str,
    name: &'static str,
    icon: &'static str,
    category: &'static str,
    description: &'static str,
    long_description: &'static str,
    specs: ResourceSpec,
    monthly_price: f64,
    install_minutes: u32,
    features: [&'static str; 4],
    tags: [&'static str; 4],
    popularity: u32,
}

impl Entry {
    fn into_template(self) -> AppTemplate {
        let minimum_requirements = ResourceKind::ALL
            .iter()
            .map(|kind| MinimumRequirement {
                name: kind.requirement_name().to_string(),
                quantity: f64::from(self.specs.get(*kind)),
                unit: Some(kind.unit().to_string()),
                display_name: Some(kind.label().to_string()),
                cost: None,
            })
            .collect();

        AppTemplate {
            uid: AppId::new(self.id),
            name: self.name.to_string(),
            logo_url: Some(self.icon.to_string()),
            description: Some(self.long_description.to_string()),
            short_description: Some(self.description.to_string()),
            is_active: Some(true),
            is_public: Some(true),
            setup_time_minutes: Some(self.install_minutes),
            repository: None,
            billing_cycle: Some(BillingCycle::Monthly),
            price: Some(self.monthly_price),
            created_at: None,
            updated_at: None,
            minimum_requirements,
            categories: vec![self.category.to_string()],
            features: self
                .features
                .iter()
                .map(|name| Feature {
                    name: (*name).to_string(),
                    description: None,
                })
                .collect(),
            tags: self.tags.iter().map(|tag| (*tag).to_string()).collect(),
            popularity: Some(self.popularity),
        }
    }
}

/// The bundled app templates.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn bundled_templates() -> Vec<AppTemplate> {
    let entries = vec![
        Entry {
            id: "wordpress",
            name: "WordPress",
            icon: "📝",
            category: "CMS",
            description: "The world's most popular CMS platform",
            long_description: "Create beautiful websites, blogs, and applications with WordPress. Includes automatic updates, security patches, and optimized performance.",
            specs: ResourceSpec::new(1, 2, 20, 1000),
            monthly_price: 12.0,
            install_minutes: 2,
            features: ["Auto SSL", "Daily Backups", "CDN Included", "Plugin Support"],
            tags: ["cms", "blog", "website", "php"],
            popularity: 95,
        },
        Entry {
            id: "nextcloud",
            name: "Nextcloud",
            icon: "☁️",
            category: "Storage",
            description: "Self-hosted cloud storage and collaboration",
            long_description: "Your own private cloud storage solution with file sharing, calendar, contacts, and collaboration tools.",
            specs: ResourceSpec::new(2, 3, 100, 3000),
            monthly_price: 28.0,
            install_minutes: 3,
            features: ["End-to-End Encryption", "File Sharing", "Calendar & Contacts", "Mobile Apps"],
            tags: ["storage", "cloud", "collaboration", "privacy"],
            popularity: 88,
        },
        Entry {
            id: "gitlab",
            name: "GitLab",
            icon: "🦊",
            category: "DevOps",
            description: "Complete DevOps platform",
            long_description: "Integrated DevOps platform with Git repository management, CI/CD pipelines, issue tracking, and more.",
            specs: ResourceSpec::new(4, 8, 100, 5000),
            monthly_price: 75.0,
            install_minutes: 5,
            features: ["Git Repository", "CI/CD Pipelines", "Issue Tracking", "Container Registry"],
            tags: ["git", "devops", "ci/cd", "development"],
            popularity: 92,
        },
        Entry {
            id: "grafana",
            name: "Grafana",
            icon: "📊",
            category: "Monitoring",
            description: "Analytics and monitoring platform",
            long_description: "Visualize and monitor your applications with beautiful dashboards and alerting capabilities.",
            specs: ResourceSpec::new(2, 4, 50, 2000),
            monthly_price: 32.0,
            install_minutes: 3,
            features: ["Custom Dashboards", "Alerting", "Data Sources", "Team Collaboration"],
            tags: ["monitoring", "analytics", "dashboard", "metrics"],
            popularity: 85,
        },
        Entry {
            id: "odoo",
            name: "Odoo",
            icon: "💼",
            category: "Business",
            description: "Complete business management suite",
            long_description: "All-in-one business software including CRM, eCommerce, accounting, inventory, and project management.",
            specs: ResourceSpec::new(2, 4, 50, 2000),
            monthly_price: 35.0,
            install_minutes: 4,
            features: ["CRM", "eCommerce", "Accounting", "Inventory Management"],
            tags: ["business", "crm", "erp", "ecommerce"],
            popularity: 78,
        },
        Entry {
            id: "n8n",
            name: "n8n",
            icon: "🔄",
            category: "Automation",
            description: "Workflow automation platform",
            long_description: "Automate your workflows with a visual interface. Connect different services and create powerful automations.",
            specs: ResourceSpec::new(1, 2, 30, 1500),
            monthly_price: 18.0,
            install_minutes: 2,
            features: ["Visual Workflow Editor", "200+ Integrations", "Custom Functions", "Webhook Support"],
            tags: ["automation", "workflow", "integration", "no-code"],
            popularity: 82,
        },
        Entry {
            id: "ghost",
            name: "Ghost",
            icon: "👻",
            category: "CMS",
            description: "Modern publishing platform",
            long_description: "Professional publishing platform focused on speed, simplicity, and beautiful design for creators.",
            specs: ResourceSpec::new(1, 1, 25, 2000),
            monthly_price: 15.0,
            install_minutes: 2,
            features: ["SEO Optimized", "Newsletter Integration", "Membership Support", "Modern Editor"],
            tags: ["blog", "publishing", "newsletter", "seo"],
            popularity: 76,
        },
        Entry {
            id: "mattermost",
            name: "Mattermost",
            icon: "💬",
            category: "Communication",
            description: "Self-hosted team communication",
            long_description: "Secure, private team messaging and collaboration platform with enterprise-grade features.",
            specs: ResourceSpec::new(2, 3, 40, 2500),
            monthly_price: 25.0,
            install_minutes: 3,
            features: ["Team Messaging", "File Sharing", "Voice Calls", "Integrations"],
            tags: ["chat", "communication", "team", "collaboration"],
            popularity: 71,
        },
        Entry {
            id: "jenkins",
            name: "Jenkins",
            icon: "🔧",
            category: "DevOps",
            description: "Automation server for CI/CD",
            long_description: "Leading open-source automation server with hundreds of plugins to support building and deploying projects.",
            specs: ResourceSpec::new(3, 6, 80, 3000),
            monthly_price: 45.0,
            install_minutes: 4,
            features: ["Pipeline as Code", "1000+ Plugins", "Distributed Builds", "Blue Ocean UI"],
            tags: ["ci/cd", "automation", "build", "deployment"],
            popularity: 89,
        },
        Entry {
            id: "portainer",
            name: "Portainer",
            icon: "🐳",
            category: "DevOps",
            description: "Container management platform",
            long_description: "Lightweight management UI for Docker environments with support for Docker Swarm and Kubernetes.",
            specs: ResourceSpec::new(1, 1, 20, 1000),
            monthly_price: 10.0,
            install_minutes: 2,
            features: ["Docker Management", "Swarm Support", "User Management", "Template Library"],
            tags: ["docker", "containers", "management", "kubernetes"],
            popularity: 84,
        },
    ];

    entries.into_iter().map(Entry::into_template).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_catalog_has_unique_ids() {
        let templates = bundled_templates();
        assert_eq!(templates.len(), 10);

        let mut ids: Vec<_> = templates.iter().map(|t| t.uid.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn bundled_templates_declare_all_requirements() {
        for template in bundled_templates() {
            for kind in ResourceKind::ALL {
                assert!(
                    template.requirement(kind.requirement_name()).is_some(),
                    "{} lacks {}",
                    template.name,
                    kind.requirement_name()
                );
            }
        }
    }

    #[tokio::test]
    async fn featured_returns_top_eight_by_popularity() {
        let catalog = StaticCatalog::bundled();
        let featured = catalog.fetch(true).await.unwrap();

        assert_eq!(featured.len(), 8);
        assert_eq!(featured[0].uid, AppId::new("wordpress"));
        assert_eq!(featured[1].uid, AppId::new("gitlab"));
        assert_eq!(featured[2].uid, AppId::new("jenkins"));
        assert!(featured.iter().all(|t| t.uid != AppId::new("mattermost")));
    }

    #[tokio::test]
    async fn full_fetch_keeps_catalog_order() {
        let catalog = StaticCatalog::bundled().with_featured_count(3);
        let all = catalog.fetch(false).await.unwrap();
        assert_eq!(all.len(), 10);
        assert_eq!(all[1].uid, AppId::new("nextcloud"));
        assert_eq!(catalog.fetch(true).await.unwrap().len(), 3);
    }
}
