//! Deployment configuration session.
//!
//! A session is either closed or open for exactly one app. Opening seeds a
//! fresh [`DeploymentConfig`] from the app's minimum resources; closing or
//! switching to another app discards it. Every edit reprices the
//! configuration.

use crate::pricing::{deploy_slider_bounds, CostBreakdown, RateTable, SliderBounds};
use crate::route::DeployRoute;
use crate::Result;
use nexent_core::{AppId, Error, Money, ResourceKind, ResourceSpec};
use nexent_marketplace::{normalize, AppTemplate, DisplayApp};
use serde::Serialize;
use tracing::{debug, info, warn};

/// Longest accepted application name, in characters.
pub const MAX_APP_NAME_LEN: usize = 50;

/// A single environment variable of a deployment.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EnvironmentVariable {
    /// Variable name. Empty and duplicate keys are allowed.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// Optional note shown next to the variable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EnvironmentVariable {
    /// Variable with a key and value.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            description: None,
        }
    }

    /// Attach a description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Editable part of an [`EnvironmentVariable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvVarField {
    /// The key.
    Key,
    /// The value.
    Value,
}

/// Outcome of a resource edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adjustment {
    /// Stored as requested.
    Accepted,
    /// Below the app's minimum; the minimum was stored instead.
    Clamped {
        /// Value asked for.
        requested: u32,
        /// Minimum that was stored.
        floor: u32,
    },
}

/// In-progress configuration for one app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentConfig {
    /// Requested resources, never below the app's minimums.
    pub resources: ResourceSpec,
    /// Whether the advanced controls are shown.
    pub advanced_mode: bool,
    /// Whether the app is reachable over HTTP.
    pub http_access_enabled: bool,
    /// Application name.
    pub app_name: String,
    /// Environment variables in insertion order.
    pub env_vars: Vec<EnvironmentVariable>,
}

impl DeploymentConfig {
    /// Fresh configuration seeded from an app's minimums.
    #[must_use]
    pub fn seeded(minimums: ResourceSpec) -> Self {
        Self {
            resources: minimums,
            advanced_mode: false,
            http_access_enabled: true,
            app_name: String::new(),
            env_vars: vec![EnvironmentVariable::new("NODE_ENV", "production")
                .with_description("Application environment")],
        }
    }
}

#[derive(Debug, Clone)]
struct OpenSession {
    app: DisplayApp,
    config: DeploymentConfig,
    summary: CostBreakdown,
}

impl OpenSession {
    fn reprice(&mut self, rates: &RateTable) {
        self.summary = CostBreakdown::compute(&self.config.resources, rates);
    }

    fn env_var_mut(&mut self, index: usize) -> Result<&mut EnvironmentVariable> {
        let len = self.config.env_vars.len();
        self.config
            .env_vars
            .get_mut(index)
            .ok_or_else(|| env_index_error(index, len))
    }
}

fn env_index_error(index: usize, len: usize) -> Error {
    Error::InvalidRequest(format!(
        "No environment variable at index {index} (have {len})"
    ))
}

/// Deployment configuration state machine.
#[derive(Debug, Clone)]
pub struct DeploymentSession {
    state: Option<OpenSession>,
    rates: RateTable,
}

impl DeploymentSession {
    /// Closed session pricing with [`RateTable::CATALOG`].
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: None,
            rates: RateTable::CATALOG,
        }
    }

    /// Price against a different rate table.
    #[must_use]
    pub const fn with_rates(mut self, rates: RateTable) -> Self {
        self.rates = rates;
        self
    }

    /// Whether a configuration is in progress.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// App being configured.
    #[must_use]
    pub fn app(&self) -> Option<&DisplayApp> {
        self.state.as_ref().map(|open| &open.app)
    }

    /// Identifier of the app being configured.
    #[must_use]
    pub fn app_id(&self) -> Option<&AppId> {
        self.app().map(|app| &app.id)
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> Option<&DeploymentConfig> {
        self.state.as_ref().map(|open| &open.config)
    }

    /// Minimum resources of the app being configured.
    #[must_use]
    pub fn minimums(&self) -> Option<ResourceSpec> {
        self.app().map(|app| app.specs)
    }

    /// Open the flow for `id`.
    ///
    /// Re-opening the app already open keeps its configuration; any other id
    /// starts over. An unknown id leaves the session closed.
    pub fn open(&mut self, id: &AppId, templates: &[AppTemplate]) -> Result<&DeploymentConfig> {
        if self.app_id() != Some(id) {
            self.state = None;
            let Some(template) = templates.iter().find(|t| &t.uid == id) else {
                warn!(app_id = %id, "Deploy requested for unknown app");
                return Err(Error::TemplateNotFound(id.to_string()));
            };

            let app = normalize(template);
            let config = DeploymentConfig::seeded(app.specs);
            let summary = CostBreakdown::compute(&config.resources, &self.rates);
            info!(app_id = %id, minimums = ?app.specs, "Deployment session opened");
            self.state = Some(OpenSession {
                app,
                config,
                summary,
            });
        }

        self.config().ok_or(Error::SessionClosed)
    }

    /// Discard the configuration.
    pub fn close(&mut self) {
        if let Some(open) = self.state.take() {
            info!(app_id = %open.app.id, "Deployment session closed");
        }
    }

    /// Open or close the session to match a deploy-flow query.
    ///
    /// Returns whether the session is open afterwards.
    pub fn sync_route(&mut self, route: &DeployRoute, templates: &[AppTemplate]) -> Result<bool> {
        match route.app_id() {
            Some(id) => self.open(&id, templates).map(|_| true),
            None => {
                self.close();
                Ok(false)
            }
        }
    }

    fn active(&mut self) -> Result<&mut OpenSession> {
        self.state.as_mut().ok_or(Error::SessionClosed)
    }

    /// Set one resource, raising it to the app's minimum when needed.
    pub fn set_resource(&mut self, kind: ResourceKind, value: u32) -> Result<Adjustment> {
        let rates = self.rates;
        let open = self.active()?;
        let floor = open.app.specs.get(kind);

        let adjustment = if value < floor {
            debug!(resource = %kind, requested = value, floor, "Resource raised to minimum");
            open.config.resources.set(kind, floor);
            Adjustment::Clamped {
                requested: value,
                floor,
            }
        } else {
            open.config.resources.set(kind, value);
            Adjustment::Accepted
        };

        open.reprice(&rates);
        Ok(adjustment)
    }

    /// Flip advanced mode; returns the new value.
    pub fn toggle_advanced_mode(&mut self) -> Result<bool> {
        let open = self.active()?;
        open.config.advanced_mode = !open.config.advanced_mode;
        Ok(open.config.advanced_mode)
    }

    /// Set advanced mode.
    pub fn set_advanced_mode(&mut self, enabled: bool) -> Result<()> {
        self.active()?.config.advanced_mode = enabled;
        Ok(())
    }

    /// Enable or disable HTTP access.
    pub fn set_http_access(&mut self, enabled: bool) -> Result<()> {
        self.active()?.config.http_access_enabled = enabled;
        Ok(())
    }

    /// Set the application name, keeping at most [`MAX_APP_NAME_LEN`] characters.
    pub fn set_app_name(&mut self, name: &str) -> Result<()> {
        self.active()?.config.app_name = name.chars().take(MAX_APP_NAME_LEN).collect();
        Ok(())
    }

    /// Append an empty environment variable; returns its index.
    pub fn add_env_var(&mut self) -> Result<usize> {
        let open = self.active()?;
        open.config.env_vars.push(EnvironmentVariable::default());
        Ok(open.config.env_vars.len() - 1)
    }

    /// Replace the key or value of the variable at `index`.
    pub fn update_env_var(
        &mut self,
        index: usize,
        field: EnvVarField,
        value: impl Into<String>,
    ) -> Result<()> {
        let var = self.active()?.env_var_mut(index)?;
        match field {
            EnvVarField::Key => var.key = value.into(),
            EnvVarField::Value => var.value = value.into(),
        }
        Ok(())
    }

    /// Remove and return the variable at `index`.
    pub fn remove_env_var(&mut self, index: usize) -> Result<EnvironmentVariable> {
        let open = self.active()?;
        let len = open.config.env_vars.len();
        if index >= len {
            return Err(env_index_error(index, len));
        }
        Ok(open.config.env_vars.remove(index))
    }

    /// Cost of the current configuration.
    pub fn summary(&self) -> Result<&CostBreakdown> {
        self.state
            .as_ref()
            .map(|open| &open.summary)
            .ok_or(Error::SessionClosed)
    }

    /// Monthly total of the current configuration.
    pub fn total(&self) -> Result<Money> {
        self.summary().map(|summary| summary.total)
    }

    /// Slider range for `kind`, starting at the app's minimum.
    pub fn slider_bounds(&self, kind: ResourceKind) -> Result<SliderBounds> {
        self.minimums()
            .map(|minimums| deploy_slider_bounds(kind, minimums.get(kind)))
            .ok_or(Error::SessionClosed)
    }

    /// Whether the deploy hand-off can be offered.
    #[must_use]
    pub const fn deploy_ready(&self, logged_in: bool) -> bool {
        self.is_open() && logged_in
    }
}

impl Default for DeploymentSession {
    fn default() -> Self {
        Self::new()
    }
}
