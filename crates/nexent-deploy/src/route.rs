//! The deploy-flow query-string contract.
//!
//! `action=deploy&id=<appId>` opens the deploy flow for an app; dropping
//! either parameter closes it. Unrelated parameters are carried through.

use nexent_core::AppId;
use url::form_urlencoded;

const ACTION_KEY: &str = "action";
const ACTION_DEPLOY: &str = "deploy";
const ID_KEY: &str = "id";

/// Decoded query parameters of a page that may host the deploy flow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployRoute {
    pairs: Vec<(String, String)>,
}

impl DeployRoute {
    /// Parse a query string, with or without its leading `?`.
    #[must_use]
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let pairs = form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Self { pairs }
    }

    fn value(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The app the deploy flow targets, if the query opens it.
    #[must_use]
    pub fn app_id(&self) -> Option<AppId> {
        match (self.value(ACTION_KEY), self.value(ID_KEY)) {
            (Some(ACTION_DEPLOY), Some(id)) if !id.is_empty() => Some(AppId::new(id)),
            _ => None,
        }
    }

    /// Whether the query opens the deploy flow.
    #[must_use]
    pub fn is_deploy(&self) -> bool {
        self.app_id().is_some()
    }

    /// Route that opens the deploy flow for `id`, keeping other parameters.
    #[must_use]
    pub fn open(&self, id: &AppId) -> Self {
        let mut route = self.close();
        route
            .pairs
            .push((ACTION_KEY.to_string(), ACTION_DEPLOY.to_string()));
        route.pairs.push((ID_KEY.to_string(), id.to_string()));
        route
    }

    /// Route with the deploy-flow parameters removed.
    #[must_use]
    pub fn close(&self) -> Self {
        let pairs = self
            .pairs
            .iter()
            .filter(|(key, _)| key != ACTION_KEY && key != ID_KEY)
            .cloned()
            .collect();
        Self { pairs }
    }

    /// Encode back into a query string, without the leading `?`.
    #[must_use]
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deploy_query_names_app() {
        let route = DeployRoute::parse("?action=deploy&id=wordpress");
        assert_eq!(route.app_id(), Some(AppId::new("wordpress")));
        assert!(route.is_deploy());
    }

    #[test]
    fn missing_or_wrong_parameters_do_not_open() {
        assert!(DeployRoute::parse("id=wordpress").app_id().is_none());
        assert!(DeployRoute::parse("action=deploy").app_id().is_none());
        assert!(DeployRoute::parse("action=deploy&id=").app_id().is_none());
        assert!(DeployRoute::parse("action=view&id=ghost").app_id().is_none());
        assert!(DeployRoute::parse("").app_id().is_none());
    }

    #[test]
    fn ids_are_url_decoded() {
        let route = DeployRoute::parse("action=deploy&id=my%20app%2Fv2");
        assert_eq!(route.app_id(), Some(AppId::new("my app/v2")));
    }

    #[test]
    fn open_keeps_unrelated_parameters() {
        let route = DeployRoute::parse("category=DevOps&q=git&id=old");
        let opened = route.open(&AppId::new("gitlab"));
        assert_eq!(
            opened.to_query_string(),
            "category=DevOps&q=git&action=deploy&id=gitlab"
        );
    }

    #[test]
    fn close_strips_only_deploy_parameters() {
        let route = DeployRoute::parse("q=work+flow&action=deploy&id=n8n&page=2");
        let closed = route.close();
        assert!(closed.app_id().is_none());
        assert_eq!(closed.to_query_string(), "q=work+flow&page=2");
    }
}
