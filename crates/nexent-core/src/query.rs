//! Query-string pairs for catalog requests.

use std::fmt::Display;

/// Ordered query parameters, rendered with `Display`.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Empty parameter list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn push(&mut self, key: &'static str, value: impl Display) {
        self.pairs.push((key, value.to_string()));
    }

    /// Collected pairs, in insertion order.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Whether nothing was pushed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn booleans_render_lowercase() {
        let mut params = QueryParams::new();
        assert!(params.is_empty());

        params.push("featured-apps", false);
        params.push("page", 2);
        assert_eq!(
            params.into_pairs(),
            vec![
                ("featured-apps", "false".to_string()),
                ("page", "2".to_string())
            ]
        );
    }
}
