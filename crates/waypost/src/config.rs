//! Router configuration.

use serde::Deserialize;

/// Default prefix prepended to route templates.
pub const DEFAULT_PREFIX: &str = "/";

/// Settings a [`Router`](crate::Router) is constructed with.
///
/// ```
/// use waypost::RouterConfig;
///
/// let config = RouterConfig::from_json(r#"{"not_found": "nothing here"}"#).unwrap();
/// assert_eq!(config.prefix, "/");
/// assert_eq!(config.not_found.as_deref(), Some("nothing here"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RouterConfig {
    /// Prepended to every registered template that does not already start with it.
    pub prefix: String,
    /// Body of 404 responses for unmatched routes. When unset the body is
    /// `Route <path> does not exist`.
    pub not_found: Option<String>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            not_found: None,
        }
    }
}

impl RouterConfig {
    /// Parses a configuration from a JSON document. Missing fields take
    /// their default values.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Sets the route prefix.
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Overrides the not-found body.
    #[must_use]
    pub fn not_found(mut self, body: impl Into<String>) -> Self {
        self.not_found = Some(body.into());
        self
    }

    /// Renders the not-found body for `path`.
    pub(crate) fn not_found_body(&self, path: &str) -> String {
        self.not_found
            .clone()
            .unwrap_or_else(|| format!("Route {path} does not exist"))
    }
}
