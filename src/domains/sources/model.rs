//! Source configuration data model.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Scheme prefix used for bearer auth when the source does not set one.
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

/// Header used for header auth when the source does not name one.
pub const DEFAULT_HEADER_NAME: &str = "X-API-Key";

/// Query parameter used for query auth when the source does not name one.
pub const DEFAULT_QUERY_PARAM: &str = "api_key";

/// How the credential is attached to outbound requests.
///
/// Exactly one strategy applies per request. Fields belonging to other
/// strategies are ignored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthType {
    /// No credential is required or sent.
    #[default]
    None,
    /// `Authorization: <scheme> <credential>`.
    Bearer,
    /// A custom header carrying the raw credential.
    Header,
    /// `Authorization: Basic <base64(username:password)>`.
    Basic,
    /// The credential is appended to the URL query string.
    Query,
}

impl AuthType {
    /// Whether requests for this auth type need a cached credential.
    pub fn requires_credential(self) -> bool {
        !matches!(self, Self::None)
    }
}

/// One configured upstream API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceConfig {
    /// Stable identifier used in tool names and artifact file names.
    pub slug: String,

    /// Display name.
    pub name: String,

    /// Base URL every request path is appended to.
    pub base_url: String,

    #[serde(default)]
    pub auth_type: AuthType,

    /// Prefix for bearer auth. An empty string sends the bare credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_scheme: Option<String>,

    /// Header name for header auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header_name: Option<String>,

    /// Query parameter name for query auth.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_param: Option<String>,

    /// Static headers merged into every request.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub default_headers: BTreeMap<String, String>,

    /// Free-text API documentation surfaced in the tool description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_raw: Option<String>,
}

impl SourceConfig {
    /// Create a source with no auth, headers or guide.
    pub fn new(
        slug: impl Into<String>,
        name: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        Self {
            slug: slug.into(),
            name: name.into(),
            base_url: base_url.into(),
            auth_type: AuthType::None,
            auth_scheme: None,
            header_name: None,
            query_param: None,
            default_headers: BTreeMap::new(),
            guide_raw: None,
        }
    }

    /// Set the auth type.
    pub fn with_auth(mut self, auth_type: AuthType) -> Self {
        self.auth_type = auth_type;
        self
    }

    /// Name of the tool generated for this source.
    pub fn tool_name(&self) -> String {
        format!("api_{}", self.slug)
    }

    pub fn auth_scheme(&self) -> &str {
        self.auth_scheme.as_deref().unwrap_or(DEFAULT_AUTH_SCHEME)
    }

    pub fn header_name(&self) -> &str {
        self.header_name
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_HEADER_NAME)
    }

    pub fn query_param(&self) -> &str {
        self.query_param
            .as_deref()
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_QUERY_PARAM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_source() {
        let json = r#"{"slug": "gh", "name": "GitHub", "baseUrl": "https://api.github.com"}"#;
        let source: SourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(source.slug, "gh");
        assert_eq!(source.auth_type, AuthType::None);
        assert!(source.default_headers.is_empty());
        assert!(source.guide_raw.is_none());
    }

    #[test]
    fn test_deserialize_full_source() {
        let json = r#"{
            "slug": "linear",
            "name": "Linear",
            "baseUrl": "https://api.linear.app/",
            "authType": "header",
            "headerName": "X-Linear-Key",
            "defaultHeaders": {"Accept": "application/json"},
            "guideRaw": "Use /graphql"
        }"#;
        let source: SourceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(source.auth_type, AuthType::Header);
        assert_eq!(source.header_name(), "X-Linear-Key");
        assert_eq!(source.default_headers["Accept"], "application/json");
        assert_eq!(source.guide_raw.as_deref(), Some("Use /graphql"));
    }

    #[test]
    fn test_unknown_auth_type_rejected() {
        let json = r#"{"slug": "x", "name": "X", "baseUrl": "https://x", "authType": "oauth"}"#;
        assert!(serde_json::from_str::<SourceConfig>(json).is_err());
    }

    #[test]
    fn test_accessor_defaults() {
        let source = SourceConfig::new("x", "X", "https://x");
        assert_eq!(source.auth_scheme(), "Bearer");
        assert_eq!(source.header_name(), "X-API-Key");
        assert_eq!(source.query_param(), "api_key");
        assert_eq!(source.tool_name(), "api_x");
    }

    #[test]
    fn test_empty_auth_scheme_is_kept() {
        let mut source = SourceConfig::new("x", "X", "https://x").with_auth(AuthType::Bearer);
        source.auth_scheme = Some(String::new());
        assert_eq!(source.auth_scheme(), "");
    }

    #[test]
    fn test_requires_credential() {
        assert!(!AuthType::None.requires_credential());
        assert!(AuthType::Bearer.requires_credential());
        assert!(AuthType::Header.requires_credential());
        assert!(AuthType::Basic.requires_credential());
        assert!(AuthType::Query.requires_credential());
    }
}
