//! Arguments accepted by every generated API tool.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// HTTP verbs an API tool can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }

    pub fn is_get(self) -> bool {
        matches!(self, Self::Get)
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Self::GET,
            HttpMethod::Post => Self::POST,
            HttpMethod::Put => Self::PUT,
            HttpMethod::Delete => Self::DELETE,
            HttpMethod::Patch => Self::PATCH,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters for an API tool call.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
pub struct ApiToolParams {
    /// API endpoint path, appended to the source's base URL.
    #[schemars(description = "API endpoint path, e.g. /v1/users")]
    pub path: String,

    /// HTTP method.
    #[schemars(description = "HTTP method")]
    pub method: HttpMethod,

    /// Query parameters for GET, JSON body for other methods.
    #[serde(default)]
    #[schemars(description = "Query parameters (GET) or JSON request body (other methods)")]
    pub params: Option<serde_json::Map<String, serde_json::Value>>,

    /// Why this call is being made. Never sent upstream.
    #[serde(default, rename = "_intent")]
    #[schemars(description = "Brief description of what this request is for (not sent to the API)")]
    pub intent: Option<String>,
}

impl ApiToolParams {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            params: None,
            intent: None,
        }
    }

    pub fn with_params(mut self, params: serde_json::Value) -> Self {
        self.params = params.as_object().cloned();
        self
    }

    /// Parameters, if any were given and the map is non-empty.
    pub fn non_empty_params(&self) -> Option<&serde_json::Map<String, serde_json::Value>> {
        self.params.as_ref().filter(|params| !params.is_empty())
    }
}
