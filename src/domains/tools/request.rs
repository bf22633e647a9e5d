//! Request construction: URL assembly and auth placement.
//!
//! Exactly one auth strategy applies per request, selected by the source's
//! `AuthType`. Only query auth puts the credential in the URL; every other
//! strategy puts it in a header.

use std::collections::BTreeMap;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::params::HttpMethod;
use crate::domains::sources::{AuthType, SourceConfig};

/// Ordered header map. Names keep the casing they were inserted with.
pub type RequestHeaders = BTreeMap<String, String>;

/// `{"username": "...", "password": "..."}` form of a basic-auth credential.
#[derive(Deserialize)]
struct BasicCredential {
    username: String,
    password: String,
}

/// Build the header map for a request to `config`.
///
/// Starts from `Content-Type: application/json`, layers the source's default
/// headers on top, then applies the auth header (if any).
pub fn build_headers(config: &SourceConfig, credential: Option<&str>) -> RequestHeaders {
    let mut headers = RequestHeaders::new();
    set_header(&mut headers, "Content-Type", "application/json");

    for (name, value) in &config.default_headers {
        set_header(&mut headers, name, value);
    }

    let Some(credential) = credential else {
        return headers;
    };

    match config.auth_type {
        AuthType::None | AuthType::Query => {}
        AuthType::Bearer => {
            let scheme = config.auth_scheme();
            let value = if scheme.is_empty() {
                credential.to_string()
            } else {
                format!("{scheme} {credential}")
            };
            set_header(&mut headers, "Authorization", &value);
        }
        AuthType::Header => {
            set_header(&mut headers, config.header_name(), credential);
        }
        AuthType::Basic => {
            let encoded = BASE64.encode(basic_user_pass(credential));
            set_header(&mut headers, "Authorization", &format!("Basic {encoded}"));
        }
    }

    headers
}

/// Build the fully-qualified request URL.
///
/// For GET, every entry of `params` becomes a query parameter. For query auth
/// the credential is appended last.
pub fn build_url(
    config: &SourceConfig,
    path: &str,
    method: HttpMethod,
    params: Option<&Map<String, Value>>,
    credential: Option<&str>,
) -> String {
    let base = config.base_url.strip_suffix('/').unwrap_or(&config.base_url);
    let mut url = if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    };

    if method.is_get() {
        for (key, value) in params.into_iter().flatten() {
            if let Some(value) = query_value(value) {
                append_query(&mut url, key, &value);
            }
        }
    }

    if let (AuthType::Query, Some(credential)) = (config.auth_type, credential) {
        append_query(&mut url, config.query_param(), credential);
    }

    url
}

/// Insert a header, replacing any existing entry with the same name in any case.
fn set_header(headers: &mut RequestHeaders, name: &str, value: &str) {
    headers.retain(|existing, _| !existing.eq_ignore_ascii_case(name));
    headers.insert(name.to_string(), value.to_string());
}

fn basic_user_pass(credential: &str) -> String {
    match serde_json::from_str::<BasicCredential>(credential) {
        Ok(pair) => format!("{}:{}", pair.username, pair.password),
        Err(_) => credential.to_string(),
    }
}

/// Query-string form of a parameter value. Objects and arrays are sent as JSON.
fn query_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            Some(value.to_string())
        }
    }
}

fn append_query(url: &mut String, key: &str, value: &str) {
    // Serializing a single pair of strings cannot fail.
    let pair = serde_urlencoded::to_string([(key, value)]).unwrap_or_default();
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(&pair);
}
