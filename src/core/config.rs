//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure populated from
//! environment variables (optionally via a `.env` file) on top of defaults.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Hard wall-clock limit for a single upstream request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest text body, in bytes, returned inline.
pub const INLINE_RESPONSE_LIMIT: usize = 60 * 1024;

/// Characters of an oversized body shown next to the saved file path.
pub const OVERFLOW_PREVIEW_CHARS: usize = 2_000;

/// Characters of an oversized body returned when it could not be saved.
pub const FALLBACK_PREVIEW_CHARS: usize = 8_000;

/// Characters of a source guide included in its tool description.
pub const GUIDE_EXCERPT_CHARS: usize = 2_000;

/// Workspace used for credential lookup when none is configured.
pub const DEFAULT_WORKSPACE_ID: &str = "default";

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Where sources, credentials and session artifacts live.
    pub bridge: BridgeConfig,

    /// Fixed execution limits. Not read from the environment.
    pub limits: ExecutionLimits,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Locations the bridge reads from and writes to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Path to the JSON source configuration document.
    pub sources_path: Option<PathBuf>,

    /// Session directory for overflow artifacts.
    /// If None, oversized and binary responses are returned inline.
    pub session_path: Option<PathBuf>,

    /// Workspace identity for credential lookup. Overrides the document's.
    pub workspace_id: Option<String>,

    /// Root of the on-disk credential cache.
    pub credentials_dir: PathBuf,
}

/// Timeout, size threshold and preview lengths applied to every tool call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionLimits {
    pub request_timeout: Duration,
    pub inline_response_limit: usize,
    pub overflow_preview_chars: usize,
    pub fallback_preview_chars: usize,
    pub guide_excerpt_chars: usize,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            request_timeout: REQUEST_TIMEOUT,
            inline_response_limit: INLINE_RESPONSE_LIMIT,
            overflow_preview_chars: OVERFLOW_PREVIEW_CHARS,
            fallback_preview_chars: FALLBACK_PREVIEW_CHARS,
            guide_excerpt_chars: GUIDE_EXCERPT_CHARS,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            sources_path: None,
            session_path: None,
            workspace_id: None,
            credentials_dir: default_credentials_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "api-bridge".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            bridge: BridgeConfig::default(),
            limits: ExecutionLimits::default(),
        }
    }
}

fn default_credentials_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".api-bridge")
        .join("credentials")
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SOURCES_CONFIG`, `MCP_SESSION_PATH`.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();

        if let Some(path) = non_empty_env("MCP_SOURCES_CONFIG") {
            config.bridge.sources_path = Some(PathBuf::from(path));
        }

        if let Some(path) = non_empty_env("MCP_SESSION_PATH") {
            config.bridge.session_path = Some(PathBuf::from(path));
        }

        if let Some(workspace_id) = non_empty_env("MCP_WORKSPACE_ID") {
            config.bridge.workspace_id = Some(workspace_id);
        }

        if let Some(dir) = non_empty_env("MCP_CREDENTIALS_DIR") {
            config.bridge.credentials_dir = PathBuf::from(dir);
        }

        config
    }
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
