//! API bridge MCP server.
//!
//! Exposes every configured REST API source as a single generic MCP tool
//! named `api_<slug>`. The agent supplies a path, a method and params; the
//! bridge injects the cached credential, performs the request and returns
//! the response inline or as a file under the session directory.
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, the server handler and transports
//! - **domains**: business logic organized by bounded contexts
//!   - **sources**: the source configuration document
//!   - **credentials**: read-only credential cache lookup
//!   - **tools**: tool definitions and the request/response pipeline
//!
//! # Example
//!
//! ```rust,no_run
//! use api_bridge_mcp::core::{Config, McpServer};
//! use api_bridge_mcp::domains::sources::SourcesDocument;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env();
//!     let document = SourcesDocument::load("sources.json".as_ref())?;
//!     let server = McpServer::new(config, document)?;
//!     // Hand the server to a TransportService...
//!     # let _ = server;
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
