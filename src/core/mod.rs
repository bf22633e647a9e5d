//! Core module containing shared infrastructure components.
//!
//! Configuration, startup errors, the MCP server handler and the transport
//! layer. Everything request-specific lives under `domains`.

pub mod config;
pub mod error;
pub mod server;
pub mod transport;

pub use config::{Config, ExecutionLimits};
pub use error::{Error, Result};
pub use server::McpServer;
pub use transport::{TransportConfig, TransportService};
