//! Transport layer for the API bridge.
//!
//! - **STDIO**: rmcp over stdin/stdout, the mode MCP hosts spawn - feature: `stdio`
//! - **HTTP**: JSON-RPC over POST for local debugging with curl - feature: `http`
//!
//! Both transports delegate to the same `McpServer`, so tool listing and
//! invocation behave identically whichever one is selected.

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "http")]
pub use config::HttpConfig;
