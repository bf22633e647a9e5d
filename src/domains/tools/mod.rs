//! Tools domain module.
//!
//! Every configured source is exposed as one generic API tool named
//! `api_<slug>`. A call flows registry -> executor -> {credentials, request,
//! response} and always comes back as a `CallToolResult`.
//!
//! ## Architecture
//!
//! - `params.rs` - Arguments shared by every API tool
//! - `catalog.rs` - Tool definitions and descriptions built from sources
//! - `request.rs` - URL and header construction per auth type
//! - `response.rs` - Response classification and overflow artifacts
//! - `executor.rs` - One request/response cycle with timeout
//! - `registry.rs` - Tool name lookup and dispatch
//! - `router.rs` - Dynamic rmcp ToolRouter for STDIO transport
//! - `error.rs` - Tool-specific error types

pub mod catalog;
mod error;
mod executor;
pub mod params;
mod registry;
pub mod request;
pub mod response;
pub mod router;

pub use error::ToolError;
pub use executor::{ToolExecutor, error_result};
pub use params::{ApiToolParams, HttpMethod};
pub use registry::ToolRegistry;
pub use router::build_tool_router;
