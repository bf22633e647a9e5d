//! Sources domain module.
//!
//! A source is one upstream REST API the bridge proxies. This module holds
//! the source data model and the loader for the JSON configuration document
//! that declares them.
//!
//! - `model.rs` - `SourceConfig` and `AuthType`
//! - `loader.rs` - `SourcesDocument` parsing and validation
//! - `error.rs` - Source configuration error types

mod error;
mod loader;
mod model;

pub use error::SourceError;
pub use loader::SourcesDocument;
pub use model::{AuthType, SourceConfig};
