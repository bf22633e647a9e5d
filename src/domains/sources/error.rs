//! Source configuration error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the source configuration document.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The configuration file could not be read.
    #[error("Failed to read source configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The configuration document is not valid JSON for the expected shape.
    #[error("Invalid source configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// The document parsed but declares no sources.
    #[error("Source configuration declares no sources")]
    Empty,

    /// A source is missing a field every source must carry.
    #[error("Source #{index} has an empty '{field}'")]
    MissingField { index: usize, field: &'static str },

    /// Two sources share a slug, which would make their tool names collide.
    #[error("Duplicate source slug: {0}")]
    DuplicateSlug(String),
}

impl SourceError {
    /// Create a read error for the given path.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }
}
