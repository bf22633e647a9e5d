//! Loading and validation of the source configuration document.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;
use tracing::info;

use super::{SourceConfig, SourceError};

/// The parsed source configuration document.
#[derive(Debug, Clone, PartialEq)]
pub struct SourcesDocument {
    /// Workspace the credentials of these sources belong to.
    pub workspace_id: Option<String>,

    /// Configured sources, in document order.
    pub sources: Vec<SourceConfig>,
}

/// Accepted on-disk shapes: a `{ "sources": [...] }` object or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawDocument {
    Object {
        #[serde(default, rename = "workspaceId")]
        workspace_id: Option<String>,
        sources: Vec<SourceConfig>,
    },
    List(Vec<SourceConfig>),
}

impl SourcesDocument {
    /// Read and validate the document at `path`.
    pub fn load(path: &Path) -> Result<Self, SourceError> {
        let raw = std::fs::read_to_string(path).map_err(|e| SourceError::read(path, e))?;
        let document = Self::from_json(&raw)?;
        info!(
            "Loaded {} source(s) from {}",
            document.sources.len(),
            path.display()
        );
        Ok(document)
    }

    /// Parse and validate a document from JSON text.
    pub fn from_json(raw: &str) -> Result<Self, SourceError> {
        let document = match serde_json::from_str::<RawDocument>(raw)? {
            RawDocument::Object {
                workspace_id,
                sources,
            } => Self {
                workspace_id,
                sources,
            },
            RawDocument::List(sources) => Self {
                workspace_id: None,
                sources,
            },
        };
        document.validate()?;
        Ok(document)
    }

    fn validate(&self) -> Result<(), SourceError> {
        if self.sources.is_empty() {
            return Err(SourceError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, source) in self.sources.iter().enumerate() {
            if source.slug.trim().is_empty() {
                return Err(SourceError::MissingField {
                    index,
                    field: "slug",
                });
            }
            if source.base_url.trim().is_empty() {
                return Err(SourceError::MissingField {
                    index,
                    field: "baseUrl",
                });
            }
            if !seen.insert(source.slug.as_str()) {
                return Err(SourceError::DuplicateSlug(source.slug.clone()));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_object_document() {
        let doc = SourcesDocument::from_json(
            r#"{"workspaceId": "ws-1", "sources": [
                {"slug": "a", "name": "A", "baseUrl": "https://a"},
                {"slug": "b", "name": "B", "baseUrl": "https://b", "authType": "bearer"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(doc.workspace_id.as_deref(), Some("ws-1"));
        assert_eq!(doc.sources.len(), 2);
        assert_eq!(doc.sources[1].slug, "b");
    }

    #[test]
    fn test_bare_array_document() {
        let doc =
            SourcesDocument::from_json(r#"[{"slug": "a", "name": "A", "baseUrl": "https://a"}]"#)
                .unwrap();
        assert!(doc.workspace_id.is_none());
        assert_eq!(doc.sources.len(), 1);
    }

    #[test]
    fn test_empty_sources_rejected() {
        let err = SourcesDocument::from_json(r#"{"sources": []}"#);
        assert!(matches!(err, Err(SourceError::Empty)));

        let err = SourcesDocument::from_json("[]");
        assert!(matches!(err, Err(SourceError::Empty)));
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let err = SourcesDocument::from_json(
            r#"[{"slug": "a", "name": "A", "baseUrl": "https://a"},
                {"slug": "a", "name": "A2", "baseUrl": "https://a2"}]"#,
        );
        assert!(matches!(err, Err(SourceError::DuplicateSlug(slug)) if slug == "a"));
    }

    #[test]
    fn test_blank_slug_rejected() {
        let err = SourcesDocument::from_json(r#"[{"slug": " ", "name": "A", "baseUrl": "https://a"}]"#);
        assert!(matches!(
            err,
            Err(SourceError::MissingField { index: 0, field: "slug" })
        ));
    }

    #[test]
    fn test_invalid_json_rejected() {
        let err = SourcesDocument::from_json("{not json");
        assert!(matches!(err, Err(SourceError::Parse(_))));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = SourcesDocument::load(&temp_dir.path().join("missing.json"));
        assert!(matches!(err, Err(SourceError::Read { .. })));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("sources.json");
        std::fs::write(
            &path,
            r#"{"sources": [{"slug": "a", "name": "A", "baseUrl": "https://a"}]}"#,
        )
        .unwrap();
        let doc = SourcesDocument::load(&path).unwrap();
        assert_eq!(doc.sources[0].name, "A");
    }
}
