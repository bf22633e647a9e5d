//! Response classification and overflow handling.
//!
//! Successful responses are returned inline when they are text and fit under
//! the inline limit. Binary bodies are saved under `<session>/downloads/` and
//! oversized text under `<session>/responses/`, with only a reference (and a
//! preview, for text) returned to the caller.
//!
//! Previews are cut on character boundaries, not semantic ones, so they may
//! end mid-token.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rmcp::model::{CallToolResult, Content};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

pub const DOWNLOADS_DIR: &str = "downloads";
pub const RESPONSES_DIR: &str = "responses";

/// Longest sanitized request-path fragment used in a text artifact name.
const PATH_FRAGMENT_MAX_CHARS: usize = 30;

/// How a response body should be handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseKind {
    /// Non-2xx status. Body read as text regardless of content type.
    UpstreamError { status: u16, body: String },
    /// 2xx with a declared, non-text content type.
    Binary { mime_type: String, bytes: Vec<u8> },
    /// 2xx text (or undeclared content type) within the inline limit.
    Text(String),
    /// 2xx text over the inline limit.
    OversizedText(String),
}

/// Decide what to do with an upstream response.
pub fn classify(
    status: u16,
    content_type: Option<&str>,
    body: Vec<u8>,
    inline_limit: usize,
) -> ResponseKind {
    if !(200..300).contains(&status) {
        return ResponseKind::UpstreamError {
            status,
            body: String::from_utf8_lossy(&body).into_owned(),
        };
    }

    if let Some(content_type) = content_type.filter(|ct| !is_text_like(ct)) {
        return ResponseKind::Binary {
            mime_type: mime_essence(content_type),
            bytes: body,
        };
    }

    let oversized = body.len() > inline_limit;
    let text = String::from_utf8_lossy(&body).into_owned();
    if oversized {
        ResponseKind::OversizedText(text)
    } else {
        ResponseKind::Text(text)
    }
}

/// Whether a content type carries human-readable text.
pub fn is_text_like(content_type: &str) -> bool {
    let mime = mime_essence(content_type);
    mime.starts_with("text/")
        || matches!(
            mime.as_str(),
            "application/json" | "application/xml" | "application/javascript"
        )
        || mime.ends_with("+json")
        || mime.ends_with("+xml")
}

/// `type/subtype` without parameters, lower-cased.
fn mime_essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

// ============================================================================
// Artifacts
// ============================================================================

/// Errors that can occur while persisting an artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("could not create directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A file written under the session directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedArtifact {
    pub path: PathBuf,
    pub size: usize,
}

/// Structured result returned for a saved binary download.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileDownload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub path: String,
    pub size: usize,
    pub mime_type: String,
}

/// Timestamp used in artifact names: ISO-8601 to the second, `-` separated.
pub fn artifact_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%dT%H-%M-%S").to_string()
}

/// Alphanumeric characters of `path`, capped for use in a file name.
pub fn sanitize_path_fragment(path: &str) -> String {
    path.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .take(PATH_FRAGMENT_MAX_CHARS)
        .collect()
}

/// File name for a binary download when the caller supplies none.
pub fn default_download_name(timestamp: &str, mime_type: &str) -> String {
    format!("{timestamp}.{}", extension_for(mime_type))
}

/// File name for a binary download: the timestamp, then the announced
/// `Content-Disposition` name if there is a safe one.
pub fn download_name(timestamp: &str, disposition: Option<&str>, mime_type: &str) -> String {
    match disposition.and_then(disposition_filename) {
        Some(name) => format!("{timestamp}_{name}"),
        None => default_download_name(timestamp, mime_type),
    }
}

/// File name announced by a `Content-Disposition` header, reduced to a safe basename.
pub fn disposition_filename(header: &str) -> Option<String> {
    let raw = header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("filename="))?
        .trim_matches('"');

    let base = raw.rsplit(['/', '\\']).next().unwrap_or_default();
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        .collect();

    if cleaned.trim_matches('.').is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn extension_for(mime_type: &str) -> &str {
    let subtype = mime_type.split('/').nth(1).unwrap_or_default();
    match subtype {
        "jpeg" => "jpg",
        "octet-stream" | "" => "bin",
        "svg+xml" => "svg",
        other if other.len() <= 8 && other.chars().all(|c| c.is_ascii_alphanumeric()) => other,
        _ => "bin",
    }
}

/// Save raw bytes under `<session>/downloads/`.
pub async fn save_binary(
    session_path: &Path,
    file_name: &str,
    bytes: &[u8],
) -> Result<SavedArtifact, ArtifactError> {
    let dir = ensure_dir(session_path, DOWNLOADS_DIR).await?;
    write_artifact(dir.join(file_name), bytes).await
}

/// Save an oversized text body under `<session>/responses/`.
pub async fn save_text(
    session_path: &Path,
    timestamp: &str,
    tool_slug: &str,
    request_path: &str,
    text: &str,
) -> Result<SavedArtifact, ArtifactError> {
    let dir = ensure_dir(session_path, RESPONSES_DIR).await?;
    let file_name = format!(
        "{timestamp}_{tool_slug}_{}.txt",
        sanitize_path_fragment(request_path)
    );
    write_artifact(dir.join(file_name), text.as_bytes()).await
}

async fn ensure_dir(session_path: &Path, name: &str) -> Result<PathBuf, ArtifactError> {
    let dir = session_path.join(name);
    // create_dir_all tolerates concurrent creation of the same directory.
    tokio::fs::create_dir_all(&dir)
        .await
        .map_err(|source| ArtifactError::CreateDir {
            path: dir.clone(),
            source,
        })?;
    Ok(dir)
}

async fn write_artifact(path: PathBuf, bytes: &[u8]) -> Result<SavedArtifact, ArtifactError> {
    if let Err(source) = tokio::fs::write(&path, bytes).await {
        return Err(ArtifactError::Write { path, source });
    }
    let path = std::path::absolute(&path).unwrap_or(path);
    info!("Saved {} bytes to {}", bytes.len(), path.display());
    Ok(SavedArtifact {
        path,
        size: bytes.len(),
    })
}

// ============================================================================
// Result rendering
// ============================================================================

/// Size in KiB, rounded to the nearest whole KiB.
pub fn size_in_kib(bytes: usize) -> u64 {
    (bytes as f64 / 1024.0).round() as u64
}

/// First `max_chars` characters of `text`.
pub fn preview(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Result for a binary body saved to disk: pretty JSON describing the file.
pub fn file_download_result(artifact: &SavedArtifact, mime_type: &str) -> CallToolResult {
    let download = FileDownload {
        kind: "file_download",
        path: artifact.path.display().to_string(),
        size: artifact.size,
        mime_type: mime_type.to_string(),
    };
    let text = serde_json::to_string_pretty(&download).unwrap_or_else(|_| {
        format!(
            "{{\"type\": \"file_download\", \"path\": {:?}}}",
            download.path
        )
    });
    CallToolResult::success(vec![Content::text(text)])
}

/// Result for an oversized text body saved to disk.
pub fn saved_text_result(
    artifact: &SavedArtifact,
    text: &str,
    preview_chars: usize,
) -> CallToolResult {
    let message = format!(
        "Response too large ({}KB) - saved to file.\n\n\
         Full response: {}\n\n\
         Preview (first {} characters):\n{}",
        size_in_kib(text.len()),
        artifact.path.display(),
        preview_chars,
        preview(text, preview_chars)
    );
    CallToolResult::success(vec![Content::text(message)])
}

/// Fallback when an oversized text body could not be saved.
pub fn unsaved_text_result(
    error: &ArtifactError,
    text: &str,
    preview_chars: usize,
) -> CallToolResult {
    warn!("Falling back to inline preview: {}", error);
    let message = format!(
        "Response too large ({}KB) and could not be saved to disk ({}).\n\n\
         Truncated response (first {} characters):\n{}",
        size_in_kib(text.len()),
        error,
        preview_chars,
        preview(text, preview_chars)
    );
    CallToolResult::success(vec![Content::text(message)])
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rmcp::model::RawContent;
    use tempfile::TempDir;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_text_like_content_types() {
        assert!(is_text_like("text/plain"));
        assert!(is_text_like("text/html; charset=utf-8"));
        assert!(is_text_like("application/json"));
        assert!(is_text_like("Application/JSON; charset=UTF-8"));
        assert!(is_text_like("application/xml"));
        assert!(is_text_like("application/javascript"));
        assert!(is_text_like("application/vnd.github+json"));
        assert!(is_text_like("application/atom+xml"));

        assert!(!is_text_like("image/png"));
        assert!(!is_text_like("application/pdf"));
        assert!(!is_text_like("application/octet-stream"));
        assert!(!is_text_like("application/jsonl"));
    }

    #[test]
    fn test_classify_error_status_ignores_content_type() {
        let kind = classify(404, Some("image/png"), b"not found".to_vec(), 10);
        assert_eq!(
            kind,
            ResponseKind::UpstreamError {
                status: 404,
                body: "not found".to_string()
            }
        );
    }

    #[test]
    fn test_classify_binary() {
        let kind = classify(200, Some("image/png; foo=bar"), vec![0x89, 0x50], 10);
        assert_eq!(
            kind,
            ResponseKind::Binary {
                mime_type: "image/png".to_string(),
                bytes: vec![0x89, 0x50]
            }
        );
    }

    #[test]
    fn test_classify_missing_content_type_is_text() {
        let kind = classify(200, None, b"hello".to_vec(), 10);
        assert_eq!(kind, ResponseKind::Text("hello".to_string()));
    }

    #[test]
    fn test_classify_inline_limit_boundary() {
        let limit = 64;
        let exact = vec![b'a'; limit];
        let over = vec![b'a'; limit + 1];

        assert!(matches!(
            classify(200, Some("text/plain"), exact, limit),
            ResponseKind::Text(_)
        ));
        assert!(matches!(
            classify(200, Some("text/plain"), over, limit),
            ResponseKind::OversizedText(_)
        ));
    }

    #[test]
    fn test_sanitize_path_fragment() {
        assert_eq!(sanitize_path_fragment("/v1/users/42?x=1"), "v1users42x1");
        let long = "/".to_string() + &"ab/".repeat(40);
        assert_eq!(sanitize_path_fragment(&long).len(), 30);
    }

    #[test]
    fn test_artifact_timestamp_format() {
        let now = Utc.with_ymd_and_hms(2026, 10, 14, 9, 5, 3).unwrap();
        assert_eq!(artifact_timestamp(now), "2026-10-14T09-05-03");
    }

    #[test]
    fn test_default_download_name() {
        assert_eq!(default_download_name("ts", "image/png"), "ts.png");
        assert_eq!(default_download_name("ts", "image/jpeg"), "ts.jpg");
        assert_eq!(default_download_name("ts", "application/octet-stream"), "ts.bin");
        assert_eq!(
            default_download_name("ts", "application/vnd.ms-excel"),
            "ts.bin"
        );
    }

    #[test]
    fn test_download_name_keeps_timestamp() {
        assert_eq!(
            download_name("ts", Some(r#"attachment; filename="report.pdf""#), "application/pdf"),
            "ts_report.pdf"
        );
        assert_eq!(
            download_name("ts", Some("attachment; filename=\"..\""), "image/png"),
            "ts.png"
        );
        assert_eq!(download_name("ts", None, "image/png"), "ts.png");
    }

    #[test]
    fn test_disposition_filename() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="report.pdf""#).as_deref(),
            Some("report.pdf")
        );
        assert_eq!(
            disposition_filename("attachment; filename=../../etc/passwd").as_deref(),
            Some("passwd")
        );
        assert_eq!(disposition_filename("attachment; filename=\"..\""), None);
        assert_eq!(disposition_filename("inline"), None);
    }

    #[test]
    fn test_size_in_kib_rounds() {
        assert_eq!(size_in_kib(61 * 1024), 61);
        assert_eq!(size_in_kib(1535), 1);
        assert_eq!(size_in_kib(1536), 2);
    }

    #[test]
    fn test_preview_cuts_on_char_boundary() {
        assert_eq!(preview("héllo", 2), "hé");
        assert_eq!(preview("abc", 10), "abc");
    }

    #[tokio::test]
    async fn test_save_binary_creates_downloads_dir() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = save_binary(temp_dir.path(), "img.png", &[1, 2, 3])
            .await
            .unwrap();

        assert!(artifact.path.is_absolute());
        assert!(artifact.path.starts_with(temp_dir.path().join(DOWNLOADS_DIR)));
        assert_eq!(artifact.size, 3);
        assert_eq!(std::fs::read(&artifact.path).unwrap(), vec![1, 2, 3]);

        let result = file_download_result(&artifact, "image/png");
        let json: serde_json::Value = serde_json::from_str(text_of(&result)).unwrap();
        assert_eq!(json["type"], "file_download");
        assert_eq!(json["size"], 3);
        assert_eq!(json["mimeType"], "image/png");
        assert_eq!(json["path"], artifact.path.display().to_string());
    }

    #[tokio::test]
    async fn test_save_text_names_file() {
        let temp_dir = TempDir::new().unwrap();
        let artifact = save_text(
            temp_dir.path(),
            "2026-10-14T09-05-03",
            "github",
            "/repos/x/issues",
            "body",
        )
        .await
        .unwrap();

        assert_eq!(
            artifact.path.file_name().unwrap().to_str().unwrap(),
            "2026-10-14T09-05-03_github_reposxissues.txt"
        );
        assert!(artifact.path.starts_with(temp_dir.path().join(RESPONSES_DIR)));
        assert_eq!(std::fs::read_to_string(&artifact.path).unwrap(), "body");
    }

    #[tokio::test]
    async fn test_save_fails_when_session_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("session");
        std::fs::write(&blocker, "not a dir").unwrap();

        let err = save_text(&blocker, "ts", "x", "/p", "body").await.unwrap_err();
        assert!(matches!(err, ArtifactError::CreateDir { .. }));

        let result = unsaved_text_result(&err, &"z".repeat(100), 10);
        let text = text_of(&result);
        assert!(text.contains("could not be saved"));
        assert!(text.contains(&"z".repeat(10)));
        assert!(!text.contains(&"z".repeat(11)));
        assert!(!result.is_error.unwrap_or(false));
    }

    #[test]
    fn test_saved_text_result_preview() {
        let artifact = SavedArtifact {
            path: PathBuf::from("/s/responses/f.txt"),
            size: 61 * 1024,
        };
        let body = "x".repeat(61 * 1024);
        let result = saved_text_result(&artifact, &body, 2_000);
        let text = text_of(&result);
        assert!(text.contains("61KB"));
        assert!(text.contains("/s/responses/f.txt"));
        assert!(text.contains(&"x".repeat(2_000)));
        assert!(!text.contains(&"x".repeat(2_001)));
    }
}
