//! API tool executor.
//!
//! Runs one request/response cycle for a source:
//! credential check, dispatch under a hard timeout, then classification.
//! Every failure is returned as an error `CallToolResult`; nothing is retried.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::model::{CallToolResult, Content};
use tracing::{debug, info, instrument, warn};

use super::error::ToolError;
use super::params::ApiToolParams;
use super::request::{build_headers, build_url};
use super::response::{
    self, ResponseKind, artifact_timestamp, download_name,
};
use crate::core::config::ExecutionLimits;
use crate::domains::credentials::CredentialReader;
use crate::domains::sources::SourceConfig;

/// Raw upstream response, fully buffered.
struct UpstreamResponse {
    status: u16,
    content_type: Option<String>,
    disposition: Option<String>,
    body: Vec<u8>,
}

/// Executes API tool calls against configured sources.
pub struct ToolExecutor {
    client: reqwest::Client,
    credentials: Arc<dyn CredentialReader>,
    workspace_id: String,
    session_path: Option<PathBuf>,
    limits: ExecutionLimits,
}

impl ToolExecutor {
    /// Create an executor with default limits and no session directory.
    pub fn new(
        client: reqwest::Client,
        credentials: Arc<dyn CredentialReader>,
        workspace_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            credentials,
            workspace_id: workspace_id.into(),
            session_path: None,
            limits: ExecutionLimits::default(),
        }
    }

    /// Set the directory overflow artifacts are written under.
    pub fn with_session_path(mut self, session_path: Option<PathBuf>) -> Self {
        self.session_path = session_path;
        self
    }

    /// Replace the timeout, inline threshold and preview lengths.
    pub fn with_limits(mut self, limits: ExecutionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Limits applied to every call.
    pub fn limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    /// Run one API tool call against `source`.
    #[instrument(skip_all, fields(source = %source.slug, method = %args.method, path = %args.path))]
    pub async fn execute(&self, source: &SourceConfig, args: &ApiToolParams) -> CallToolResult {
        if let Some(intent) = &args.intent {
            debug!("Intent: {}", intent);
        }

        let credential = if source.auth_type.requires_credential() {
            match self
                .credentials
                .read_credential(&self.workspace_id, &source.slug)
                .await
            {
                Some(credential) => Some(credential),
                None => {
                    return error_result(ToolError::MissingCredential {
                        source_name: source.name.clone(),
                        tool_name: source.tool_name(),
                    });
                }
            }
        } else {
            None
        };

        let upstream = match self.dispatch(source, args, credential.as_deref()).await {
            Ok(upstream) => upstream,
            Err(e) => return error_result(e),
        };

        info!("Upstream responded with status {}", upstream.status);
        self.render(source, args, upstream).await
    }

    /// Issue the request and buffer the response, bounded by the timeout.
    async fn dispatch(
        &self,
        source: &SourceConfig,
        args: &ApiToolParams,
        credential: Option<&str>,
    ) -> Result<UpstreamResponse, ToolError> {
        let params = args.non_empty_params();
        let url = build_url(source, &args.path, args.method, params, credential);
        let headers = build_headers(source, credential);

        let mut request = self.client.request(args.method.into(), &url);
        for (name, value) in &headers {
            request = request.header(name, value);
        }
        if let (false, Some(params)) = (args.method.is_get(), params) {
            let body = serde_json::to_vec(params)
                .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;
            request = request.body(body);
        }

        let exchange = async {
            let response = request.send().await?;
            let status = response.status().as_u16();
            let header = |name: reqwest::header::HeaderName| {
                response
                    .headers()
                    .get(name)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            };
            let content_type = header(reqwest::header::CONTENT_TYPE);
            let disposition = header(reqwest::header::CONTENT_DISPOSITION);
            let body = response.bytes().await?.to_vec();
            Ok::<_, reqwest::Error>(UpstreamResponse {
                status,
                content_type,
                disposition,
                body,
            })
        };

        // Dropping the exchange future on timeout aborts the in-flight request.
        match tokio::time::timeout(self.limits.request_timeout, exchange).await {
            Ok(Ok(upstream)) => Ok(upstream),
            Ok(Err(e)) => {
                warn!("Request to {} failed: {}", source.slug, e);
                Err(ToolError::transport(&e))
            }
            Err(_) => {
                warn!(
                    "Request to {} timed out after {:?}",
                    source.slug, self.limits.request_timeout
                );
                Err(ToolError::Timeout(self.limits.request_timeout))
            }
        }
    }

    async fn render(
        &self,
        source: &SourceConfig,
        args: &ApiToolParams,
        upstream: UpstreamResponse,
    ) -> CallToolResult {
        let kind = response::classify(
            upstream.status,
            upstream.content_type.as_deref(),
            upstream.body,
            self.limits.inline_response_limit,
        );

        match kind {
            ResponseKind::UpstreamError { status, body } => {
                error_result(ToolError::Upstream { status, body })
            }
            ResponseKind::Text(text) => CallToolResult::success(vec![Content::text(text)]),
            ResponseKind::Binary { mime_type, bytes } => {
                let Some(session_path) = &self.session_path else {
                    warn!(
                        "No session path; returning {} bytes of {} inline",
                        bytes.len(),
                        mime_type
                    );
                    let text = String::from_utf8_lossy(&bytes).into_owned();
                    return CallToolResult::success(vec![Content::text(text)]);
                };

                let file_name = download_name(
                    &artifact_timestamp(chrono::Utc::now()),
                    upstream.disposition.as_deref(),
                    &mime_type,
                );

                match response::save_binary(session_path, &file_name, &bytes).await {
                    Ok(artifact) => response::file_download_result(&artifact, &mime_type),
                    Err(e) => error_result(ToolError::Artifact(e.to_string())),
                }
            }
            ResponseKind::OversizedText(text) => {
                let Some(session_path) = &self.session_path else {
                    warn!(
                        "No session path; returning {} byte response inline",
                        text.len()
                    );
                    return CallToolResult::success(vec![Content::text(text)]);
                };

                let timestamp = artifact_timestamp(chrono::Utc::now());
                match response::save_text(session_path, &timestamp, &source.slug, &args.path, &text)
                    .await
                {
                    Ok(artifact) => response::saved_text_result(
                        &artifact,
                        &text,
                        self.limits.overflow_preview_chars,
                    ),
                    Err(e) => {
                        response::unsaved_text_result(&e, &text, self.limits.fallback_preview_chars)
                    }
                }
            }
        }
    }
}

/// Render a tool error as an error result.
pub fn error_result(error: ToolError) -> CallToolResult {
    warn!("{}", error);
    CallToolResult::error(vec![Content::text(error.to_string())])
}
