//! Tool-specific error types.
//!
//! None of these escape a tool call as `Err`: the executor and dispatcher
//! render them into an error `CallToolResult`.

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur during tool operations.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),

    /// The source needs a credential and none is cached.
    #[error(
        "No credential found for {source_name}. \
         Please authenticate with this source before calling {tool_name}."
    )]
    MissingCredential {
        source_name: String,
        tool_name: String,
    },

    /// The upstream API answered with a non-2xx status.
    #[error("API Error {status}: {body}")]
    Upstream { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out after {}", describe_duration(*.0))]
    Timeout(Duration),

    /// DNS, connection or other transport-level failure.
    #[error("Request failed: {0}")]
    Transport(String),

    /// A binary response could not be written to the session directory.
    #[error("Failed to save downloaded file: {0}")]
    Artifact(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }

    /// Create a new transport error from any error, including its source chain.
    pub fn transport(err: &(dyn std::error::Error + 'static)) -> Self {
        let mut message = err.to_string();
        let mut source = err.source();
        while let Some(cause) = source {
            let cause_text = cause.to_string();
            if !message.contains(&cause_text) {
                message.push_str(": ");
                message.push_str(&cause_text);
            }
            source = cause.source();
        }
        Self::Transport(message)
    }
}

fn describe_duration(duration: Duration) -> String {
    if duration.subsec_millis() == 0 {
        let secs = duration.as_secs();
        if secs == 1 {
            "1 second".to_string()
        } else {
            format!("{secs} seconds")
        }
    } else {
        format!("{} ms", duration.as_millis())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_message_names_duration() {
        assert_eq!(
            ToolError::Timeout(Duration::from_secs(30)).to_string(),
            "Request timed out after 30 seconds"
        );
        assert_eq!(
            ToolError::Timeout(Duration::from_millis(250)).to_string(),
            "Request timed out after 250 ms"
        );
    }

    #[test]
    fn test_upstream_message() {
        let err = ToolError::Upstream {
            status: 404,
            body: "not found".to_string(),
        };
        assert_eq!(err.to_string(), "API Error 404: not found");
    }

    #[test]
    fn test_unknown_tool_message() {
        assert_eq!(
            ToolError::not_found("api_nope").to_string(),
            "Unknown tool: api_nope"
        );
    }

    #[test]
    fn test_transport_includes_source_chain() {
        let inner = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "connection reset");
        let outer = std::io::Error::other(inner);
        let err = ToolError::transport(&outer);
        assert!(err.to_string().starts_with("Request failed: "));
        assert!(err.to_string().contains("connection reset"));
    }
}
