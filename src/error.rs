use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::ParseError;

#[derive(Debug, Error)]
pub enum PrerenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid bot signature '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Render failed: {0}")]
    Render(String),
}

impl From<ParseError> for PrerenderError {
    fn from(err: ParseError) -> Self {
        PrerenderError::InvalidUrl(err.to_string())
    }
}

impl PrerenderError {
    pub fn invalid_url(message: impl Into<String>) -> Self {
        PrerenderError::InvalidUrl(message.into())
    }

    pub fn config(message: impl Into<String>) -> Self {
        PrerenderError::Config(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        PrerenderError::Render(message.into())
    }

    /// True for failures that must stop the process at startup.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            PrerenderError::Config(_)
                | PrerenderError::InvalidPattern { .. }
                | PrerenderError::InvalidUrl(_)
        )
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            PrerenderError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            PrerenderError::InvalidUrl(msg) => ErrorPayload::new(
                ErrorCategory::Config,
                msg.to_string(),
                "Pass an absolute URL including the scheme (e.g., https://example.com/page).",
            ),
            PrerenderError::InvalidPattern { name, source } => ErrorPayload::new(
                ErrorCategory::Config,
                format!("Invalid bot signature '{}': {}", name, source),
                "Fix the `pattern` of this entry in the `bots` list; patterns use Rust regex syntax.",
            ),
            PrerenderError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("playwright npm package is missing") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Install Playwright (e.g., `npm install playwright` and `npx playwright install chromium`).",
                    )
                } else if lower.contains("not found on path") || lower.contains("node command") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Install Node.js and ensure the node binary is on PATH, or set `renderer.node_command`.",
                    )
                } else if lower.contains("configuration file not found") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Create prerender.toml next to the executable or pass --config PATH.",
                    )
                } else if lower.contains("origin") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Set `server.origin` in the config file or pass --origin URL.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check the config file and command-line flags.",
                    )
                }
            }
            PrerenderError::Render(msg) => {
                if msg.to_ascii_lowercase().contains("timeout")
                    || msg.to_ascii_lowercase().contains("timed out")
                {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Increase `renderer.navigation_timeout`/`renderer.process_timeout` or ensure the page reaches network idle.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Render,
                        msg.to_string(),
                        "Verify the URL is reachable from this host; rerun with --verbose.",
                    )
                }
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, PrerenderError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Io,
    Render,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
