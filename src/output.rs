use serde::{Deserialize, Serialize};

use crate::error::ErrorPayload;

/// Schema version for output payloads.
pub const PRERENDER_OUTPUT_VERSION: &str = "0.1.0";

/// JSON payloads printed by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum PrerenderOutput {
    Detect(DetectOutput),
    Render(RenderOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetectOutput {
    pub version: String,
    pub user_agent: String,
    pub bot: bool,
    /// Name of the first matching signature.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOutput {
    pub version: String,
    pub url: String,
    pub bytes: usize,
    pub elapsed_ms: u64,
    /// Where the HTML was written; absent when it went to stdout.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn detect_output_is_tagged_with_mode() {
        let body = PrerenderOutput::Detect(DetectOutput {
            version: PRERENDER_OUTPUT_VERSION.to_string(),
            user_agent: "Googlebot/2.1".to_string(),
            bot: true,
            signature: Some("googlebot".to_string()),
        });
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(value["mode"], "detect");
        assert_eq!(value["userAgent"], "Googlebot/2.1");
        assert_eq!(value["signature"], "googlebot");
    }

    #[test]
    fn error_output_round_trips() {
        let body = PrerenderOutput::Error(ErrorOutput {
            version: PRERENDER_OUTPUT_VERSION.to_string(),
            error: ErrorPayload::new(ErrorCategory::Render, "boom".to_string(), "retry"),
        });
        let json = serde_json::to_string(&body).unwrap();
        match serde_json::from_str::<PrerenderOutput>(&json).unwrap() {
            PrerenderOutput::Error(out) => assert_eq!(out.error.category, ErrorCategory::Render),
            other => panic!("expected error output, got {other:?}"),
        }
    }
}
