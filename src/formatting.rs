use std::fmt::Write as FmtWrite;
use std::process::ExitCode;

use prerender_lib::{ErrorOutput, PrerenderError, PrerenderOutput, PRERENDER_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Exit code for configuration and input errors.
pub const EXIT_CONFIG: u8 = 2;
/// Exit code for render failures.
pub const EXIT_RENDER: u8 = 3;

/// Print a payload to stdout in the requested format.
pub fn write_output(body: &PrerenderOutput, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            println!("{content}");
        }
        OutputFormat::Text => println!("{}", format_text(body)),
    }
}

/// Render an error and return the matching exit code.
pub fn render_error(err: PrerenderError, format: OutputFormat) -> ExitCode {
    let code = if err.is_configuration() {
        EXIT_CONFIG
    } else {
        EXIT_RENDER
    };
    let payload = PrerenderOutput::Error(ErrorOutput {
        version: PRERENDER_OUTPUT_VERSION.to_string(),
        error: err.to_payload(),
    });

    match format {
        OutputFormat::Json => write_output(&payload, format),
        OutputFormat::Text => eprintln!("{}", format_text(&payload)),
    }

    ExitCode::from(code)
}

pub fn format_text(body: &PrerenderOutput) -> String {
    let mut buf = String::new();
    match body {
        PrerenderOutput::Detect(out) => {
            let verdict = if out.bot { "bot" } else { "not a bot" };
            write!(buf, "{verdict}").ok();
            if let Some(signature) = &out.signature {
                write!(buf, " (matched {signature})").ok();
            }
        }
        PrerenderOutput::Render(out) => {
            write!(
                buf,
                "Rendered {} ({} bytes in {} ms)",
                out.url, out.bytes, out.elapsed_ms
            )
            .ok();
            if let Some(path) = &out.output {
                write!(buf, " -> {path}").ok();
            }
        }
        PrerenderOutput::Error(out) => {
            write!(buf, "Error: {}", out.error.message).ok();
            if let Some(hint) = &out.error.remediation {
                write!(buf, "\nHint: {hint}").ok();
            }
        }
    }
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use prerender_lib::{DetectOutput, ErrorCategory, ErrorPayload};

    #[test]
    fn detect_text_names_signature() {
        let body = PrerenderOutput::Detect(DetectOutput {
            version: PRERENDER_OUTPUT_VERSION.to_string(),
            user_agent: "Googlebot".to_string(),
            bot: true,
            signature: Some("googlebot".to_string()),
        });
        assert_eq!(format_text(&body), "bot (matched googlebot)");
    }

    #[test]
    fn error_text_includes_hint() {
        let body = PrerenderOutput::Error(ErrorOutput {
            version: PRERENDER_OUTPUT_VERSION.to_string(),
            error: ErrorPayload::new(ErrorCategory::Config, "missing".to_string(), "add it"),
        });
        assert_eq!(format_text(&body), "Error: missing\nHint: add it");
    }
}
