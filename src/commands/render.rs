use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use prerender_lib::{
    ConfigProvider, PlaywrightEngine, PrerenderOutput, RenderOrchestrator, RenderOutput,
    PRERENDER_OUTPUT_VERSION,
};

use crate::cli::OutputFormat;
use crate::formatting::{render_error, write_output};

/// Run the render command.
///
/// Without `--output` the HTML itself goes to stdout and nothing else is
/// printed there; with it, a summary is printed instead.
pub async fn run_render(
    provider: &ConfigProvider,
    url: String,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> ExitCode {
    let engine = PlaywrightEngine::new(provider.get().playwright_options());
    if let Err(err) = engine.check_available().await {
        return render_error(err, format);
    }
    let orchestrator = RenderOrchestrator::new(Arc::new(engine));

    let start = Instant::now();
    let html = match orchestrator.prerender(&url).await {
        Ok(html) => html,
        Err(err) => return render_error(err, format),
    };
    let elapsed_ms = start.elapsed().as_millis() as u64;

    match output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                if let Err(err) = std::fs::create_dir_all(parent) {
                    return render_error(err.into(), format);
                }
            }
            if let Err(err) = std::fs::write(&path, &html) {
                return render_error(err.into(), format);
            }
            let body = PrerenderOutput::Render(RenderOutput {
                version: PRERENDER_OUTPUT_VERSION.to_string(),
                url,
                bytes: html.len(),
                elapsed_ms,
                output: Some(path.display().to_string()),
            });
            write_output(&body, format);
        }
        None => {
            println!("{html}");
            tracing::info!(url = %url, bytes = html.len(), elapsed_ms, "Rendered page");
        }
    }
    ExitCode::SUCCESS
}
