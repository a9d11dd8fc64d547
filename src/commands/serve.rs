use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use prerender_lib::config::parse_origin;
use prerender_lib::{
    ConfigProvider, PlaywrightEngine, PrerenderError, PrerenderService, RenderOrchestrator,
    ServerState, TtlCache,
};

use crate::cli::OutputFormat;
use crate::formatting::render_error;

/// Run the demo listener until it fails or the process is stopped.
pub async fn run_serve(
    provider: &ConfigProvider,
    listen: Option<SocketAddr>,
    origin: Option<String>,
    format: OutputFormat,
) -> ExitCode {
    let config = provider.get();
    let origin = match origin.or_else(|| config.server.origin.clone()) {
        Some(origin) => origin,
        None => {
            return render_error(
                PrerenderError::config("No origin configured; the listener needs a site to prerender"),
                format,
            )
        }
    };
    let origin = match parse_origin(&origin) {
        Ok(url) => url,
        Err(err) => return render_error(err, format),
    };

    let engine = PlaywrightEngine::new(config.playwright_options());
    if let Err(err) = engine.check_available().await {
        return render_error(err, format);
    }

    let service = PrerenderService::new(
        provider.matcher().clone(),
        Arc::new(TtlCache::new()),
        RenderOrchestrator::new(Arc::new(engine)),
        config.cache.ttl_seconds(),
    );
    let state = ServerState::new(Arc::new(service), origin);
    let addr = listen.unwrap_or(config.server.listen);

    match prerender_lib::server::serve(addr, state).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => render_error(err, format),
    }
}
