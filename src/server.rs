//! Demo HTTP listener fronting an origin site.
//!
//! Bots get prerendered HTML for the requested path; everyone else is
//! redirected to the origin untouched.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Json, Redirect, Response},
    routing::get,
    Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::service::{PrerenderService, Prerendered};
use crate::{PrerenderError, Result};

/// Response header reporting whether the body came from cache.
pub const CACHE_STATUS_HEADER: &str = "x-prerender-cache";

/// Server state shared by all handlers.
#[derive(Clone)]
pub struct ServerState {
    service: Arc<PrerenderService>,
    origin: Url,
}

impl ServerState {
    pub fn new(service: Arc<PrerenderService>, origin: Url) -> Self {
        Self { service, origin }
    }

    /// URL on the origin for a request's path and query. Scheme, host and
    /// port always come from the origin, whatever the path looks like.
    fn target_url(&self, uri: &Uri) -> Url {
        let mut target = self.origin.clone();
        target.set_path(uri.path());
        target.set_query(uri.query());
        target
    }
}

pub fn create_router(state: ServerState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .fallback(prerender_page)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: SocketAddr, state: ServerState) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, origin = %state.origin, "Prerender server listening");
    axum::serve(listener, create_router(state)).await?;
    Ok(())
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}

async fn prerender_page(
    State(state): State<ServerState>,
    method: Method,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    if method != Method::GET && method != Method::HEAD {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            [(header::ALLOW, "GET, HEAD")],
            "Only GET requests are prerendered",
        )
            .into_response();
    }
    let target = state.target_url(&uri);
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|value| value.to_str().ok());

    match state.service.handle(user_agent, target.as_str()).await {
        Ok(Prerendered::PassThrough) => Redirect::temporary(target.as_str()).into_response(),
        Ok(outcome) => {
            let cache_status = if outcome.is_cache_hit() { "hit" } else { "miss" };
            let html = outcome.into_content().unwrap_or_default();
            let mut response = (
                [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
                html,
            )
                .into_response();
            response
                .headers_mut()
                .insert(CACHE_STATUS_HEADER, HeaderValue::from_static(cache_status));
            response
        }
        Err(err) => render_error_response(&err),
    }
}

/// Only a malformed request URL is the client's fault.
fn render_error_response(err: &PrerenderError) -> Response {
    let status = match err {
        PrerenderError::InvalidUrl(_) => StatusCode::BAD_REQUEST,
        PrerenderError::Render(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, format!("Prerender failed: {}", err)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_failures_map_to_bad_gateway() {
        let response = render_error_response(&PrerenderError::render("timeout"));
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let response = render_error_response(&PrerenderError::invalid_url("bad url"));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn engine_configuration_faults_are_server_errors() {
        let err = PrerenderError::config("chromium executable is missing");
        let response = render_error_response(&err);
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
