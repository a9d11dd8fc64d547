//! Bot-gated, cached prerendering.
//!
//! `PrerenderService` is the composition of the three core pieces: the
//! matcher decides whether a request is prerendered at all, the cache is
//! consulted by URL, and the orchestrator renders on a miss.

use std::sync::Arc;

use crate::bot::BotMatcher;
use crate::cache::TtlCache;
use crate::render::RenderOrchestrator;
use crate::Result;

/// What the service did with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prerendered {
    /// Not a bot; the caller should serve the request normally.
    PassThrough,
    Cached(String),
    Rendered(String),
}

impl Prerendered {
    pub fn content(&self) -> Option<&str> {
        match self {
            Prerendered::PassThrough => None,
            Prerendered::Cached(html) | Prerendered::Rendered(html) => Some(html),
        }
    }

    pub fn into_content(self) -> Option<String> {
        match self {
            Prerendered::PassThrough => None,
            Prerendered::Cached(html) | Prerendered::Rendered(html) => Some(html),
        }
    }

    pub fn is_cache_hit(&self) -> bool {
        matches!(self, Prerendered::Cached(_))
    }
}

#[derive(Debug, Clone)]
pub struct PrerenderService {
    matcher: BotMatcher,
    cache: Arc<TtlCache<String>>,
    orchestrator: RenderOrchestrator,
    ttl_seconds: i64,
}

impl PrerenderService {
    /// The cache is injected so several services (or tests) can share or
    /// isolate it.
    pub fn new(
        matcher: BotMatcher,
        cache: Arc<TtlCache<String>>,
        orchestrator: RenderOrchestrator,
        ttl_seconds: i64,
    ) -> Self {
        Self {
            matcher,
            cache,
            orchestrator,
            ttl_seconds,
        }
    }

    pub fn cache(&self) -> &TtlCache<String> {
        &self.cache
    }

    /// Renders `url` for bot traffic, serving from cache when possible.
    ///
    /// Failed renders are not cached. Concurrent misses for the same URL each
    /// render independently.
    pub async fn handle(&self, user_agent: Option<&str>, url: &str) -> Result<Prerendered> {
        let Some(signature) = self.matcher.matching(user_agent) else {
            return Ok(Prerendered::PassThrough);
        };

        if let Some(html) = self.cache.get(url) {
            tracing::debug!(url, bot = signature.name(), "Serving cached render");
            return Ok(Prerendered::Cached(html));
        }

        tracing::info!(url, bot = signature.name(), "Cache miss; prerendering");
        let html = self.orchestrator.prerender(url).await?;
        self.cache.set(url, html.clone(), self.ttl_seconds);
        Ok(Prerendered::Rendered(html))
    }
}
