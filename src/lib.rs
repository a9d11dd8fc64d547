//! Prerender Library
//!
//! Serves fully rendered HTML to crawlers that cannot execute client-side
//! JavaScript, while leaving browser traffic alone.
//!
//! # Module Overview
//!
//! - [`bot`] - User-Agent classification against configured bot signatures
//! - [`cache`] - Expiring key/value store with lazy eviction
//! - [`render`] - Render engines and the `RenderOrchestrator`
//! - [`service`] - Bot gate + cache + render composition
//! - [`server`] - Demo HTTP listener built on the service
//! - [`config`] - Configuration file support
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use prerender_lib::{
//!     BotMatcher, PlaywrightEngine, PlaywrightOptions, PrerenderService, RenderOrchestrator,
//!     TtlCache,
//! };
//! use std::sync::Arc;
//!
//! # async fn example() -> prerender_lib::Result<()> {
//! let orchestrator =
//!     RenderOrchestrator::new(Arc::new(PlaywrightEngine::new(PlaywrightOptions::default())));
//! let service = PrerenderService::new(
//!     BotMatcher::with_defaults()?,
//!     Arc::new(TtlCache::new()),
//!     orchestrator,
//!     3600,
//! );
//!
//! let outcome = service
//!     .handle(Some("Mozilla/5.0 (compatible; Googlebot/2.1)"), "https://example.com/")
//!     .await?;
//! println!("{:?}", outcome.content().map(str::len));
//! # Ok(())
//! # }
//! ```

pub mod bot;
pub mod cache;
pub mod config;
pub mod error;
pub mod output;
pub mod render;
pub mod server;
pub mod service;

pub use bot::{BotMatcher, BotSignature, SignatureDef};
pub use cache::TtlCache;
pub use config::{Config, ConfigProvider, CONFIG_FILE_NAME};
pub use error::{ErrorCategory, ErrorPayload, PrerenderError, Result};
pub use output::{
    DetectOutput, ErrorOutput, PrerenderOutput, RenderOutput, PRERENDER_OUTPUT_VERSION,
};
pub use render::{
    ContextLauncher, IsolatedContextEngine, PlaywrightEngine, PlaywrightOptions, RenderContext,
    RenderEngine, RenderOrchestrator, Viewport,
};
pub use server::{create_router, ServerState, CACHE_STATUS_HEADER};
pub use service::{PrerenderService, Prerendered};
