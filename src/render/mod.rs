//! Page rendering through a headless browser.
//!
//! # Module Structure
//!
//! - [`orchestrator`] - `RenderOrchestrator`, the entry point callers use
//! - [`engine`] - `PlaywrightEngine`, one Node.js + Playwright process per render
//! - [`context`] - `IsolatedContextEngine`, a generic engine over launchable contexts
//! - [`playwright`] - Playwright script, availability checks and error mapping
//!
//! # Example
//!
//! ```no_run
//! use prerender_lib::{PlaywrightEngine, PlaywrightOptions, RenderOrchestrator};
//! use std::sync::Arc;
//!
//! # async fn example() -> prerender_lib::Result<()> {
//! let engine = PlaywrightEngine::new(PlaywrightOptions::default());
//! let orchestrator = RenderOrchestrator::new(Arc::new(engine));
//! let html = orchestrator.prerender("https://example.com").await?;
//! println!("{} bytes", html.len());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;

use crate::Result;

mod context;
mod engine;
mod orchestrator;
mod playwright;

pub use context::{ContextLauncher, IsolatedContextEngine, RenderContext};
pub use engine::{
    PlaywrightEngine, PlaywrightOptions, Viewport, DEFAULT_NAVIGATION_TIMEOUT,
    DEFAULT_PROCESS_TIMEOUT,
};
pub use orchestrator::RenderOrchestrator;

/// Renders a URL to its serialized document.
///
/// Implementations acquire a fresh rendering context per call, wait for the
/// page's network activity to settle, and release everything they acquired
/// before returning, on success and on failure alike.
#[async_trait]
pub trait RenderEngine: Send + Sync {
    async fn render_page(&self, url: &str) -> Result<String>;
}
