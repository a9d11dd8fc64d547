//! Generic engine over launchable rendering contexts.
//!
//! A [`ContextLauncher`] hands out isolated [`RenderContext`]s (a browser
//! session, a CDP target, a fake in tests). [`IsolatedContextEngine`] drives
//! one context per render and closes it exactly once whatever happens.

use async_trait::async_trait;

use super::RenderEngine;
use crate::Result;

/// One isolated browsing context, owned by a single render.
#[async_trait]
pub trait RenderContext: Send {
    /// Navigates and waits for network activity to settle.
    async fn navigate(&mut self, url: &str) -> Result<()>;

    async fn content(&mut self) -> Result<String>;

    /// Releases the context and everything it holds.
    async fn close(self: Box<Self>) -> Result<()>;
}

#[async_trait]
pub trait ContextLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn RenderContext>>;
}

#[derive(Debug, Clone)]
pub struct IsolatedContextEngine<L> {
    launcher: L,
}

impl<L: ContextLauncher> IsolatedContextEngine<L> {
    pub fn new(launcher: L) -> Self {
        Self { launcher }
    }

    async fn drive(context: &mut dyn RenderContext, url: &str) -> Result<String> {
        context.navigate(url).await?;
        context.content().await
    }
}

#[async_trait]
impl<L: ContextLauncher> RenderEngine for IsolatedContextEngine<L> {
    async fn render_page(&self, url: &str) -> Result<String> {
        let mut context = self.launcher.launch().await?;
        let rendered = Self::drive(context.as_mut(), url).await;
        let closed = context.close().await;

        match (rendered, closed) {
            (Ok(content), Ok(())) => Ok(content),
            (Ok(_), Err(close_err)) => Err(close_err),
            (Err(err), Ok(())) => Err(err),
            (Err(err), Err(close_err)) => {
                // The render failure is what the caller needs to see.
                tracing::warn!(url, error = %close_err, "Failed to close render context");
                Err(err)
            }
        }
    }
}
