use std::sync::Arc;

use url::Url;

use super::RenderEngine;
use crate::{PrerenderError, Result};

/// Requests rendered content for a URL from a [`RenderEngine`].
///
/// No retries, no fallback content, no deduplication of concurrent requests
/// for the same URL. Each render runs on its own task, so a caller that
/// stops awaiting does not interrupt the render or its cleanup.
#[derive(Clone)]
pub struct RenderOrchestrator {
    engine: Arc<dyn RenderEngine>,
}

impl std::fmt::Debug for RenderOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderOrchestrator").finish_non_exhaustive()
    }
}

impl RenderOrchestrator {
    pub fn new(engine: Arc<dyn RenderEngine>) -> Self {
        Self { engine }
    }

    /// Renders `url`, which must be absolute. Engine failures are logged and
    /// returned unchanged.
    #[tracing::instrument(skip(self))]
    pub async fn prerender(&self, url: &str) -> Result<String> {
        let parsed = Url::parse(url)?;
        if parsed.cannot_be_a_base() {
            return Err(PrerenderError::invalid_url(format!(
                "cannot prerender non-hierarchical URL {url}"
            )));
        }

        let engine = Arc::clone(&self.engine);
        let target = url.to_string();
        let task = tokio::spawn(async move { engine.render_page(&target).await });

        let result = match task.await {
            Ok(result) => result,
            Err(join_err) => Err(PrerenderError::render(format!(
                "Render task aborted: {join_err}"
            ))),
        };

        if let Err(err) = &result {
            tracing::error!(error = %err, "Error during prerendering");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct EchoEngine {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RenderEngine for EchoEngine {
        async fn render_page(&self, url: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(format!("<html><body>{url}</body></html>"))
        }
    }

    struct FailingEngine;

    #[async_trait]
    impl RenderEngine for FailingEngine {
        async fn render_page(&self, url: &str) -> Result<String> {
            Err(PrerenderError::render(format!("navigation to {url} failed")))
        }
    }

    struct SlowEngine {
        finished: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl RenderEngine for SlowEngine {
        async fn render_page(&self, _url: &str) -> Result<String> {
            tokio::time::sleep(Duration::from_millis(50)).await;
            self.finished.fetch_add(1, Ordering::SeqCst);
            Ok("late".to_string())
        }
    }

    #[tokio::test]
    async fn returns_engine_content_unchanged() {
        let engine = Arc::new(EchoEngine {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = RenderOrchestrator::new(engine.clone());

        let html = orchestrator.prerender("https://example.com/a?b=c").await.unwrap();
        assert_eq!(html, "<html><body>https://example.com/a?b=c</body></html>");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn propagates_engine_failure_verbatim() {
        let orchestrator = RenderOrchestrator::new(Arc::new(FailingEngine));

        let err = orchestrator
            .prerender("https://example.com/")
            .await
            .unwrap_err();
        match err {
            PrerenderError::Render(msg) => {
                assert_eq!(msg, "navigation to https://example.com/ failed")
            }
            other => panic!("expected render error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn relative_url_is_rejected_before_rendering() {
        let engine = Arc::new(EchoEngine {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = RenderOrchestrator::new(engine.clone());

        let err = orchestrator.prerender("/about").await.unwrap_err();
        assert!(matches!(err, PrerenderError::InvalidUrl(_)));
        let err = orchestrator.prerender("mailto:team@example.com").await.unwrap_err();
        assert!(matches!(err, PrerenderError::InvalidUrl(_)), "got {err:?}");
        assert_eq!(engine.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn concurrent_calls_are_not_collapsed() {
        let engine = Arc::new(EchoEngine {
            calls: AtomicUsize::new(0),
        });
        let orchestrator = RenderOrchestrator::new(engine.clone());

        let calls = (0..5).map(|_| orchestrator.prerender("https://example.com/"));
        let results = futures::future::join_all(calls).await;
        assert!(results.iter().all(|r| r.is_ok()));
        assert_eq!(engine.calls.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn abandoned_call_still_finishes_render() {
        let finished = Arc::new(AtomicUsize::new(0));
        let orchestrator = RenderOrchestrator::new(Arc::new(SlowEngine {
            finished: finished.clone(),
        }));

        let abandoned = tokio::time::timeout(
            Duration::from_millis(5),
            orchestrator.prerender("https://example.com/"),
        )
        .await;
        assert!(abandoned.is_err());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(finished.load(Ordering::SeqCst), 1);
    }
}
