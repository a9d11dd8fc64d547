//! Playwright-backed render engine.
//!
//! Each render spawns one Node.js process running [`RENDER_SCRIPT`], which
//! owns a private chromium instance for the lifetime of that render. A
//! semaphore bounds how many of those processes run at once.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::io::AsyncReadExt;
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::time::timeout;

use super::playwright::{
    ensure_node_available, ensure_playwright_available, map_playwright_error,
    map_playwright_status_error, map_spawn_error, ScriptOutput, RENDER_SCRIPT,
};
use super::RenderEngine;
use crate::{PrerenderError, Result};

/// Default timeout for page navigation, including the network-idle wait.
pub const DEFAULT_NAVIGATION_TIMEOUT: Duration = Duration::from_secs(30);

/// Default timeout for the entire Playwright process.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(45);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440,
            height: 900,
        }
    }
}

/// Configuration options for the Playwright engine.
#[derive(Debug, Clone)]
pub struct PlaywrightOptions {
    /// The Node.js command to use (default: "node").
    pub node_command: String,
    pub viewport: Viewport,
    pub headless: bool,
    /// Timeout for navigation until the network is idle.
    pub navigation_timeout: Duration,
    /// Timeout for the entire Playwright process.
    pub process_timeout: Duration,
    /// Maximum number of browser processes alive at once.
    pub max_concurrent_sessions: usize,
}

impl Default for PlaywrightOptions {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            viewport: Viewport::default(),
            headless: true,
            navigation_timeout: DEFAULT_NAVIGATION_TIMEOUT,
            process_timeout: DEFAULT_PROCESS_TIMEOUT,
            max_concurrent_sessions: 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlaywrightEngine {
    options: PlaywrightOptions,
    semaphore: Arc<Semaphore>,
}

impl PlaywrightEngine {
    pub fn new(options: PlaywrightOptions) -> Self {
        let permits = options.max_concurrent_sessions.max(1);
        Self {
            options,
            semaphore: Arc::new(Semaphore::new(permits)),
        }
    }

    /// Fails fast when node or the playwright package is missing.
    pub async fn check_available(&self) -> Result<()> {
        ensure_node_available(&self.options.node_command).await?;
        ensure_playwright_available(&self.options.node_command).await
    }

    async fn run_playwright(&self, url: &str) -> Result<String> {
        let mut cmd = Command::new(&self.options.node_command);
        cmd.arg("-e")
            .arg(RENDER_SCRIPT)
            .arg(url)
            .arg(self.options.viewport.width.to_string())
            .arg(self.options.viewport.height.to_string())
            .arg(self.options.navigation_timeout.as_millis().to_string())
            .arg(if self.options.headless { "1" } else { "0" })
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let start = Instant::now();
        let mut child = cmd
            .spawn()
            .map_err(|err| map_spawn_error(err, &self.options.node_command))?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        let stdout_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut out) = stdout_pipe {
                let _ = out.read_to_end(&mut buf).await;
            }
            buf
        });

        let stderr_task = tokio::spawn(async move {
            let mut buf = Vec::new();
            if let Some(mut err) = stderr_pipe {
                let _ = err.read_to_end(&mut buf).await;
            }
            buf
        });

        let status = match timeout(self.options.process_timeout, child.wait()).await {
            Ok(Ok(status)) => status,
            Ok(Err(err)) => return Err(PrerenderError::Io(err)),
            Err(_) => {
                let _ = child.kill().await;
                let _ = child.wait().await;
                return Err(PrerenderError::Render(format!(
                    "Playwright timed out after {:?} rendering {}",
                    self.options.process_timeout, url
                )));
            }
        };

        let stdout = stdout_task.await.unwrap_or_default();
        let stderr = stderr_task.await.unwrap_or_default();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(map_playwright_error(status.to_string(), &stderr));
        }

        let stdout = String::from_utf8_lossy(&stdout);
        let output: ScriptOutput = serde_json::from_str(stdout.trim()).map_err(|e| {
            PrerenderError::Render(format!(
                "Failed to parse Playwright output: {} - raw: {}",
                e,
                stdout.trim()
            ))
        })?;

        if output.status != "ok" {
            let message = output
                .message
                .unwrap_or_else(|| "no additional details".to_string());
            return Err(map_playwright_status_error(&output.status, message));
        }

        let content = output.content.ok_or_else(|| {
            PrerenderError::Render("Playwright returned ok status but no content".to_string())
        })?;

        tracing::debug!(
            url,
            bytes = content.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Rendered page"
        );
        Ok(content)
    }
}

#[async_trait]
impl RenderEngine for PlaywrightEngine {
    async fn render_page(&self, url: &str) -> Result<String> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| PrerenderError::Config("Render engine unavailable".to_string()))?;

        self.run_playwright(url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn playwright_options_default_values() {
        let opts = PlaywrightOptions::default();
        assert_eq!(opts.node_command, "node");
        assert!(opts.headless);
        assert_eq!(opts.max_concurrent_sessions, 2);
        assert_eq!(opts.viewport.width, 1440);
        assert_eq!(opts.viewport.height, 900);
        assert_eq!(opts.navigation_timeout, DEFAULT_NAVIGATION_TIMEOUT);
        assert_eq!(opts.process_timeout, DEFAULT_PROCESS_TIMEOUT);
    }

    #[test]
    fn semaphore_never_zero() {
        let engine = PlaywrightEngine::new(PlaywrightOptions {
            max_concurrent_sessions: 0,
            ..PlaywrightOptions::default()
        });

        assert_eq!(engine.semaphore.available_permits(), 1);
    }

    #[tokio::test]
    async fn render_fails_fast_without_node() {
        let engine = PlaywrightEngine::new(PlaywrightOptions {
            node_command: "definitely-not-a-binary".to_string(),
            ..PlaywrightOptions::default()
        });

        let err = engine
            .render_page("https://example.com")
            .await
            .unwrap_err();
        assert!(err.is_configuration(), "got {err:?}");
        assert_eq!(engine.semaphore.available_permits(), 2);
    }

    #[tokio::test]
    async fn render_waits_for_a_session_before_spawning_anything() {
        let engine = PlaywrightEngine::new(PlaywrightOptions {
            node_command: "definitely-not-a-binary".to_string(),
            max_concurrent_sessions: 1,
            ..PlaywrightOptions::default()
        });
        let held = engine.semaphore.clone().acquire_owned().await.unwrap();

        let blocked = timeout(
            Duration::from_millis(50),
            engine.render_page("https://example.com"),
        )
        .await;
        assert!(blocked.is_err(), "render must not touch node without a permit");

        drop(held);
        let err = engine.render_page("https://example.com").await.unwrap_err();
        assert!(err.is_configuration(), "got {err:?}");
        assert_eq!(engine.semaphore.available_permits(), 1);
    }

    #[tokio::test]
    async fn check_available_fails_without_node() {
        let engine = PlaywrightEngine::new(PlaywrightOptions {
            node_command: "definitely-not-a-binary".to_string(),
            ..PlaywrightOptions::default()
        });
        assert!(engine.check_available().await.is_err());
    }
}
