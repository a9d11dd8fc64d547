//! Playwright integration for headless rendering.
//!
//! This module contains the inline render script, error mapping,
//! and availability checks for Node.js and Playwright.

use crate::{PrerenderError, Result};
use std::io;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;

/// Renders one URL and prints `{status, content}` as JSON on stdout.
///
/// The browser is closed in `finally`, so every exit path releases it.
pub(crate) const RENDER_SCRIPT: &str = r#"
const [, url, width, height, navTimeout, headlessFlag] = process.argv;

async function run() {
  let browser;
  try {
    const { chromium } = require('playwright');
    browser = await chromium.launch({ headless: headlessFlag !== '0' });
    const context = await browser.newContext({
      viewport: {
        width: parseInt(width, 10),
        height: parseInt(height, 10)
      }
    });
    const page = await context.newPage();
    const navMs = parseInt(navTimeout, 10);

    await page.goto(url, { waitUntil: 'networkidle', timeout: navMs });
    const content = await page.content();

    process.stdout.write(JSON.stringify({ status: 'ok', content }));
  } catch (err) {
    const message = err && err.message ? err.message : String(err);
    console.error(JSON.stringify({ status: 'error', message }));
    process.exitCode = 1;
  } finally {
    if (browser) {
      await browser.close();
    }
  }
}

run();
"#;

/// Timeout for checking node/playwright availability.
pub(crate) const NODE_CHECK_TIMEOUT: Duration = Duration::from_secs(5);

/// Script to check if Playwright is installed.
const PLAYWRIGHT_CHECK_SCRIPT: &str = "require('playwright'); process.stdout.write('ok');";

/// Output of [`RENDER_SCRIPT`].
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptOutput {
    pub status: String,
    pub content: Option<String>,
    pub message: Option<String>,
}

/// Error result from the render script.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ScriptError {
    pub status: String,
    pub message: String,
}

pub(crate) fn map_spawn_error(err: io::Error, command: &str) -> PrerenderError {
    if err.kind() == io::ErrorKind::NotFound {
        PrerenderError::Config(format!(
            "Unable to spawn Playwright helper; '{}' was not found on PATH",
            command
        ))
    } else {
        PrerenderError::Io(err)
    }
}

/// Maps the helper's stderr to an error. Missing tooling is a configuration
/// problem; anything else is a render failure.
pub(crate) fn map_playwright_error(status_text: impl Into<String>, stderr: &str) -> PrerenderError {
    if let Ok(error) = serde_json::from_str::<ScriptError>(stderr.trim()) {
        return map_playwright_status_error(&error.status, error.message);
    }

    let lower = stderr.to_ascii_lowercase();

    if lower.contains("cannot find module 'playwright'") {
        return PrerenderError::Config(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        );
    }

    if lower.contains("timeout") {
        return PrerenderError::Render(format!(
            "Playwright timed out: {}",
            stderr.trim()
        ));
    }

    PrerenderError::Render(format!(
        "Playwright exited with status {}: {}",
        status_text.into(),
        stderr.trim()
    ))
}

pub(crate) fn map_playwright_status_error(status: &str, message: String) -> PrerenderError {
    let lower = message.to_ascii_lowercase();
    if lower.contains("cannot find module 'playwright'") {
        PrerenderError::Config(
            "Playwright npm package is missing; install with `npm install playwright`.".to_string(),
        )
    } else if lower.contains("executable doesn't exist") {
        PrerenderError::Config(format!(
            "Playwright chromium executable is missing ({}); run `npx playwright install chromium`.",
            message
        ))
    } else {
        PrerenderError::Render(format!("Playwright error (status {}): {}", status, message))
    }
}

pub(crate) async fn ensure_node_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null());

    let status = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.status())
        .await
        .map_err(|_| {
            PrerenderError::Config(format!(
                "Timed out checking node availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !status.success() {
        return Err(PrerenderError::Config(format!(
            "Node command {:?} is not available (exit {})",
            node_command, status
        )));
    }

    Ok(())
}

pub(crate) async fn ensure_playwright_available(node_command: &str) -> Result<()> {
    let mut cmd = Command::new(node_command);
    cmd.arg("-e")
        .arg(PLAYWRIGHT_CHECK_SCRIPT)
        .stdout(Stdio::null())
        .stderr(Stdio::piped());

    let output = tokio::time::timeout(NODE_CHECK_TIMEOUT, cmd.output())
        .await
        .map_err(|_| {
            PrerenderError::Config(format!(
                "Timed out checking Playwright availability after {:?}",
                NODE_CHECK_TIMEOUT
            ))
        })?
        .map_err(|err| map_spawn_error(err, node_command))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(map_playwright_error(
            format!("{:?}", output.status),
            &stderr,
        ));
    }

    Ok(())
}
