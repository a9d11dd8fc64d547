//! Static configuration loaded once at startup.
//!
//! The file is TOML. Every section is optional, but the file itself is not:
//! a missing file stops the process instead of silently running on defaults.
//!
//! ```toml
//! bots = [
//!   "googlebot",
//!   { name = "baidu", pattern = "baiduspider", sample = "Mozilla/5.0 (compatible; Baiduspider/2.0)" },
//! ]
//!
//! [cache]
//! ttl = "1h"
//!
//! [renderer]
//! node_command = "node"
//! navigation_timeout = "30s"
//! process_timeout = "45s"
//! max_concurrent_sessions = 2
//! viewport = { width = 1440, height = 900 }
//!
//! [server]
//! listen = "127.0.0.1:39101"
//! origin = "https://www.example.com"
//! ```

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use url::Url;

use crate::bot::{default_signatures, BotMatcher, SignatureDef};
use crate::render::{PlaywrightOptions, Viewport};
use crate::{PrerenderError, Result};

/// File name looked up beside the executable.
pub const CONFIG_FILE_NAME: &str = "prerender.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub bots: Vec<SignatureDef>,
    pub cache: CacheConfig,
    pub renderer: RendererConfig,
    pub server: ServerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bots: default_signatures(),
            cache: CacheConfig::default(),
            renderer: RendererConfig::default(),
            server: ServerConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60 * 60),
        }
    }
}

impl CacheConfig {
    pub fn ttl_seconds(&self) -> i64 {
        i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    pub node_command: String,
    pub headless: bool,
    pub viewport: Viewport,
    #[serde(with = "humantime_serde")]
    pub navigation_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub process_timeout: Duration,
    pub max_concurrent_sessions: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        let defaults = PlaywrightOptions::default();
        Self {
            node_command: defaults.node_command,
            headless: defaults.headless,
            viewport: defaults.viewport,
            navigation_timeout: defaults.navigation_timeout,
            process_timeout: defaults.process_timeout,
            max_concurrent_sessions: defaults.max_concurrent_sessions,
        }
    }
}

impl From<&RendererConfig> for PlaywrightOptions {
    fn from(cfg: &RendererConfig) -> Self {
        Self {
            node_command: cfg.node_command.clone(),
            viewport: cfg.viewport,
            headless: cfg.headless,
            navigation_timeout: cfg.navigation_timeout,
            process_timeout: cfg.process_timeout,
            max_concurrent_sessions: cfg.max_concurrent_sessions,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub listen: SocketAddr,
    /// Site whose pages are prerendered; request paths are resolved against it.
    pub origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: SocketAddr::from(([127, 0, 0, 1], 39101)),
            origin: None,
        }
    }
}

impl Config {
    /// `prerender.toml` in the directory holding the running executable.
    pub fn colocated_path() -> Result<PathBuf> {
        let exe = std::env::current_exe()?;
        let dir = exe.parent().ok_or_else(|| {
            PrerenderError::config(format!("Executable {} has no parent directory", exe.display()))
        })?;
        Ok(dir.join(CONFIG_FILE_NAME))
    }

    /// Reads, parses and validates the file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PrerenderError::config(format!(
                "Configuration file not found at {}",
                path.display()
            )));
        }
        let raw = fs::read_to_string(path)?;
        let cfg = Self::from_toml(&raw).map_err(|e| match e {
            PrerenderError::Config(msg) => {
                PrerenderError::config(format!("{} ({})", msg, path.display()))
            }
            other => other,
        })?;
        tracing::debug!(path = %path.display(), bots = cfg.bots.len(), "Loaded configuration");
        Ok(cfg)
    }

    pub fn from_toml(raw: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(raw)
            .map_err(|e| PrerenderError::config(format!("Failed to parse config: {}", e)))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        self.bot_matcher()?;
        if self.renderer.node_command.trim().is_empty() {
            return Err(PrerenderError::config("renderer.node_command must not be empty"));
        }
        if self.renderer.viewport.width == 0 || self.renderer.viewport.height == 0 {
            return Err(PrerenderError::config(
                "renderer.viewport width and height must be positive",
            ));
        }
        if self.renderer.process_timeout.is_zero() || self.renderer.navigation_timeout.is_zero() {
            return Err(PrerenderError::config("renderer timeouts must be positive"));
        }
        if let Some(origin) = &self.server.origin {
            parse_origin(origin)?;
        }
        Ok(())
    }

    pub fn bot_matcher(&self) -> Result<BotMatcher> {
        BotMatcher::new(&self.bots)
    }

    pub fn playwright_options(&self) -> PlaywrightOptions {
        PlaywrightOptions::from(&self.renderer)
    }
}

/// Origins must be absolute http(s) URLs.
pub fn parse_origin(origin: &str) -> Result<Url> {
    let url = Url::parse(origin)?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(PrerenderError::config(format!(
            "server.origin must use http or https, got '{}'",
            other
        ))),
    }
}

/// Loads configuration once and hands out the pieces built from it.
#[derive(Debug, Clone)]
pub struct ConfigProvider {
    path: PathBuf,
    config: Config,
    matcher: BotMatcher,
}

impl ConfigProvider {
    /// Loads from `path`, or from [`Config::colocated_path`] when `None`.
    pub fn new(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => Config::colocated_path()?,
        };
        let config = Config::load(&path)?;
        let matcher = config.bot_matcher()?;
        Ok(Self {
            path,
            config,
            matcher,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self) -> &Config {
        &self.config
    }

    pub fn matcher(&self) -> &BotMatcher {
        &self.matcher
    }
}
