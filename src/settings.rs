use std::path::Path;

use prerender_lib::{Config, ConfigProvider, PrerenderError};

/// Load the config once at startup. A missing file is fatal.
pub fn load_provider(path: Option<&Path>) -> Result<ConfigProvider, PrerenderError> {
    let provider = ConfigProvider::new(path)?;
    tracing::debug!(
        "{}",
        format_effective_config(provider.get(), Some(provider.path()))
    );
    Ok(provider)
}

/// Format effective config as a single-line string.
pub fn format_effective_config(config: &Config, source: Option<&Path>) -> String {
    let source = source
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());
    format!(
        "Effective config [{source}]: bots={}, cache ttl={}s, renderer: node={}, viewport={}x{}, nav={}s, process={}s, sessions={}, server: listen={}, origin={}",
        config.bots.len(),
        config.cache.ttl_seconds(),
        config.renderer.node_command,
        config.renderer.viewport.width,
        config.renderer.viewport.height,
        config.renderer.navigation_timeout.as_secs(),
        config.renderer.process_timeout.as_secs(),
        config.renderer.max_concurrent_sessions,
        config.server.listen,
        config.server.origin.as_deref().unwrap_or("-"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_effective_config_includes_all_fields() {
        let summary = format_effective_config(&Config::default(), Some(Path::new("prerender.toml")));
        assert!(summary.contains("[prerender.toml]"));
        assert!(summary.contains("bots=6"));
        assert!(summary.contains("ttl=3600s"));
        assert!(summary.contains("viewport=1440x900"));
        assert!(summary.contains("nav=30s"));
        assert!(summary.contains("process=45s"));
        assert!(summary.contains("listen=127.0.0.1:39101"));
        assert!(summary.contains("origin=-"));
    }

    #[test]
    fn load_provider_fails_for_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_provider(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(err.is_configuration());
    }
}
