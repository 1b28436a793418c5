// src/scrape/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const ENV_PATH: &str = "QUOTES_CONFIG_PATH";

pub const DEFAULT_PER_SOURCE_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_OVERALL_DEADLINE_SECS: u64 = 6;
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub enabled: bool,
    /// Overrides the built-in base URL; used by tests to point at stubs.
    pub base_url: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    pub toscrape: SiteConfig,
    pub goodreads: SiteConfig,
    pub per_source_timeout_secs: u64,
    pub overall_deadline_secs: u64,
    /// 0 disables the response cache.
    pub cache_ttl_secs: u64,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            toscrape: SiteConfig::default(),
            goodreads: SiteConfig::default(),
            per_source_timeout_secs: DEFAULT_PER_SOURCE_TIMEOUT_SECS,
            overall_deadline_secs: DEFAULT_OVERALL_DEADLINE_SECS,
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
        }
    }
}

impl ScrapeConfig {
    pub fn per_source_timeout(&self) -> Duration {
        Duration::from_secs(self.per_source_timeout_secs)
    }

    pub fn overall_deadline(&self) -> Duration {
        Duration::from_secs(self.overall_deadline_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

/// Load config from an explicit path. Supports TOML or JSON formats.
pub fn load_from(path: &Path) -> Result<ScrapeConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading scrape config from {}", path.display()))?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();
    parse_config(&content, ext.as_str())
}

/// Load config using env var + fallbacks:
/// 1) $QUOTES_CONFIG_PATH
/// 2) config/sources.toml
/// 3) config/sources.json
/// Built-in defaults when none exist.
pub fn load_default() -> Result<ScrapeConfig> {
    if let Ok(p) = std::env::var(ENV_PATH) {
        let pb = PathBuf::from(p);
        if pb.exists() {
            return load_from(&pb);
        }
        return Err(anyhow!("QUOTES_CONFIG_PATH points to non-existent path"));
    }
    let toml_p = PathBuf::from("config/sources.toml");
    if toml_p.exists() {
        return load_from(&toml_p);
    }
    let json_p = PathBuf::from("config/sources.json");
    if json_p.exists() {
        return load_from(&json_p);
    }
    Ok(ScrapeConfig::default())
}

fn parse_config(s: &str, hint_ext: &str) -> Result<ScrapeConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("parsing scrape config json");
    }
    if let Ok(v) = toml::from_str(s) {
        return Ok(v);
    }
    serde_json::from_str(s).context("unsupported scrape config format")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{env, fs};

    #[test]
    fn toml_and_json_formats_parse() {
        let toml_s = r#"
            cache_ttl_secs = 0

            [goodreads]
            enabled = false
        "#;
        let cfg = parse_config(toml_s, "toml").unwrap();
        assert!(cfg.toscrape.enabled);
        assert!(!cfg.goodreads.enabled);
        assert_eq!(cfg.cache_ttl_secs, 0);
        assert_eq!(cfg.per_source_timeout_secs, DEFAULT_PER_SOURCE_TIMEOUT_SECS);

        let json_s = r#"{"toscrape": {"base_url": "http://localhost:9999"}}"#;
        let cfg = parse_config(json_s, "json").unwrap();
        assert_eq!(
            cfg.toscrape.base_url.as_deref(),
            Some("http://localhost:9999")
        );
        assert!(cfg.goodreads.enabled);
    }

    #[serial_test::serial]
    #[test]
    fn default_uses_env_then_fallbacks() {
        // Isolate CWD in a temp dir so a real config/ in the repo can't interfere.
        let old = env::current_dir().unwrap();
        let tmp = tempfile::tempdir().unwrap();
        env::set_current_dir(tmp.path()).unwrap();

        env::remove_var(ENV_PATH);

        // No files in the temp CWD: built-in defaults.
        let cfg = load_default().unwrap();
        assert_eq!(cfg.overall_deadline_secs, DEFAULT_OVERALL_DEADLINE_SECS);

        // Env var takes precedence.
        let p_json = tmp.path().join("sources.json");
        fs::write(&p_json, r#"{"overall_deadline_secs": 3}"#).unwrap();
        env::set_var(ENV_PATH, p_json.display().to_string());
        let cfg = load_default().unwrap();
        assert_eq!(cfg.overall_deadline_secs, 3);
        env::remove_var(ENV_PATH);

        env::set_current_dir(&old).unwrap();
    }
}
