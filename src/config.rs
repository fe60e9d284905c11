use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_PORT: u16 = 8081;
pub const DEFAULT_UPSTREAM: &str = "https://api.mangadex.dev";

/// Everything the binary needs, resolved once at start-up and passed down by reference.
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub proxy: ProxyConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ProxyConfig {
    pub host: String,
    pub port: u16,
    /// Origin requests under `/api` are forwarded to, without a trailing slash.
    pub upstream_origin: String,
    /// Name used in relayed error envelopes (`<name> API error: <status>`).
    pub upstream_name: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Where the proxy's `/api` mount is reachable.
    pub base_url: String,
    pub preferred_language: String,
    pub cover_host: String,
    pub placeholder_cover: String,
    pub trending_limit: u32,
    pub timeout_secs: u64,
}

impl Default for ProxyConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            upstream_origin: DEFAULT_UPSTREAM.to_string(),
            upstream_name: "MangaDex".to_string(),
            timeout_secs: 30,
            user_agent: concat!("pixeldex/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: format!("http://localhost:{}/api", DEFAULT_PORT),
            preferred_language: "en".to_string(),
            cover_host: "https://uploads.mangadex.org".to_string(),
            placeholder_cover: "/placeholder.svg".to_string(),
            trending_limit: 20,
            timeout_secs: 30,
        }
    }
}

impl ProxyConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Config {
    /// Defaults, then the TOML file (explicit path or the per-user default), then the process environment.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut cfg = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match default_config_path() {
                Some(path) if path.exists() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config: {}", path.display()))
    }

    /// `PORT`, `PIXELDEX_UPSTREAM` and `PIXELDEX_BASE_URL`; unparseable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(port) = lookup("PORT").and_then(|s| s.trim().parse().ok()) {
            self.proxy.port = port;
        }
        if let Some(upstream) = lookup("PIXELDEX_UPSTREAM").filter(|s| !s.trim().is_empty()) {
            self.proxy.upstream_origin = upstream.trim().to_string();
        }
        if let Some(base) = lookup("PIXELDEX_BASE_URL").filter(|s| !s.trim().is_empty()) {
            self.client.base_url = base.trim().to_string();
        }
    }

    pub fn validate(&mut self) -> Result<()> {
        self.proxy.upstream_origin = normalize_origin(&self.proxy.upstream_origin)
            .with_context(|| format!("invalid upstream origin: {}", self.proxy.upstream_origin))?;
        Url::parse(&self.client.base_url)
            .with_context(|| format!("invalid client base url: {}", self.client.base_url))?;
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("dev", "pixeldex", "pixeldex")?;
    Some(proj.config_dir().join("config.toml"))
}

fn normalize_origin(raw: &str) -> Result<String> {
    let url = Url::parse(raw.trim())?;
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_match_documented_values() {
        let cfg = Config::default();
        assert_eq!(cfg.proxy.port, 8081);
        assert_eq!(cfg.proxy.upstream_origin, "https://api.mangadex.dev");
        assert_eq!(cfg.client.base_url, "http://localhost:8081/api");
        assert_eq!(cfg.client.preferred_language, "en");
        assert_eq!(cfg.client.trending_limit, 20);
    }

    #[test]
    fn port_comes_from_environment() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("PORT", "9000")]));
        assert_eq!(cfg.proxy.port, 9000);
    }

    #[test]
    fn bad_port_keeps_default() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("PORT", "not-a-port")]));
        assert_eq!(cfg.proxy.port, DEFAULT_PORT);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[proxy]\nport = 7000\nupstream_origin = \"http://localhost:1234/\"\n\n[client]\npreferred_language = \"ja\"\n",
        )
        .unwrap();

        let mut cfg = Config::from_file(&path).unwrap();
        cfg.validate().unwrap();
        assert_eq!(cfg.proxy.port, 7000);
        assert_eq!(cfg.proxy.upstream_origin, "http://localhost:1234");
        assert_eq!(cfg.proxy.upstream_name, "MangaDex");
        assert_eq!(cfg.client.preferred_language, "ja");
        assert_eq!(cfg.client.cover_host, "https://uploads.mangadex.org");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn invalid_upstream_is_rejected() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[("PIXELDEX_UPSTREAM", "not a url")]));
        assert!(cfg.validate().is_err());
    }
}
