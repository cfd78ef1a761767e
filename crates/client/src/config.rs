//! Environment-driven configuration, read once at startup.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use reqwest::Url;
use tracing::info;

pub const API_URL_VAR: &str = "AGROFIERROS_API_URL";
pub const TOKEN_DIR_VAR: &str = "AGROFIERROS_TOKEN_DIR";
pub const TIMEOUT_VAR: &str = "AGROFIERROS_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Backend base URL, without a trailing slash.
    pub api_url: String,
    /// Where the auth token is kept; `None` means the OS data directory.
    pub token_dir: Option<PathBuf>,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_dir: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_url = match get(API_URL_VAR) {
            Some(url) => normalize_url(&url)?,
            None => {
                info!(default = DEFAULT_API_URL, "{API_URL_VAR} not set; using default");
                DEFAULT_API_URL.to_string()
            }
        };

        let timeout = match get(TIMEOUT_VAR) {
            Some(secs) => {
                let secs: u64 = secs
                    .trim()
                    .parse()
                    .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds"))?;
                if secs == 0 {
                    bail!("{TIMEOUT_VAR} must be greater than zero");
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self {
            api_url,
            token_dir: get(TOKEN_DIR_VAR).map(PathBuf::from),
            timeout,
        })
    }

    /// `{api_url}/{path}`.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn normalize_url(url: &str) -> anyhow::Result<String> {
    let url = url.trim().trim_end_matches('/');
    let parsed =
        Url::parse(url).with_context(|| format!("{API_URL_VAR} is not a valid URL: '{url}'"))?;
    if !matches!(parsed.scheme(), "http" | "https") || parsed.host_str().is_none() {
        bail!("{API_URL_VAR} must be an http(s) URL with a host, got '{url}'");
    }
    Ok(url.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn reads_and_normalizes_values() {
        let config = ClientConfig::from_lookup(lookup(&[
            (API_URL_VAR, " https://api.agrofierros.uy/api/ "),
            (TOKEN_DIR_VAR, "/var/lib/agrofierros"),
            (TIMEOUT_VAR, "3"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://api.agrofierros.uy/api");
        assert_eq!(config.token_dir, Some(PathBuf::from("/var/lib/agrofierros")));
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert_eq!(config.endpoint("/auth/login"), "https://api.agrofierros.uy/api/auth/login");
    }

    #[test]
    fn rejects_bad_values() {
        assert!(ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "ftp://x")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "http://")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "http://exa mple.com")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(API_URL_VAR, "localhost:3000")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "soon")])).is_err());
        assert!(ClientConfig::from_lookup(lookup(&[(TIMEOUT_VAR, "0")])).is_err());
    }
}
