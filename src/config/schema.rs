use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::extract::llm::{DEFAULT_API_BASE, DEFAULT_MAX_CHARS, DEFAULT_MODEL};
use crate::extract::page::DEFAULT_TIMEOUT;
use crate::matching::DEFAULT_TOP_K;

fn default_top_k() -> usize {
    DEFAULT_TOP_K
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_api_base() -> String {
    DEFAULT_API_BASE.to_string()
}

fn default_timeout() -> String {
    humantime::format_duration(DEFAULT_TIMEOUT).to_string()
}

fn default_max_chars() -> usize {
    DEFAULT_MAX_CHARS
}

fn default_true() -> bool {
    true
}

fn default_ttl() -> String {
    "24h".to_string()
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Config {
    /// Fund dataset path. Falls back to `data/pe_funds.json` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dataset: Option<PathBuf>,

    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Always use the heuristic extractor, even when an API key is present.
    #[serde(default)]
    pub offline: bool,

    #[serde(default)]
    pub fetch: FetchConfig,

    #[serde(default)]
    pub cache: CacheSettings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dataset: None,
            top_k: default_top_k(),
            model: default_model(),
            api_base: default_api_base(),
            offline: false,
            fetch: FetchConfig::default(),
            cache: CacheSettings::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FetchConfig {
    /// Per-request timeout, humantime format (e.g. "15s").
    #[serde(default = "default_timeout")]
    pub timeout: String,

    /// Page characters sent to the model.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout: default_timeout(),
            max_chars: default_max_chars(),
        }
    }
}

impl FetchConfig {
    pub fn timeout(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(self.timeout.trim())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CacheSettings {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// How long fetched pages stay fresh, humantime format (e.g. "24h").
    #[serde(default = "default_ttl")]
    pub ttl: String,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: default_ttl(),
        }
    }
}

impl CacheSettings {
    pub fn ttl(&self) -> Result<Duration, humantime::DurationError> {
        humantime::parse_duration(self.ttl.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_yaml_gives_defaults() {
        let config: Config = serde_saphyr::from_str("{}").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.top_k, 5);
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.fetch.timeout, "15s");
        assert_eq!(config.fetch.timeout().unwrap(), DEFAULT_TIMEOUT);
        assert_eq!(config.cache.ttl().unwrap(), Duration::from_secs(86_400));
    }

    #[test]
    fn test_partial_yaml() {
        let yaml = r#"
dataset: /tmp/funds.json
top_k: 8
offline: true
fetch:
  timeout: 30s
cache:
  enabled: false
"#;
        let config: Config = serde_saphyr::from_str(yaml).unwrap();
        assert_eq!(config.dataset, Some(PathBuf::from("/tmp/funds.json")));
        assert_eq!(config.top_k, 8);
        assert!(config.offline);
        assert_eq!(config.fetch.timeout().unwrap(), Duration::from_secs(30));
        assert_eq!(config.fetch.max_chars, 20_000);
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.ttl, "24h");
    }

    #[test]
    fn test_round_trip_yaml() {
        let config = Config {
            top_k: 3,
            ..Default::default()
        };
        let yaml = serde_saphyr::to_string(&config).unwrap();
        let parsed: Config = serde_saphyr::from_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }
}
