use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::page::FetchedPage;

/// Configuration for page caching
#[derive(Clone, Debug)]
pub struct CacheConfig {
    pub enabled: bool, // false when --no-cache
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl: Duration::from_secs(24 * 60 * 60),
        }
    }
}

/// Get the platform-appropriate cache directory for pe-shortlist
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("pe-shortlist/pages"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/pe-shortlist/pages",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Clear the page cache directory
pub fn clear_cache() -> Result<()> {
    clear_cache_at(&get_cache_path())
}

fn clear_cache_at(cache_path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(cache_path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).context("Failed to remove cache directory"),
    }
}

/// Disk cache of fetched pages keyed by URL.
///
/// Entries older than the TTL are ignored on read and overwritten on the next fetch.
/// Cache failures never fail a run.
#[derive(Clone, Debug)]
pub struct PageCache {
    cache_path: PathBuf,
    ttl: Duration,
}

impl PageCache {
    pub fn new(cache_path: PathBuf, ttl: Duration) -> Self {
        Self { cache_path, ttl }
    }

    /// Cache at the default location, or `None` when caching is disabled.
    pub fn from_config(config: &CacheConfig) -> Option<Self> {
        config
            .enabled
            .then(|| Self::new(get_cache_path(), config.ttl))
    }

    fn key(url: &str) -> String {
        format!("page:{}", url)
    }

    /// A fresh cached page for `url`, if any.
    pub fn get(&self, url: &str) -> Option<FetchedPage> {
        let bytes = cacache::read_sync(&self.cache_path, Self::key(url)).ok()?;
        let page: FetchedPage = serde_json::from_slice(&bytes).ok()?;

        let age = Utc::now().signed_duration_since(page.fetched_at);
        let fresh = age
            .to_std()
            .map(|age| age < self.ttl)
            .unwrap_or(true); // fetched_at in the future: clock skew, treat as fresh
        if fresh {
            tracing::debug!(url, "page cache hit");
            Some(page)
        } else {
            tracing::debug!(url, "page cache entry expired");
            None
        }
    }

    /// Store a page (fire-and-forget, don't fail on disk errors)
    pub fn put(&self, page: &FetchedPage) {
        let Ok(serialized) = serde_json::to_vec(page) else {
            return;
        };
        if let Err(e) = cacache::write_sync(&self.cache_path, Self::key(&page.url), serialized) {
            tracing::warn!(url = %page.url, error = %e, "failed to write page cache");
        }
    }

    pub fn clear(&self) -> Result<()> {
        clear_cache_at(&self.cache_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn page(url: &str, age: chrono::Duration) -> FetchedPage {
        FetchedPage {
            url: url.to_string(),
            status: 200,
            title: Some("Acme".to_string()),
            text: "We make widgets".to_string(),
            content_type: "text/html".to_string(),
            fetched_at: Utc::now() - age,
        }
    }

    fn temp_cache(name: &str, ttl: Duration) -> PageCache {
        let path = env::temp_dir().join(format!("pe_shortlist_test_cache_{}", name));
        let _ = std::fs::remove_dir_all(&path);
        PageCache::new(path, ttl)
    }

    #[test]
    fn test_round_trip_fresh_entry() {
        let cache = temp_cache("fresh", Duration::from_secs(3600));
        let stored = page("https://acme.example", chrono::Duration::zero());
        cache.put(&stored);

        let loaded = cache.get("https://acme.example").unwrap();
        assert_eq!(loaded, stored);
        assert!(cache.get("https://other.example").is_none());

        cache.clear().unwrap();
        assert!(cache.get("https://acme.example").is_none());
    }

    #[test]
    fn test_expired_entry_is_ignored() {
        let cache = temp_cache("expired", Duration::from_secs(60));
        cache.put(&page("https://old.example", chrono::Duration::hours(2)));
        assert!(cache.get("https://old.example").is_none());
        cache.clear().unwrap();
    }

    #[test]
    fn test_clear_missing_dir_is_ok() {
        let cache = temp_cache("missing", Duration::from_secs(60));
        assert!(cache.clear().is_ok());
    }

    #[test]
    fn test_disabled_config_has_no_cache() {
        let config = CacheConfig {
            enabled: false,
            ..Default::default()
        };
        assert!(PageCache::from_config(&config).is_none());
        assert!(PageCache::from_config(&CacheConfig::default()).is_some());
    }
}
