use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::Config;
use crate::extract::heuristic;
use crate::extract::{
    build_client, fetch_url, normalize_url, CacheConfig, ExtractError, FetchError, FetchedPage,
    LlmExtractor, PageCache,
};
use crate::matching::{shortlist, ShortlistEntry};
use crate::model::{CompanyProfile, Fund};

/// One analysis request: which site, and how to treat it.
#[derive(Debug, Clone)]
pub struct MatchRequest {
    pub url: String,
    /// Free-text notes passed to the model (size, HQ, preferences).
    pub context: Option<String>,
    pub offline: bool,
    pub top_k: usize,
}

/// How the profile was produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "mode")]
pub enum ExtractionMode {
    Llm { model: String },
    Heuristic { reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtractionInfo {
    #[serde(flatten)]
    pub mode: ExtractionMode,
    pub page_status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_title: Option<String>,
    /// Page served from the disk cache.
    pub cached: bool,
}

/// Everything one run produces; serialized as-is for `--json-output`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchReport {
    pub company_profile: CompanyProfile,
    pub extraction: ExtractionInfo,
    pub shortlist: Vec<ShortlistEntry>,
}

/// Fetch, extract and shortlist, with the collaborators each stage needs.
///
/// Cheap to clone; the dashboard clones it into background re-runs.
#[derive(Debug, Clone)]
pub struct Pipeline {
    client: reqwest::Client,
    cache: Option<PageCache>,
    extractor: Option<LlmExtractor>,
}

impl Pipeline {
    pub fn new(
        client: reqwest::Client,
        cache: Option<PageCache>,
        extractor: Option<LlmExtractor>,
    ) -> Self {
        Self {
            client,
            cache,
            extractor,
        }
    }

    /// Build from config. Without an API key every run is heuristic.
    pub fn from_config(config: &Config, api_key: Option<String>, use_cache: bool) -> Result<Self> {
        let timeout = config
            .fetch
            .timeout()
            .context("Invalid fetch.timeout in config")?;
        let ttl = config.cache.ttl().context("Invalid cache.ttl in config")?;
        let client = build_client(timeout)?;

        let cache = PageCache::from_config(&CacheConfig {
            enabled: config.cache.enabled && use_cache,
            ttl,
        });
        let extractor = api_key.map(|key| {
            LlmExtractor::new(client.clone(), &config.api_base, key, &config.model)
                .with_max_chars(config.fetch.max_chars)
        });

        Ok(Self::new(client, cache, extractor))
    }

    pub fn has_extractor(&self) -> bool {
        self.extractor.is_some()
    }

    /// Fetch a page, consulting the cache first. Returns the page and whether it was cached.
    pub async fn fetch_page(&self, url: &str) -> Result<(FetchedPage, bool), FetchError> {
        if let Some(page) = self.cache.as_ref().and_then(|c| c.get(url)) {
            return Ok((page, true));
        }

        let page = fetch_url(&self.client, url).await?;
        if let Some(cache) = &self.cache {
            // Error pages are not worth keeping.
            if (200..300).contains(&page.status) {
                cache.put(&page);
            }
        }
        Ok((page, false))
    }

    /// Produce a profile from a fetched page: the model when available, else heuristics.
    pub async fn extract(
        &self,
        url: &str,
        page: &FetchedPage,
        context: Option<&str>,
        offline: bool,
    ) -> Result<(CompanyProfile, ExtractionMode), ExtractError> {
        match (&self.extractor, offline) {
            (Some(extractor), false) => {
                let profile = extractor.extract(url, page, context).await?;
                Ok((
                    profile,
                    ExtractionMode::Llm {
                        model: extractor.model().to_string(),
                    },
                ))
            }
            (_, offline) => {
                let reason = if offline {
                    "offline mode"
                } else {
                    "OPENAI_API_KEY not set"
                };
                tracing::info!(reason, "using heuristic extraction");
                Ok((
                    heuristic::extract_profile(url, page),
                    ExtractionMode::Heuristic {
                        reason: reason.to_string(),
                    },
                ))
            }
        }
    }

    pub async fn run(&self, request: &MatchRequest, funds: &[Fund]) -> Result<MatchReport> {
        let url = normalize_url(&request.url)?;

        let (page, cached) = self
            .fetch_page(&url)
            .await
            .with_context(|| format!("Failed to fetch {}", url))?;

        let (company_profile, mode) = self
            .extract(&url, &page, request.context.as_deref(), request.offline)
            .await
            .context("Failed to extract a company profile")?;

        let shortlist = shortlist(&company_profile, funds, request.top_k);

        Ok(MatchReport {
            company_profile,
            extraction: ExtractionInfo {
                mode,
                page_status: page.status,
                page_title: page.title,
                cached,
            },
            shortlist,
        })
    }
}

/// Run one analysis end to end.
pub async fn run_pipeline(
    pipeline: &Pipeline,
    request: &MatchRequest,
    funds: &[Fund],
) -> Result<MatchReport> {
    tracing::info!(url = %request.url, offline = request.offline, top_k = request.top_k, "running analysis");
    let report = pipeline.run(request, funds).await?;
    tracing::info!(
        company = %report.company_profile.company_name,
        shortlisted = report.shortlist.len(),
        "analysis complete"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::time::Duration;

    fn install_crypto() {
        let _ = rustls::crypto::ring::default_provider().install_default();
    }

    fn offline_pipeline() -> Pipeline {
        install_crypto();
        let client = build_client(Duration::from_secs(1)).unwrap();
        Pipeline::new(client, None, None)
    }

    fn page() -> FetchedPage {
        FetchedPage {
            url: "https://acme.example".to_string(),
            status: 200,
            title: Some("Acme Cloud | Home".to_string()),
            text: "Acme sells SaaS software to retailers in the USA.".to_string(),
            content_type: "text/html".to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_extract_without_key_is_heuristic() {
        let pipeline = offline_pipeline();
        assert!(!pipeline.has_extractor());

        let (profile, mode) = pipeline
            .extract("https://acme.example", &page(), None, false)
            .await
            .unwrap();
        assert_eq!(profile.company_name, "Acme Cloud");
        assert_eq!(
            mode,
            ExtractionMode::Heuristic {
                reason: "OPENAI_API_KEY not set".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_offline_flag_skips_model() {
        install_crypto();
        let client = build_client(Duration::from_secs(1)).unwrap();
        let extractor = LlmExtractor::new(client.clone(), "http://127.0.0.1:9", "key", "gpt-4o-mini");
        let pipeline = Pipeline::new(client, None, Some(extractor));

        let (_, mode) = pipeline
            .extract("https://acme.example", &page(), None, true)
            .await
            .unwrap();
        assert_eq!(
            mode,
            ExtractionMode::Heuristic {
                reason: "offline mode".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_model_failure_is_error() {
        install_crypto();
        let client = build_client(Duration::from_millis(500)).unwrap();
        let extractor = LlmExtractor::new(client.clone(), "http://127.0.0.1:9", "key", "gpt-4o-mini");
        let pipeline = Pipeline::new(client, None, Some(extractor));

        let err = pipeline
            .extract("https://acme.example", &page(), None, false)
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractError::Http(_)));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_before_fetch() {
        let err = offline_pipeline()
            .run(
                &MatchRequest {
                    url: "ftp://acme.example".to_string(),
                    context: None,
                    offline: true,
                    top_k: 5,
                },
                &[],
            )
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<FetchError>().is_some());
    }

    #[test]
    fn test_report_serialization() {
        let report = MatchReport {
            company_profile: CompanyProfile::default(),
            extraction: ExtractionInfo {
                mode: ExtractionMode::Llm {
                    model: "gpt-4o-mini".to_string(),
                },
                page_status: 200,
                page_title: None,
                cached: true,
            },
            shortlist: Vec::new(),
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["extraction"]["mode"], "llm");
        assert_eq!(value["extraction"]["model"], "gpt-4o-mini");
        assert_eq!(value["extraction"]["cached"], true);
        assert!(value["shortlist"].as_array().unwrap().is_empty());
        assert!(value["company_profile"].is_object());
    }

    #[test]
    fn test_from_config_respects_no_cache() {
        install_crypto();
        let config = Config::default();
        let pipeline = Pipeline::from_config(&config, None, false).unwrap();
        assert!(pipeline.cache.is_none());
        assert!(!pipeline.has_extractor());

        let pipeline = Pipeline::from_config(&config, Some("key".to_string()), true).unwrap();
        assert!(pipeline.cache.is_some());
        assert!(pipeline.has_extractor());
    }
}
