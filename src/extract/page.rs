use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT_LANGUAGE, CONTENT_TYPE};
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tokio_retry::{strategy::ExponentialBackoff, RetryIf};

pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                              (KHTML, like Gecko) Chrome/123.0 Safari/537.36";
const ACCEPT_LANGUAGE_VALUE: &str = "en-US,en;q=0.9";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Subtrees dropped before collecting page text.
const SKIPPED_TAGS: &[&str] = &["script", "style", "noscript", "nav", "footer", "svg"];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl FetchError {
    /// Connection and timeout failures are worth another attempt; bad input is not.
    fn is_transient(&self) -> bool {
        matches!(self, FetchError::Request { .. })
    }
}

/// A fetched page reduced to readable text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub title: Option<String>,
    pub text: String,
    pub content_type: String,
    pub fetched_at: DateTime<Utc>,
}

/// Prefix `https://` when the user typed a bare domain.
pub fn normalize_url(raw: &str) -> Result<String, FetchError> {
    let trimmed = raw.trim();
    let candidate = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("https://{}", trimmed)
    };

    let parsed = reqwest::Url::parse(&candidate).map_err(|e| FetchError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(candidate),
        other => Err(FetchError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", other),
        }),
    }
}

pub fn build_client(timeout: Duration) -> Result<reqwest::Client, FetchError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static(ACCEPT_LANGUAGE_VALUE));

    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .default_headers(headers)
        .timeout(timeout)
        .build()
        .map_err(FetchError::Client)
}

/// Fetch a page and clean it.
///
/// HTTP error statuses are not failures: the page is returned with its status so the
/// caller can decide. Transport errors are retried with exponential backoff.
pub async fn fetch_url(client: &reqwest::Client, url: &str) -> Result<FetchedPage, FetchError> {
    // Retry strategy: exponential backoff with 3 attempts
    let retry_strategy = ExponentialBackoff::from_millis(100)
        .max_delay(Duration::from_secs(5))
        .take(3);

    let response = RetryIf::spawn(
        retry_strategy,
        || async {
            tracing::debug!(url, "fetching page");
            client
                .get(url)
                .send()
                .await
                .map_err(|source| FetchError::Request {
                    url: url.to_string(),
                    source,
                })
        },
        |e: &FetchError| {
            let retry = e.is_transient();
            if retry {
                tracing::warn!(url, error = %e, "page fetch failed, retrying");
            }
            retry
        },
    )
    .await?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url, status = status.as_u16(), "page returned an error status");
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();

    let body = response.text().await.map_err(|source| FetchError::Request {
        url: url.to_string(),
        source,
    })?;

    let page = page_from_body(url, status.as_u16(), &content_type, &body);
    tracing::debug!(
        url,
        status = page.status,
        chars = page.text.len(),
        "fetched page"
    );
    Ok(page)
}

/// Turn a response body into a [`FetchedPage`]. Non-HTML bodies keep their raw text.
pub fn page_from_body(url: &str, status: u16, content_type: &str, body: &str) -> FetchedPage {
    let is_html =
        content_type.contains("text/html") || content_type.contains("application/xhtml+xml");

    let (title, text) = if is_html {
        clean_html(body)
    } else {
        (None, compact_ws(body))
    };

    FetchedPage {
        url: url.to_string(),
        status,
        title,
        text,
        content_type: content_type.to_string(),
        fetched_at: Utc::now(),
    }
}

/// Extract the title and the readable text of an HTML document.
///
/// Text comes from `<main>`, else `<article>`, else `<body>`.
pub fn clean_html(html: &str) -> (Option<String>, String) {
    let document = Html::parse_document(html);

    let title = Selector::parse("title")
        .ok()
        .and_then(|sel| document.select(&sel).next())
        .map(|el| compact_ws(&text_content(el)))
        .filter(|t| !t.is_empty());

    let root = ["main", "article", "body"].iter().find_map(|tag| {
        let sel = Selector::parse(tag).ok()?;
        document.select(&sel).next()
    });

    let mut parts = Vec::new();
    match root {
        Some(root) => collect_text(root, &mut parts),
        None => collect_text(document.root_element(), &mut parts),
    }

    (title, compact_ws(&parts.join(" ")))
}

fn collect_text(element: ElementRef<'_>, out: &mut Vec<String>) {
    for child in element.children() {
        if let Some(child_el) = ElementRef::wrap(child) {
            if SKIPPED_TAGS.contains(&child_el.value().name()) {
                continue;
            }
            collect_text(child_el, out);
        } else if let Some(text) = child.value().as_text() {
            let text: &str = text;
            out.push(text.to_string());
        }
    }
}

fn text_content(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ")
}

pub fn compact_ws(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
