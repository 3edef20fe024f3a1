use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use thiserror::Error;

use super::page::FetchedPage;
use crate::model::CompanyProfile;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAX_CHARS: usize = 20_000;
const TEMPERATURE: f32 = 0.1;

const SYSTEM_PROMPT: &str = "You are a pragmatic M&A analyst agent. Given a company website, \
extract a structured company_profile.\n\n\
Instructions:\n\
- Infer fields: company_name, url, industries, locations, employee_count_range, \
revenue_range_usd, offerings, summary, confidence (0-1).\n\
- Consider any user-provided context as clarifications or overrides (size, regions, deal preferences).\n\
- Return strictly a JSON object for company_profile.";

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("HTTP error talking to the model API: {0}")]
    Http(#[from] reqwest::Error),

    #[error("model API error [{status}]: {message}")]
    Api { status: u16, message: String },

    #[error("model API returned no message content")]
    EmptyResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Message {
    role: String, // "system" | "user"
    content: String,
}

/// OpenAI-compatible chat-completions client that turns a page into a profile.
#[derive(Debug, Clone)]
pub struct LlmExtractor {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
    max_chars: usize,
}

impl LlmExtractor {
    pub fn new(
        client: reqwest::Client,
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
            max_chars: DEFAULT_MAX_CHARS,
        }
    }

    pub fn with_max_chars(mut self, max_chars: usize) -> Self {
        self.max_chars = max_chars;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Ask the model for a profile of the page.
    ///
    /// Transport and API failures are errors. An unparsable answer is not: it yields an
    /// empty profile carrying only the URL.
    pub async fn extract(
        &self,
        url: &str,
        page: &FetchedPage,
        context: Option<&str>,
    ) -> Result<CompanyProfile, ExtractError> {
        let endpoint = format!("{}/chat/completions", self.api_base.trim_end_matches('/'));
        let body = json!({
            "model": &self.model,
            "messages": build_messages(url, page, context, self.max_chars),
            "temperature": TEMPERATURE,
            "response_format": {"type": "json_object"},
        });

        tracing::debug!(model = %self.model, endpoint = %endpoint, "requesting profile extraction");
        let response = self
            .client
            .post(&endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let json = check_response_status(response).await?;
        let content = json["choices"][0]["message"]["content"]
            .as_str()
            .filter(|c| !c.trim().is_empty())
            .ok_or(ExtractError::EmptyResponse)?;

        Ok(parse_profile_response(content, url))
    }
}

async fn check_response_status(resp: reqwest::Response) -> Result<Value, ExtractError> {
    let status = resp.status().as_u16();
    if status >= 400 {
        let text = resp.text().await.unwrap_or_default();
        return Err(ExtractError::Api {
            status,
            message: api_error_message(&text),
        });
    }
    Ok(resp.json().await?)
}

/// `error.message` (or `message`) from a JSON error body, else the raw body.
fn api_error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|v| {
        v["error"]["message"]
            .as_str()
            .or_else(|| v["message"].as_str())
            .map(str::to_string)
    });
    match from_json {
        Some(message) => message,
        None if body.trim().is_empty() => "unknown API error".to_string(),
        None => body.trim().chars().take(500).collect(),
    }
}

fn build_messages(
    url: &str,
    page: &FetchedPage,
    context: Option<&str>,
    max_chars: usize,
) -> Vec<Message> {
    let mut parts = vec![
        "Analyze the following web page content and return only company_profile as JSON.".to_string(),
        format!("URL: {}", url),
    ];
    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        parts.push(format!("Context: {}", context));
    }
    if let Some(title) = page.title.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Page title: {}", title));
    }
    parts.push("Page text (truncated):".to_string());
    parts.push(page.text.chars().take(max_chars).collect());

    vec![
        Message {
            role: "system".to_string(),
            content: SYSTEM_PROMPT.to_string(),
        },
        Message {
            role: "user".to_string(),
            content: parts.join("\n\n"),
        },
    ]
}

/// Parse the model's answer into a profile.
///
/// Tries the whole text as JSON, then the span from the first `{` to the last `}`.
/// Anything else becomes an empty profile. The URL is filled in when the model left it out.
pub fn parse_profile_response(content: &str, url: &str) -> CompanyProfile {
    let parsed = CompanyProfile::from_json(content).ok().or_else(|| {
        let start = content.find('{')?;
        let end = content.rfind('}')?;
        (end > start)
            .then(|| CompanyProfile::from_json(&content[start..=end]).ok())
            .flatten()
    });

    let mut profile = parsed.unwrap_or_else(|| {
        tracing::warn!("model response was not a JSON profile, using an empty profile");
        CompanyProfile::default()
    });
    if profile.url.trim().is_empty() {
        profile.url = url.to_string();
    }
    profile
}
