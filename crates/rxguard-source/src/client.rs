//! HTTP client for the public drug-label search API.

use rxguard_core::LabelRecord;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Public openFDA drug-label endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.fda.gov/drug/label.json";

/// Result-limit bounds accepted by the API call.
const MIN_LIMIT: usize = 1;
const MAX_LIMIT: usize = 25;

/// Upstream error bodies are truncated to this many bytes.
const BODY_TRUNCATE: usize = 300;

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("label source returned {status}: {body}")]
    Upstream { status: u16, body: String },
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Anything that can search the label source.
///
/// The production implementation is [`LabelSourceClient`]; tests substitute a
/// canned in-process source.
#[allow(async_fn_in_trait)]
pub trait LabelSource {
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LabelRecord>, SourceError>;
}

/// HTTP client for the label-source search endpoint.
pub struct LabelSourceClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Option<Vec<LabelRecord>>,
}

impl LabelSourceClient {
    /// Create a client for the given base URL (no trailing slash needed).
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Client against the public endpoint.
    pub fn public(api_key: Option<String>) -> Self {
        Self::new(DEFAULT_BASE_URL.to_string(), api_key)
    }
}

impl LabelSource for LabelSourceClient {
    /// Search label records matching the sanitized query.
    ///
    /// HTTP 404 means zero matches, not an error. Any other non-success
    /// status is fatal and carries a truncated response body.
    async fn search(&self, query: &str, limit: usize) -> Result<Vec<LabelRecord>, SourceError> {
        let term = sanitize_query(query);
        let expr = search_expression(&term);
        let limit = limit.clamp(MIN_LIMIT, MAX_LIMIT);

        info!(query = %term, limit, "searching label source");
        let mut request = self
            .client
            .get(&self.base_url)
            .query(&[("search", expr.as_str()), ("limit", &limit.to_string())]);
        if let Some(key) = &self.api_key {
            request = request.query(&[("api_key", key.as_str())]);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            debug!(query = %term, "label source returned 404; treating as zero results");
            return Ok(Vec::new());
        }
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(SourceError::Upstream {
                status: status.as_u16(),
                body: truncate(&body, BODY_TRUNCATE),
            });
        }

        let parsed: SearchResponse = resp.json().await?;
        let results = parsed.results.unwrap_or_default();
        info!(count = results.len(), "label source search complete");
        Ok(results)
    }
}

/// Strip quote and backslash characters and collapse whitespace.
pub fn sanitize_query(query: &str) -> String {
    let filtered: String = query
        .chars()
        .filter(|c| !matches!(c, '"' | '\'' | '`' | '\\'))
        .collect();
    filtered.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Boolean OR search expression over the three name fields.
pub fn search_expression(term: &str) -> String {
    format!(
        "openfda.brand_name:\"{term}\" OR openfda.generic_name:\"{term}\" OR openfda.substance_name:\"{term}\""
    )
}

fn truncate(body: &str, max: usize) -> String {
    if body.len() <= max {
        return body.to_string();
    }
    let mut end = max;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    body[..end].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_backslashes() {
        assert_eq!(sanitize_query("Ty\"le'nol\\  PM`"), "Tylenol PM");
    }

    #[test]
    fn sanitize_collapses_whitespace() {
        assert_eq!(sanitize_query("  advil \t 200 "), "advil 200");
    }

    #[test]
    fn search_expression_covers_three_name_fields() {
        let expr = search_expression("advil");
        assert!(expr.contains("openfda.brand_name:\"advil\""));
        assert!(expr.contains("openfda.generic_name:\"advil\""));
        assert!(expr.contains("openfda.substance_name:\"advil\""));
        assert_eq!(expr.matches(" OR ").count(), 2);
    }

    #[test]
    fn response_with_missing_results_parses_empty() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_none());
        let parsed: SearchResponse =
            serde_json::from_str(r#"{"results": [{"set_id": "s1"}]}"#).unwrap();
        assert_eq!(parsed.results.unwrap().len(), 1);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("abcdef", 4), "abcd");
        assert_eq!(truncate("ab", 4), "ab");
        // 'é' is two bytes; cutting inside it must back off.
        assert_eq!(truncate("aéb", 2), "a");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = LabelSourceClient::new("http://localhost:9000/".into(), None);
        assert_eq!(client.base_url, "http://localhost:9000");
    }
}
