//! Tavily search, map and crawl.
//!
//! Response shapes have moved around between API revisions, so URLs and page
//! content are pulled out of loosely typed JSON.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::{WebResearch, read_success};
use crate::constants::TAVILY_BASE_URL;
use crate::error::ClientError;

const SERVICE: &str = "tavily";

/// Keys that may hold a list of results, in the order we check them.
const RESULT_KEYS: [&str; 4] = ["results", "links", "items", "urls"];

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: &'a str,
    max_results: usize,
}

#[derive(Debug, Serialize)]
struct UrlRequest<'a> {
    url: &'a str,
}

/// Tavily REST client.
#[derive(Clone, Debug)]
pub struct TavilyClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl TavilyClient {
    /// Builds a client against the public endpoint.
    pub fn new(client: reqwest::Client, api_key: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            base_url: TAVILY_BASE_URL.to_string(),
        }
    }

    async fn post<T: Serialize + Sync>(&self, path: &str, body: &T) -> Result<Value, ClientError> {
        let resp = self
            .client
            .post(format!("{}/{}", self.base_url.trim_end_matches('/'), path))
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                source,
            })?;
        let bytes = read_success(SERVICE, resp).await?;
        serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
            service: SERVICE,
            source,
        })
    }
}

fn url_of(entry: &Value) -> Option<String> {
    match entry {
        Value::String(url) => Some(url.clone()),
        Value::Object(map) => map.get("url").and_then(Value::as_str).map(str::to_string),
        _ => None,
    }
}

/// Pulls URLs out of a search or map response.
///
/// Looks at the first list-holding key that is present, then a bare `url`,
/// then treats a top-level array as the list itself.
pub fn extract_urls(value: &Value) -> Vec<String> {
    match value {
        Value::Object(map) => {
            if let Some(entries) = RESULT_KEYS.iter().find_map(|key| map.get(*key)) {
                return entries
                    .as_array()
                    .map(|entries| entries.iter().filter_map(url_of).collect())
                    .unwrap_or_default();
            }
            map.get("url")
                .and_then(Value::as_str)
                .map(|url| vec![url.to_string()])
                .unwrap_or_default()
        }
        Value::Array(entries) => entries.iter().filter_map(url_of).collect(),
        _ => Vec::new(),
    }
}

/// Pulls page text out of a crawl response.
pub fn extract_content(value: &Value) -> String {
    let pages = value
        .get("results")
        .and_then(Value::as_array)
        .map(|results| {
            results
                .iter()
                .filter_map(|page| {
                    ["raw_content", "content"]
                        .iter()
                        .find_map(|key| page.get(*key).and_then(Value::as_str))
                })
                .filter(|text| !text.trim().is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    if !pages.is_empty() {
        return pages.join("\n\n");
    }
    value
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[async_trait]
impl WebResearch for TavilyClient {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, ClientError> {
        let body = SearchRequest {
            query,
            search_depth: "advanced",
            max_results,
        };
        let value = self.post("search", &body).await?;
        let mut urls = extract_urls(&value);
        urls.truncate(max_results);
        debug!("Search for {:?} returned {} urls", query, urls.len());
        Ok(urls)
    }

    async fn map(&self, url: &str) -> Result<Vec<String>, ClientError> {
        let value = self.post("map", &UrlRequest { url }).await?;
        let urls = extract_urls(&value);
        debug!("Map of {} returned {} urls", url, urls.len());
        Ok(urls)
    }

    async fn crawl(&self, url: &str) -> Result<String, ClientError> {
        let value = self.post("crawl", &UrlRequest { url }).await?;
        Ok(extract_content(&value))
    }
}
