//! The research-and-write pipeline.
//!
//! A user request becomes a search query, the search hits are fanned out
//! through their site maps, the language model picks the most relevant pages,
//! those pages are crawled, and the crawled text is written up in the
//! requested format.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::clients::{LanguageModel, WebResearch};
use crate::constants::{FILTERED_URL_LIMIT, SEARCH_MAX_RESULTS, SNIPPET_CHARS};
use crate::error::StudioError;
use crate::prompts::{SEARCH_QUERY_PROMPT, SystemPrompts};

/// What kind of text to write.
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(from = "String", into = "String")]
pub enum OutputFormat {
    /// A social media post
    #[default]
    SocialPost,
    /// A YouTube video script
    YoutubeScript,
    /// Anything else, written as a short-form reel script
    Other(String),
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "social_post" => Self::SocialPost,
            "youtube_script" => Self::YoutubeScript,
            _ => Self::Other(value),
        }
    }
}

impl From<OutputFormat> for String {
    fn from(value: OutputFormat) -> Self {
        value.as_str().to_string()
    }
}

impl OutputFormat {
    /// Wire name, eg `social_post`.
    pub fn as_str(&self) -> &str {
        match self {
            Self::SocialPost => "social_post",
            Self::YoutubeScript => "youtube_script",
            Self::Other(name) => name,
        }
    }

    /// Human label used inside prompts.
    pub fn label(&self) -> String {
        self.as_str().replace('_', " ")
    }

    /// The fill-in template the model has to follow.
    pub fn template(&self) -> &'static str {
        match self {
            Self::SocialPost => "POST:\n<write the post here>\nSOURCE_URLS:\n- <url1>\n...",
            Self::YoutubeScript => {
                "YOUTUBE SCRIPT:\n<write youtube script here>\nSOURCE_URLS:\n- <url1>\n..."
            }
            Self::Other(_) => {
                "REEL SCRIPT:\n<write instagram reel script here>\nSOURCE_URLS:\n- <url1>\n..."
            }
        }
    }
}

/// One crawled page.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CrawledPage {
    /// Page URL
    pub url: String,
    /// Page text; empty when the crawl failed
    pub content: String,
    /// Why the crawl failed, if it did
    pub error: Option<String>,
}

/// Asks the model to turn a request into a search query.
pub fn search_query_prompt(user_prompt: &str) -> String {
    format!(
        "Given the following user prompt, generate a concise search query compatible with Tavily search API. \
         Only output the search query text.\n\nUser prompt: {user_prompt}"
    )
}

/// Asks the model to pick the most relevant URLs.
pub fn filter_prompt(user_prompt: &str, urls: &[String]) -> String {
    format!(
        "Given the list of sitemap URLs below and the user's content creation intent, \
         select and return as a JSON array the {FILTERED_URL_LIMIT} most relevant URLs for content creation.\
         \n\nUser's intent:\n{user_prompt}\n\nSitemap URLs:\n{}",
        urls.join("\n")
    )
}

/// Reads the model's URL pick, falling back to the head of `fallback` when
/// the reply isn't a JSON array.
pub fn parse_filtered_urls(output: &str, fallback: &[String]) -> Vec<String> {
    let output = output.trim();
    let cleaned = if output.starts_with("```json") {
        output.trim_matches('`').replacen("json", "", 1).trim().to_string()
    } else if output.starts_with("```") {
        output.trim_matches('`').trim().to_string()
    } else {
        output.to_string()
    };

    match serde_json::from_str::<Value>(&cleaned) {
        Ok(Value::Array(entries)) => entries
            .into_iter()
            .take(FILTERED_URL_LIMIT)
            .filter_map(|entry| match entry {
                Value::String(url) => Some(url),
                _ => None,
            })
            .collect(),
        _ => {
            debug!("Filter reply wasn't a JSON array, using the first {FILTERED_URL_LIMIT} urls");
            fallback.iter().take(FILTERED_URL_LIMIT).cloned().collect()
        }
    }
}

/// Builds the final writing prompt from whatever was crawled successfully.
pub fn synthesis_prompt(user_prompt: &str, pages: &[CrawledPage], format: &OutputFormat) -> String {
    let snippets = pages
        .iter()
        .filter(|page| !page.content.is_empty())
        .map(|page| {
            let snippet: String = page.content.chars().take(SNIPPET_CHARS).collect();
            format!("URL: {}\nContent: {}", page.url, snippet)
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    format!(
        "Based on the user's request and the following web contents, generate a {label}.\n\
         Format:\n\"\"\"\n{template}\n\"\"\"\n\n\
         USER REQUEST:\n{user_prompt}\n\n\
         WEB CONTENTS:\n{snippets}\n\
         Return only the filled out template in your response.",
        label = format.label(),
        template = format.template(),
    )
}

/// The six-step research pipeline over pluggable backends.
pub struct ResearchPipeline {
    model: Arc<dyn LanguageModel>,
    web: Arc<dyn WebResearch>,
    prompts: SystemPrompts,
}

impl ResearchPipeline {
    /// Wires the pipeline to its backends.
    pub fn new(
        model: Arc<dyn LanguageModel>,
        web: Arc<dyn WebResearch>,
        prompts: SystemPrompts,
    ) -> Self {
        Self {
            model,
            web,
            prompts,
        }
    }

    async fn ask(&self, system: Option<&str>, prompt: &str, step: &str) -> Result<String, StudioError> {
        self.model
            .complete(system, prompt)
            .await
            .map(|text| text.trim().to_string())
            .map_err(|err| StudioError::Upstream(format!("Error during {step}: {err}")))
    }

    /// Step 1: request to search query.
    pub async fn search_query(&self, user_prompt: &str) -> Result<String, StudioError> {
        let system = self.prompts.get(SEARCH_QUERY_PROMPT);
        let system = (!system.is_empty()).then_some(system);
        self.ask(system, &search_query_prompt(user_prompt), "search query generation")
            .await
    }

    /// Step 2: search hits.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, StudioError> {
        self.web
            .search(query, SEARCH_MAX_RESULTS)
            .await
            .map_err(|err| StudioError::Upstream(format!("Tavily search error: {err}")))
    }

    /// Step 3: every URL found in the site maps of `urls`, in order.
    pub async fn expand(&self, urls: &[String]) -> Vec<String> {
        let mut expanded = Vec::new();
        for url in urls {
            match self.web.map(url).await {
                Ok(found) => expanded.extend(found),
                Err(err) => warn!("Skipping site map of {}: {}", url, err),
            }
        }
        expanded
    }

    /// Step 4: the model's pick of the most relevant URLs.
    pub async fn filter(&self, user_prompt: &str, urls: &[String]) -> Result<Vec<String>, StudioError> {
        let reply = self
            .ask(None, &filter_prompt(user_prompt, urls), "url filtering")
            .await?;
        Ok(parse_filtered_urls(&reply, urls))
    }

    /// Step 5: page text for each URL; failures are recorded, not raised.
    pub async fn crawl(&self, urls: &[String]) -> Vec<CrawledPage> {
        let mut pages = Vec::with_capacity(urls.len());
        for url in urls {
            let page = match self.web.crawl(url).await {
                Ok(content) => CrawledPage {
                    url: url.clone(),
                    content,
                    error: None,
                },
                Err(err) => {
                    warn!("Crawl of {} failed: {}", url, err);
                    CrawledPage {
                        url: url.clone(),
                        content: String::new(),
                        error: Some(err.to_string()),
                    }
                }
            };
            pages.push(page);
        }
        pages
    }

    /// Step 6: the finished text.
    pub async fn write(
        &self,
        user_prompt: &str,
        pages: &[CrawledPage],
        format: &OutputFormat,
    ) -> Result<String, StudioError> {
        self.ask(None, &synthesis_prompt(user_prompt, pages, format), "content generation")
            .await
    }

    /// Runs all six steps.
    pub async fn run(&self, user_prompt: &str, format: &OutputFormat) -> Result<String, StudioError> {
        let query = self.search_query(user_prompt).await?;
        info!("Search query: {:?}", query);

        let hits = self.search(&query).await?;
        info!("Search returned {} urls", hits.len());

        let expanded = self.expand(&hits).await;
        info!("Site maps expanded to {} urls", expanded.len());

        let picked = self.filter(user_prompt, &expanded).await?;
        info!("Filter kept {} urls", picked.len());

        let pages = self.crawl(&picked).await;
        let crawled = pages.iter().filter(|page| !page.content.is_empty()).count();
        info!("Crawled {} of {} pages", crawled, pages.len());

        let result = self.write(user_prompt, &pages, format).await?;
        info!("Wrote {} ({} chars)", format.label(), result.len());
        Ok(result)
    }
}
