//! Upstream API clients and the traits the rest of the service talks through.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

pub mod azure;
pub mod gemini;
pub mod tavily;

pub use azure::AzureImageClient;
pub use gemini::GeminiClient;
pub use tavily::TavilyClient;

/// Image quality tier requested from the image model.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    /// Faster and cheaper
    Standard,
    /// Finer detail
    #[default]
    Hd,
}

impl Quality {
    /// Wire value, as sent to the API.
    pub fn as_str(self) -> &'static str {
        match self {
            Quality::Standard => "standard",
            Quality::Hd => "hd",
        }
    }
}

/// Text-to-image generation.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generates one image and returns where it can be downloaded from.
    async fn generate(&self, prompt: &str, quality: Quality) -> Result<String, ClientError>;

    /// Downloads a generated image.
    async fn download(&self, url: &str) -> Result<Vec<u8>, ClientError>;
}

/// Single-turn text completion.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Completes `prompt`, optionally steered by a system instruction.
    async fn complete(
        &self,
        system_instruction: Option<&str>,
        prompt: &str,
    ) -> Result<String, ClientError>;
}

/// Web search, site mapping and crawling.
#[async_trait]
pub trait WebResearch: Send + Sync {
    /// Returns up to `max_results` URLs relevant to `query`.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<String>, ClientError>;

    /// Returns the URLs discovered from a site's map.
    async fn map(&self, url: &str) -> Result<Vec<String>, ClientError>;

    /// Returns the text content found by crawling `url`.
    async fn crawl(&self, url: &str) -> Result<String, ClientError>;
}

/// Reads a response body and turns a non-success status into an error.
pub(crate) async fn read_success(
    service: &'static str,
    resp: reqwest::Response,
) -> Result<Vec<u8>, ClientError> {
    let status = resp.status();
    let bytes = resp
        .bytes()
        .await
        .map_err(|source| ClientError::Transport { service, source })?;
    if !status.is_success() {
        return Err(ClientError::Status {
            service,
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        });
    }
    tracing::debug!("{} responded {} with {} bytes", service, status, bytes.len());
    Ok(bytes.to_vec())
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_wire_values() {
        assert_eq!(Quality::default(), Quality::Hd);
        assert_eq!(Quality::Standard.as_str(), "standard");
        let parsed: Quality = serde_json::from_str("\"standard\"").expect("parse");
        assert_eq!(parsed, Quality::Standard);
        assert!(serde_json::from_str::<Quality>("\"ultra\"").is_err());
    }

    fn upstream_response(status: u16, body: &'static str) -> reqwest::Response {
        reqwest::Response::from(
            axum::http::Response::builder()
                .status(status)
                .body(body)
                .expect("response"),
        )
    }

    #[tokio::test]
    async fn read_success_returns_body() {
        let bytes = read_success("test", upstream_response(200, "{\"ok\":true}"))
            .await
            .expect("success");
        assert_eq!(bytes, b"{\"ok\":true}".to_vec());
    }

    #[tokio::test]
    async fn read_success_keeps_error_body() {
        let err = read_success("test", upstream_response(502, "gateway down"))
            .await
            .expect_err("bad status");
        assert!(matches!(
            err,
            ClientError::Status { service: "test", status, ref body }
                if status.as_u16() == 502 && body == "gateway down"
        ));
    }
}
