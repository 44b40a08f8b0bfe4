//! Azure OpenAI image generation.
//!
//! Docs: <https://learn.microsoft.com/azure/ai-services/openai/reference#image-generation>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use url::Url;

use super::{ImageGenerator, Quality, read_success};
use crate::constants::{GENERATION_SIZE, IMAGE_DOWNLOAD_TIMEOUT};
use crate::error::ClientError;

const SERVICE: &str = "azure openai images";

/// Request body for POST .../images/generations
#[derive(Serialize, Debug)]
struct ImagesGenerateRequest<'a> {
    prompt: &'a str,
    n: u8,
    size: &'a str,
    quality: &'a str,
}

#[derive(Deserialize, Debug)]
struct ImagesGenerateResponse {
    #[serde(default)]
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    url: Option<String>,
    revised_prompt: Option<String>,
}

/// Image generation against an Azure OpenAI deployment.
#[derive(Clone, Debug)]
pub struct AzureImageClient {
    client: reqwest::Client,
    api_key: String,
    generations_url: Url,
}

impl AzureImageClient {
    /// Builds a client for `deployment` on the resource at `endpoint`.
    pub fn new(
        client: reqwest::Client,
        api_key: &str,
        endpoint: &str,
        deployment: &str,
        api_version: &str,
    ) -> Result<Self, ClientError> {
        Ok(Self {
            client,
            api_key: api_key.to_string(),
            generations_url: generations_url(endpoint, deployment, api_version)?,
        })
    }
}

/// `{endpoint}/openai/deployments/{deployment}/images/generations?api-version=...`
fn generations_url(endpoint: &str, deployment: &str, api_version: &str) -> Result<Url, ClientError> {
    let base = Url::parse(&format!("{}/", endpoint.trim_end_matches('/')))?;
    let mut url = base.join(&format!("openai/deployments/{deployment}/images/generations"))?;
    url.query_pairs_mut().append_pair("api-version", api_version);
    Ok(url)
}

fn first_image_url(parsed: ImagesGenerateResponse) -> Result<String, ClientError> {
    let first = parsed.data.into_iter().next().ok_or(ClientError::Missing {
        service: SERVICE,
        field: "image data",
    })?;
    if let Some(revised_prompt) = first.revised_prompt {
        debug!("Revised prompt from image model: {revised_prompt}");
    }
    first.url.ok_or(ClientError::Missing {
        service: SERVICE,
        field: "image url",
    })
}

#[async_trait]
impl ImageGenerator for AzureImageClient {
    async fn generate(&self, prompt: &str, quality: Quality) -> Result<String, ClientError> {
        let req_body = ImagesGenerateRequest {
            prompt,
            n: 1,
            size: GENERATION_SIZE,
            quality: quality.as_str(),
        };

        let resp = self
            .client
            .post(self.generations_url.clone())
            .header("api-key", &self.api_key)
            .json(&req_body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                source,
            })?;
        let bytes = read_success(SERVICE, resp).await?;

        let parsed: ImagesGenerateResponse =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                service: SERVICE,
                source,
            })?;
        let url = first_image_url(parsed)?;
        info!("Image generated ({} quality)", quality.as_str());
        Ok(url)
    }

    async fn download(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let resp = self
            .client
            .get(url)
            .timeout(IMAGE_DOWNLOAD_TIMEOUT)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                service: "image download",
                source,
            })?;
        read_success("image download", resp).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generations_url_with_and_without_slash() {
        for endpoint in [
            "https://studio.openai.azure.com",
            "https://studio.openai.azure.com/",
        ] {
            let url = generations_url(endpoint, "dall-e-3", "2024-02-01").expect("url");
            assert_eq!(
                url.as_str(),
                "https://studio.openai.azure.com/openai/deployments/dall-e-3/images/generations?api-version=2024-02-01"
            );
        }
    }

    #[test]
    fn bad_endpoint_is_rejected() {
        assert!(matches!(
            generations_url("not a url", "dall-e-3", "2024-02-01"),
            Err(ClientError::Url(_))
        ));
    }

    #[test]
    fn request_body_shape() {
        let body = ImagesGenerateRequest {
            prompt: "a goat",
            n: 1,
            size: GENERATION_SIZE,
            quality: Quality::Hd.as_str(),
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({"prompt": "a goat", "n": 1, "size": "1792x1024", "quality": "hd"})
        );
    }

    #[test]
    fn picks_first_url() {
        let parsed: ImagesGenerateResponse = serde_json::from_str(
            r#"{"created": 1, "data": [{"url": "https://blob/1.png", "revised_prompt": "x"}, {"url": "https://blob/2.png"}]}"#,
        )
        .expect("parse");
        assert_eq!(first_image_url(parsed).expect("url"), "https://blob/1.png");
    }

    #[test]
    fn empty_data_is_an_error() {
        let parsed: ImagesGenerateResponse = serde_json::from_str(r#"{"data": []}"#).expect("parse");
        assert!(matches!(
            first_image_url(parsed),
            Err(ClientError::Missing {
                field: "image data",
                ..
            })
        ));
    }
}
