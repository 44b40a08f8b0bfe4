//! Gemini text generation.
//!
//! Endpoint:
//!   POST https://generativelanguage.googleapis.com/v1beta/models/{model}:generateContent
//! Auth:
//!   x-goog-api-key: <API_KEY>

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{LanguageModel, read_success};
use crate::constants::GEMINI_BASE_URL;
use crate::error::ClientError;

const SERVICE: &str = "gemini";

#[derive(Serialize, Debug)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize, Debug)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
struct ResponsePart {
    text: Option<String>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(system_instruction: Option<&'a str>, prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text: prompt }],
            }],
            system_instruction: system_instruction
                .filter(|instruction| !instruction.trim().is_empty())
                .map(|text| Content {
                    role: None,
                    parts: vec![Part { text }],
                }),
        }
    }
}

/// Joins the text parts of the first candidate that has any.
fn response_text(parsed: GenerateContentResponse) -> Option<String> {
    parsed.candidates.into_iter().find_map(|candidate| {
        let text = candidate
            .content?
            .parts
            .into_iter()
            .filter_map(|part| part.text)
            .collect::<String>();
        (!text.trim().is_empty()).then(|| text.trim().to_string())
    })
}

/// Gemini `generateContent` client.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiClient {
    /// Builds a client for `model` against the public endpoint.
    pub fn new(client: reqwest::Client, api_key: &str, model: &str) -> Self {
        Self {
            client,
            api_key: api_key.to_string(),
            model: model.to_string(),
            base_url: GEMINI_BASE_URL.to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(
        &self,
        system_instruction: Option<&str>,
        prompt: &str,
    ) -> Result<String, ClientError> {
        let req_body = GenerateContentRequest::new(system_instruction, prompt);
        debug!("Sending {} prompt chars to {}", prompt.len(), self.model);

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&req_body)
            .send()
            .await
            .map_err(|source| ClientError::Transport {
                service: SERVICE,
                source,
            })?;
        let bytes = read_success(SERVICE, resp).await?;

        let parsed: GenerateContentResponse =
            serde_json::from_slice(&bytes).map_err(|source| ClientError::Decode {
                service: SERVICE,
                source,
            })?;
        response_text(parsed).ok_or(ClientError::Missing {
            service: SERVICE,
            field: "candidate text",
        })
    }
}
