//! Error handling

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use chrono::Utc;
use serde_json::json;
use tracing::{error, info};

/// Errors surfaced to HTTP clients.
#[derive(Debug, thiserror::Error)]
pub enum StudioError {
    /// When the caller sent something we can't use
    #[error("{0}")]
    BadRequest(String),
    /// When a third-party API call fails; the detail goes back to the caller
    #[error("{0}")]
    Upstream(String),
    /// When something on our side breaks; the detail is only logged
    #[error("{0}")]
    InternalServerError(String),
}

/// Failures talking to image, search and language model APIs.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The request never got a response
    #[error("request to {service} failed: {source}")]
    Transport {
        /// Upstream name
        service: &'static str,
        /// Underlying error
        #[source]
        source: reqwest::Error,
    },
    /// Non-success status code
    #[error("{service} returned {status}: {body}")]
    Status {
        /// Upstream name
        service: &'static str,
        /// Status code returned
        status: reqwest::StatusCode,
        /// Response body, lossily decoded
        body: String,
    },
    /// Body wasn't the JSON we expected
    #[error("failed to parse {service} response: {source}")]
    Decode {
        /// Upstream name
        service: &'static str,
        /// Underlying error
        #[source]
        source: serde_json::Error,
    },
    /// Body parsed but lacked the field we need
    #[error("{service} response missing {field}")]
    Missing {
        /// Upstream name
        service: &'static str,
        /// What was missing
        field: &'static str,
    },
    /// Endpoint configuration produced an invalid URL
    #[error("invalid endpoint URL: {0}")]
    Url(#[from] url::ParseError),
}

impl From<std::io::Error> for StudioError {
    fn from(err: std::io::Error) -> Self {
        StudioError::InternalServerError(err.to_string())
    }
}

impl From<axum::http::Error> for StudioError {
    fn from(err: axum::http::Error) -> Self {
        StudioError::InternalServerError(err.to_string())
    }
}

impl From<JsonRejection> for StudioError {
    fn from(rejection: JsonRejection) -> Self {
        StudioError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for StudioError {
    fn from(rejection: QueryRejection) -> Self {
        StudioError::BadRequest(rejection.body_text())
    }
}

impl From<tokio::task::JoinError> for StudioError {
    fn from(err: tokio::task::JoinError) -> Self {
        StudioError::InternalServerError(err.to_string())
    }
}

impl StudioError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            StudioError::BadRequest(_) => StatusCode::BAD_REQUEST,
            StudioError::Upstream(_) | StudioError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for StudioError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status();
        let detail = match self {
            StudioError::BadRequest(detail) => {
                info!("Bad request received: {}", detail);
                detail
            }
            StudioError::Upstream(detail) => {
                error!("Upstream error: {}", detail);
                detail
            }
            StudioError::InternalServerError(message) => {
                error!("Internal server error: {}", message);
                "Internal server error".to_string()
            }
        };
        let body = json!({
            "error": detail,
            "timestamp": Utc::now().to_rfc3339(),
        });
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: StudioError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("collect body")
            .to_bytes();
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn bad_request_keeps_detail() {
        let (status, body) = body_json(StudioError::BadRequest("nope".to_string())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "nope");
        assert!(body["timestamp"].is_string());
    }

    #[tokio::test]
    async fn upstream_keeps_detail() {
        let (status, body) =
            body_json(StudioError::Upstream("Tavily search error: boom".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Tavily search error: boom");
    }

    #[tokio::test]
    async fn internal_hides_detail() {
        let (status, body) =
            body_json(StudioError::InternalServerError("disk on fire".to_string())).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
    }

    #[test]
    fn missing_field_message() {
        let err = ClientError::Missing {
            service: "gemini",
            field: "candidate text",
        };
        assert_eq!(err.to_string(), "gemini response missing candidate text");
    }
}
