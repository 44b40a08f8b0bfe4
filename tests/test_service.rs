use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use creatorstudio::clients::{ImageGenerator, LanguageModel, Quality, WebResearch};
use creatorstudio::error::ClientError;
use creatorstudio::prompts::SystemPrompts;
use creatorstudio::research::ResearchPipeline;
use creatorstudio::thumbnail::{ThumbnailGenerator, ThumbnailSpec, build_prompt};
use creatorstudio::web::{AppState, build_app};
use http_body_util::BodyExt;
use tower::ServiceExt;

const IMAGE_URL: &str = "https://cdn.example/thumb.png";

struct StaticImages;

#[async_trait]
impl ImageGenerator for StaticImages {
    async fn generate(&self, _prompt: &str, _quality: Quality) -> Result<String, ClientError> {
        Ok(IMAGE_URL.to_string())
    }

    async fn download(&self, _url: &str) -> Result<Vec<u8>, ClientError> {
        let image = image::RgbImage::from_pixel(320, 180, image::Rgb([10, 120, 220]));
        let mut out = Cursor::new(Vec::new());
        image::DynamicImage::ImageRgb8(image)
            .write_to(&mut out, image::ImageFormat::Png)
            .expect("encode png");
        Ok(out.into_inner())
    }
}

/// Echoes the last line of the prompt back.
struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(
        &self,
        _system_instruction: Option<&str>,
        prompt: &str,
    ) -> Result<String, ClientError> {
        Ok(prompt.lines().last().unwrap_or_default().to_string())
    }
}

struct EmptyWeb;

#[async_trait]
impl WebResearch for EmptyWeb {
    async fn search(&self, _query: &str, _max_results: usize) -> Result<Vec<String>, ClientError> {
        Ok(Vec::new())
    }

    async fn map(&self, _url: &str) -> Result<Vec<String>, ClientError> {
        Ok(Vec::new())
    }

    async fn crawl(&self, _url: &str) -> Result<String, ClientError> {
        Ok(String::new())
    }
}

fn app() -> axum::Router {
    let state = AppState::new(
        ThumbnailGenerator::new(Arc::new(StaticImages), None),
        ResearchPipeline::new(
            Arc::new(EchoModel),
            Arc::new(EmptyWeb),
            SystemPrompts::bundled().expect("bundled prompts"),
        ),
    );
    build_app(state, &[])
}

#[tokio::test]
async fn test_thumbnail_image_is_1280x720_jpeg() {
    let request = Request::builder()
        .method("POST")
        .uri("/generate/thumbnail/image")
        .header("content-type", "application/json")
        .body(Body::from(
            r#"{"title": "Build a Shed", "overlay_text": "DIY", "quality": "standard"}"#,
        ))
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let decoded = image::load_from_memory(&bytes).expect("decode jpeg");
    assert_eq!((decoded.width(), decoded.height()), (1280, 720));
}

#[tokio::test]
async fn test_generate_with_no_sources() {
    let request = Request::builder()
        .method("POST")
        .uri("/generate")
        .header("content-type", "application/json")
        .body(Body::from(r#"{"query": "winter cycling tips"}"#))
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(
        body["result"],
        "Return only the filled out template in your response."
    );
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let request = Request::builder()
        .uri("/nope")
        .body(Body::empty())
        .expect("request");
    let response = app().oneshot(request).await.expect("response");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn test_prompt_mentions_title_and_look() {
    let mut spec = ThumbnailSpec::new("Build a Shed");
    spec.style = "rustic".to_string();
    spec.additional_elements = vec!["timber".to_string(), "saw".to_string()];
    let prompt = build_prompt(&spec);
    assert!(prompt.starts_with("Create a YouTube thumbnail image for a video titled \"Build a Shed\"."));
    assert!(prompt.contains("Overall look: rustic, with a modern theme."));
    assert!(prompt.contains("Additional elements to include: timber, saw"));
}
