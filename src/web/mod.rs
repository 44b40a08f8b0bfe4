//! HTTP surface: routing, shared state and server startup.

use std::num::NonZeroU16;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use crate::research::ResearchPipeline;
use crate::thumbnail::ThumbnailGenerator;

mod images;
mod prelude;
mod thumbnails;
mod views;

use thumbnails::{
    generate_thumbnail_handler, preset_thumbnail_handler, thumbnail_image_handler,
    thumbnail_url_handler,
};
use views::{generate_content_handler, health_handler, presets_handler, root_handler};

/// Everything a request handler needs.
#[derive(Clone)]
pub struct AppState {
    thumbnails: Arc<ThumbnailGenerator>,
    research: Arc<ResearchPipeline>,
}

impl AppState {
    /// Bundles the two request flows.
    pub fn new(thumbnails: ThumbnailGenerator, research: ResearchPipeline) -> Self {
        Self {
            thumbnails: Arc::new(thumbnails),
            research: Arc::new(research),
        }
    }
}

fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/presets", get(presets_handler))
        .route("/generate", post(generate_content_handler))
        .route("/generate/thumbnail", post(generate_thumbnail_handler))
        .route("/generate/thumbnail/image", post(thumbnail_image_handler))
        .route("/generate/thumbnail/preset", post(preset_thumbnail_handler))
        .route("/generate/thumbnail/url", get(thumbnail_url_handler))
}

/// Any origin when `allowed_origins` is empty, otherwise just those listed.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin.trim()) {
            Ok(value) => Some(value),
            Err(err) => {
                warn!("Ignoring CORS origin {:?}: {}", origin, err);
                None
            }
        })
        .collect();
    let allow_origin = if origins.is_empty() {
        AllowOrigin::from(Any)
    } else {
        AllowOrigin::list(origins)
    };
    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// The full application with middleware applied.
pub fn build_app(state: AppState, allowed_origins: &[String]) -> Router {
    create_router()
        .layer(cors_layer(allowed_origins))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Binds the listener and serves until the server stops.
pub async fn setup_server(
    listen_addr: &str,
    port: NonZeroU16,
    allowed_origins: &[String],
    state: AppState,
) -> Result<(), anyhow::Error> {
    let app = build_app(state, allowed_origins);

    let addr = format!("{}:{}", listen_addr, port);
    info!("Starting server on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    if let Err(err) = axum::serve(listener, app).await {
        error!("Server error: {}", err);
    }
    Ok(())
}
