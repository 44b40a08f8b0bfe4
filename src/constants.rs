//! Shared constants for the service and its upstream APIs
//!

use std::time::Duration;

/// Name reported by the root endpoint.
pub const SERVICE_NAME: &str = "YouTube Thumbnail Generator API";

/// Version reported by the root endpoint.
pub const SERVICE_VERSION: &str = "1.0.0";

/// Final thumbnail width in pixels.
pub const THUMBNAIL_WIDTH: u32 = 1280;

/// Final thumbnail height in pixels.
pub const THUMBNAIL_HEIGHT: u32 = 720;

/// Size requested from the image model; the closest landscape it supports.
pub const GENERATION_SIZE: &str = "1792x1024";

/// JPEG quality of processed thumbnails.
pub const JPEG_QUALITY: u8 = 95;

/// How long we wait for a generated image to download.
pub const IMAGE_DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Distance from the top/bottom edge for positioned overlays.
pub const OVERLAY_MARGIN: i32 = 50;

/// Number of search results fed into site mapping.
pub const SEARCH_MAX_RESULTS: usize = 5;

/// Number of URLs kept after the relevance filter.
pub const FILTERED_URL_LIMIT: usize = 5;

/// Characters of each crawled page passed to the writer.
pub const SNIPPET_CHARS: usize = 500;

/// Default Azure OpenAI REST API version.
pub const DEFAULT_AZURE_API_VERSION: &str = "2024-02-01";

/// Default Azure deployment name for image generation.
pub const DEFAULT_AZURE_IMAGE_DEPLOYMENT: &str = "dall-e-3";

/// Default Gemini model for every text step.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Gemini REST base URL.
pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Tavily REST base URL.
pub const TAVILY_BASE_URL: &str = "https://api.tavily.com";

/// Header carrying how long a thumbnail took, in seconds.
pub const X_GENERATION_TIME: &str = "x-generation-time";

/// Fonts tried, in order, when no overlay font is configured.
pub const FALLBACK_FONTS: [&str; 5] = [
    "arial.ttf",
    "Arial Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/Library/Fonts/Arial Bold.ttf",
];
