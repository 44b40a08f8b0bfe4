//! Thumbnail prompt building, generation and post-processing.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ab_glyph::FontArc;
use image::imageops::FilterType;
use tracing::{debug, info, warn};

use crate::clients::{ImageGenerator, Quality};
use crate::constants::{FALLBACK_FONTS, JPEG_QUALITY, THUMBNAIL_HEIGHT, THUMBNAIL_WIDTH};
use crate::error::StudioError;

pub mod overlay;

pub use overlay::{TextOverlay, TextPosition};

/// Default visual style when the caller doesn't pick one.
pub const DEFAULT_STYLE: &str = "vibrant and eye-catching";

/// Default theme when the caller doesn't pick one.
pub const DEFAULT_THEME: &str = "modern";

/// What to ask the image model for.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ThumbnailSpec {
    /// Video title or topic
    pub title: String,
    /// Visual style
    pub style: String,
    /// Theme/genre
    pub theme: String,
    /// Extra things to include in the image
    pub additional_elements: Vec<String>,
    /// Quality tier
    pub quality: Quality,
}

impl ThumbnailSpec {
    /// A spec with the default style, theme and quality.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            style: DEFAULT_STYLE.to_string(),
            theme: DEFAULT_THEME.to_string(),
            additional_elements: Vec::new(),
            quality: Quality::default(),
        }
    }
}

/// Builds the creative brief sent to the image model.
pub fn build_prompt(spec: &ThumbnailSpec) -> String {
    let mut prompt = format!(
        r#"Create a YouTube thumbnail image for a video titled "{title}".

Background: A minimal and energetic pattern,
with high contrast colors such as red, yellow, or orange to create urgency and excitement.

Text Layout: Use large, bold, uppercase text split across 2–3 segments
Combine contrasting color blocks (e.g., black, white, yellow) behind text for emphasis
Include dynamic font choices such as sans-serif, bold, and condensed styles
Apply mild shadows or outlines to ensure legibility

Visual Elements: Add hand-drawn arrows or shapes pointing toward text to guide the viewer's eye
Optionally include emoji-style icons or comic effects like bursts, stars, or exclamation marks

Human Element: Place a person or character on one side (left or right), with a strong emotional expression (e.g., surprise, excitement, shock)
Use a sticker-style white border or cut-out effect around them for emphasis

Requirements:
- 16:9 aspect ratio (landscape orientation)
- High contrast and vibrant colors that stand out
- Clear focal point that draws attention
- Professional and polished appearance
- Optimized for small display sizes (will be viewed as small thumbnails)
- No text overlay (text will be added separately)
- Eye-catching and clickable design

Overall look: {style}, with a {theme} theme."#,
        title = spec.title,
        style = spec.style,
        theme = spec.theme,
    );

    if !spec.additional_elements.is_empty() {
        prompt.push_str("\n\nAdditional elements to include: ");
        prompt.push_str(&spec.additional_elements.join(", "));
    }

    prompt.push_str(
        "\n\nThe image should be visually striking and make viewers want to click on the video.",
    );
    prompt
}

/// Loads the first font that parses, trying `configured` before the fallbacks.
pub fn load_font(configured: Option<&Path>) -> Option<FontArc> {
    let candidates = configured
        .map(Path::to_path_buf)
        .into_iter()
        .chain(FALLBACK_FONTS.iter().map(PathBuf::from));
    let font = first_font(candidates);
    if font.is_none() {
        warn!("No overlay font found, text overlays will be skipped");
    }
    font
}

fn first_font(candidates: impl IntoIterator<Item = PathBuf>) -> Option<FontArc> {
    for path in candidates {
        match std::fs::read(&path) {
            Ok(bytes) => match FontArc::try_from_vec(bytes) {
                Ok(font) => {
                    info!("Using overlay font {}", path.display());
                    return Some(font);
                }
                Err(err) => warn!("Failed to parse font {}: {}", path.display(), err),
            },
            Err(err) => debug!("Font {} not readable: {}", path.display(), err),
        }
    }
    None
}

/// Resizes to thumbnail size, draws the overlay if there's a font for it,
/// and encodes as JPEG.
pub fn process_image(
    bytes: &[u8],
    overlay: Option<&TextOverlay>,
    font: Option<&FontArc>,
) -> Result<Vec<u8>, StudioError> {
    let image = image::load_from_memory(bytes)
        .map_err(|err| StudioError::Upstream(format!("Error processing image: {err}")))?;
    let mut resized = image
        .resize_exact(THUMBNAIL_WIDTH, THUMBNAIL_HEIGHT, FilterType::Lanczos3)
        .to_rgb8();

    match (overlay, font) {
        (Some(overlay), Some(font)) if !overlay.text.is_empty() => {
            overlay.draw(&mut resized, font)?;
        }
        (Some(overlay), None) if !overlay.text.is_empty() => {
            warn!("Skipping overlay {:?}: no font available", overlay.text);
        }
        _ => {}
    }

    let mut output = Vec::new();
    let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut output, JPEG_QUALITY);
    encoder
        .encode_image(&resized)
        .map_err(|err| StudioError::Upstream(format!("Error processing image: {err}")))?;
    Ok(output)
}

/// Drives the image model and post-processing.
pub struct ThumbnailGenerator {
    images: Arc<dyn ImageGenerator>,
    font: Option<FontArc>,
}

impl ThumbnailGenerator {
    /// Wraps an image backend, with an optional overlay font.
    pub fn new(images: Arc<dyn ImageGenerator>, font: Option<FontArc>) -> Self {
        Self { images, font }
    }

    /// Generates a thumbnail and returns the model's image URL.
    pub async fn generate_url(&self, spec: &ThumbnailSpec) -> Result<String, StudioError> {
        let prompt = build_prompt(spec);
        debug!("Thumbnail prompt for {:?}: {}", spec.title, prompt);
        self.images
            .generate(&prompt, spec.quality)
            .await
            .map_err(|err| StudioError::Upstream(format!("Error generating thumbnail: {err}")))
    }

    /// Downloads a generated image and turns it into the final JPEG.
    pub async fn render(
        &self,
        image_url: &str,
        overlay: Option<TextOverlay>,
    ) -> Result<Vec<u8>, StudioError> {
        let bytes = self
            .images
            .download(image_url)
            .await
            .map_err(|err| StudioError::Upstream(format!("Error processing image: {err}")))?;
        let font = self.font.clone();
        let jpeg = tokio::task::spawn_blocking(move || {
            process_image(&bytes, overlay.as_ref(), font.as_ref())
        })
        .await??;
        info!("Rendered thumbnail ({} bytes)", jpeg.len());
        Ok(jpeg)
    }
}
