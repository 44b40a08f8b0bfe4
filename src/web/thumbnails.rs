use super::images::jpeg_response;
use super::prelude::*;
use crate::clients::Quality;
use crate::presets::{preset, preset_names};
use crate::thumbnail::overlay::validate_ranges;
use crate::thumbnail::{DEFAULT_STYLE, DEFAULT_THEME, TextOverlay, TextPosition, ThumbnailSpec};

/// Body of the JSON thumbnail endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct ThumbnailRequest {
    title: String,
    overlay_text: Option<String>,
    style: Option<String>,
    theme: Option<String>,
    additional_elements: Option<Vec<String>>,
    #[serde(default)]
    quality: Quality,
    font_size: Option<u32>,
    text_color: Option<String>,
    stroke_color: Option<String>,
    stroke_width: Option<u32>,
    position: Option<TextPosition>,
}

impl ThumbnailRequest {
    fn into_parts(self) -> Result<(ThumbnailSpec, Option<TextOverlay>), StudioError> {
        let overlay = match self.overlay_text.filter(|text| !text.trim().is_empty()) {
            Some(text) => {
                let mut overlay = TextOverlay::new(text);
                if let Some(font_size) = self.font_size {
                    overlay.font_size = font_size;
                }
                if let Some(text_color) = self.text_color {
                    overlay.text_color = text_color;
                }
                if let Some(stroke_color) = self.stroke_color {
                    overlay.stroke_color = stroke_color;
                }
                if let Some(stroke_width) = self.stroke_width {
                    overlay.stroke_width = stroke_width;
                }
                if let Some(position) = self.position {
                    overlay.position = position;
                }
                overlay.validate()?;
                Some(overlay)
            }
            None => None,
        };
        let spec = ThumbnailSpec {
            title: checked_title(self.title)?,
            style: self.style.unwrap_or_else(|| DEFAULT_STYLE.to_string()),
            theme: self.theme.unwrap_or_else(|| DEFAULT_THEME.to_string()),
            additional_elements: self.additional_elements.unwrap_or_default(),
            quality: self.quality,
        };
        Ok((spec, overlay))
    }
}

fn checked_title(title: String) -> Result<String, StudioError> {
    if title.trim().is_empty() {
        return Err(StudioError::BadRequest("title must not be empty".to_string()));
    }
    Ok(title)
}

fn default_font_size() -> u32 {
    60
}

fn default_text_color() -> String {
    "white".to_string()
}

fn default_stroke_color() -> String {
    "black".to_string()
}

fn default_stroke_width() -> u32 {
    3
}

/// Query of the preset endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct PresetQuery {
    preset: String,
    title: String,
    overlay_text: Option<String>,
    #[serde(default = "default_font_size")]
    font_size: u32,
    #[serde(default = "default_text_color")]
    text_color: String,
    #[serde(default = "default_stroke_color")]
    stroke_color: String,
    #[serde(default = "default_stroke_width")]
    stroke_width: u32,
    #[serde(default)]
    position: TextPosition,
    #[serde(default)]
    quality: Quality,
}

/// Query of the raw URL endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct UrlQuery {
    title: String,
    #[serde(default = "default_style")]
    style: String,
    #[serde(default = "default_theme")]
    theme: String,
    #[serde(default)]
    quality: Quality,
}

fn default_style() -> String {
    DEFAULT_STYLE.to_string()
}

fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}

#[derive(Serialize)]
pub(crate) struct ThumbnailResponse {
    thumbnail_url: String,
    generated_at: String,
    generation_time: f64,
}

#[derive(Serialize)]
pub(crate) struct ImageUrlResponse {
    image_url: String,
    title: String,
    style: String,
    theme: String,
    quality: Quality,
    generated_at: String,
}

/// Generates, downloads and processes a thumbnail, answering with its URL.
pub(crate) async fn generate_thumbnail_handler(
    State(state): State<AppState>,
    payload: Result<Json<ThumbnailRequest>, JsonRejection>,
) -> Result<Json<ThumbnailResponse>, StudioError> {
    let started = Instant::now();
    let Json(request) = payload?;
    let (spec, overlay) = request.into_parts()?;
    info!("Generating thumbnail for {:?}", spec.title);

    let thumbnail_url = state.thumbnails.generate_url(&spec).await?;
    // processing proves the image is usable before we hand out its URL
    state.thumbnails.render(&thumbnail_url, overlay).await?;

    Ok(Json(ThumbnailResponse {
        thumbnail_url,
        generated_at: Utc::now().to_rfc3339(),
        generation_time: started.elapsed().as_secs_f64(),
    }))
}

/// Generates a thumbnail and answers with the processed JPEG.
pub(crate) async fn thumbnail_image_handler(
    State(state): State<AppState>,
    payload: Result<Json<ThumbnailRequest>, JsonRejection>,
) -> Result<Response, StudioError> {
    let started = Instant::now();
    let Json(request) = payload?;
    let (spec, overlay) = request.into_parts()?;
    render_jpeg(&state, &spec, overlay, started).await
}

/// Generates a thumbnail from a named preset and answers with the JPEG.
pub(crate) async fn preset_thumbnail_handler(
    State(state): State<AppState>,
    query: Result<Query<PresetQuery>, QueryRejection>,
) -> Result<Response, StudioError> {
    let started = Instant::now();
    let Query(query) = query?;
    let Some(chosen) = preset(&query.preset) else {
        return Err(StudioError::BadRequest(format!(
            "Invalid preset. Available presets: {}",
            preset_names()
        )));
    };

    validate_ranges(query.font_size, query.stroke_width)?;
    let overlay = match query.overlay_text.filter(|text| !text.trim().is_empty()) {
        Some(text) => {
            let overlay = TextOverlay {
                text,
                font_size: query.font_size,
                text_color: query.text_color,
                stroke_color: query.stroke_color,
                stroke_width: query.stroke_width,
                position: query.position,
            };
            overlay.validate()?;
            Some(overlay)
        }
        None => None,
    };
    let spec = ThumbnailSpec {
        title: checked_title(query.title)?,
        style: chosen.style.to_string(),
        theme: chosen.theme.to_string(),
        additional_elements: chosen
            .additional_elements
            .iter()
            .map(|element| element.to_string())
            .collect(),
        quality: query.quality,
    };
    debug!("Using preset {}", chosen.name);
    render_jpeg(&state, &spec, overlay, started).await
}

async fn render_jpeg(
    state: &AppState,
    spec: &ThumbnailSpec,
    overlay: Option<TextOverlay>,
    started: Instant,
) -> Result<Response, StudioError> {
    info!("Generating thumbnail image for {:?}", spec.title);
    let image_url = state.thumbnails.generate_url(spec).await?;
    let jpeg = state.thumbnails.render(&image_url, overlay).await?;
    jpeg_response(jpeg, started.elapsed())
}

/// Generates a thumbnail and answers with the model's raw image URL.
pub(crate) async fn thumbnail_url_handler(
    State(state): State<AppState>,
    query: Result<Query<UrlQuery>, QueryRejection>,
) -> Result<Json<ImageUrlResponse>, StudioError> {
    let Query(query) = query?;
    let spec = ThumbnailSpec {
        title: checked_title(query.title)?,
        style: query.style,
        theme: query.theme,
        additional_elements: Vec::new(),
        quality: query.quality,
    };
    let image_url = state.thumbnails.generate_url(&spec).await?;
    Ok(Json(ImageUrlResponse {
        image_url,
        title: spec.title,
        style: spec.style,
        theme: spec.theme,
        quality: spec.quality,
        generated_at: Utc::now().to_rfc3339(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(value: serde_json::Value) -> ThumbnailRequest {
        serde_json::from_value(value).expect("valid request")
    }

    #[test]
    fn minimal_request_uses_defaults() {
        let (spec, overlay) = request(serde_json::json!({"title": "Knots"}))
            .into_parts()
            .expect("parts");
        assert_eq!(spec, ThumbnailSpec::new("Knots"));
        assert!(overlay.is_none());
    }

    #[test]
    fn overlay_fields_are_applied() {
        let (spec, overlay) = request(serde_json::json!({
            "title": "Knots",
            "overlay_text": "TIE IT",
            "font_size": 90,
            "position": "bottom",
            "quality": "standard",
            "additional_elements": ["rope"]
        }))
        .into_parts()
        .expect("parts");
        assert_eq!(spec.quality, Quality::Standard);
        assert_eq!(spec.additional_elements, vec!["rope".to_string()]);
        let overlay = overlay.expect("overlay");
        assert_eq!(overlay.font_size, 90);
        assert_eq!(overlay.position, TextPosition::Bottom);
        assert_eq!(overlay.text_color, "white");
    }

    #[test]
    fn bad_overlay_is_rejected() {
        let err = request(serde_json::json!({"title": "x", "overlay_text": "y", "stroke_width": 20}))
            .into_parts()
            .expect_err("invalid");
        assert!(matches!(err, StudioError::BadRequest(_)));
    }

    #[test]
    fn blank_title_is_rejected() {
        assert!(request(serde_json::json!({"title": "  "})).into_parts().is_err());
    }
}
