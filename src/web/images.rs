use std::time::Duration;

use axum::body::Body;
use axum::http::header::{CACHE_CONTROL, CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::Response;
use chrono::{DateTime, Utc};

use crate::constants::X_GENERATION_TIME;
use crate::error::StudioError;

/// `thumbnail_YYYYmmdd_HHMMSS.jpg` for the given moment.
pub(crate) fn thumbnail_filename(at: DateTime<Utc>) -> String {
    format!("thumbnail_{}.jpg", at.format("%Y%m%d_%H%M%S"))
}

/// Builds an inline JPEG response with the generation timing header.
pub(crate) fn jpeg_response(jpeg: Vec<u8>, elapsed: Duration) -> Result<Response, StudioError> {
    Response::builder()
        .header(CONTENT_TYPE, "image/jpeg")
        .header(
            CONTENT_DISPOSITION,
            format!("inline; filename={}", thumbnail_filename(Utc::now())),
        )
        .header(CACHE_CONTROL, "no-store")
        .header(X_GENERATION_TIME, elapsed.as_secs_f64().to_string())
        .body(Body::from(jpeg))
        .map_err(StudioError::from)
}
