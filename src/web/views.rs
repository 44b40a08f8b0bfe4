use super::prelude::*;
use crate::constants::{SERVICE_NAME, SERVICE_VERSION};
use crate::presets::PresetTable;
use crate::research::OutputFormat;

#[derive(Serialize)]
pub(crate) struct RootResponse {
    message: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
    timestamp: String,
}

#[derive(Serialize)]
pub(crate) struct PresetsResponse {
    presets: PresetTable,
}

#[derive(Deserialize)]
pub(crate) struct GenerateRequest {
    query: String,
    #[serde(default)]
    format: Option<OutputFormat>,
}

#[derive(Serialize)]
pub(crate) struct GenerateResponse {
    result: String,
}

/// handles the / GET
pub(crate) async fn root_handler() -> Json<RootResponse> {
    Json(RootResponse {
        message: SERVICE_NAME,
        version: SERVICE_VERSION,
    })
}

pub(crate) async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339(),
    })
}

pub(crate) async fn presets_handler() -> Json<PresetsResponse> {
    Json(PresetsResponse {
        presets: PresetTable,
    })
}

/// Runs the research pipeline and returns the written text.
pub(crate) async fn generate_content_handler(
    State(state): State<AppState>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, StudioError> {
    let Json(request) = payload?;
    if request.query.trim().is_empty() {
        return Err(StudioError::BadRequest("query must not be empty".to_string()));
    }
    let format = request.format.unwrap_or_default();
    let started = Instant::now();
    debug!("Research request for {}: {:?}", format.as_str(), request.query);

    let result = state.research.run(&request.query, &format).await?;
    info!(
        "Generated {} in {:.1}s",
        format.label(),
        started.elapsed().as_secs_f64()
    );
    Ok(Json(GenerateResponse { result }))
}
