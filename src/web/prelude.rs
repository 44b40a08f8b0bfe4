pub(crate) use crate::error::StudioError;
pub(crate) use crate::web::AppState;
pub(crate) use axum::Json;
pub(crate) use axum::extract::rejection::{JsonRejection, QueryRejection};
pub(crate) use axum::extract::{Query, State};
pub(crate) use axum::response::Response;
pub(crate) use chrono::Utc;
pub(crate) use serde::{Deserialize, Serialize};
pub(crate) use std::time::Instant;
pub(crate) use tracing::{debug, info};
