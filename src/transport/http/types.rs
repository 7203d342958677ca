use crate::app::roster_service::RosterService;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tokio::sync::Mutex;
use utoipa::ToSchema;

/// Shared handler state. The mutex serializes roster interactions so each
/// reload-resolve-write sequence runs alone.
#[derive(Clone)]
pub struct AppState {
    pub roster: Arc<Mutex<RosterService>>,
}

impl AppState {
    pub fn new(service: RosterService) -> Self {
        Self {
            roster: Arc::new(Mutex::new(service)),
        }
    }
}

#[derive(Serialize, Debug, ToSchema)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub data: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiResponse {
    pub fn ok(data: JsonValue) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[derive(Deserialize, Debug, Default, ToSchema)]
pub struct SweepRequest {
    /// Date to evaluate against; defaults to the server's local date.
    #[serde(default)]
    #[schema(value_type = Option<String>, format = Date)]
    pub today: Option<NaiveDate>,
    /// Warning window in days; defaults to the configured window.
    #[serde(default)]
    pub warning_days: Option<u32>,
}

pub fn json_422(err: JsonRejection, expected: &str) -> (StatusCode, Json<ApiResponse>) {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(ApiResponse::err(format!(
            "Invalid JSON body: {} (expected: {})",
            err, expected
        ))),
    )
}
