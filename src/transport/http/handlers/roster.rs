use crate::domain::views::RosterFilter;
use crate::transport::http::handlers::common::{error_response, ok_response};
use crate::transport::http::types::{ApiResponse, AppState, SweepRequest};
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

#[utoipa::path(
    post,
    path = "/api/roster/sweep",
    request_body = SweepRequest,
    responses(
        (status = 200, description = "Status sweep applied; changed and skipped records", body = ApiResponse),
        (status = 422, description = "Invalid JSON body", body = ApiResponse),
        (status = 500, description = "Backing store failure", body = ApiResponse)
    )
)]
pub async fn sweep_handler(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    // An empty body means "today, configured window".
    let request = if body.iter().all(u8::is_ascii_whitespace) {
        SweepRequest::default()
    } else {
        match serde_json::from_slice::<SweepRequest>(&body) {
            Ok(r) => r,
            Err(e) => {
                return (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(ApiResponse::err(format!(
                        "Invalid JSON body: {} (expected: {{\"today\"?: \"YYYY-MM-DD\", \"warning_days\"?: n}})",
                        e
                    ))),
                )
                    .into_response();
            }
        }
    };

    let roster = state.roster.lock().await;
    match roster.sweep(request.today, request.warning_days).await {
        Ok(report) => ok_response(&serde_json::json!({
            "changed": report.changed(),
            "changes": report.changes,
            "skipped": report.skipped,
        })),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/roster/filters",
    responses(
        (status = 200, description = "Vessel and status filter options", body = ApiResponse)
    )
)]
pub async fn filters_handler(State(state): State<AppState>) -> impl IntoResponse {
    let roster = state.roster.lock().await;
    match roster.filter_options().await {
        Ok(options) => ok_response(&options),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/roster/calendar",
    params(RosterFilter),
    responses(
        (status = 200, description = "Crew change calendar events", body = ApiResponse),
        (status = 400, description = "Unknown status filter", body = ApiResponse)
    )
)]
pub async fn calendar_handler(
    State(state): State<AppState>,
    Query(filter): Query<RosterFilter>,
) -> impl IntoResponse {
    let roster = state.roster.lock().await;
    match roster.calendar(&filter).await {
        Ok(events) => ok_response(&events),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/roster/timeline",
    params(RosterFilter),
    responses(
        (status = 200, description = "Onboard timeline bars in sheet order", body = ApiResponse),
        (status = 400, description = "Unknown status filter", body = ApiResponse)
    )
)]
pub async fn timeline_handler(
    State(state): State<AppState>,
    Query(filter): Query<RosterFilter>,
) -> impl IntoResponse {
    let roster = state.roster.lock().await;
    match roster.timeline(&filter).await {
        Ok(bars) => ok_response(&bars),
        Err(e) => error_response(&e),
    }
}
