use crate::domain::crew::{CrewDraft, CrewId, CrewPatch, RecordKey};
use crate::domain::views::RosterFilter;
use crate::error::RosterError;
use crate::transport::http::handlers::common::{error_response, ok_response};
use crate::transport::http::types::{json_422, ApiResponse, AppState};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/crew",
    params(RosterFilter),
    responses(
        (status = 200, description = "Crew records in sheet order", body = ApiResponse),
        (status = 400, description = "Unknown status filter", body = ApiResponse),
        (status = 500, description = "Backing store failure", body = ApiResponse)
    )
)]
pub async fn list_crew_handler(
    State(state): State<AppState>,
    Query(filter): Query<RosterFilter>,
) -> impl IntoResponse {
    let roster = state.roster.lock().await;
    match roster.list(&filter).await {
        Ok(listing) => ok_response(&listing),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    get,
    path = "/api/crew/{id}",
    params(("id" = i64, Path, description = "Crew id")),
    responses(
        (status = 200, description = "Crew record with its current row", body = ApiResponse),
        (status = 404, description = "No such id", body = ApiResponse),
        (status = 409, description = "Id is duplicated or the row cannot be decoded", body = ApiResponse)
    )
)]
pub async fn get_crew_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    let roster = state.roster.lock().await;
    match roster.get(&RecordKey::Id(CrewId(id))).await {
        Ok(entry) => ok_response(&entry),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/crew",
    request_body = CrewDraft,
    responses(
        (status = 200, description = "Crew record appended", body = ApiResponse),
        (status = 422, description = "Validation failed or invalid JSON body", body = ApiResponse),
        (status = 500, description = "Backing store failure", body = ApiResponse)
    )
)]
pub async fn create_crew_handler(
    State(state): State<AppState>,
    request: Result<Json<CrewDraft>, JsonRejection>,
) -> impl IntoResponse {
    let Json(draft) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "a crew draft").into_response(),
    };

    let roster = state.roster.lock().await;
    match roster.add(draft).await {
        Ok(record) => ok_response(&record),
        Err(e) => error_response(&e),
    }
}

async fn update_by_key(
    state: &AppState,
    key: RecordKey,
    request: Result<Json<CrewPatch>, JsonRejection>,
) -> Response {
    let Json(patch) = match request {
        Ok(v) => v,
        Err(e) => return json_422(e, "a crew patch").into_response(),
    };

    let roster = state.roster.lock().await;
    match roster.update(&key, patch).await {
        Ok(record) => ok_response(&record),
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    put,
    path = "/api/crew/{id}",
    params(("id" = i64, Path, description = "Crew id")),
    request_body = CrewPatch,
    responses(
        (status = 200, description = "Crew record updated", body = ApiResponse),
        (status = 404, description = "No such id", body = ApiResponse),
        (status = 409, description = "Id is duplicated or the row cannot be decoded", body = ApiResponse),
        (status = 422, description = "Validation failed or invalid JSON body", body = ApiResponse),
        (status = 500, description = "Backing store failure", body = ApiResponse)
    )
)]
pub async fn update_crew_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    request: Result<Json<CrewPatch>, JsonRejection>,
) -> impl IntoResponse {
    update_by_key(&state, RecordKey::Id(CrewId(id)), request).await
}

#[utoipa::path(
    put,
    path = "/api/crew-by-name/{name}",
    params(("name" = String, Path, description = "Crew member name (must be unique)")),
    request_body = CrewPatch,
    responses(
        (status = 200, description = "Crew record updated", body = ApiResponse),
        (status = 404, description = "No such name", body = ApiResponse),
        (status = 409, description = "Name is not unique", body = ApiResponse),
        (status = 422, description = "Validation failed or invalid JSON body", body = ApiResponse)
    )
)]
pub async fn update_crew_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Result<Json<CrewPatch>, JsonRejection>,
) -> impl IntoResponse {
    update_by_key(&state, RecordKey::Name(name), request).await
}

/// Delete reports backing-store failures in the envelope instead of
/// surfacing them as a server error.
async fn delete_by_key(state: &AppState, key: RecordKey) -> Response {
    let roster = state.roster.lock().await;
    match roster.remove(&key).await {
        Ok(removed) => ok_response(&serde_json::json!({
            "row": removed.row,
            "id": removed.id,
            "record": removed.record,
        })),
        Err(RosterError::BackingStore(e)) => {
            tracing::error!(%key, error = %e, "delete failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(ApiResponse::err(format!("Failed to delete: {}", e))),
            )
                .into_response()
        }
        Err(e) => error_response(&e),
    }
}

#[utoipa::path(
    delete,
    path = "/api/crew/{id}",
    params(("id" = i64, Path, description = "Crew id")),
    responses(
        (status = 200, description = "Row deleted; later rows moved up", body = ApiResponse),
        (status = 404, description = "No such id", body = ApiResponse),
        (status = 409, description = "Id is duplicated", body = ApiResponse),
        (status = 502, description = "Backing store rejected the delete", body = ApiResponse)
    )
)]
pub async fn delete_crew_handler(State(state): State<AppState>, Path(id): Path<i64>) -> impl IntoResponse {
    delete_by_key(&state, RecordKey::Id(CrewId(id))).await
}

#[utoipa::path(
    delete,
    path = "/api/crew-by-name/{name}",
    params(("name" = String, Path, description = "Crew member name (must be unique)")),
    responses(
        (status = 200, description = "Row deleted; later rows moved up", body = ApiResponse),
        (status = 404, description = "No such name", body = ApiResponse),
        (status = 409, description = "Name is not unique", body = ApiResponse),
        (status = 502, description = "Backing store rejected the delete", body = ApiResponse)
    )
)]
pub async fn delete_crew_by_name_handler(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> impl IntoResponse {
    delete_by_key(&state, RecordKey::Name(name)).await
}
