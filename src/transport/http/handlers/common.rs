use crate::error::{LookupError, RosterError};
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// 200 with `data` serialized into the envelope.
pub fn ok_response<T: Serialize>(data: &T) -> Response {
    match serde_json::to_value(data) {
        Ok(value) => (StatusCode::OK, Json(ApiResponse::ok(value))).into_response(),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ApiResponse::err(format!("Failed to serialize response: {}", e))),
        )
            .into_response(),
    }
}

pub fn status_for(err: &RosterError) -> StatusCode {
    match err {
        RosterError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        RosterError::Lookup(LookupError::NotFound(_)) => StatusCode::NOT_FOUND,
        RosterError::Lookup(LookupError::Ambiguous { .. }) => StatusCode::CONFLICT,
        RosterError::MalformedRow { .. } => StatusCode::CONFLICT,
        RosterError::Filter(_) => StatusCode::BAD_REQUEST,
        RosterError::BackingStore(_) | RosterError::Layout(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Maps a roster error onto the envelope. Validation failures also carry
/// the individual messages under `data.errors`.
pub fn error_response(err: &RosterError) -> Response {
    let status = status_for(err);
    if status.is_server_error() {
        tracing::error!(error = %err, "roster operation failed");
    }
    let body = match err {
        RosterError::Validation(errors) => ApiResponse {
            success: false,
            data: Some(serde_json::json!({ "errors": errors.messages() })),
            error: Some(errors.to_string()),
        },
        other => ApiResponse::err(other.to_string()),
    };
    (status, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::crew::{CrewId, RecordKey, ValidationErrors};
    use crate::storage::sheet::SheetError;

    #[test]
    fn statuses_follow_error_kind() {
        assert_eq!(
            status_for(&RosterError::Validation(ValidationErrors(vec!["x".to_string()]))),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_for(&LookupError::NotFound(RecordKey::Id(CrewId(1))).into()),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(
                &LookupError::Ambiguous {
                    key: RecordKey::Name("Ana".to_string()),
                    count: 2
                }
                .into()
            ),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_for(&SheetError::Unavailable("down".to_string()).into()),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
