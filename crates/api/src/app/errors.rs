use axum::Json;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use taskdeck_jobs::DispatchError;
use taskdeck_tasks::{FieldErrors, TaskStoreError};

/// Validation failure: the body is the field→messages mapping itself.
pub fn validation_response(fields: FieldErrors) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(fields)).into_response()
}

pub fn store_error_to_response(err: TaskStoreError) -> axum::response::Response {
    match err {
        TaskStoreError::Validation(fields) => validation_response(fields),
        TaskStoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
    }
}

pub fn dispatch_error_to_response(err: DispatchError) -> axum::response::Response {
    match err {
        DispatchError::UnknownJobName(name) => json_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "unknown_job",
            format!("unknown job name: {name}"),
        ),
        DispatchError::Broker(e) => {
            json_error(StatusCode::BAD_GATEWAY, "broker_error", e.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
