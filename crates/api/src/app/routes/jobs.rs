//! Job submission and status polling.
//!
//! Submission is fire-and-forget: the handlers return as soon as the
//! broker has the message, and clients learn the rest by polling.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use taskdeck_jobs::{DELAY_TEST, GENERATE_REPORT, JobId, JobState};

use crate::app::{errors, services::AppServices};

/// POST (or GET) /api/test-celery/
pub async fn test_celery(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let id = match services.dispatcher.submit(DELAY_TEST, serde_json::Value::Null) {
        Ok(id) => id,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "message": "delay test job submitted",
            "task_id": id.to_string(),
        })),
    )
        .into_response()
}

/// POST /api/start-report/
pub async fn start_report(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    let id = match services
        .dispatcher
        .submit(GENERATE_REPORT, serde_json::Value::Null)
    {
        Ok(id) => id,
        Err(e) => return errors::dispatch_error_to_response(e),
    };

    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "task_id": id.to_string(),
            "message": "report generation started",
        })),
    )
        .into_response()
}

/// GET /api/check-report-status/:task_id/
pub async fn check_report_status(
    Extension(services): Extension<Arc<AppServices>>,
    Path(task_id): Path<String>,
) -> axum::response::Response {
    // Status polling never errors on the id itself: the result backend
    // reports `pending` for any id it has never seen, malformed ones
    // included.
    let (state, result) = match task_id.parse::<JobId>() {
        Ok(id) => match services.tracker.status(id) {
            Ok(view) => (view.state, view.result),
            Err(e) => {
                return errors::json_error(StatusCode::BAD_GATEWAY, "broker_error", e.to_string());
            }
        },
        Err(_) => (JobState::Pending, None),
    };

    (
        StatusCode::OK,
        Json(serde_json::json!({
            "task_id": task_id,
            "state": state,
            "result": result,
        })),
    )
        .into_response()
}
