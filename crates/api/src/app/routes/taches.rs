//! Owner-scoped task CRUD.
//!
//! Every handler reads the owner from the request's [`OwnerContext`]; a
//! task belonging to someone else is indistinguishable from a missing one
//! (404), and invalid ids take the same path.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
};

use taskdeck_core::TaskId;
use taskdeck_jobs::SEND_CREATION_NOTIFICATION;
use taskdeck_tasks::{FieldErrors, NewTask, TaskPatch};

use crate::app::{dto, errors, services::AppServices};
use crate::context::OwnerContext;

/// GET /api/taches/
pub async fn list(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
) -> axum::response::Response {
    match services.tasks.list(owner.user_id()) {
        Ok(tasks) => (StatusCode::OK, Json(tasks)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// POST /api/taches/
pub async fn create(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Json(body): Json<dto::CreateTaskRequest>,
) -> axum::response::Response {
    let Some(title) = body.title else {
        let mut fields = FieldErrors::new();
        fields.push("title", "this field is required");
        return errors::validation_response(fields);
    };

    let input = NewTask {
        title,
        description: body.description,
        completed: body.completed.unwrap_or(false),
    };

    let task = match services.tasks.create(owner.user_id(), input) {
        Ok(task) => task,
        Err(e) => return errors::store_error_to_response(e),
    };

    // Fire-and-forget: the notification job must never delay the response.
    let args = serde_json::json!({ "task_id": task.id.to_string() });
    if let Err(e) = services.dispatcher.submit(SEND_CREATION_NOTIFICATION, args) {
        tracing::warn!(task_id = %task.id, error = %e, "failed to submit creation notification");
    }

    (StatusCode::CREATED, Json(task)).into_response()
}

/// GET /api/taches/:id/
pub async fn get(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_task_id(&id) else {
        return not_found();
    };

    match services.tasks.get(owner.user_id(), id) {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

/// PUT /api/taches/:id/ — full update, title required.
pub async fn put(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateTaskRequest>,
) -> axum::response::Response {
    let Some(id) = parse_task_id(&id) else {
        return not_found();
    };

    let Some(title) = body.title else {
        let mut fields = FieldErrors::new();
        fields.push("title", "this field is required");
        return errors::validation_response(fields);
    };

    // Full update: unspecified optional fields reset to their defaults.
    let patch = TaskPatch {
        title: Some(title),
        description: Some(body.description.unwrap_or_default()),
        completed: Some(body.completed.unwrap_or(false)),
    };

    apply_update(&services, owner, id, patch)
}

/// PATCH /api/taches/:id/ — partial update.
pub async fn patch(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
    Json(body): Json<dto::UpdateTaskRequest>,
) -> axum::response::Response {
    let Some(id) = parse_task_id(&id) else {
        return not_found();
    };

    let patch = TaskPatch {
        title: body.title,
        description: body.description,
        completed: body.completed,
    };

    apply_update(&services, owner, id, patch)
}

/// DELETE /api/taches/:id/
pub async fn delete(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(owner): Extension<OwnerContext>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let Some(id) = parse_task_id(&id) else {
        return not_found();
    };

    match services.tasks.delete(owner.user_id(), id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn apply_update(
    services: &AppServices,
    owner: OwnerContext,
    id: TaskId,
    patch: TaskPatch,
) -> axum::response::Response {
    match services.tasks.update(owner.user_id(), id, patch) {
        Ok(task) => (StatusCode::OK, Json(task)).into_response(),
        Err(e) => errors::store_error_to_response(e),
    }
}

fn parse_task_id(raw: &str) -> Option<TaskId> {
    raw.parse().ok()
}

fn not_found() -> axum::response::Response {
    errors::json_error(StatusCode::NOT_FOUND, "not_found", "not found")
}
