//! Credential → token exchange.

use std::sync::Arc;

use axum::{Json, extract::Extension, http::StatusCode, response::IntoResponse};
use chrono::Utc;

use taskdeck_tasks::FieldErrors;

use crate::app::{dto, errors, services::AppServices};

/// POST /api/token/
pub async fn issue(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::TokenRequest>,
) -> axum::response::Response {
    let mut fields = FieldErrors::new();
    if body.username.as_deref().unwrap_or("").is_empty() {
        fields.push("username", "this field is required");
    }
    if body.password.as_deref().unwrap_or("").is_empty() {
        fields.push("password", "this field is required");
    }
    if !fields.is_empty() {
        return errors::validation_response(fields);
    }

    let username = body.username.unwrap_or_default();
    let password = body.password.unwrap_or_default();

    let user_id = match services.users.verify(&username, &password) {
        Ok(id) => id,
        Err(_) => {
            return errors::json_error(
                StatusCode::UNAUTHORIZED,
                "invalid_credentials",
                "unable to log in with provided credentials",
            );
        }
    };

    match services.codec.issue(user_id, Utc::now()) {
        Ok(token) => (StatusCode::OK, Json(serde_json::json!({ "token": token }))).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "token issuance failed");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to issue token",
            )
        }
    }
}
