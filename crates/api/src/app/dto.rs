//! Request DTOs.
//!
//! Required fields are modeled as `Option` so that a missing field surfaces
//! as a per-field 400 validation body instead of a deserialization
//! rejection.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}

/// Shared by PUT (full update, title required) and PATCH (partial update).
#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
}
