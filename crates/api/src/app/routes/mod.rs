use axum::{
    Router,
    routing::{get, post},
};

pub mod jobs;
pub mod system;
pub mod taches;
pub mod token;

/// Router for all authenticated (owner-scoped) endpoints. The trailing
/// slashes are part of the wire contract.
pub fn router() -> Router {
    Router::new()
        .route("/api/taches/", get(taches::list).post(taches::create))
        .route(
            "/api/taches/:id/",
            get(taches::get)
                .put(taches::put)
                .patch(taches::patch)
                .delete(taches::delete),
        )
        .route(
            "/api/test-celery/",
            post(jobs::test_celery).get(jobs::test_celery),
        )
        .route("/api/start-report/", post(jobs::start_report))
        .route(
            "/api/check-report-status/:task_id/",
            get(jobs::check_report_status),
        )
}
