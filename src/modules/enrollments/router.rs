use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    enroll_student, get_enrollments, get_student_allowed_sections, update_enrollment_status,
};

/// Routes: POST /, GET /,
/// GET /students/{student_id}/allowed-sections/{term_id}
pub fn init_enrollments_router() -> Router<AppState> {
    Router::new()
        .route("/", post(enroll_student).get(get_enrollments))
        .route(
            "/students/{student_id}/allowed-sections/{term_id}",
            get(get_student_allowed_sections),
        )
}

/// Routes: PATCH /status. Split off so the caller can gate enrollment
/// decisions to registrar-level actors.
pub fn init_enrollment_decisions_router() -> Router<AppState> {
    Router::new().route("/status", patch(update_enrollment_status))
}
