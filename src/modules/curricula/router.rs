use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    get_curriculum, get_curriculum_courses, register_courses, register_curriculum,
    register_curriculum_courses, register_programs, update_curriculum_status,
};

/// Routes: POST /
pub fn init_programs_router() -> Router<AppState> {
    Router::new().route("/", post(register_programs))
}

/// Routes: POST /
pub fn init_courses_router() -> Router<AppState> {
    Router::new().route("/", post(register_courses))
}

/// Routes: POST /, GET /{id}, POST /{id}/courses, GET /{id}/courses,
/// PATCH /{id}/status
pub fn init_curricula_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_curriculum))
        .route("/{id}", get(get_curriculum))
        .route(
            "/{id}/courses",
            post(register_curriculum_courses).get(get_curriculum_courses),
        )
        .route("/{id}/status", patch(update_curriculum_status))
}
