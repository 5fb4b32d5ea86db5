use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{assign_professor, assign_schedule, get_section_schedules};

/// Nested under /sections: POST /{id}/schedules, GET /{id}/schedules,
/// POST /{id}/professors
pub fn init_section_schedules_router() -> Router<AppState> {
    Router::new()
        .route(
            "/{id}/schedules",
            post(assign_schedule).get(get_section_schedules),
        )
        .route("/{id}/professors", post(assign_professor))
}
