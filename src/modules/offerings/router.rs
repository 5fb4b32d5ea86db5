use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    get_offering, get_offering_sections, get_section, register_offerings, register_sections,
    update_offering_status, update_section_status,
};

/// Routes: POST /, GET /{id}, PATCH /{id}/status,
/// POST /{id}/sections, GET /{id}/sections
pub fn init_offerings_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_offerings))
        .route("/{id}", get(get_offering))
        .route("/{id}/status", patch(update_offering_status))
        .route(
            "/{id}/sections",
            post(register_sections).get(get_offering_sections),
        )
}

/// Routes: GET /{id}, PATCH /{id}/status
pub fn init_sections_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_section))
        .route("/{id}/status", patch(update_section_status))
}
