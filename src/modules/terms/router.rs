use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{
    get_active_year_terms, get_open_enrollment_terms, get_term, register_terms, update_term_status,
};

/// Routes: POST /, GET /active-year, GET /open, GET /{id}, PATCH /{id}/status
pub fn init_terms_router() -> Router<AppState> {
    Router::new()
        .route("/", post(register_terms))
        .route("/active-year", get(get_active_year_terms))
        .route("/open", get(get_open_enrollment_terms))
        .route("/{id}", get(get_term))
        .route("/{id}/status", patch(update_term_status))
}
