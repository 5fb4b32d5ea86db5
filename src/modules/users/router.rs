use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::state::AppState;

use super::controller::{create_user, get_active_professors, get_user, update_user_status};

/// Routes: POST /, GET /{id}, GET /professors/active, PATCH /{id}/status
pub fn init_users_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_user))
        .route("/professors/active", get(get_active_professors))
        .route("/{id}", get(get_user))
        .route("/{id}/status", patch(update_user_status))
}
