use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::UserId;

use crate::middleware::actor::Actor;
use crate::modules::users::model::{CreateUserDto, UpdateUserStatusDto, User};
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// Create a user
#[utoipa::path(
    post,
    path = "/api/users",
    summary = "Create user",
    request_body = CreateUserDto,
    responses(
        (status = 201, description = "User created successfully", body = User),
        (status = 400, description = "Invalid input or role-field mismatch"),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn create_user(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<CreateUserDto>,
) -> Result<(StatusCode, Json<User>), AppError> {
    dto.validate()?;

    let user = UserService::create_user(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Get a user by ID
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    summary = "Get user by ID",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User details", body = User),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, AppError> {
    let user = UserService::get_user(&state.db, UserId::from(id)).await?;

    Ok(Json(user))
}

/// List professors eligible for section assignment
#[utoipa::path(
    get,
    path = "/api/users/professors/active",
    summary = "List active professors",
    responses(
        (status = 200, description = "Approved, active professors", body = Vec<User>),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn get_active_professors(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<Vec<User>>, AppError> {
    let professors = UserService::get_active_professors(&state.db).await?;

    Ok(Json(professors))
}

/// Update a user's account standing
#[utoipa::path(
    patch,
    path = "/api/users/{id}/status",
    summary = "Update user status",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = UpdateUserStatusDto,
    responses(
        (status = 200, description = "Receipt for the status change", body = ActionReceipt),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
#[instrument(skip(state))]
pub async fn update_user_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateUserStatusDto>,
) -> Result<Json<ActionReceipt>, AppError> {
    let receipt = UserService::update_user_status(
        &state.db,
        UserId::from(id),
        dto,
        &actor.user_id.to_string(),
    )
    .await?;

    Ok(Json(receipt))
}
