use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::TermId;

use crate::middleware::actor::Actor;
use crate::modules::terms::model::{RegisterTermsDto, Term, UpdateTermStatusDto};
use crate::modules::terms::service::TermService;
use crate::state::AppState;

/// Register a batch of terms
#[utoipa::path(
    post,
    path = "/api/terms",
    summary = "Register terms",
    request_body = RegisterTermsDto,
    responses(
        (status = 201, description = "Terms registered", body = Vec<Term>),
        (status = 400, description = "Invalid enrollment window"),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 409, description = "Duplicate academic year and semester period")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn register_terms(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<RegisterTermsDto>,
) -> Result<(StatusCode, Json<Vec<Term>>), AppError> {
    dto.validate()?;

    let terms = TermService::register_terms(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(terms)))
}

/// Get a term by ID
#[utoipa::path(
    get,
    path = "/api/terms/{id}",
    summary = "Get term by ID",
    params(
        ("id" = Uuid, Path, description = "Term ID")
    ),
    responses(
        (status = 200, description = "Term details", body = Term),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "Term not found")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn get_term(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Term>, AppError> {
    let term = TermService::get_term(&state.db, TermId::from(id)).await?;

    Ok(Json(term))
}

/// List terms of the active academic year
#[utoipa::path(
    get,
    path = "/api/terms/active-year",
    summary = "List active-year terms",
    responses(
        (status = 200, description = "Terms of the most recent non-archived academic year", body = Vec<Term>),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn get_active_year_terms(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<Vec<Term>>, AppError> {
    let terms = TermService::get_active_year_terms(&state.db).await?;

    Ok(Json(terms))
}

/// List terms currently open for enrollment
#[utoipa::path(
    get,
    path = "/api/terms/open",
    summary = "List open-enrollment terms",
    responses(
        (status = 200, description = "Terms accepting enrollments", body = Vec<Term>),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn get_open_enrollment_terms(
    State(state): State<AppState>,
    _actor: Actor,
) -> Result<Json<Vec<Term>>, AppError> {
    let terms = TermService::get_open_enrollment_terms(&state.db).await?;

    Ok(Json(terms))
}

/// Update a term's lifecycle status
#[utoipa::path(
    patch,
    path = "/api/terms/{id}/status",
    summary = "Update term status",
    params(
        ("id" = Uuid, Path, description = "Term ID")
    ),
    request_body = UpdateTermStatusDto,
    responses(
        (status = 200, description = "Receipt for the status change", body = ActionReceipt),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Term not found")
    ),
    tag = "Terms"
)]
#[instrument(skip(state))]
pub async fn update_term_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateTermStatusDto>,
) -> Result<Json<ActionReceipt>, AppError> {
    let receipt = TermService::update_term_status(
        &state.db,
        TermId::from(id),
        dto,
        &actor.user_id.to_string(),
    )
    .await?;

    Ok(Json(receipt))
}
