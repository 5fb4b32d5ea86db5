use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::{ClassSectionId, CourseOfferingId};

use crate::middleware::actor::Actor;
use crate::modules::offerings::model::{
    ClassSection, CourseOffering, RegisterOfferingsDto, RegisterSectionsDto,
    UpdateOfferingStatusDto, UpdateSectionStatusDto,
};
use crate::modules::offerings::service::OfferingService;
use crate::state::AppState;

/// Register course offerings for a term
#[utoipa::path(
    post,
    path = "/api/offerings",
    summary = "Register offerings",
    request_body = RegisterOfferingsDto,
    responses(
        (status = 201, description = "Offerings registered", body = Vec<CourseOffering>),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Term or curriculum course not found"),
        (status = 409, description = "Curriculum course already offered this term"),
        (status = 422, description = "Curriculum not active or term not open")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn register_offerings(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<RegisterOfferingsDto>,
) -> Result<(StatusCode, Json<Vec<CourseOffering>>), AppError> {
    dto.validate()?;

    let offerings = OfferingService::register_offerings(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(offerings)))
}

/// Get a course offering by ID
#[utoipa::path(
    get,
    path = "/api/offerings/{id}",
    summary = "Get offering by ID",
    params(
        ("id" = Uuid, Path, description = "Course offering ID")
    ),
    responses(
        (status = 200, description = "Offering details", body = CourseOffering),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "Offering not found")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn get_offering(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<CourseOffering>, AppError> {
    let offering = OfferingService::get_offering(&state.db, CourseOfferingId::from(id)).await?;

    Ok(Json(offering))
}

/// Update an offering's lifecycle status
#[utoipa::path(
    patch,
    path = "/api/offerings/{id}/status",
    summary = "Update offering status",
    params(
        ("id" = Uuid, Path, description = "Course offering ID")
    ),
    request_body = UpdateOfferingStatusDto,
    responses(
        (status = 200, description = "Receipt for the status change", body = ActionReceipt),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Offering not found")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn update_offering_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateOfferingStatusDto>,
) -> Result<Json<ActionReceipt>, AppError> {
    let receipt = OfferingService::update_offering_status(
        &state.db,
        CourseOfferingId::from(id),
        dto,
        &actor.user_id.to_string(),
    )
    .await?;

    Ok(Json(receipt))
}

/// Register class sections under an offering
#[utoipa::path(
    post,
    path = "/api/offerings/{id}/sections",
    summary = "Register sections",
    params(
        ("id" = Uuid, Path, description = "Course offering ID")
    ),
    request_body = RegisterSectionsDto,
    responses(
        (status = 201, description = "Sections registered", body = Vec<ClassSection>),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Offering not found"),
        (status = 409, description = "Section code already used for this offering"),
        (status = 422, description = "Offering not approved or term not open")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn register_sections(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<RegisterSectionsDto>,
) -> Result<(StatusCode, Json<Vec<ClassSection>>), AppError> {
    dto.validate()?;

    let sections =
        OfferingService::register_sections(&state.db, CourseOfferingId::from(id), dto).await?;

    Ok((StatusCode::CREATED, Json(sections)))
}

/// List sections of an offering
#[utoipa::path(
    get,
    path = "/api/offerings/{id}/sections",
    summary = "List offering sections",
    params(
        ("id" = Uuid, Path, description = "Course offering ID")
    ),
    responses(
        (status = 200, description = "Sections of the offering", body = Vec<ClassSection>),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn get_offering_sections(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClassSection>>, AppError> {
    let sections =
        OfferingService::get_offering_sections(&state.db, CourseOfferingId::from(id)).await?;

    Ok(Json(sections))
}

/// Get a class section by ID
#[utoipa::path(
    get,
    path = "/api/sections/{id}",
    summary = "Get section by ID",
    params(
        ("id" = Uuid, Path, description = "Class section ID")
    ),
    responses(
        (status = 200, description = "Section details", body = ClassSection),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "Section not found")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn get_section(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassSection>, AppError> {
    let section = OfferingService::get_section(&state.db, ClassSectionId::from(id)).await?;

    Ok(Json(section))
}

/// Update a section's lifecycle status
#[utoipa::path(
    patch,
    path = "/api/sections/{id}/status",
    summary = "Update section status",
    params(
        ("id" = Uuid, Path, description = "Class section ID")
    ),
    request_body = UpdateSectionStatusDto,
    responses(
        (status = 200, description = "Receipt for the status change", body = ActionReceipt),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Section not found")
    ),
    tag = "Offerings"
)]
#[instrument(skip(state))]
pub async fn update_section_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateSectionStatusDto>,
) -> Result<Json<ActionReceipt>, AppError> {
    let receipt = OfferingService::update_section_status(
        &state.db,
        ClassSectionId::from(id),
        dto,
        &actor.user_id.to_string(),
    )
    .await?;

    Ok(Json(receipt))
}
