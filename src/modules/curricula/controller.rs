use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::CurriculumId;

use crate::middleware::actor::Actor;
use crate::modules::curricula::model::{
    Course, Curriculum, CurriculumCourse, Program, RegisterCoursesDto,
    RegisterCurriculumCoursesDto, RegisterCurriculumDto, RegisterProgramsDto,
    UpdateCurriculumStatusDto,
};
use crate::modules::curricula::service::CurriculumService;
use crate::state::AppState;

/// Register programs
#[utoipa::path(
    post,
    path = "/api/programs",
    summary = "Register programs",
    request_body = RegisterProgramsDto,
    responses(
        (status = 201, description = "Programs registered", body = Vec<Program>),
        (status = 400, description = "Unknown department reference"),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 409, description = "Duplicate program code")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn register_programs(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<RegisterProgramsDto>,
) -> Result<(StatusCode, Json<Vec<Program>>), AppError> {
    dto.validate()?;

    let programs = CurriculumService::register_programs(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(programs)))
}

/// Register courses
#[utoipa::path(
    post,
    path = "/api/courses",
    summary = "Register courses",
    request_body = RegisterCoursesDto,
    responses(
        (status = 201, description = "Courses registered", body = Vec<Course>),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 409, description = "Duplicate course code")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn register_courses(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<RegisterCoursesDto>,
) -> Result<(StatusCode, Json<Vec<Course>>), AppError> {
    dto.validate()?;

    let courses = CurriculumService::register_courses(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(courses)))
}

/// Register a curriculum
#[utoipa::path(
    post,
    path = "/api/curricula",
    summary = "Register curriculum",
    request_body = RegisterCurriculumDto,
    responses(
        (status = 201, description = "Curriculum registered", body = Curriculum),
        (status = 400, description = "Invalid effectivity range or unknown program"),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn register_curriculum(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<RegisterCurriculumDto>,
) -> Result<(StatusCode, Json<Curriculum>), AppError> {
    dto.validate()?;

    let curriculum = CurriculumService::register_curriculum(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(curriculum)))
}

/// Get a curriculum by ID
#[utoipa::path(
    get,
    path = "/api/curricula/{id}",
    summary = "Get curriculum by ID",
    params(
        ("id" = Uuid, Path, description = "Curriculum ID")
    ),
    responses(
        (status = 200, description = "Curriculum details", body = Curriculum),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "Curriculum not found")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn get_curriculum(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Curriculum>, AppError> {
    let curriculum = CurriculumService::get_curriculum(&state.db, CurriculumId::from(id)).await?;

    Ok(Json(curriculum))
}

/// Attach courses to a curriculum
#[utoipa::path(
    post,
    path = "/api/curricula/{id}/courses",
    summary = "Register curriculum courses",
    params(
        ("id" = Uuid, Path, description = "Curriculum ID")
    ),
    request_body = RegisterCurriculumCoursesDto,
    responses(
        (status = 201, description = "Courses attached to curriculum", body = Vec<CurriculumCourse>),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Curriculum not found"),
        (status = 409, description = "Course already in curriculum")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn register_curriculum_courses(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<RegisterCurriculumCoursesDto>,
) -> Result<(StatusCode, Json<Vec<CurriculumCourse>>), AppError> {
    dto.validate()?;

    let courses =
        CurriculumService::register_curriculum_courses(&state.db, CurriculumId::from(id), dto)
            .await?;

    Ok((StatusCode::CREATED, Json(courses)))
}

/// List the courses of a curriculum
#[utoipa::path(
    get,
    path = "/api/curricula/{id}/courses",
    summary = "List curriculum courses",
    params(
        ("id" = Uuid, Path, description = "Curriculum ID")
    ),
    responses(
        (status = 200, description = "Courses of the curriculum", body = Vec<CurriculumCourse>),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn get_curriculum_courses(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<CurriculumCourse>>, AppError> {
    let courses =
        CurriculumService::get_curriculum_courses(&state.db, CurriculumId::from(id)).await?;

    Ok(Json(courses))
}

/// Update a curriculum's lifecycle status
#[utoipa::path(
    patch,
    path = "/api/curricula/{id}/status",
    summary = "Update curriculum status",
    params(
        ("id" = Uuid, Path, description = "Curriculum ID")
    ),
    request_body = UpdateCurriculumStatusDto,
    responses(
        (status = 200, description = "Receipt for the status change", body = ActionReceipt),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Curriculum not found")
    ),
    tag = "Curricula"
)]
#[instrument(skip(state))]
pub async fn update_curriculum_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<UpdateCurriculumStatusDto>,
) -> Result<Json<ActionReceipt>, AppError> {
    let receipt = CurriculumService::update_curriculum_status(
        &state.db,
        CurriculumId::from(id),
        dto,
        &actor.user_id.to_string(),
    )
    .await?;

    Ok(Json(receipt))
}
