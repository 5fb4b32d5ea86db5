use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;

use campanile_core::AppError;
use campanile_models::ids::ClassSectionId;

use crate::middleware::actor::Actor;
use crate::modules::schedules::model::{
    AssignProfessorDto, AssignScheduleDto, ClassSchedule, ProfessorAssignment,
};
use crate::modules::schedules::service::ScheduleService;
use crate::state::AppState;

/// Assign a weekly meeting slot to a section
#[utoipa::path(
    post,
    path = "/api/sections/{id}/schedules",
    summary = "Assign schedule",
    params(
        ("id" = Uuid, Path, description = "Class section ID")
    ),
    request_body = AssignScheduleDto,
    responses(
        (status = 201, description = "Schedule assigned", body = ClassSchedule),
        (status = 400, description = "Invalid day of week or interval"),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Section or room not found"),
        (status = 409, description = "Room or professor already booked for that slot")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn assign_schedule(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<AssignScheduleDto>,
) -> Result<(StatusCode, Json<ClassSchedule>), AppError> {
    let schedule =
        ScheduleService::assign_schedule(&state.db, ClassSectionId::from(id), dto).await?;

    Ok((StatusCode::CREATED, Json(schedule)))
}

/// List the meeting slots of a section
#[utoipa::path(
    get,
    path = "/api/sections/{id}/schedules",
    summary = "List section schedules",
    params(
        ("id" = Uuid, Path, description = "Class section ID")
    ),
    responses(
        (status = 200, description = "Meeting slots of the section", body = Vec<ClassSchedule>),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn get_section_schedules(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<ClassSchedule>>, AppError> {
    let schedules =
        ScheduleService::get_section_schedules(&state.db, ClassSectionId::from(id)).await?;

    Ok(Json(schedules))
}

/// Assign a professor to a section
#[utoipa::path(
    post,
    path = "/api/sections/{id}/professors",
    summary = "Assign professor",
    params(
        ("id" = Uuid, Path, description = "Class section ID")
    ),
    request_body = AssignProfessorDto,
    responses(
        (status = 201, description = "Professor assigned", body = ProfessorAssignment),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "Section not found"),
        (status = 409, description = "Professor already assigned or double-booked"),
        (status = 422, description = "User is not an approved, active professor")
    ),
    tag = "Schedules"
)]
#[instrument(skip(state))]
pub async fn assign_professor(
    State(state): State<AppState>,
    _actor: Actor,
    Path(id): Path<Uuid>,
    Json(dto): Json<AssignProfessorDto>,
) -> Result<(StatusCode, Json<ProfessorAssignment>), AppError> {
    let assignment =
        ScheduleService::assign_professor(&state.db, ClassSectionId::from(id), dto).await?;

    Ok((StatusCode::CREATED, Json(assignment)))
}
