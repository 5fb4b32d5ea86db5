use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use campanile_core::AppError;
use campanile_models::ids::{TermId, UserId};

use crate::middleware::actor::Actor;
use crate::modules::enrollments::model::{
    EnrollDto, Enrollment, EnrollmentFilterParams, PaginatedEnrollmentsResponse,
    UpdateEnrollmentStatusDto,
};
use crate::modules::enrollments::service::EnrollmentService;
use crate::modules::offerings::model::ClassSection;
use crate::state::AppState;

/// Admit a student into a class section
#[utoipa::path(
    post,
    path = "/api/enrollments",
    summary = "Enroll student",
    request_body = EnrollDto,
    responses(
        (status = 201, description = "Enrollment created as PENDING", body = Enrollment),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "Student or section not found"),
        (status = 409, description = "Already enrolled or section full"),
        (status = 422, description = "Section, offering, term, or curriculum not eligible")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn enroll_student(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<EnrollDto>,
) -> Result<(StatusCode, Json<Enrollment>), AppError> {
    let enrollment = EnrollmentService::enroll_student(&state.db, dto).await?;

    Ok((StatusCode::CREATED, Json(enrollment)))
}

/// Decide a batch of enrollments
#[utoipa::path(
    patch,
    path = "/api/enrollments/status",
    summary = "Update enrollment statuses",
    request_body = UpdateEnrollmentStatusDto,
    responses(
        (status = 200, description = "Enrollments whose status changed", body = Vec<Enrollment>),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 403, description = "Forbidden - requires registrar privileges"),
        (status = 404, description = "One or more enrollments not found"),
        (status = 409, description = "Reinstating would oversubscribe a section")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn update_enrollment_status(
    State(state): State<AppState>,
    _actor: Actor,
    Json(dto): Json<UpdateEnrollmentStatusDto>,
) -> Result<Json<Vec<Enrollment>>, AppError> {
    dto.validate()?;

    let updated = EnrollmentService::update_enrollment_status(&state.db, dto).await?;

    Ok(Json(updated))
}

/// List enrollments
#[utoipa::path(
    get,
    path = "/api/enrollments",
    summary = "List enrollments",
    params(
        ("student_id" = Option<Uuid>, Query, description = "Filter by student"),
        ("class_section_id" = Option<Uuid>, Query, description = "Filter by section"),
        ("term_id" = Option<Uuid>, Query, description = "Filter by term"),
        ("status" = Option<String>, Query, description = "Filter by enrollment status"),
        ("limit" = Option<i64>, Query, description = "Page size (max 100)"),
        ("offset" = Option<i64>, Query, description = "Page offset")
    ),
    responses(
        (status = 200, description = "Paginated enrollments", body = PaginatedEnrollmentsResponse),
        (status = 401, description = "Missing or invalid acting-identity headers")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_enrollments(
    State(state): State<AppState>,
    _actor: Actor,
    Query(filters): Query<EnrollmentFilterParams>,
) -> Result<Json<PaginatedEnrollmentsResponse>, AppError> {
    let enrollments = EnrollmentService::get_enrollments(&state.db, filters).await?;

    Ok(Json(enrollments))
}

/// List the sections a student can still enroll in for a term
#[utoipa::path(
    get,
    path = "/api/enrollments/students/{student_id}/allowed-sections/{term_id}",
    summary = "List allowed sections",
    params(
        ("student_id" = Uuid, Path, description = "Student ID"),
        ("term_id" = Uuid, Path, description = "Term ID")
    ),
    responses(
        (status = 200, description = "Sections open to the student", body = Vec<ClassSection>),
        (status = 401, description = "Missing or invalid acting-identity headers"),
        (status = 404, description = "Student not found")
    ),
    tag = "Enrollments"
)]
#[instrument(skip(state))]
pub async fn get_student_allowed_sections(
    State(state): State<AppState>,
    _actor: Actor,
    Path((student_id, term_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<ClassSection>>, AppError> {
    let sections = EnrollmentService::get_student_allowed_sections(
        &state.db,
        UserId::from(student_id),
        TermId::from(term_id),
    )
    .await?;

    Ok(Json(sections))
}
