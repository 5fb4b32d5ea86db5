use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use axum::http::StatusCode;
use campanile_core::{PaginationMeta, PaginationParams};
use campanile_models::ids::{ClassSectionId, EnrollmentId, TermId, UserId};
use campanile_models::status::{
    ClassSectionStatus, CourseOfferingStatus, EnrollmentStatus, TermStatus,
};

/// A student's membership in a class section for a term. `PENDING` and
/// `APPROVED` rows hold a seat; `REJECTED` rows do not.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub status: EnrollmentStatus,
    pub student_id: UserId,
    pub class_section_id: ClassSectionId,
    pub term_id: TermId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EnrollDto {
    pub student_id: UserId,
    pub class_section_id: ClassSectionId,
}

/// Bulk status decision over enrollments; the whole batch commits or rolls
/// back together.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateEnrollmentStatusDto {
    #[validate(length(min = 1))]
    pub enrollment_ids: Vec<EnrollmentId>,
    pub status: EnrollmentStatus,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EnrollmentFilterParams {
    pub student_id: Option<UserId>,
    pub class_section_id: Option<ClassSectionId>,
    pub term_id: Option<TermId>,
    pub status: Option<EnrollmentStatus>,
    #[serde(flatten)]
    pub pagination: PaginationParams,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PaginatedEnrollmentsResponse {
    pub data: Vec<Enrollment>,
    pub meta: PaginationMeta,
}

/// Why an admission request was refused. The variants mirror the order the
/// eligibility chain runs in; the first failed guard wins.
#[derive(Debug, Error)]
pub enum EnrollmentRejection {
    #[error("student is already enrolled in this class section")]
    AlreadyEnrolled,
    #[error("class section status is currently {0}; enrollment requires an open section")]
    SectionNotOpen(ClassSectionStatus),
    #[error("course offering status is currently {0}; enrollment requires an approved offering")]
    OfferingNotApproved(CourseOfferingStatus),
    #[error("term status is currently {0}; enrollment requires an open term")]
    TermNotOpen(TermStatus),
    #[error("class section does not belong to the student's program curriculum")]
    CurriculumMismatch,
    #[error("class section has no remaining seats")]
    SectionFull,
}

impl EnrollmentRejection {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::AlreadyEnrolled | Self::SectionFull => StatusCode::CONFLICT,
            Self::SectionNotOpen(_)
            | Self::OfferingNotApproved(_)
            | Self::TermNotOpen(_)
            | Self::CurriculumMismatch => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}

pub(crate) fn rejection(rejection: EnrollmentRejection) -> campanile_core::AppError {
    campanile_core::AppError::new(rejection.http_status(), rejection)
}
