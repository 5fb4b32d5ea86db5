use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

use axum::http::StatusCode;
use campanile_models::ids::{ClassSectionId, CourseOfferingId, CurriculumCourseId, TermId};
use campanile_models::status::{
    ClassSectionStatus, CourseOfferingStatus, CurriculumStatus, TermStatus,
};

/// A curriculum course scheduled to run in a specific term. Offerings start
/// `PENDING` and take sections only once `APPROVED`.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CourseOffering {
    pub id: CourseOfferingId,
    pub status: CourseOfferingStatus,
    pub term_id: TermId,
    pub curriculum_course_id: CurriculumCourseId,
    pub created_at: DateTime<Utc>,
}

/// A seat-bounded instance of an offering. `current_student_cnt` is the
/// capacity ledger; enrollments are the source of truth it can be rebuilt
/// from.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassSection {
    pub id: ClassSectionId,
    pub section_code: String,
    pub student_capacity: i16,
    pub current_student_cnt: i16,
    pub status: ClassSectionStatus,
    pub course_offering_id: CourseOfferingId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterOfferingsDto {
    pub term_id: TermId,
    #[validate(length(min = 1))]
    pub curriculum_course_ids: Vec<CurriculumCourseId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOfferingStatusDto {
    pub status: CourseOfferingStatus,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterSectionDto {
    #[validate(length(min = 1, max = 10))]
    pub section_code: String,
    #[validate(range(min = 1))]
    pub student_capacity: i16,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterSectionsDto {
    #[validate(length(min = 1), nested)]
    pub sections: Vec<RegisterSectionDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateSectionStatusDto {
    pub status: ClassSectionStatus,
}

/// Why an offering registration was refused.
#[derive(Debug, Error)]
pub enum OfferingRejection {
    #[error("curriculum status is currently {0}; only active curricula can be offered")]
    CurriculumNotActive(CurriculumStatus),
    #[error("term status is currently {0}; offerings require an open term")]
    TermNotOpen(TermStatus),
    #[error("this curriculum course is already offered in this term")]
    DuplicateOffering,
}

impl OfferingRejection {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::CurriculumNotActive(_) | Self::TermNotOpen(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateOffering => StatusCode::CONFLICT,
        }
    }
}

/// Why a section registration was refused.
#[derive(Debug, Error)]
pub enum SectionRejection {
    #[error("course offering status is currently {0}; sections require an approved offering")]
    OfferingNotApproved(CourseOfferingStatus),
    #[error("term status is currently {0}; sections require an open term")]
    TermNotOpen(TermStatus),
    #[error("section code {0} is already used for this offering")]
    DuplicateSectionCode(String),
}

impl SectionRejection {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::OfferingNotApproved(_) | Self::TermNotOpen(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::DuplicateSectionCode(_) => StatusCode::CONFLICT,
        }
    }
}
