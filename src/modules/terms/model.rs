use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use campanile_models::ids::TermId;
use campanile_models::status::{SemesterPeriod, TermStatus};

/// An academic term: one semester period of one academic year, with the
/// enrollment window attached.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Term {
    pub id: TermId,
    pub academic_year_start: i16,
    pub academic_year_end: i16,
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    pub semester_period: SemesterPeriod,
    pub status: TermStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterTermDto {
    #[validate(range(min = 1900, max = 2999))]
    pub academic_year_start: i16,
    pub enrollment_start: DateTime<Utc>,
    pub enrollment_end: DateTime<Utc>,
    pub semester_period: SemesterPeriod,
}

/// Bulk registration payload; the whole batch commits or none of it does.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterTermsDto {
    #[validate(length(min = 1), nested)]
    pub terms: Vec<RegisterTermDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateTermStatusDto {
    pub status: TermStatus,
}
