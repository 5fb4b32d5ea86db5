use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use campanile_models::ids::{CourseId, CurriculumCourseId, CurriculumId, DepartmentId, ProgramId};
use campanile_models::status::{CurriculumStatus, SemesterPeriod};

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Program {
    pub id: ProgramId,
    pub title: String,
    pub program_code: String,
    pub description: Option<String>,
    pub department_id: DepartmentId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub course_code: String,
    pub units: i16,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A versioned study plan for a program. Only `ACTIVE` curricula admit
/// course offerings.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Curriculum {
    pub id: CurriculumId,
    pub title: String,
    pub effective_from: i16,
    pub effective_to: Option<i16>,
    pub status: CurriculumStatus,
    pub program_id: ProgramId,
    pub created_at: DateTime<Utc>,
}

/// Placement of a course inside a curriculum: which year level and semester
/// the plan schedules it for.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct CurriculumCourse {
    pub id: CurriculumCourseId,
    pub curriculum_id: CurriculumId,
    pub course_id: CourseId,
    pub year_level: i16,
    pub semester: SemesterPeriod,
    pub is_required: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterProgramDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 10))]
    pub program_code: String,
    pub description: Option<String>,
    pub department_id: DepartmentId,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterProgramsDto {
    #[validate(length(min = 1), nested)]
    pub programs: Vec<RegisterProgramDto>,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterCourseDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(length(min = 1, max = 10))]
    pub course_code: String,
    #[validate(range(min = 1, max = 12))]
    pub units: i16,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterCoursesDto {
    #[validate(length(min = 1), nested)]
    pub courses: Vec<RegisterCourseDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterCurriculumDto {
    #[validate(length(min = 1, max = 100))]
    pub title: String,
    #[validate(range(min = 1900, max = 2999))]
    pub effective_from: i16,
    pub effective_to: Option<i16>,
    pub program_id: ProgramId,
}

#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct RegisterCurriculumCourseDto {
    pub course_id: CourseId,
    #[validate(range(min = 1, max = 10))]
    pub year_level: i16,
    pub semester: SemesterPeriod,
    #[serde(default = "default_is_required")]
    pub is_required: bool,
}

fn default_is_required() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterCurriculumCoursesDto {
    #[validate(length(min = 1), nested)]
    pub courses: Vec<RegisterCurriculumCourseDto>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateCurriculumStatusDto {
    pub status: CurriculumStatus,
}
