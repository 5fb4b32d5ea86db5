//! Lifecycle status enums for the academic entities.
//!
//! Each enum maps to a Postgres enum type created in the migrations, with
//! SCREAMING_SNAKE_CASE labels on both sides. `Display` renders the
//! lowercase form used in user-facing rejection messages
//! ("term status is currently closed").

use serde::{Deserialize, Serialize};
use std::fmt;
use utoipa::ToSchema;

/// Role discriminator for the single `users` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Administrator,
    Registrar,
    Dean,
    ProgramChair,
    Professor,
    Student,
}

/// Account standing of a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserStatus {
    Pending,
    Approved,
    Rejected,
}

/// One of the semester periods within an academic year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "semester_period", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SemesterPeriod {
    First,
    Second,
    Summer,
}

/// Lifecycle of a Term. New terms start as `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "term_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TermStatus {
    Draft,
    Open,
    Closed,
    Archived,
}

/// Lifecycle of a Curriculum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "curriculum_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CurriculumStatus {
    Draft,
    Active,
    Retired,
}

/// Lifecycle of a CourseOffering. New offerings start as `Pending`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "course_offering_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseOfferingStatus {
    Pending,
    Approved,
    Cancelled,
}

/// Lifecycle of a ClassSection. New sections start as `Close`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "class_section_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClassSectionStatus {
    Open,
    Close,
    Cancelled,
}

/// Lifecycle of an Enrollment. Admission creates rows as `Pending`;
/// `Pending` and `Approved` hold a seat, `Rejected` does not.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "enrollment_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrollmentStatus {
    Pending,
    Approved,
    Rejected,
}

impl EnrollmentStatus {
    /// Whether an enrollment in this status occupies a seat in its section.
    pub fn holds_seat(&self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

macro_rules! lowercase_display {
    ($($ty:ident),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    let label = format!("{:?}", self);
                    write!(f, "{}", label.to_lowercase())
                }
            }
        )+
    };
}

lowercase_display!(
    UserRole,
    UserStatus,
    SemesterPeriod,
    TermStatus,
    CurriculumStatus,
    CourseOfferingStatus,
    ClassSectionStatus,
    EnrollmentStatus,
);
