use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::ToSchema;

use axum::http::StatusCode;
use campanile_models::ids::{
    ClassScheduleId, ClassSectionId, ProfessorAssignmentId, RoomId, UserId,
};

/// A weekly meeting slot of a class section. Intervals are half-open:
/// a slot ending at 10:30 does not collide with one starting at 10:30.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ClassSchedule {
    pub id: ClassScheduleId,
    /// ISO weekday, 1 = Monday through 7 = Sunday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub class_section_id: ClassSectionId,
    pub room_id: Option<RoomId>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct ProfessorAssignment {
    pub id: ProfessorAssignmentId,
    pub professor_id: UserId,
    pub class_section_id: ClassSectionId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignScheduleDto {
    /// ISO weekday, 1 = Monday through 7 = Sunday.
    pub day_of_week: i16,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    /// Room to hold the slot in; omit for online or room-less meetings.
    pub room_id: Option<RoomId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AssignProfessorDto {
    pub professor_id: UserId,
}

/// Why a schedule or professor assignment was refused. Conflict variants
/// carry the interval that already holds the slot so the caller can see
/// what they collided with.
#[derive(Debug, Error)]
pub enum ScheduleRejection {
    #[error("day_of_week must be between 1 (Monday) and 7 (Sunday), got {0}")]
    InvalidDayOfWeek(i16),
    #[error("start_time must be strictly before end_time")]
    InvalidInterval,
    #[error("room is already booked on day {day_of_week} from {start_time} to {end_time}")]
    RoomConflict {
        day_of_week: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
    #[error("professor already teaches on day {day_of_week} from {start_time} to {end_time}")]
    ProfessorConflict {
        day_of_week: i16,
        start_time: NaiveTime,
        end_time: NaiveTime,
    },
    #[error("professor is not an approved, active professor")]
    ProfessorNotAssignable,
    #[error("professor is already assigned to this section")]
    DuplicateAssignment,
}

impl ScheduleRejection {
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::InvalidDayOfWeek(_) | Self::InvalidInterval => StatusCode::BAD_REQUEST,
            Self::RoomConflict { .. }
            | Self::ProfessorConflict { .. }
            | Self::DuplicateAssignment => StatusCode::CONFLICT,
            Self::ProfessorNotAssignable => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }
}
