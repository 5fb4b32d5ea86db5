use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use campanile_core::AppError;
use campanile_models::ids::{DepartmentId, ProgramId, UserId};
use campanile_models::status::{UserRole, UserStatus};

/// A user row. Role-specific columns are nullable in storage and resolved
/// into a [`RoleProfile`] before any domain logic touches them.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub is_active: bool,
    pub program_id: Option<ProgramId>,
    pub year_level: Option<i16>,
    pub department_id: Option<DepartmentId>,
    pub created_at: DateTime<Utc>,
}

/// Role-specific data as a closed sum, so callers never reason about which
/// nullable columns apply to which role.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoleProfile {
    Student {
        program_id: ProgramId,
        year_level: i16,
    },
    Faculty {
        department_id: Option<DepartmentId>,
    },
    Staff,
}

impl User {
    /// Resolve the role-specific columns into a profile.
    ///
    /// Creation enforces that student rows carry program and year level, so
    /// an inconsistent row here is a data fault, not a caller error.
    pub fn role_profile(&self) -> Result<RoleProfile, AppError> {
        match self.role {
            UserRole::Student => {
                let program_id = self.program_id.ok_or_else(|| {
                    AppError::internal(anyhow::anyhow!(
                        "Student {} has no program on record",
                        self.id
                    ))
                })?;
                let year_level = self.year_level.ok_or_else(|| {
                    AppError::internal(anyhow::anyhow!(
                        "Student {} has no year level on record",
                        self.id
                    ))
                })?;
                Ok(RoleProfile::Student {
                    program_id,
                    year_level,
                })
            }
            UserRole::Professor | UserRole::Dean | UserRole::ProgramChair => {
                Ok(RoleProfile::Faculty {
                    department_id: self.department_id,
                })
            }
            UserRole::Administrator | UserRole::Registrar => Ok(RoleProfile::Staff),
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(max = 100))]
    pub middle_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    pub role: UserRole,
    /// Required when role is STUDENT.
    pub program_id: Option<ProgramId>,
    /// Required when role is STUDENT.
    #[validate(range(min = 1, max = 10))]
    pub year_level: Option<i16>,
    /// Optional faculty affiliation for PROFESSOR, DEAN, and PROGRAM_CHAIR.
    pub department_id: Option<DepartmentId>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateUserStatusDto {
    pub status: UserStatus,
}
