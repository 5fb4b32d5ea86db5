use sqlx::PgPool;
use tracing::instrument;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::UserId;
use campanile_models::status::{UserRole, UserStatus};
use campanile_models::transitions;

use crate::modules::users::model::{CreateUserDto, UpdateUserStatusDto, User};

const USER_COLUMNS: &str = "id, first_name, middle_name, last_name, email, role, status, \
     is_active, program_id, year_level, department_id, created_at";

pub struct UserService;

impl UserService {
    /// Create a user. Role-specific fields must be consistent with the role:
    /// a student carries a program and year level, staff roles carry neither.
    #[instrument(skip(db))]
    pub async fn create_user(db: &PgPool, dto: CreateUserDto) -> Result<User, AppError> {
        if dto.role == UserRole::Student {
            if dto.program_id.is_none() || dto.year_level.is_none() {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "A student account requires both program_id and year_level"
                )));
            }
        } else if dto.program_id.is_some() || dto.year_level.is_some() {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "program_id and year_level only apply to student accounts"
            )));
        }

        let user = sqlx::query_as::<_, User>(&format!(
            r#"INSERT INTO users (first_name, middle_name, last_name, email, role, program_id, year_level, department_id)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {USER_COLUMNS}"#,
        ))
        .bind(&dto.first_name)
        .bind(&dto.middle_name)
        .bind(&dto.last_name)
        .bind(&dto.email)
        .bind(dto.role)
        .bind(dto.program_id)
        .bind(dto.year_level)
        .bind(dto.department_id)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::conflict(anyhow::anyhow!(
                    "A user with email {} already exists",
                    dto.email
                ));
            }
            AppError::from(e)
        })?;

        Ok(user)
    }

    #[instrument(skip(db))]
    pub async fn get_user(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        let user =
            sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(user_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        Ok(user)
    }

    /// Get a user that must be a student.
    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, user_id: UserId) -> Result<User, AppError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND role = 'STUDENT'"
        ))
        .bind(user_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Student not found")))?;

        Ok(user)
    }

    /// List professors that can take on section assignments.
    #[instrument(skip(db))]
    pub async fn get_active_professors(db: &PgPool) -> Result<Vec<User>, AppError> {
        let professors = sqlx::query_as::<_, User>(&format!(
            r#"SELECT {USER_COLUMNS} FROM users
               WHERE role = 'PROFESSOR' AND status = 'APPROVED' AND is_active = TRUE
               ORDER BY last_name, first_name"#
        ))
        .fetch_all(db)
        .await?;

        Ok(professors)
    }

    /// Update the account standing of a user. Requesting the standing the
    /// account already has is reported back as a no-op, not an error.
    #[instrument(skip(db))]
    pub async fn update_user_status(
        db: &PgPool,
        user_id: UserId,
        dto: UpdateUserStatusDto,
        requested_by: &str,
    ) -> Result<ActionReceipt, AppError> {
        let current = sqlx::query_scalar::<_, UserStatus>("SELECT status FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("User not found")))?;

        if transitions::plan(&current, &dto.status).is_noop() {
            return Ok(ActionReceipt::noop(
                requested_by,
                format!("User {user_id} is already {current}."),
            ));
        }

        sqlx::query("UPDATE users SET status = $1 WHERE id = $2")
            .bind(dto.status)
            .bind(user_id)
            .execute(db)
            .await?;

        Ok(ActionReceipt::applied(
            requested_by,
            format!("User {user_id} moved from {current} to {}.", dto.status),
        ))
    }
}
