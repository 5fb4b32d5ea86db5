use sqlx::PgPool;
use tracing::instrument;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::CurriculumId;
use campanile_models::status::CurriculumStatus;
use campanile_models::transitions;

use crate::modules::curricula::model::{
    Course, Curriculum, CurriculumCourse, Program, RegisterCoursesDto,
    RegisterCurriculumCoursesDto, RegisterCurriculumDto, RegisterProgramsDto,
    UpdateCurriculumStatusDto,
};

pub struct CurriculumService;

impl CurriculumService {
    /// Register programs. Codes are normalized to uppercase before storage
    /// so lookups stay case-insensitive.
    #[instrument(skip(db, dto))]
    pub async fn register_programs(
        db: &PgPool,
        dto: RegisterProgramsDto,
    ) -> Result<Vec<Program>, AppError> {
        let mut tx = db.begin().await?;
        let mut registered = Vec::with_capacity(dto.programs.len());

        for program in &dto.programs {
            let code = program.program_code.to_uppercase();
            let row = sqlx::query_as::<_, Program>(
                r#"INSERT INTO programs (title, program_code, description, department_id)
                   VALUES ($1, $2, $3, $4)
                   RETURNING id, title, program_code, description, department_id, created_at"#,
            )
            .bind(&program.title)
            .bind(&code)
            .bind(&program.description)
            .bind(program.department_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Self::map_registration_error(e, "program", &code))?;

            registered.push(row);
        }

        tx.commit().await?;
        Ok(registered)
    }

    #[instrument(skip(db, dto))]
    pub async fn register_courses(
        db: &PgPool,
        dto: RegisterCoursesDto,
    ) -> Result<Vec<Course>, AppError> {
        let mut tx = db.begin().await?;
        let mut registered = Vec::with_capacity(dto.courses.len());

        for course in &dto.courses {
            let code = course.course_code.to_uppercase();
            let row = sqlx::query_as::<_, Course>(
                r#"INSERT INTO courses (title, course_code, units, description)
                   VALUES ($1, $2, $3, $4)
                   RETURNING id, title, course_code, units, description, created_at"#,
            )
            .bind(&course.title)
            .bind(&code)
            .bind(course.units)
            .bind(&course.description)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| Self::map_registration_error(e, "course", &code))?;

            registered.push(row);
        }

        tx.commit().await?;
        Ok(registered)
    }

    /// Register a curriculum for a program. New curricula start as `DRAFT`
    /// and admit no offerings until activated.
    #[instrument(skip(db))]
    pub async fn register_curriculum(
        db: &PgPool,
        dto: RegisterCurriculumDto,
    ) -> Result<Curriculum, AppError> {
        if let Some(effective_to) = dto.effective_to
            && effective_to < dto.effective_from
        {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "effective_to must not precede effective_from"
            )));
        }

        let curriculum = sqlx::query_as::<_, Curriculum>(
            r#"INSERT INTO curricula (title, effective_from, effective_to, program_id)
               VALUES ($1, $2, $3, $4)
               RETURNING id, title, effective_from, effective_to, status, program_id, created_at"#,
        )
        .bind(&dto.title)
        .bind(dto.effective_from)
        .bind(dto.effective_to)
        .bind(dto.program_id)
        .fetch_one(db)
        .await
        .map_err(|e| Self::map_registration_error(e, "curriculum", &dto.title))?;

        Ok(curriculum)
    }

    /// Attach courses to a curriculum. A course can appear in a curriculum
    /// at most once.
    #[instrument(skip(db, dto))]
    pub async fn register_curriculum_courses(
        db: &PgPool,
        curriculum_id: CurriculumId,
        dto: RegisterCurriculumCoursesDto,
    ) -> Result<Vec<CurriculumCourse>, AppError> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM curricula WHERE id = $1)")
                .bind(curriculum_id)
                .fetch_one(db)
                .await?;
        if !exists {
            return Err(AppError::not_found(anyhow::anyhow!("Curriculum not found")));
        }

        let mut tx = db.begin().await?;
        let mut registered = Vec::with_capacity(dto.courses.len());

        for course in &dto.courses {
            let row = sqlx::query_as::<_, CurriculumCourse>(
                r#"INSERT INTO curriculum_courses (curriculum_id, course_id, year_level, semester, is_required)
                   VALUES ($1, $2, $3, $4, $5)
                   RETURNING id, curriculum_id, course_id, year_level, semester, is_required, created_at"#,
            )
            .bind(curriculum_id)
            .bind(course.course_id)
            .bind(course.year_level)
            .bind(course.semester)
            .bind(course.is_required)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "Course {} is already part of this curriculum",
                        course.course_id
                    ));
                }
                Self::map_registration_error(e, "curriculum course", &course.course_id.to_string())
            })?;

            registered.push(row);
        }

        tx.commit().await?;
        Ok(registered)
    }

    #[instrument(skip(db))]
    pub async fn get_curriculum(
        db: &PgPool,
        curriculum_id: CurriculumId,
    ) -> Result<Curriculum, AppError> {
        let curriculum = sqlx::query_as::<_, Curriculum>(
            r#"SELECT id, title, effective_from, effective_to, status, program_id, created_at
               FROM curricula WHERE id = $1"#,
        )
        .bind(curriculum_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Curriculum not found")))?;

        Ok(curriculum)
    }

    #[instrument(skip(db))]
    pub async fn get_curriculum_courses(
        db: &PgPool,
        curriculum_id: CurriculumId,
    ) -> Result<Vec<CurriculumCourse>, AppError> {
        let courses = sqlx::query_as::<_, CurriculumCourse>(
            r#"SELECT id, curriculum_id, course_id, year_level, semester, is_required, created_at
               FROM curriculum_courses WHERE curriculum_id = $1
               ORDER BY year_level, semester"#,
        )
        .bind(curriculum_id)
        .fetch_all(db)
        .await?;

        Ok(courses)
    }

    /// Update the lifecycle status of a curriculum. Requesting the current
    /// status is a reported no-op.
    #[instrument(skip(db))]
    pub async fn update_curriculum_status(
        db: &PgPool,
        curriculum_id: CurriculumId,
        dto: UpdateCurriculumStatusDto,
        requested_by: &str,
    ) -> Result<ActionReceipt, AppError> {
        let current =
            sqlx::query_scalar::<_, CurriculumStatus>("SELECT status FROM curricula WHERE id = $1")
                .bind(curriculum_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Curriculum not found")))?;

        if transitions::plan(&current, &dto.status).is_noop() {
            return Ok(ActionReceipt::noop(
                requested_by,
                format!("Curriculum {curriculum_id} status is currently {current}."),
            ));
        }

        sqlx::query("UPDATE curricula SET status = $1 WHERE id = $2")
            .bind(dto.status)
            .bind(curriculum_id)
            .execute(db)
            .await?;

        Ok(ActionReceipt::applied(
            requested_by,
            format!(
                "Curriculum {curriculum_id} moved from {current} to {}.",
                dto.status
            ),
        ))
    }

    fn map_registration_error(e: sqlx::Error, entity: &str, label: &str) -> AppError {
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.is_unique_violation() {
                return AppError::conflict(anyhow::anyhow!(
                    "A {entity} with code {label} already exists"
                ));
            }
            if db_err.is_foreign_key_violation() {
                return AppError::bad_request(anyhow::anyhow!(
                    "Unknown reference while registering {entity} {label}"
                ));
            }
        }
        AppError::from(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use campanile_models::status::SemesterPeriod;

    use campanile_models::ids::DepartmentId;

    use crate::modules::curricula::model::{
        RegisterCourseDto, RegisterCurriculumCourseDto, RegisterProgramDto,
    };

    async fn seed_program(pool: &PgPool) -> campanile_models::ids::ProgramId {
        // Departments are storage-only; they arrive out of band
        let department_id = sqlx::query_scalar::<_, DepartmentId>(
            "INSERT INTO departments (title, department_code) VALUES ($1, $2) RETURNING id",
        )
        .bind("Computer Studies")
        .bind("CS")
        .fetch_one(pool)
        .await
        .unwrap();

        let programs = CurriculumService::register_programs(
            pool,
            RegisterProgramsDto {
                programs: vec![RegisterProgramDto {
                    title: "BS Computer Science".to_string(),
                    program_code: "bscs".to_string(),
                    description: None,
                    department_id,
                }],
            },
        )
        .await
        .unwrap();

        programs[0].id
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_codes_are_uppercased(pool: PgPool) {
        let program_id = seed_program(&pool).await;
        let programs = sqlx::query_as::<_, Program>(
            "SELECT id, title, program_code, description, department_id, created_at FROM programs WHERE id = $1",
        )
        .bind(program_id)
        .fetch_all(&pool)
        .await
        .unwrap();
        assert_eq!(programs[0].program_code, "BSCS");

        let courses = CurriculumService::register_courses(
            &pool,
            RegisterCoursesDto {
                courses: vec![RegisterCourseDto {
                    title: "Data Structures".to_string(),
                    course_code: "cs201".to_string(),
                    units: 3,
                    description: None,
                }],
            },
        )
        .await
        .unwrap();
        assert_eq!(courses[0].course_code, "CS201");
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_course_code_conflicts(pool: PgPool) {
        let dto = || RegisterCoursesDto {
            courses: vec![RegisterCourseDto {
                title: "Data Structures".to_string(),
                course_code: "CS201".to_string(),
                units: 3,
                description: None,
            }],
        };

        CurriculumService::register_courses(&pool, dto()).await.unwrap();
        let err = CurriculumService::register_courses(&pool, dto())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_curriculum_lifecycle(pool: PgPool) {
        let program_id = seed_program(&pool).await;

        let curriculum = CurriculumService::register_curriculum(
            &pool,
            RegisterCurriculumDto {
                title: "BSCS 2025".to_string(),
                effective_from: 2025,
                effective_to: None,
                program_id,
            },
        )
        .await
        .unwrap();
        assert_eq!(curriculum.status, CurriculumStatus::Draft);

        let receipt = CurriculumService::update_curriculum_status(
            &pool,
            curriculum.id,
            UpdateCurriculumStatusDto {
                status: CurriculumStatus::Active,
            },
            "registrar-1",
        )
        .await
        .unwrap();
        assert!(receipt.success);

        let receipt = CurriculumService::update_curriculum_status(
            &pool,
            curriculum.id,
            UpdateCurriculumStatusDto {
                status: CurriculumStatus::Active,
            },
            "registrar-1",
        )
        .await
        .unwrap();
        assert!(!receipt.success);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_curriculum_course_appears_once(pool: PgPool) {
        let program_id = seed_program(&pool).await;
        let curriculum = CurriculumService::register_curriculum(
            &pool,
            RegisterCurriculumDto {
                title: "BSCS 2025".to_string(),
                effective_from: 2025,
                effective_to: None,
                program_id,
            },
        )
        .await
        .unwrap();

        let courses = CurriculumService::register_courses(
            &pool,
            RegisterCoursesDto {
                courses: vec![RegisterCourseDto {
                    title: "Data Structures".to_string(),
                    course_code: "CS201".to_string(),
                    units: 3,
                    description: None,
                }],
            },
        )
        .await
        .unwrap();

        let attach = || RegisterCurriculumCoursesDto {
            courses: vec![RegisterCurriculumCourseDto {
                course_id: courses[0].id,
                year_level: 2,
                semester: SemesterPeriod::First,
                is_required: true,
            }],
        };

        CurriculumService::register_curriculum_courses(&pool, curriculum.id, attach())
            .await
            .unwrap();
        let err = CurriculumService::register_curriculum_courses(&pool, curriculum.id, attach())
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_inverted_effectivity_rejected(pool: PgPool) {
        let program_id = seed_program(&pool).await;

        let err = CurriculumService::register_curriculum(
            &pool,
            RegisterCurriculumDto {
                title: "BSCS 2025".to_string(),
                effective_from: 2025,
                effective_to: Some(2024),
                program_id,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);
    }
}
