use sqlx::PgPool;
use tracing::instrument;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::{ClassSectionId, CourseOfferingId};
use campanile_models::status::{ClassSectionStatus, CourseOfferingStatus, CurriculumStatus, TermStatus};
use campanile_models::transitions;

use crate::modules::offerings::model::{
    ClassSection, CourseOffering, OfferingRejection, RegisterOfferingsDto, RegisterSectionsDto,
    SectionRejection, UpdateOfferingStatusDto, UpdateSectionStatusDto,
};

const OFFERING_COLUMNS: &str = "id, status, term_id, curriculum_course_id, created_at";
const SECTION_COLUMNS: &str =
    "id, section_code, student_capacity, current_student_cnt, status, course_offering_id, created_at";

pub struct OfferingService;

impl OfferingService {
    /// Register offerings of curriculum courses for a term. Every course in
    /// the batch must belong to an `ACTIVE` curriculum and the term must be
    /// `OPEN`; the batch commits atomically.
    #[instrument(skip(db, dto))]
    pub async fn register_offerings(
        db: &PgPool,
        dto: RegisterOfferingsDto,
    ) -> Result<Vec<CourseOffering>, AppError> {
        let term_status =
            sqlx::query_scalar::<_, TermStatus>("SELECT status FROM terms WHERE id = $1")
                .bind(dto.term_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Term not found")))?;

        if term_status != TermStatus::Open {
            return Err(offering_rejection(OfferingRejection::TermNotOpen(
                term_status,
            )));
        }

        let mut tx = db.begin().await?;
        let mut registered = Vec::with_capacity(dto.curriculum_course_ids.len());

        for curriculum_course_id in &dto.curriculum_course_ids {
            let curriculum_status = sqlx::query_scalar::<_, CurriculumStatus>(
                r#"SELECT c.status FROM curriculum_courses cc
                   JOIN curricula c ON c.id = cc.curriculum_id
                   WHERE cc.id = $1"#,
            )
            .bind(curriculum_course_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Curriculum course not found")))?;

            if curriculum_status != CurriculumStatus::Active {
                return Err(offering_rejection(OfferingRejection::CurriculumNotActive(
                    curriculum_status,
                )));
            }

            let offering = sqlx::query_as::<_, CourseOffering>(&format!(
                r#"INSERT INTO course_offerings (term_id, curriculum_course_id)
                   VALUES ($1, $2)
                   RETURNING {OFFERING_COLUMNS}"#,
            ))
            .bind(dto.term_id)
            .bind(curriculum_course_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return offering_rejection(OfferingRejection::DuplicateOffering);
                }
                AppError::from(e)
            })?;

            registered.push(offering);
        }

        tx.commit().await?;
        Ok(registered)
    }

    #[instrument(skip(db))]
    pub async fn get_offering(
        db: &PgPool,
        offering_id: CourseOfferingId,
    ) -> Result<CourseOffering, AppError> {
        let offering = sqlx::query_as::<_, CourseOffering>(&format!(
            "SELECT {OFFERING_COLUMNS} FROM course_offerings WHERE id = $1"
        ))
        .bind(offering_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course offering not found")))?;

        Ok(offering)
    }

    /// Update the lifecycle status of an offering. Requesting the current
    /// status is a reported no-op.
    #[instrument(skip(db))]
    pub async fn update_offering_status(
        db: &PgPool,
        offering_id: CourseOfferingId,
        dto: UpdateOfferingStatusDto,
        requested_by: &str,
    ) -> Result<ActionReceipt, AppError> {
        let current = sqlx::query_scalar::<_, CourseOfferingStatus>(
            "SELECT status FROM course_offerings WHERE id = $1",
        )
        .bind(offering_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course offering not found")))?;

        if transitions::plan(&current, &dto.status).is_noop() {
            return Ok(ActionReceipt::noop(
                requested_by,
                format!("Offering {offering_id} status is currently {current}."),
            ));
        }

        sqlx::query("UPDATE course_offerings SET status = $1 WHERE id = $2")
            .bind(dto.status)
            .bind(offering_id)
            .execute(db)
            .await?;

        Ok(ActionReceipt::applied(
            requested_by,
            format!("Offering {offering_id} moved from {current} to {}.", dto.status),
        ))
    }

    /// Register sections under an offering. The offering must be `APPROVED`
    /// and its term `OPEN`. New sections start `CLOSE` with an empty ledger.
    #[instrument(skip(db, dto))]
    pub async fn register_sections(
        db: &PgPool,
        offering_id: CourseOfferingId,
        dto: RegisterSectionsDto,
    ) -> Result<Vec<ClassSection>, AppError> {
        let statuses = sqlx::query_as::<_, (CourseOfferingStatus, TermStatus)>(
            r#"SELECT o.status, t.status FROM course_offerings o
               JOIN terms t ON t.id = o.term_id
               WHERE o.id = $1"#,
        )
        .bind(offering_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Course offering not found")))?;

        let (offering_status, term_status) = statuses;
        if offering_status != CourseOfferingStatus::Approved {
            return Err(section_rejection(SectionRejection::OfferingNotApproved(
                offering_status,
            )));
        }
        if term_status != TermStatus::Open {
            return Err(section_rejection(SectionRejection::TermNotOpen(
                term_status,
            )));
        }

        let mut tx = db.begin().await?;
        let mut registered = Vec::with_capacity(dto.sections.len());

        for section in &dto.sections {
            let code = section.section_code.to_uppercase();
            let row = sqlx::query_as::<_, ClassSection>(&format!(
                r#"INSERT INTO class_sections (section_code, student_capacity, course_offering_id)
                   VALUES ($1, $2, $3)
                   RETURNING {SECTION_COLUMNS}"#,
            ))
            .bind(&code)
            .bind(section.student_capacity)
            .bind(offering_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return section_rejection(SectionRejection::DuplicateSectionCode(code.clone()));
                }
                AppError::from(e)
            })?;

            registered.push(row);
        }

        tx.commit().await?;
        Ok(registered)
    }

    #[instrument(skip(db))]
    pub async fn get_section(
        db: &PgPool,
        section_id: ClassSectionId,
    ) -> Result<ClassSection, AppError> {
        let section = sqlx::query_as::<_, ClassSection>(&format!(
            "SELECT {SECTION_COLUMNS} FROM class_sections WHERE id = $1"
        ))
        .bind(section_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        Ok(section)
    }

    #[instrument(skip(db))]
    pub async fn get_offering_sections(
        db: &PgPool,
        offering_id: CourseOfferingId,
    ) -> Result<Vec<ClassSection>, AppError> {
        let sections = sqlx::query_as::<_, ClassSection>(&format!(
            "SELECT {SECTION_COLUMNS} FROM class_sections WHERE course_offering_id = $1 ORDER BY section_code"
        ))
        .bind(offering_id)
        .fetch_all(db)
        .await?;

        Ok(sections)
    }

    /// Update the lifecycle status of a section. Requesting the current
    /// status is a reported no-op.
    #[instrument(skip(db))]
    pub async fn update_section_status(
        db: &PgPool,
        section_id: ClassSectionId,
        dto: UpdateSectionStatusDto,
        requested_by: &str,
    ) -> Result<ActionReceipt, AppError> {
        let current = sqlx::query_scalar::<_, ClassSectionStatus>(
            "SELECT status FROM class_sections WHERE id = $1",
        )
        .bind(section_id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        if transitions::plan(&current, &dto.status).is_noop() {
            return Ok(ActionReceipt::noop(
                requested_by,
                format!("Section {section_id} status is currently {current}."),
            ));
        }

        sqlx::query("UPDATE class_sections SET status = $1 WHERE id = $2")
            .bind(dto.status)
            .bind(section_id)
            .execute(db)
            .await?;

        Ok(ActionReceipt::applied(
            requested_by,
            format!("Section {section_id} moved from {current} to {}.", dto.status),
        ))
    }
}

fn offering_rejection(rejection: OfferingRejection) -> AppError {
    AppError::new(rejection.http_status(), rejection)
}

fn section_rejection(rejection: SectionRejection) -> AppError {
    AppError::new(rejection.http_status(), rejection)
}
