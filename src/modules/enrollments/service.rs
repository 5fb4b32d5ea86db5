use sqlx::PgPool;
use tracing::{info, instrument};

use campanile_core::{AppError, PaginationMeta};
use campanile_models::ids::{TermId, UserId};
use campanile_models::transitions;

use crate::modules::enrollments::eligibility;
use crate::modules::enrollments::ledger;
use crate::modules::enrollments::model::{
    rejection, EnrollDto, Enrollment, EnrollmentFilterParams, EnrollmentRejection,
    PaginatedEnrollmentsResponse, UpdateEnrollmentStatusDto,
};
use crate::modules::offerings::model::ClassSection;
use crate::modules::users::service::UserService;

const ENROLLMENT_COLUMNS: &str = "id, status, student_id, class_section_id, term_id, created_at";

pub struct EnrollmentService;

impl EnrollmentService {
    /// Admit a student into a class section.
    ///
    /// Eligibility, the seat reservation, and the enrollment insert share
    /// one transaction: either the student holds a seat and a `PENDING`
    /// enrollment exists, or nothing changed. The ledger's conditional
    /// update is what serializes concurrent admissions to the same section.
    #[instrument(skip(db))]
    pub async fn enroll_student(db: &PgPool, dto: EnrollDto) -> Result<Enrollment, AppError> {
        let student = UserService::get_student(db, dto.student_id).await?;

        let mut tx = db.begin().await?;

        let section = sqlx::query_as::<_, ClassSection>(
            r#"SELECT id, section_code, student_capacity, current_student_cnt, status,
                      course_offering_id, created_at
               FROM class_sections WHERE id = $1"#,
        )
        .bind(dto.class_section_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

        let term_id = eligibility::check_eligibility(&mut tx, &student, &section).await?;

        let occupancy = ledger::reserve_seat(&mut tx, section.id)
            .await?
            .ok_or_else(|| rejection(EnrollmentRejection::SectionFull))?;

        let enrollment = sqlx::query_as::<_, Enrollment>(&format!(
            r#"INSERT INTO enrollments (student_id, class_section_id, term_id)
               VALUES ($1, $2, $3)
               RETURNING {ENROLLMENT_COLUMNS}"#,
        ))
        .bind(student.id)
        .bind(section.id)
        .bind(term_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return rejection(EnrollmentRejection::AlreadyEnrolled);
            }
            AppError::from(e)
        })?;

        tx.commit().await?;

        info!(
            enrollment_id = %enrollment.id,
            section_id = %section.id,
            occupancy,
            "Student admitted"
        );
        Ok(enrollment)
    }

    /// Decide a batch of enrollments in one transaction.
    ///
    /// Rejecting an enrollment that held a seat releases it; reinstating a
    /// rejected enrollment reserves one again and fails the whole batch if
    /// the section has filled up in the meantime. Enrollments already in
    /// the requested status are left untouched.
    #[instrument(skip(db, dto))]
    pub async fn update_enrollment_status(
        db: &PgPool,
        dto: UpdateEnrollmentStatusDto,
    ) -> Result<Vec<Enrollment>, AppError> {
        let mut tx = db.begin().await?;

        let rows = sqlx::query_as::<_, Enrollment>(&format!(
            "SELECT {ENROLLMENT_COLUMNS} FROM enrollments WHERE id = ANY($1) FOR UPDATE"
        ))
        .bind(&dto.enrollment_ids)
        .fetch_all(&mut *tx)
        .await?;

        if rows.len() != dto.enrollment_ids.len() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "One or more enrollments not found"
            )));
        }

        let mut changed = Vec::new();
        for row in &rows {
            if transitions::plan(&row.status, &dto.status).is_noop() {
                continue;
            }

            let was_seated = row.status.holds_seat();
            let will_be_seated = dto.status.holds_seat();
            if was_seated && !will_be_seated {
                ledger::release_seat(&mut tx, row.class_section_id).await?;
            } else if !was_seated && will_be_seated {
                ledger::reserve_seat(&mut tx, row.class_section_id)
                    .await?
                    .ok_or_else(|| rejection(EnrollmentRejection::SectionFull))?;
            }

            changed.push(row.id);
        }

        let updated = if changed.is_empty() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Enrollment>(&format!(
                r#"UPDATE enrollments SET status = $1
                   WHERE id = ANY($2)
                   RETURNING {ENROLLMENT_COLUMNS}"#,
            ))
            .bind(dto.status)
            .bind(&changed)
            .fetch_all(&mut *tx)
            .await?
        };

        tx.commit().await?;
        Ok(updated)
    }

    /// Filtered, paginated enrollment listing.
    #[instrument(skip(db))]
    pub async fn get_enrollments(
        db: &PgPool,
        filters: EnrollmentFilterParams,
    ) -> Result<PaginatedEnrollmentsResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM enrollments
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid IS NULL OR class_section_id = $2)
                 AND ($3::uuid IS NULL OR term_id = $3)
                 AND ($4::enrollment_status IS NULL OR status = $4)"#,
        )
        .bind(filters.student_id)
        .bind(filters.class_section_id)
        .bind(filters.term_id)
        .bind(filters.status)
        .fetch_one(db)
        .await?;

        let enrollments = sqlx::query_as::<_, Enrollment>(&format!(
            r#"SELECT {ENROLLMENT_COLUMNS} FROM enrollments
               WHERE ($1::uuid IS NULL OR student_id = $1)
                 AND ($2::uuid IS NULL OR class_section_id = $2)
                 AND ($3::uuid IS NULL OR term_id = $3)
                 AND ($4::enrollment_status IS NULL OR status = $4)
               ORDER BY created_at DESC
               LIMIT $5 OFFSET $6"#,
        ))
        .bind(filters.student_id)
        .bind(filters.class_section_id)
        .bind(filters.term_id)
        .bind(filters.status)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedEnrollmentsResponse {
            data: enrollments,
            meta: PaginationMeta {
                total,
                limit,
                offset: Some(offset),
                has_more: offset + limit < total,
            },
        })
    }

    /// Sections of a term the student could enroll in right now: open
    /// sections of approved offerings in an open term, on the student's
    /// program curriculum, with a free seat, that the student is not
    /// already in.
    #[instrument(skip(db))]
    pub async fn get_student_allowed_sections(
        db: &PgPool,
        student_id: UserId,
        term_id: TermId,
    ) -> Result<Vec<ClassSection>, AppError> {
        let student_exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE id = $1 AND role = 'STUDENT')",
        )
        .bind(student_id)
        .fetch_one(db)
        .await?;
        if !student_exists {
            return Err(AppError::not_found(anyhow::anyhow!("Student not found")));
        }

        let sections = sqlx::query_as::<_, ClassSection>(
            r#"SELECT s.id, s.section_code, s.student_capacity, s.current_student_cnt,
                      s.status, s.course_offering_id, s.created_at
               FROM class_sections s
               JOIN course_offerings o ON o.id = s.course_offering_id
               JOIN terms t ON t.id = o.term_id
               JOIN curriculum_courses cc ON cc.id = o.curriculum_course_id
               JOIN curricula c ON c.id = cc.curriculum_id
               WHERE t.id = $2
                 AND t.status = 'OPEN'
                 AND o.status = 'APPROVED'
                 AND s.status = 'OPEN'
                 AND s.current_student_cnt < s.student_capacity
                 AND c.program_id = (SELECT program_id FROM users WHERE id = $1)
                 AND NOT EXISTS (
                     SELECT 1 FROM enrollments e
                     WHERE e.student_id = $1 AND e.class_section_id = s.id
                 )
               ORDER BY s.section_code"#,
        )
        .bind(student_id)
        .bind(term_id)
        .fetch_all(db)
        .await?;

        Ok(sections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use campanile_models::ids::ClassSectionId;
    use campanile_models::status::{
        ClassSectionStatus, CourseOfferingStatus, EnrollmentStatus, TermStatus,
    };

    use crate::modules::testkit::{self, AcademicFixture};

    async fn seed_open_section(pool: &PgPool, fixture: &AcademicFixture, capacity: i16) -> ClassSectionId {
        let offering_id = testkit::seed_approved_offering(
            pool,
            fixture.term_id,
            fixture.curriculum_course_id,
        )
        .await;
        testkit::seed_open_section(pool, offering_id, capacity).await
    }

    async fn occupancy(pool: &PgPool, section_id: ClassSectionId) -> i16 {
        sqlx::query_scalar::<_, i16>(
            "SELECT current_student_cnt FROM class_sections WHERE id = $1",
        )
        .bind(section_id)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_admission_happy_path(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        let enrollment = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();

        assert_eq!(enrollment.status, EnrollmentStatus::Pending);
        assert_eq!(enrollment.term_id, fixture.term_id);
        assert_eq!(occupancy(&pool, section_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_duplicate_enrollment_rejected(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;
        let dto = || EnrollDto {
            student_id: fixture.student_id,
            class_section_id: section_id,
        };

        EnrollmentService::enroll_student(&pool, dto()).await.unwrap();
        let err = EnrollmentService::enroll_student(&pool, dto())
            .await
            .unwrap_err();

        assert_eq!(err.status, StatusCode::CONFLICT);
        assert!(matches!(
            err.error.downcast_ref::<EnrollmentRejection>(),
            Some(EnrollmentRejection::AlreadyEnrolled)
        ));
        // The failed attempt must not have taken a seat
        assert_eq!(occupancy(&pool, section_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_last_seat_goes_to_exactly_one_student(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 1).await;
        let second_student = testkit::seed_student(&pool, fixture.program_id).await;

        let (first, second) = tokio::join!(
            EnrollmentService::enroll_student(
                &pool,
                EnrollDto {
                    student_id: fixture.student_id,
                    class_section_id: section_id,
                },
            ),
            EnrollmentService::enroll_student(
                &pool,
                EnrollDto {
                    student_id: second_student,
                    class_section_id: section_id,
                },
            ),
        );

        let successes = [&first, &second].iter().filter(|r| r.is_ok()).count();
        assert_eq!(successes, 1);

        let loser = if first.is_err() { first } else { second };
        let err = loser.unwrap_err();
        assert!(matches!(
            err.error.downcast_ref::<EnrollmentRejection>(),
            Some(EnrollmentRejection::SectionFull)
        ));
        assert_eq!(occupancy(&pool, section_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_first_failed_guard_wins(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        // Both the section and the term are ineligible; the section guard
        // runs first and must be the reported reason
        testkit::set_section_status(&pool, section_id, ClassSectionStatus::Close).await;
        testkit::set_term_status(&pool, fixture.term_id, TermStatus::Closed).await;

        let err = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap_err();

        assert!(matches!(
            err.error.downcast_ref::<EnrollmentRejection>(),
            Some(EnrollmentRejection::SectionNotOpen(ClassSectionStatus::Close))
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_unapproved_offering_rejected(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let offering_id = testkit::seed_approved_offering(
            &pool,
            fixture.term_id,
            fixture.curriculum_course_id,
        )
        .await;
        let section_id = testkit::seed_open_section(&pool, offering_id, 30).await;

        // The offering is pulled back to PENDING while its section stays OPEN
        testkit::set_offering_status(&pool, offering_id, CourseOfferingStatus::Pending).await;

        let err = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(
            err.error.downcast_ref::<EnrollmentRejection>(),
            Some(EnrollmentRejection::OfferingNotApproved(
                CourseOfferingStatus::Pending
            ))
        ));
        assert_eq!(occupancy(&pool, section_id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_closed_term_rejected(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        // The term closes while the section and offering remain eligible
        testkit::set_term_status(&pool, fixture.term_id, TermStatus::Closed).await;

        let err = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(
            err.error.downcast_ref::<EnrollmentRejection>(),
            Some(EnrollmentRejection::TermNotOpen(TermStatus::Closed))
        ));
        assert_eq!(occupancy(&pool, section_id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_curriculum_mismatch_rejected(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        // Student from a different program
        let other_program = sqlx::query_scalar::<_, campanile_models::ids::ProgramId>(
            r#"INSERT INTO programs (title, program_code, department_id)
               VALUES ('BS Mathematics', 'BSMATH', $1) RETURNING id"#,
        )
        .bind(fixture.department_id)
        .fetch_one(&pool)
        .await
        .unwrap();
        let outsider = testkit::seed_student(&pool, other_program).await;

        let err = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: outsider,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(matches!(
            err.error.downcast_ref::<EnrollmentRejection>(),
            Some(EnrollmentRejection::CurriculumMismatch)
        ));
        assert_eq!(occupancy(&pool, section_id).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rejection_releases_seat_and_reinstating_takes_one(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 1).await;

        let enrollment = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();
        assert_eq!(occupancy(&pool, section_id).await, 1);

        // Reject: the seat opens up
        let updated = EnrollmentService::update_enrollment_status(
            &pool,
            UpdateEnrollmentStatusDto {
                enrollment_ids: vec![enrollment.id],
                status: EnrollmentStatus::Rejected,
            },
        )
        .await
        .unwrap();
        assert_eq!(updated[0].status, EnrollmentStatus::Rejected);
        assert_eq!(occupancy(&pool, section_id).await, 0);

        // Reinstate: the seat is taken again
        EnrollmentService::update_enrollment_status(
            &pool,
            UpdateEnrollmentStatusDto {
                enrollment_ids: vec![enrollment.id],
                status: EnrollmentStatus::Approved,
            },
        )
        .await
        .unwrap();
        assert_eq!(occupancy(&pool, section_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_reinstating_into_full_section_fails_batch(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 1).await;
        let second_student = testkit::seed_student(&pool, fixture.program_id).await;

        let first = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();

        // Reject the first student, let the second take the seat
        EnrollmentService::update_enrollment_status(
            &pool,
            UpdateEnrollmentStatusDto {
                enrollment_ids: vec![first.id],
                status: EnrollmentStatus::Rejected,
            },
        )
        .await
        .unwrap();
        EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: second_student,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();

        // Reinstating the first student would oversubscribe the section
        let err = EnrollmentService::update_enrollment_status(
            &pool,
            UpdateEnrollmentStatusDto {
                enrollment_ids: vec![first.id],
                status: EnrollmentStatus::Pending,
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::CONFLICT);

        // The aborted batch left the enrollment rejected
        let row = sqlx::query_scalar::<_, EnrollmentStatus>(
            "SELECT status FROM enrollments WHERE id = $1",
        )
        .bind(first.id)
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(row, EnrollmentStatus::Rejected);
        assert_eq!(occupancy(&pool, section_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_noop_status_updates_touch_nothing(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        let enrollment = EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();

        let updated = EnrollmentService::update_enrollment_status(
            &pool,
            UpdateEnrollmentStatusDto {
                enrollment_ids: vec![enrollment.id],
                status: EnrollmentStatus::Pending,
            },
        )
        .await
        .unwrap();

        assert!(updated.is_empty());
        assert_eq!(occupancy(&pool, section_id).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_filtered_listing(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;
        let second_student = testkit::seed_student(&pool, fixture.program_id).await;

        for student_id in [fixture.student_id, second_student] {
            EnrollmentService::enroll_student(
                &pool,
                EnrollDto {
                    student_id,
                    class_section_id: section_id,
                },
            )
            .await
            .unwrap();
        }

        let all = EnrollmentService::get_enrollments(
            &pool,
            EnrollmentFilterParams {
                term_id: Some(fixture.term_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(all.meta.total, 2);

        let one = EnrollmentService::get_enrollments(
            &pool,
            EnrollmentFilterParams {
                student_id: Some(fixture.student_id),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(one.meta.total, 1);
        assert_eq!(one.data[0].student_id, fixture.student_id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_allowed_sections_shrink_as_student_enrolls(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        let allowed = EnrollmentService::get_student_allowed_sections(
            &pool,
            fixture.student_id,
            fixture.term_id,
        )
        .await
        .unwrap();
        assert_eq!(allowed.len(), 1);
        assert_eq!(allowed[0].id, section_id);

        EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();

        let allowed = EnrollmentService::get_student_allowed_sections(
            &pool,
            fixture.student_id,
            fixture.term_id,
        )
        .await
        .unwrap();
        assert!(allowed.is_empty());
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_rebuild_count_restores_ledger(pool: PgPool) {
        let fixture = AcademicFixture::seed(&pool).await;
        let section_id = seed_open_section(&pool, &fixture, 30).await;

        EnrollmentService::enroll_student(
            &pool,
            EnrollDto {
                student_id: fixture.student_id,
                class_section_id: section_id,
            },
        )
        .await
        .unwrap();

        // Corrupt the counter, then rebuild it from the enrollments
        sqlx::query("UPDATE class_sections SET current_student_cnt = 7 WHERE id = $1")
            .bind(section_id)
            .execute(&pool)
            .await
            .unwrap();

        let occupancy = ledger::rebuild_count(&pool, section_id).await.unwrap();
        assert_eq!(occupancy, 1);
    }
}
