//! Shared seeding helpers for service tests.
//!
//! Most scenarios need the full academic chain in place before the
//! interesting call: department, program, active curriculum with a course,
//! and an open term. `AcademicFixture::seed` builds that chain; the small
//! helpers push individual entities into specific states.

use sqlx::PgPool;
use uuid::Uuid;

use campanile_models::ids::{
    ClassSectionId, CourseId, CourseOfferingId, CurriculumCourseId, CurriculumId, DepartmentId,
    ProgramId, RoomId, TermId, UserId,
};
use campanile_models::status::{
    ClassSectionStatus, CourseOfferingStatus, CurriculumStatus, TermStatus,
};

pub struct AcademicFixture {
    pub department_id: DepartmentId,
    pub program_id: ProgramId,
    pub course_id: CourseId,
    pub curriculum_id: CurriculumId,
    pub curriculum_course_id: CurriculumCourseId,
    pub term_id: TermId,
    pub student_id: UserId,
}

impl AcademicFixture {
    /// Seed a department, program, ACTIVE curriculum with one first-year
    /// course, an OPEN term, and one approved student of the program.
    pub async fn seed(pool: &PgPool) -> Self {
        let department_id = sqlx::query_scalar::<_, DepartmentId>(
            "INSERT INTO departments (title, department_code) VALUES ($1, $2) RETURNING id",
        )
        .bind("Computer Studies")
        .bind(short_code())
        .fetch_one(pool)
        .await
        .unwrap();

        let program_id = sqlx::query_scalar::<_, ProgramId>(
            r#"INSERT INTO programs (title, program_code, department_id)
               VALUES ($1, $2, $3) RETURNING id"#,
        )
        .bind("BS Computer Science")
        .bind(short_code())
        .bind(department_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let course_id = sqlx::query_scalar::<_, CourseId>(
            r#"INSERT INTO courses (title, course_code, units)
               VALUES ($1, $2, 3) RETURNING id"#,
        )
        .bind("Introduction to Computing")
        .bind(short_code())
        .fetch_one(pool)
        .await
        .unwrap();

        let curriculum_id = sqlx::query_scalar::<_, CurriculumId>(
            r#"INSERT INTO curricula (title, effective_from, status, program_id)
               VALUES ($1, 2025, 'ACTIVE', $2) RETURNING id"#,
        )
        .bind("BSCS 2025")
        .bind(program_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let curriculum_course_id = sqlx::query_scalar::<_, CurriculumCourseId>(
            r#"INSERT INTO curriculum_courses (curriculum_id, course_id, year_level, semester)
               VALUES ($1, $2, 1, 'FIRST') RETURNING id"#,
        )
        .bind(curriculum_id)
        .bind(course_id)
        .fetch_one(pool)
        .await
        .unwrap();

        let term_id = sqlx::query_scalar::<_, TermId>(
            r#"INSERT INTO terms
               (academic_year_start, academic_year_end, enrollment_start, enrollment_end, semester_period, status)
               VALUES (2025, 2026, NOW(), NOW() + INTERVAL '30 days', 'FIRST', 'OPEN')
               RETURNING id"#,
        )
        .fetch_one(pool)
        .await
        .unwrap();

        let student_id = seed_student(pool, program_id).await;

        Self {
            department_id,
            program_id,
            course_id,
            curriculum_id,
            curriculum_course_id,
            term_id,
            student_id,
        }
    }
}

pub async fn seed_student(pool: &PgPool, program_id: ProgramId) -> UserId {
    sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users
           (first_name, last_name, email, role, status, program_id, year_level)
           VALUES ('Ana', 'Reyes', $1, 'STUDENT', 'APPROVED', $2, 1)
           RETURNING id"#,
    )
    .bind(format!("{}@example.edu", Uuid::new_v4()))
    .bind(program_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_professor(pool: &PgPool, department_id: DepartmentId) -> UserId {
    sqlx::query_scalar::<_, UserId>(
        r#"INSERT INTO users
           (first_name, last_name, email, role, status, department_id)
           VALUES ('Liza', 'Cortez', $1, 'PROFESSOR', 'APPROVED', $2)
           RETURNING id"#,
    )
    .bind(format!("{}@example.edu", Uuid::new_v4()))
    .bind(department_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_room(pool: &PgPool) -> RoomId {
    sqlx::query_scalar::<_, RoomId>(
        "INSERT INTO rooms (room_code) VALUES ($1) RETURNING id",
    )
    .bind(short_code())
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_approved_offering(
    pool: &PgPool,
    term_id: TermId,
    curriculum_course_id: CurriculumCourseId,
) -> CourseOfferingId {
    sqlx::query_scalar::<_, CourseOfferingId>(
        r#"INSERT INTO course_offerings (status, term_id, curriculum_course_id)
           VALUES ('APPROVED', $1, $2) RETURNING id"#,
    )
    .bind(term_id)
    .bind(curriculum_course_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn seed_open_section(
    pool: &PgPool,
    offering_id: CourseOfferingId,
    capacity: i16,
) -> ClassSectionId {
    sqlx::query_scalar::<_, ClassSectionId>(
        r#"INSERT INTO class_sections (section_code, student_capacity, status, course_offering_id)
           VALUES ($1, $2, 'OPEN', $3) RETURNING id"#,
    )
    .bind(short_code())
    .bind(capacity)
    .bind(offering_id)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn set_term_status(pool: &PgPool, term_id: TermId, status: TermStatus) {
    sqlx::query("UPDATE terms SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(term_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_curriculum_status(
    pool: &PgPool,
    curriculum_id: CurriculumId,
    status: CurriculumStatus,
) {
    sqlx::query("UPDATE curricula SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(curriculum_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_offering_status(
    pool: &PgPool,
    offering_id: CourseOfferingId,
    status: CourseOfferingStatus,
) {
    sqlx::query("UPDATE course_offerings SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(offering_id)
        .execute(pool)
        .await
        .unwrap();
}

pub async fn set_section_status(
    pool: &PgPool,
    section_id: ClassSectionId,
    status: ClassSectionStatus,
) {
    sqlx::query("UPDATE class_sections SET status = $1 WHERE id = $2")
        .bind(status)
        .bind(section_id)
        .execute(pool)
        .await
        .unwrap();
}

/// Random 8-char uppercase code that fits the VARCHAR(10) code columns.
fn short_code() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_uppercase()
}
