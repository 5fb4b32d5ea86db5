//! The admission eligibility chain.
//!
//! Guards run in a fixed order and the first failure wins, so a request
//! that trips several rules always reports the same one: duplicate check,
//! then section status, then offering status, then term status, then
//! curriculum compatibility. Capacity is NOT checked here; the seat is
//! taken (or refused) atomically by the ledger, because a read-then-write
//! capacity check would race.

use sqlx::PgConnection;

use campanile_core::AppError;
use campanile_models::ids::{ProgramId, TermId};
use campanile_models::status::{ClassSectionStatus, CourseOfferingStatus, TermStatus};

use crate::modules::enrollments::model::{rejection, EnrollmentRejection};
use crate::modules::offerings::model::ClassSection;
use crate::modules::users::model::{RoleProfile, User};

/// Run the eligibility chain for one student and one section.
///
/// Returns the term the section belongs to, which the admission insert
/// needs. Expects to run inside the admission transaction.
pub async fn check_eligibility(
    conn: &mut PgConnection,
    student: &User,
    section: &ClassSection,
) -> Result<TermId, AppError> {
    // A section lives in exactly one term, so (student, section) is enough
    // to detect a duplicate regardless of term.
    let already_enrolled = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = $1 AND class_section_id = $2)",
    )
    .bind(student.id)
    .bind(section.id)
    .fetch_one(&mut *conn)
    .await?;
    if already_enrolled {
        return Err(rejection(EnrollmentRejection::AlreadyEnrolled));
    }

    if section.status != ClassSectionStatus::Open {
        return Err(rejection(EnrollmentRejection::SectionNotOpen(
            section.status,
        )));
    }

    let (offering_status, term_id) = sqlx::query_as::<_, (CourseOfferingStatus, TermId)>(
        "SELECT status, term_id FROM course_offerings WHERE id = $1",
    )
    .bind(section.course_offering_id)
    .fetch_one(&mut *conn)
    .await?;
    if offering_status != CourseOfferingStatus::Approved {
        return Err(rejection(EnrollmentRejection::OfferingNotApproved(
            offering_status,
        )));
    }

    let term_status = sqlx::query_scalar::<_, TermStatus>("SELECT status FROM terms WHERE id = $1")
        .bind(term_id)
        .fetch_one(&mut *conn)
        .await?;
    if term_status != TermStatus::Open {
        return Err(rejection(EnrollmentRejection::TermNotOpen(term_status)));
    }

    let student_program = match student.role_profile()? {
        RoleProfile::Student { program_id, .. } => program_id,
        _ => {
            return Err(AppError::unprocessable(anyhow::anyhow!(
                "Only student accounts can enroll"
            )));
        }
    };

    let offered_program = sqlx::query_scalar::<_, ProgramId>(
        r#"SELECT c.program_id FROM course_offerings o
           JOIN curriculum_courses cc ON cc.id = o.curriculum_course_id
           JOIN curricula c ON c.id = cc.curriculum_id
           WHERE o.id = $1"#,
    )
    .bind(section.course_offering_id)
    .fetch_one(&mut *conn)
    .await?;
    if offered_program != student_program {
        return Err(rejection(EnrollmentRejection::CurriculumMismatch));
    }

    Ok(term_id)
}
