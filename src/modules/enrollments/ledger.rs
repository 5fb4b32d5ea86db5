//! The capacity ledger.
//!
//! `class_sections.current_student_cnt` is a denormalized seat counter kept
//! next to the capacity so a reservation is a single atomic statement. The
//! conditional update both checks and takes the seat: the row lock it
//! acquires serializes concurrent reservations on the same section, and a
//! losing writer re-evaluates the predicate against the winner's committed
//! count. Enrollments remain the source of truth; [`rebuild_count`] restores
//! the counter from them.

use sqlx::{PgConnection, PgPool};

use campanile_core::AppError;
use campanile_models::ids::ClassSectionId;

/// Try to take one seat. Returns the new occupancy, or `None` when the
/// section is full.
pub async fn reserve_seat(
    conn: &mut PgConnection,
    section_id: ClassSectionId,
) -> Result<Option<i16>, AppError> {
    let occupancy = sqlx::query_scalar::<_, i16>(
        r#"UPDATE class_sections
           SET current_student_cnt = current_student_cnt + 1
           WHERE id = $1 AND current_student_cnt < student_capacity
           RETURNING current_student_cnt"#,
    )
    .bind(section_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(occupancy)
}

/// Give one seat back. Floored at zero so a stray double-release cannot
/// drive the counter negative.
pub async fn release_seat(
    conn: &mut PgConnection,
    section_id: ClassSectionId,
) -> Result<i16, AppError> {
    let occupancy = sqlx::query_scalar::<_, i16>(
        r#"UPDATE class_sections
           SET current_student_cnt = GREATEST(current_student_cnt - 1, 0)
           WHERE id = $1
           RETURNING current_student_cnt"#,
    )
    .bind(section_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(occupancy)
}

/// Recompute the counter from the enrollments table: every non-rejected
/// enrollment holds a seat.
pub async fn rebuild_count(db: &PgPool, section_id: ClassSectionId) -> Result<i16, AppError> {
    let occupancy = sqlx::query_scalar::<_, i16>(
        r#"UPDATE class_sections
           SET current_student_cnt = (
               SELECT COUNT(*) FROM enrollments
               WHERE class_section_id = $1 AND status <> 'REJECTED'
           )
           WHERE id = $1
           RETURNING current_student_cnt"#,
    )
    .bind(section_id)
    .fetch_optional(db)
    .await?
    .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Class section not found")))?;

    Ok(occupancy)
}
