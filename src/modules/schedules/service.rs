use sqlx::{PgConnection, PgPool};
use tracing::instrument;

use campanile_core::AppError;
use campanile_models::ids::{ClassSectionId, RoomId, UserId};

use crate::modules::schedules::conflict;
use crate::modules::schedules::model::{
    AssignProfessorDto, AssignScheduleDto, ClassSchedule, ProfessorAssignment, ScheduleRejection,
};

const SCHEDULE_COLUMNS: &str =
    "id, day_of_week, start_time, end_time, class_section_id, room_id, created_at";

pub struct ScheduleService;

impl ScheduleService {
    /// Assign a weekly meeting slot to a section.
    ///
    /// Shape checks (weekday range, interval direction) run before any
    /// conflict search. The section row is locked first, then the room row
    /// and the rows of professors already assigned to the section, so rival
    /// schedule or professor assignments touching the same section, room,
    /// or professor serialize and the loser sees the winner's slot.
    #[instrument(skip(db))]
    pub async fn assign_schedule(
        db: &PgPool,
        section_id: ClassSectionId,
        dto: AssignScheduleDto,
    ) -> Result<ClassSchedule, AppError> {
        if !conflict::valid_day_of_week(dto.day_of_week) {
            return Err(rejection(ScheduleRejection::InvalidDayOfWeek(
                dto.day_of_week,
            )));
        }
        if dto.start_time >= dto.end_time {
            return Err(rejection(ScheduleRejection::InvalidInterval));
        }

        let mut tx = db.begin().await?;

        // Lock the section row; a rival professor assignment for the same
        // section queues here until we commit
        let section = sqlx::query_scalar::<_, ClassSectionId>(
            "SELECT id FROM class_sections WHERE id = $1 FOR UPDATE",
        )
        .bind(section_id)
        .fetch_optional(&mut *tx)
        .await?;
        if section.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Class section not found"
            )));
        }

        if let Some(room_id) = dto.room_id {
            Self::check_room_bucket(&mut tx, room_id, &dto).await?;
        }

        let professor_ids = sqlx::query_scalar::<_, UserId>(
            "SELECT professor_id FROM professor_class_sections WHERE class_section_id = $1",
        )
        .bind(section_id)
        .fetch_all(&mut *tx)
        .await?;
        if !professor_ids.is_empty() {
            // Lock the professors so concurrent assignments serialize
            sqlx::query("SELECT id FROM users WHERE id = ANY($1) FOR UPDATE")
                .bind(&professor_ids)
                .execute(&mut *tx)
                .await?;

            for professor_id in &professor_ids {
                let existing = Self::professor_day_schedules(
                    &mut tx,
                    *professor_id,
                    dto.day_of_week,
                )
                .await?;
                if let Some(slot) =
                    conflict::find_conflict(dto.day_of_week, dto.start_time, dto.end_time, &existing)
                {
                    let collision = ScheduleRejection::ProfessorConflict {
                        day_of_week: slot.day_of_week,
                        start_time: slot.start_time,
                        end_time: slot.end_time,
                    };
                    return Err(rejection(collision));
                }
            }
        }

        let schedule = sqlx::query_as::<_, ClassSchedule>(&format!(
            r#"INSERT INTO class_schedules (day_of_week, start_time, end_time, class_section_id, room_id)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {SCHEDULE_COLUMNS}"#,
        ))
        .bind(dto.day_of_week)
        .bind(dto.start_time)
        .bind(dto.end_time)
        .bind(section_id)
        .bind(dto.room_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(schedule)
    }

    async fn check_room_bucket(
        tx: &mut PgConnection,
        room_id: RoomId,
        dto: &AssignScheduleDto,
    ) -> Result<(), AppError> {
        // Lock the room row; concurrent bookings for the same room queue here
        let room_exists =
            sqlx::query_scalar::<_, RoomId>("SELECT id FROM rooms WHERE id = $1 FOR UPDATE")
                .bind(room_id)
                .fetch_optional(&mut *tx)
                .await?;
        if room_exists.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!("Room not found")));
        }

        let existing = sqlx::query_as::<_, ClassSchedule>(&format!(
            r#"SELECT {SCHEDULE_COLUMNS} FROM class_schedules
               WHERE room_id = $1 AND day_of_week = $2"#,
        ))
        .bind(room_id)
        .bind(dto.day_of_week)
        .fetch_all(&mut *tx)
        .await?;

        if let Some(slot) =
            conflict::find_conflict(dto.day_of_week, dto.start_time, dto.end_time, &existing)
        {
            return Err(rejection(ScheduleRejection::RoomConflict {
                day_of_week: slot.day_of_week,
                start_time: slot.start_time,
                end_time: slot.end_time,
            }));
        }

        Ok(())
    }

    async fn professor_day_schedules(
        tx: &mut PgConnection,
        professor_id: UserId,
        day_of_week: i16,
    ) -> Result<Vec<ClassSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, ClassSchedule>(
            r#"SELECT s.id, s.day_of_week, s.start_time, s.end_time, s.class_section_id, s.room_id, s.created_at
               FROM class_schedules s
               JOIN professor_class_sections pcs ON pcs.class_section_id = s.class_section_id
               WHERE pcs.professor_id = $1 AND s.day_of_week = $2"#,
        )
        .bind(professor_id)
        .bind(day_of_week)
        .fetch_all(&mut *tx)
        .await?;

        Ok(schedules)
    }

    #[instrument(skip(db))]
    pub async fn get_section_schedules(
        db: &PgPool,
        section_id: ClassSectionId,
    ) -> Result<Vec<ClassSchedule>, AppError> {
        let schedules = sqlx::query_as::<_, ClassSchedule>(&format!(
            r#"SELECT {SCHEDULE_COLUMNS} FROM class_schedules
               WHERE class_section_id = $1
               ORDER BY day_of_week, start_time"#,
        ))
        .bind(section_id)
        .fetch_all(db)
        .await?;

        Ok(schedules)
    }

    /// Assign a professor to teach a section.
    ///
    /// The professor must be an approved, active professor, and taking the
    /// section must not put them in two places at once: every meeting slot
    /// of the section is checked against the professor's existing schedule.
    #[instrument(skip(db))]
    pub async fn assign_professor(
        db: &PgPool,
        section_id: ClassSectionId,
        dto: AssignProfessorDto,
    ) -> Result<ProfessorAssignment, AppError> {
        let mut tx = db.begin().await?;

        let assignable = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(
                SELECT 1 FROM users
                WHERE id = $1 AND role = 'PROFESSOR' AND status = 'APPROVED' AND is_active = TRUE
            )"#,
        )
        .bind(dto.professor_id)
        .fetch_one(&mut *tx)
        .await?;
        if !assignable {
            return Err(rejection(ScheduleRejection::ProfessorNotAssignable));
        }

        // Lock the section row, then the professor row. A concurrent
        // schedule assignment for this section takes the same section lock,
        // so it cannot slip a conflicting slot in while we check.
        let section = sqlx::query_scalar::<_, ClassSectionId>(
            "SELECT id FROM class_sections WHERE id = $1 FOR UPDATE",
        )
        .bind(section_id)
        .fetch_optional(&mut *tx)
        .await?;
        if section.is_none() {
            return Err(AppError::not_found(anyhow::anyhow!(
                "Class section not found"
            )));
        }

        sqlx::query("SELECT id FROM users WHERE id = $1 FOR UPDATE")
            .bind(dto.professor_id)
            .execute(&mut *tx)
            .await?;

        let section_slots = sqlx::query_as::<_, ClassSchedule>(&format!(
            "SELECT {SCHEDULE_COLUMNS} FROM class_schedules WHERE class_section_id = $1",
        ))
        .bind(section_id)
        .fetch_all(&mut *tx)
        .await?;

        for slot in &section_slots {
            let existing =
                Self::professor_day_schedules(&mut tx, dto.professor_id, slot.day_of_week).await?;
            if let Some(taken) = conflict::find_conflict(
                slot.day_of_week,
                slot.start_time,
                slot.end_time,
                &existing,
            ) {
                let collision = ScheduleRejection::ProfessorConflict {
                    day_of_week: taken.day_of_week,
                    start_time: taken.start_time,
                    end_time: taken.end_time,
                };
                return Err(rejection(collision));
            }
        }

        let assignment = sqlx::query_as::<_, ProfessorAssignment>(
            r#"INSERT INTO professor_class_sections (professor_id, class_section_id)
               VALUES ($1, $2)
               RETURNING id, professor_id, class_section_id, created_at"#,
        )
        .bind(dto.professor_id)
        .bind(section_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return rejection(ScheduleRejection::DuplicateAssignment);
            }
            AppError::from(e)
        })?;

        tx.commit().await?;
        Ok(assignment)
    }
}

fn rejection(rejection: ScheduleRejection) -> AppError {
    AppError::new(rejection.http_status(), rejection)
}
