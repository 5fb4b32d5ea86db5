use sqlx::PgPool;
use tracing::instrument;

use campanile_core::{ActionReceipt, AppError};
use campanile_models::ids::TermId;
use campanile_models::status::TermStatus;
use campanile_models::transitions;

use crate::modules::terms::model::{RegisterTermsDto, Term, UpdateTermStatusDto};

const TERM_COLUMNS: &str = "id, academic_year_start, academic_year_end, enrollment_start, \
     enrollment_end, semester_period, status, created_at";

pub struct TermService;

impl TermService {
    /// Register a batch of terms. The batch is atomic: a duplicate
    /// year/semester pair or an inverted enrollment window anywhere in the
    /// payload rolls back the whole registration.
    #[instrument(skip(db, dto))]
    pub async fn register_terms(db: &PgPool, dto: RegisterTermsDto) -> Result<Vec<Term>, AppError> {
        let mut tx = db.begin().await?;
        let mut registered = Vec::with_capacity(dto.terms.len());

        for term in &dto.terms {
            if term.enrollment_start >= term.enrollment_end {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Enrollment window for {}-{} {} must start before it ends",
                    term.academic_year_start,
                    term.academic_year_start + 1,
                    term.semester_period
                )));
            }

            let row = sqlx::query_as::<_, Term>(&format!(
                r#"INSERT INTO terms
                   (academic_year_start, academic_year_end, enrollment_start, enrollment_end, semester_period)
                   VALUES ($1, $2, $3, $4, $5)
                   RETURNING {TERM_COLUMNS}"#,
            ))
            .bind(term.academic_year_start)
            .bind(term.academic_year_start + 1)
            .bind(term.enrollment_start)
            .bind(term.enrollment_end)
            .bind(term.semester_period)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(db_err) = &e
                    && db_err.is_unique_violation()
                {
                    return AppError::conflict(anyhow::anyhow!(
                        "A {} term for academic year {}-{} already exists",
                        term.semester_period,
                        term.academic_year_start,
                        term.academic_year_start + 1
                    ));
                }
                AppError::from(e)
            })?;

            registered.push(row);
        }

        tx.commit().await?;
        Ok(registered)
    }

    /// Update the lifecycle status of a term. Requesting the status the term
    /// already holds is a reported no-op; any other move is applied, including
    /// reopening a closed term.
    #[instrument(skip(db))]
    pub async fn update_term_status(
        db: &PgPool,
        term_id: TermId,
        dto: UpdateTermStatusDto,
        requested_by: &str,
    ) -> Result<ActionReceipt, AppError> {
        let current = sqlx::query_scalar::<_, TermStatus>("SELECT status FROM terms WHERE id = $1")
            .bind(term_id)
            .fetch_optional(db)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Term not found")))?;

        if transitions::plan(&current, &dto.status).is_noop() {
            return Ok(ActionReceipt::noop(
                requested_by,
                format!("Term {term_id} status is currently {current}."),
            ));
        }

        sqlx::query("UPDATE terms SET status = $1 WHERE id = $2")
            .bind(dto.status)
            .bind(term_id)
            .execute(db)
            .await?;

        Ok(ActionReceipt::applied(
            requested_by,
            format!("Term {term_id} moved from {current} to {}.", dto.status),
        ))
    }

    #[instrument(skip(db))]
    pub async fn get_term(db: &PgPool, term_id: TermId) -> Result<Term, AppError> {
        let term =
            sqlx::query_as::<_, Term>(&format!("SELECT {TERM_COLUMNS} FROM terms WHERE id = $1"))
                .bind(term_id)
                .fetch_optional(db)
                .await?
                .ok_or_else(|| AppError::not_found(anyhow::anyhow!("Term not found")))?;

        Ok(term)
    }

    /// Terms of the most recent academic year that still has non-archived
    /// terms, in semester order.
    #[instrument(skip(db))]
    pub async fn get_active_year_terms(db: &PgPool) -> Result<Vec<Term>, AppError> {
        let terms = sqlx::query_as::<_, Term>(&format!(
            r#"SELECT {TERM_COLUMNS} FROM terms
               WHERE status <> 'ARCHIVED'
                 AND academic_year_start = (
                     SELECT MAX(academic_year_start) FROM terms WHERE status <> 'ARCHIVED'
                 )
               ORDER BY semester_period"#
        ))
        .fetch_all(db)
        .await?;

        Ok(terms)
    }

    /// Terms currently accepting enrollments: `OPEN` status and an
    /// enrollment window containing the current instant.
    #[instrument(skip(db))]
    pub async fn get_open_enrollment_terms(db: &PgPool) -> Result<Vec<Term>, AppError> {
        let terms = sqlx::query_as::<_, Term>(&format!(
            r#"SELECT {TERM_COLUMNS} FROM terms
               WHERE status = 'OPEN'
                 AND NOW() BETWEEN enrollment_start AND enrollment_end
               ORDER BY academic_year_start, semester_period"#
        ))
        .fetch_all(db)
        .await?;

        Ok(terms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use campanile_models::status::SemesterPeriod;
    use chrono::{Duration, Utc};

    use crate::modules::terms::model::RegisterTermDto;

    fn term_dto(year: i16, period: SemesterPeriod) -> RegisterTermDto {
        RegisterTermDto {
            academic_year_start: year,
            enrollment_start: Utc::now(),
            enrollment_end: Utc::now() + Duration::days(30),
            semester_period: period,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_terms_bulk(pool: PgPool) {
        let dto = RegisterTermsDto {
            terms: vec![
                term_dto(2025, SemesterPeriod::First),
                term_dto(2025, SemesterPeriod::Second),
            ],
        };

        let terms = TermService::register_terms(&pool, dto).await.unwrap();

        assert_eq!(terms.len(), 2);
        assert_eq!(terms[0].academic_year_end, 2026);
        assert!(terms.iter().all(|t| t.status == TermStatus::Draft));
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_duplicate_year_semester_conflicts(pool: PgPool) {
        TermService::register_terms(
            &pool,
            RegisterTermsDto {
                terms: vec![term_dto(2025, SemesterPeriod::First)],
            },
        )
        .await
        .unwrap();

        let err = TermService::register_terms(
            &pool,
            RegisterTermsDto {
                terms: vec![term_dto(2025, SemesterPeriod::First)],
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.status, StatusCode::CONFLICT);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_register_batch_is_atomic(pool: PgPool) {
        let mut bad = term_dto(2025, SemesterPeriod::Second);
        bad.enrollment_end = bad.enrollment_start - Duration::days(1);

        let err = TermService::register_terms(
            &pool,
            RegisterTermsDto {
                terms: vec![term_dto(2025, SemesterPeriod::First), bad],
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::BAD_REQUEST);

        // The valid first entry must not have been committed
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM terms")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_status_update_noop_and_reopen(pool: PgPool) {
        let terms = TermService::register_terms(
            &pool,
            RegisterTermsDto {
                terms: vec![term_dto(2025, SemesterPeriod::First)],
            },
        )
        .await
        .unwrap();
        let term_id = terms[0].id;

        // Draft -> Open
        let receipt = TermService::update_term_status(
            &pool,
            term_id,
            UpdateTermStatusDto {
                status: TermStatus::Open,
            },
            "registrar-1",
        )
        .await
        .unwrap();
        assert!(receipt.success);

        // Open -> Open is a no-op receipt
        let receipt = TermService::update_term_status(
            &pool,
            term_id,
            UpdateTermStatusDto {
                status: TermStatus::Open,
            },
            "registrar-1",
        )
        .await
        .unwrap();
        assert!(!receipt.success);
        assert!(receipt.description.contains("currently open"));

        // Open -> Closed -> Open: reopening is allowed
        TermService::update_term_status(
            &pool,
            term_id,
            UpdateTermStatusDto {
                status: TermStatus::Closed,
            },
            "registrar-1",
        )
        .await
        .unwrap();
        let receipt = TermService::update_term_status(
            &pool,
            term_id,
            UpdateTermStatusDto {
                status: TermStatus::Open,
            },
            "registrar-1",
        )
        .await
        .unwrap();
        assert!(receipt.success);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_open_enrollment_terms(pool: PgPool) {
        let mut expired = term_dto(2024, SemesterPeriod::First);
        expired.enrollment_start = Utc::now() - Duration::days(60);
        expired.enrollment_end = Utc::now() - Duration::days(30);

        let terms = TermService::register_terms(
            &pool,
            RegisterTermsDto {
                terms: vec![
                    term_dto(2025, SemesterPeriod::First),
                    term_dto(2025, SemesterPeriod::Second),
                    expired,
                ],
            },
        )
        .await
        .unwrap();

        // Open the current-window term and the expired-window one
        for term in [&terms[0], &terms[2]] {
            TermService::update_term_status(
                &pool,
                term.id,
                UpdateTermStatusDto {
                    status: TermStatus::Open,
                },
                "registrar-1",
            )
            .await
            .unwrap();
        }

        // Only the term whose enrollment window contains now is listed
        let open = TermService::get_open_enrollment_terms(&pool).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].id, terms[0].id);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_active_year_terms_picks_latest_year(pool: PgPool) {
        TermService::register_terms(
            &pool,
            RegisterTermsDto {
                terms: vec![
                    term_dto(2024, SemesterPeriod::First),
                    term_dto(2025, SemesterPeriod::First),
                    term_dto(2025, SemesterPeriod::Second),
                ],
            },
        )
        .await
        .unwrap();

        let active = TermService::get_active_year_terms(&pool).await.unwrap();
        assert_eq!(active.len(), 2);
        assert!(active.iter().all(|t| t.academic_year_start == 2025));
    }
}
