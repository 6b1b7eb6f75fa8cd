use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use crate::{
    models::{Shift, ShiftPeriod, ShiftRow, Worker},
    AppError, AppResult,
};

/// Persistence for shifts.
///
/// `exists` followed by `create` is not atomic; callers get no uniqueness
/// guarantee from the store itself.
#[async_trait]
pub trait ShiftStore: Send + Sync {
    /// Whether `worker_id` already has a shift on `date`.
    async fn exists(&self, worker_id: i32, date: NaiveDate) -> AppResult<bool>;

    /// Inserts a shift; `id` and `created_at` are assigned here.
    async fn create(
        &self,
        worker: &Worker,
        shift_period: ShiftPeriod,
        date: NaiveDate,
    ) -> AppResult<Shift>;

    async fn list_for_worker(&self, worker_id: i32) -> AppResult<Vec<Shift>>;

    async fn get(&self, id: i64) -> AppResult<Option<Shift>>;

    async fn ping(&self) -> AppResult<()>;
}

pub struct PgShiftStore {
    db: PgPool,
}

impl PgShiftStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// A foreign-key failure on insert means the worker row is gone.
fn map_insert_error(e: sqlx::Error, worker_id: i32) -> AppError {
    match &e {
        sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
            tracing::warn!(worker_id, "Shift insert for a removed worker");
            AppError::Unauthorized(format!("Worker {} no longer exists", worker_id))
        }
        _ => AppError::Database(e),
    }
}

fn into_shift(row: ShiftRow) -> AppResult<Shift> {
    let id = row.id;
    Shift::try_from(row).map_err(|e| {
        tracing::error!(shift_id = id, error = %e, "Stored shift has an invalid period");
        AppError::Internal(format!("Shift {} is corrupt: {}", id, e))
    })
}

#[async_trait]
impl ShiftStore for PgShiftStore {
    async fn exists(&self, worker_id: i32, date: NaiveDate) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"SELECT EXISTS(SELECT 1 FROM "Shifts" WHERE worker_id = $1 AND date = $2)"#,
        )
        .bind(worker_id)
        .bind(date)
        .fetch_one(&self.db)
        .await?;

        Ok(exists)
    }

    async fn create(
        &self,
        worker: &Worker,
        shift_period: ShiftPeriod,
        date: NaiveDate,
    ) -> AppResult<Shift> {
        let row = sqlx::query_as::<_, ShiftRow>(
            r#"
            WITH inserted AS (
                INSERT INTO "Shifts" (worker_id, shift_period, date)
                VALUES ($1, $2, $3)
                RETURNING id, date, created_at, shift_period, worker_id
            )
            SELECT
                i.id,
                i.date,
                i.created_at,
                i.shift_period,
                i.worker_id,
                u.username AS worker_username
            FROM inserted i
            LEFT JOIN "Users" u ON u.id = i.worker_id
            "#,
        )
        .bind(worker.id)
        .bind(shift_period.label())
        .bind(date)
        .fetch_one(&self.db)
        .await
        .map_err(|e| map_insert_error(e, worker.id))?;

        into_shift(row)
    }

    async fn list_for_worker(&self, worker_id: i32) -> AppResult<Vec<Shift>> {
        let rows = sqlx::query_as::<_, ShiftRow>(
            r#"
            SELECT
                s.id,
                s.date,
                s.created_at,
                s.shift_period,
                s.worker_id,
                u.username AS worker_username
            FROM "Shifts" s
            LEFT JOIN "Users" u ON u.id = s.worker_id
            WHERE s.worker_id = $1
            ORDER BY s.date, s.id
            "#,
        )
        .bind(worker_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(into_shift).collect()
    }

    async fn get(&self, id: i64) -> AppResult<Option<Shift>> {
        let row = sqlx::query_as::<_, ShiftRow>(
            r#"
            SELECT
                s.id,
                s.date,
                s.created_at,
                s.shift_period,
                s.worker_id,
                u.username AS worker_username
            FROM "Shifts" s
            LEFT JOIN "Users" u ON u.id = s.worker_id
            WHERE s.id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        row.map(into_shift).transpose()
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.db).await?;
        Ok(())
    }
}
