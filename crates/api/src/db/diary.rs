//! Diary entry repository for `PostgreSQL`.
//!
//! Every query carries the owner in its `WHERE` clause; there is no separate
//! authorization step.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;

use fitness_diary_core::{
    DiaryEntry, DiaryEntryId, ExerciseId, NewDiaryEntry, Pagination, UserId,
};

use super::{DiaryStore, RepositoryError};

// =============================================================================
// Internal Row Types
// =============================================================================

/// Internal row type for diary entry queries. Audit columns are not selected.
#[derive(Debug, sqlx::FromRow)]
struct DiaryEntryRow {
    id: i64,
    owner: i64,
    date: NaiveDate,
    exercise_id: i64,
    duration_secs: i32,
    calories: i32,
    sets: Option<i32>,
    reps: Option<i32>,
}

impl From<DiaryEntryRow> for DiaryEntry {
    fn from(row: DiaryEntryRow) -> Self {
        Self {
            id: DiaryEntryId::new(row.id),
            owner: UserId::new(row.owner),
            date: row.date,
            exercise_id: ExerciseId::new(row.exercise_id),
            duration_secs: row.duration_secs,
            calories: row.calories,
            sets: row.sets,
            reps: row.reps,
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

/// `PostgreSQL` diary store.
#[derive(Clone)]
pub struct PgDiaryStore {
    pool: PgPool,
}

impl PgDiaryStore {
    /// Create a new diary store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DiaryStore for PgDiaryStore {
    async fn list(
        &self,
        owner: UserId,
        date: NaiveDate,
        page: Pagination,
    ) -> Result<Vec<DiaryEntry>, RepositoryError> {
        let offset = i64::try_from(page.offset()).unwrap_or(i64::MAX);

        let rows = sqlx::query_as::<_, DiaryEntryRow>(
            r"
            SELECT id, owner, date, exercise_id, duration_secs, calories, sets, reps
            FROM fitness.diary_entry
            WHERE owner = $1 AND date = $2
            ORDER BY id ASC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(owner)
        .bind(date)
        .bind(i64::from(page.limit()))
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn add(
        &self,
        owner: UserId,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry, RepositoryError> {
        let row = sqlx::query_as::<_, DiaryEntryRow>(
            r"
            INSERT INTO fitness.diary_entry
                (owner, date, exercise_id, duration_secs, calories, sets, reps)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, owner, date, exercise_id, duration_secs, calories, sets, reps
            ",
        )
        .bind(owner)
        .bind(entry.date)
        .bind(entry.exercise_id)
        .bind(entry.duration_secs)
        .bind(entry.calories)
        .bind(entry.sets)
        .bind(entry.reps)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "diary entry already exists"))?;

        tracing::debug!(entry_id = row.id, %owner, "diary entry added");
        Ok(row.into())
    }

    async fn delete_by_key(
        &self,
        owner: UserId,
        date: NaiveDate,
        exercise_id: ExerciseId,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            r"
            DELETE FROM fitness.diary_entry
            WHERE id = (
                SELECT id FROM fitness.diary_entry
                WHERE owner = $1 AND date = $2 AND exercise_id = $3
                ORDER BY id ASC
                LIMIT 1
            )
            ",
        )
        .bind(owner)
        .bind(date)
        .bind(exercise_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tracing::debug!(%owner, %date, %exercise_id, "diary entry deleted");
        Ok(())
    }
}
