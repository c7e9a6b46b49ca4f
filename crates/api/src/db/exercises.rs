//! Exercise catalog repository for `PostgreSQL`.

use async_trait::async_trait;
use sqlx::PgPool;

use fitness_diary_core::{Exercise, ExerciseId, NewExercise};

use super::{ExerciseCatalog, RepositoryError};

/// Internal row type for catalog queries.
#[derive(Debug, sqlx::FromRow)]
struct ExerciseRow {
    id: i64,
    name: String,
    body_part: String,
    target: String,
    equipment: String,
    gif_url: String,
    burned_calories: i32,
    time_minutes: i32,
}

impl From<ExerciseRow> for Exercise {
    fn from(row: ExerciseRow) -> Self {
        Self {
            id: ExerciseId::new(row.id),
            name: row.name,
            body_part: row.body_part,
            target: row.target,
            equipment: row.equipment,
            gif_url: row.gif_url,
            burned_calories: row.burned_calories,
            time_minutes: row.time_minutes,
        }
    }
}

/// `PostgreSQL` exercise catalog.
#[derive(Clone)]
pub struct PgExerciseCatalog {
    pool: PgPool,
}

impl PgExerciseCatalog {
    /// Create a new catalog over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ExerciseCatalog for PgExerciseCatalog {
    async fn list_all(&self) -> Result<Vec<Exercise>, RepositoryError> {
        let rows = sqlx::query_as::<_, ExerciseRow>(
            r"
            SELECT id, name, body_part, target, equipment, gif_url,
                   burned_calories, time_minutes
            FROM fitness.exercise
            ORDER BY id ASC
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get_by_id(&self, id: ExerciseId) -> Result<Exercise, RepositoryError> {
        sqlx::query_as::<_, ExerciseRow>(
            r"
            SELECT id, name, body_part, target, equipment, gif_url,
                   burned_calories, time_minutes
            FROM fitness.exercise
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Into::into)
        .ok_or(RepositoryError::NotFound)
    }

    async fn insert(&self, exercise: NewExercise) -> Result<Exercise, RepositoryError> {
        let row = sqlx::query_as::<_, ExerciseRow>(
            r"
            INSERT INTO fitness.exercise
                (name, body_part, target, equipment, gif_url, burned_calories, time_minutes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, body_part, target, equipment, gif_url,
                      burned_calories, time_minutes
            ",
        )
        .bind(&exercise.name)
        .bind(&exercise.body_part)
        .bind(&exercise.target)
        .bind(&exercise.equipment)
        .bind(&exercise.gif_url)
        .bind(exercise.burned_calories)
        .bind(exercise.time_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "exercise already exists"))?;

        tracing::info!(exercise_id = row.id, name = %row.name, "exercise added to catalog");
        Ok(row.into())
    }
}
