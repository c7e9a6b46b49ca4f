//! Exercise catalog route handlers.
//!
//! The catalog is shared by all users and readable without authentication.

use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};

use tracing::instrument;

use fitness_diary_core::{Exercise, ExerciseId};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// List every exercise in the catalog.
#[instrument(skip_all)]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Exercise>>> {
    Ok(Json(state.exercises().list_all().await?))
}

/// Show one exercise.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Exercise>> {
    let Path(id) = id?;
    let id = ExerciseId::new(id);

    match state.exercises().get_by_id(id).await {
        Ok(exercise) => Ok(Json(exercise)),
        Err(RepositoryError::NotFound) => {
            Err(AppError::NotFound(format!("Exercise {id} not found")))
        }
        Err(err) => Err(err.into()),
    }
}
