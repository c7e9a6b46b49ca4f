//! Diary route handlers.
//!
//! These routes require authentication. The owner of every entry read,
//! written or deleted here is the authenticated caller.

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use fitness_diary_core::{DiaryEntry, ExerciseId, NewDiaryEntry, Pagination};

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::state::AppState;

/// Query parameters for listing a day's entries.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

/// Confirmation body for a deletion.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// List the caller's entries for one date, a page at a time.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    date: std::result::Result<Path<NaiveDate>, PathRejection>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<Json<Vec<DiaryEntry>>> {
    let Path(date) = date?;
    let Query(query) = query?;
    let page = Pagination::new(query.page, query.limit)?;

    let entries = state.diary().list(user.id, date, page).await?;
    Ok(Json(entries))
}

/// Log an exercise for the caller.
///
/// Any `owner` in the body is ignored. The referenced exercise must exist.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: std::result::Result<Json<NewDiaryEntry>, JsonRejection>,
) -> Result<(StatusCode, Json<DiaryEntry>)> {
    let Json(entry) = payload?;
    entry.validate()?;

    let exercise_id = entry.exercise_id;
    match state.exercises().get_by_id(exercise_id).await {
        Ok(_) => {}
        Err(RepositoryError::NotFound) => {
            return Err(AppError::NotFound(format!(
                "Exercise {exercise_id} not found"
            )));
        }
        Err(err) => return Err(err.into()),
    }

    let created = state.diary().add(user.id, entry).await?;
    tracing::info!(entry_id = %created.id, user_id = %user.id, "diary entry logged");
    Ok((StatusCode::CREATED, Json(created)))
}

/// Remove one of the caller's entries for (date, exercise).
#[instrument(skip_all)]
pub async fn destroy(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    key: std::result::Result<Path<(NaiveDate, i64)>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let Path((date, exercise_id)) = key?;
    let exercise_id = ExerciseId::new(exercise_id);

    state
        .diary()
        .delete_by_key(user.id, date, exercise_id)
        .await
        .map_err(|err| match err {
            RepositoryError::NotFound => AppError::NotFound("Not found".to_string()),
            other => other.into(),
        })?;

    Ok(Json(MessageResponse {
        message: "Delete success",
    }))
}
