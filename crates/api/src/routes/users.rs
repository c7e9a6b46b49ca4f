//! User route handlers.
//!
//! These routes require authentication.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use chrono::Utc;
use tracing::instrument;

use fitness_diary_core::{ProfileParamsInput, UsernameInput};

use crate::error::{AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

/// Return the caller's account, including profile parameters once set.
#[instrument(skip_all)]
pub async fn current(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<User>> {
    state
        .users()
        .get_by_id(user.id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))
}

/// Validate and store the caller's profile parameters.
///
/// Every field is checked against today's date; the response lists all
/// violations at once. Nothing is written unless every check passes.
#[instrument(skip_all)]
pub async fn update_params(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: std::result::Result<Json<ProfileParamsInput>, JsonRejection>,
) -> Result<Json<User>> {
    let Json(input) = payload?;
    let params = input.validate(Utc::now().date_naive())?;

    let updated = state.users().update_params(user.id, &params).await?;
    Ok(Json(updated))
}

/// Rename the caller. Surrounding whitespace is dropped.
#[instrument(skip_all)]
pub async fn update_name(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: std::result::Result<Json<UsernameInput>, JsonRejection>,
) -> Result<Json<User>> {
    let Json(input) = payload?;
    let name = input.validate()?;

    let updated = state.users().update_name(user.id, &name).await?;
    Ok(Json(updated))
}
