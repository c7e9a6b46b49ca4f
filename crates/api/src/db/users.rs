//! User repository for `PostgreSQL`.
//!
//! Profile parameters are stored as nullable columns on the user row. They are
//! either all NULL (no profile yet) or all set.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::PgPool;

use fitness_diary_core::{
    ActivityLevel, BloodType, Email, ProfileParams, Sex, UserId, ValidationErrors, ViolationKind,
};

use super::{RepositoryError, UserStore};
use crate::models::{NewUser, User};

/// Column list shared by every query that returns a [`UserRow`].
macro_rules! user_columns {
    () => {
        "id, name, email, avatar_url, \
         height, current_weight, desired_weight, birthday, blood, sex, level_activity, \
         created_at, updated_at"
    };
}

/// Internal row type for user queries.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    avatar_url: String,
    height: Option<f64>,
    current_weight: Option<f64>,
    desired_weight: Option<f64>,
    birthday: Option<NaiveDate>,
    blood: Option<i16>,
    sex: Option<String>,
    level_activity: Option<i16>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;

        let params = match (
            self.height,
            self.current_weight,
            self.desired_weight,
            self.birthday,
            self.blood,
            self.sex,
            self.level_activity,
        ) {
            (None, None, None, None, None, None, None) => None,
            (
                Some(height),
                Some(current_weight),
                Some(desired_weight),
                Some(birthday),
                Some(blood),
                Some(sex),
                Some(level_activity),
            ) => Some(ProfileParams {
                height,
                current_weight,
                desired_weight,
                birthday,
                blood: BloodType::try_from(i64::from(blood)).map_err(corrupt)?,
                sex: sex.parse::<Sex>().map_err(corrupt)?,
                level_activity: ActivityLevel::try_from(i64::from(level_activity))
                    .map_err(corrupt)?,
            }),
            _ => {
                return Err(RepositoryError::DataCorruption(format!(
                    "user {} has partially set profile parameters",
                    self.id
                )));
            }
        };

        Ok(User {
            id: UserId::new(self.id),
            name: self.name,
            email,
            avatar_url: self.avatar_url,
            params,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn corrupt(err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::DataCorruption(format!("invalid profile parameter in database: {err}"))
}

/// `PostgreSQL` user store.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    /// Create a new user store over `pool`.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let row = sqlx::query_as::<_, UserRow>(concat!(
            "INSERT INTO fitness.user (name, email, token) VALUES ($1, $2, $3) RETURNING ",
            user_columns!()
        ))
        .bind(&user.name)
        .bind(user.email.as_str())
        .bind(&user.token)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "email already exists"))?;

        tracing::info!(user_id = row.id, "user created");
        row.into_user()
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM fitness.user WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(UserRow::into_user)
        .transpose()
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        if token.is_empty() {
            return Ok(None);
        }

        sqlx::query_as::<_, UserRow>(concat!(
            "SELECT ",
            user_columns!(),
            " FROM fitness.user WHERE token = $1 AND token <> ''"
        ))
        .bind(token)
        .fetch_optional(&self.pool)
        .await?
        .map(UserRow::into_user)
        .transpose()
    }

    async fn update_params(
        &self,
        id: UserId,
        params: &ProfileParams,
    ) -> Result<User, RepositoryError> {
        params.check_constraints()?;

        let blood = i16::try_from(i64::from(params.blood)).map_err(corrupt)?;
        let level_activity = i16::try_from(i64::from(params.level_activity)).map_err(corrupt)?;

        let row = sqlx::query_as::<_, UserRow>(concat!(
            "UPDATE fitness.user \
             SET height = $2, current_weight = $3, desired_weight = $4, birthday = $5, \
                 blood = $6, sex = $7, level_activity = $8, updated_at = NOW() \
             WHERE id = $1 \
             RETURNING ",
            user_columns!()
        ))
        .bind(id)
        .bind(params.height)
        .bind(params.current_weight)
        .bind(params.desired_weight)
        .bind(params.birthday)
        .bind(blood)
        .bind(params.sex.as_str())
        .bind(level_activity)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "profile update conflict"))?
        .ok_or(RepositoryError::NotFound)?;

        tracing::info!(user_id = row.id, "profile parameters updated");
        row.into_user()
    }

    async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError> {
        let name = checked_name(name)?;

        let row = sqlx::query_as::<_, UserRow>(concat!(
            "UPDATE fitness.user SET name = $2, updated_at = NOW() WHERE id = $1 RETURNING ",
            user_columns!()
        ))
        .bind(id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::from_write(e, "name update conflict"))?
        .ok_or(RepositoryError::NotFound)?;

        tracing::info!(user_id = row.id, "user renamed");
        row.into_user()
    }
}

/// Trim `name`, rejecting it if nothing is left.
pub(super) fn checked_name(name: &str) -> Result<&str, RepositoryError> {
    let name = name.trim();
    if name.is_empty() {
        let mut errors = ValidationErrors::new();
        errors.push("name", ViolationKind::MissingField);
        return Err(errors.into());
    }
    Ok(name)
}
