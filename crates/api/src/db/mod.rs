//! Store handles for the fitness diary.
//!
//! # Stores
//!
//! - [`DiaryStore`] - per-user diary entries, scoped by (owner, date)
//! - [`ExerciseCatalog`] - the shared exercise catalog
//! - [`UserStore`] - users and their profile parameters
//!
//! Each store is a trait with a `PostgreSQL` implementation (in [`diary`],
//! [`exercises`] and [`users`]) and an in-memory one in [`memory`]. Handlers
//! never reach a store through a global; they get it from [`Stores`] in the
//! application state.
//!
//! # Database tables (`fitness` schema)
//!
//! - `user` - accounts, session token, embedded profile parameters
//! - `exercise` - catalog
//! - `diary_entry` - diary
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p fitness-diary-cli -- migrate
//! ```

pub mod diary;
pub mod exercises;
pub mod memory;
pub mod users;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use fitness_diary_core::{
    DiaryEntry, Exercise, ExerciseId, NewDiaryEntry, NewExercise, Pagination, ProfileParams,
    UserId, ValidationErrors,
};

use crate::models::{NewUser, User};

pub use diary::PgDiaryStore;
pub use exercises::PgExerciseCatalog;
pub use memory::MemoryStore;
pub use users::PgUserStore;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found (or is not visible to the caller).
    #[error("not found")]
    NotFound,

    /// Uniqueness violation (e.g., email already registered).
    #[error("conflict: {0}")]
    Conflict(String),

    /// The record failed the store's own constraint checks.
    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    /// The database rejected the write with a CHECK constraint.
    #[error("constraint violation: {0}")]
    Constraint(String),
}

impl RepositoryError {
    /// Classify a sqlx error from a write.
    ///
    /// Unique violations become `Conflict`, foreign-key violations (a
    /// reference to a row that does not exist) become `NotFound`, and CHECK
    /// violations become `Constraint`.
    pub(crate) fn from_write(err: sqlx::Error, conflict: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                return Self::Conflict(conflict.to_owned());
            }
            if db_err.is_foreign_key_violation() {
                return Self::NotFound;
            }
            if db_err.is_check_violation() {
                return Self::Constraint(
                    db_err
                        .constraint()
                        .unwrap_or("check constraint")
                        .to_owned(),
                );
            }
        }
        Self::Database(err)
    }
}

/// Per-user exercise diary.
#[async_trait]
pub trait DiaryStore: Send + Sync {
    /// List `owner`'s entries for `date`, ordered by ID, within the page.
    ///
    /// Returns an empty list when nothing matches or the page is past the end.
    async fn list(
        &self,
        owner: UserId,
        date: NaiveDate,
        page: Pagination,
    ) -> Result<Vec<DiaryEntry>, RepositoryError>;

    /// Record a new entry owned by `owner`.
    ///
    /// The owner always comes from this argument. No uniqueness check is made,
    /// so the same (owner, date, exercise) may be logged more than once.
    async fn add(
        &self,
        owner: UserId,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry, RepositoryError>;

    /// Delete one entry matching (owner, date, exercise).
    ///
    /// When several match, the one with the lowest ID goes. Another user's
    /// entry is indistinguishable from a missing one: both are `NotFound`.
    async fn delete_by_key(
        &self,
        owner: UserId,
        date: NaiveDate,
        exercise_id: ExerciseId,
    ) -> Result<(), RepositoryError>;
}

/// Shared exercise catalog.
#[async_trait]
pub trait ExerciseCatalog: Send + Sync {
    /// Every exercise, ordered by ID.
    async fn list_all(&self) -> Result<Vec<Exercise>, RepositoryError>;

    /// Look up one exercise, `NotFound` if it does not exist.
    async fn get_by_id(&self, id: ExerciseId) -> Result<Exercise, RepositoryError>;

    /// Add an exercise to the catalog (administrative import).
    async fn insert(&self, exercise: NewExercise) -> Result<Exercise, RepositoryError>;
}

/// Users and their profile parameters.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Create a user. `Conflict` if the email is already registered.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Get a user by ID.
    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError>;

    /// Resolve a session token to its user. Empty tokens never match.
    async fn get_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError>;

    /// Replace a user's profile parameters.
    ///
    /// The range constraints are re-checked here before anything is written.
    async fn update_params(
        &self,
        id: UserId,
        params: &ProfileParams,
    ) -> Result<User, RepositoryError>;

    /// Rename a user. The name is trimmed and must not be blank.
    async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError>;
}

/// Which backend the stores talk to.
#[derive(Clone)]
enum Backend {
    Postgres(PgPool),
    Memory,
}

/// The set of store handles shared by all handlers.
#[derive(Clone)]
pub struct Stores {
    /// Diary entries.
    pub diary: Arc<dyn DiaryStore>,
    /// Exercise catalog.
    pub exercises: Arc<dyn ExerciseCatalog>,
    /// Users and profiles.
    pub users: Arc<dyn UserStore>,
    backend: Backend,
}

impl Stores {
    /// Stores backed by `PostgreSQL`.
    #[must_use]
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            diary: Arc::new(PgDiaryStore::new(pool.clone())),
            exercises: Arc::new(PgExerciseCatalog::new(pool.clone())),
            users: Arc::new(PgUserStore::new(pool.clone())),
            backend: Backend::Postgres(pool),
        }
    }

    /// Stores backed by a single in-memory [`MemoryStore`].
    #[must_use]
    pub fn memory(store: MemoryStore) -> Self {
        let store = Arc::new(store);
        Self {
            diary: store.clone(),
            exercises: store.clone(),
            users: store,
            backend: Backend::Memory,
        }
    }

    /// Check that the backend is reachable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the database does not answer.
    pub async fn ping(&self) -> Result<(), RepositoryError> {
        match &self.backend {
            Backend::Postgres(pool) => {
                sqlx::query("SELECT 1").execute(pool).await?;
                Ok(())
            }
            Backend::Memory => Ok(()),
        }
    }

    /// Name of the backend, for logs.
    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        match self.backend {
            Backend::Postgres(_) => "postgres",
            Backend::Memory => "memory",
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
