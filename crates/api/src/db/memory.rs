//! In-memory implementation of every store.
//!
//! Used by the `memory` storage backend and by tests. Behaves like the
//! `PostgreSQL` stores: same ordering, same ownership scoping, same errors.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;

use fitness_diary_core::{
    DiaryEntry, DiaryEntryId, Exercise, ExerciseId, NewDiaryEntry, NewExercise, Pagination,
    ProfileParams, UserId,
};

use super::users::checked_name;
use super::{DiaryStore, ExerciseCatalog, RepositoryError, UserStore};
use crate::models::{NewUser, User};

#[derive(Default)]
struct Tables {
    /// Kept in ascending ID order; IDs are only ever appended.
    diary: Vec<DiaryEntry>,
    exercises: BTreeMap<ExerciseId, Exercise>,
    users: BTreeMap<UserId, User>,
    tokens: HashMap<String, UserId>,
    next_diary_id: i64,
    next_exercise_id: i64,
    next_user_id: i64,
}

impl Tables {
    fn next_id(counter: &mut i64) -> i64 {
        *counter += 1;
        *counter
    }
}

/// A single lock-protected set of tables serving all three store traits.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with `exercises` already in the catalog, IDs assigned
    /// in order starting from 1.
    #[must_use]
    pub fn with_exercises(exercises: impl IntoIterator<Item = NewExercise>) -> Self {
        let mut tables = Tables::default();
        for exercise in exercises {
            let id = ExerciseId::new(Tables::next_id(&mut tables.next_exercise_id));
            tables.exercises.insert(id, exercise.into_exercise(id));
        }
        Self {
            tables: RwLock::new(tables),
        }
    }
}

#[async_trait]
impl DiaryStore for MemoryStore {
    async fn list(
        &self,
        owner: UserId,
        date: NaiveDate,
        page: Pagination,
    ) -> Result<Vec<DiaryEntry>, RepositoryError> {
        let tables = self.tables.read().await;
        let skip = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(page.limit()).unwrap_or(usize::MAX);

        Ok(tables
            .diary
            .iter()
            .filter(|e| e.owner == owner && e.date == date)
            .skip(skip)
            .take(take)
            .cloned()
            .collect())
    }

    async fn add(
        &self,
        owner: UserId,
        entry: NewDiaryEntry,
    ) -> Result<DiaryEntry, RepositoryError> {
        let mut tables = self.tables.write().await;
        if !tables.exercises.contains_key(&entry.exercise_id) {
            return Err(RepositoryError::NotFound);
        }
        if !tables.users.contains_key(&owner) {
            return Err(RepositoryError::NotFound);
        }

        let id = DiaryEntryId::new(Tables::next_id(&mut tables.next_diary_id));
        let entry = entry.into_entry(id, owner);
        tables.diary.push(entry.clone());

        tracing::debug!(entry_id = %id, %owner, "diary entry added");
        Ok(entry)
    }

    async fn delete_by_key(
        &self,
        owner: UserId,
        date: NaiveDate,
        exercise_id: ExerciseId,
    ) -> Result<(), RepositoryError> {
        let mut tables = self.tables.write().await;
        let position = tables
            .diary
            .iter()
            .position(|e| e.owner == owner && e.date == date && e.exercise_id == exercise_id)
            .ok_or(RepositoryError::NotFound)?;
        tables.diary.remove(position);

        tracing::debug!(%owner, %date, %exercise_id, "diary entry deleted");
        Ok(())
    }
}

#[async_trait]
impl ExerciseCatalog for MemoryStore {
    async fn list_all(&self) -> Result<Vec<Exercise>, RepositoryError> {
        Ok(self.tables.read().await.exercises.values().cloned().collect())
    }

    async fn get_by_id(&self, id: ExerciseId) -> Result<Exercise, RepositoryError> {
        self.tables
            .read()
            .await
            .exercises
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn insert(&self, exercise: NewExercise) -> Result<Exercise, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.exercises.values().any(|e| e.name == exercise.name) {
            return Err(RepositoryError::Conflict("exercise already exists".to_owned()));
        }
        if exercise.burned_calories < 0 {
            return Err(RepositoryError::Constraint(
                "exercise_burned_calories_check".to_owned(),
            ));
        }
        if exercise.time_minutes < 1 {
            return Err(RepositoryError::Constraint(
                "exercise_time_minutes_check".to_owned(),
            ));
        }
        let id = ExerciseId::new(Tables::next_id(&mut tables.next_exercise_id));
        let exercise = exercise.into_exercise(id);
        tables.exercises.insert(id, exercise.clone());
        Ok(exercise)
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == user.email) {
            return Err(RepositoryError::Conflict("email already exists".to_owned()));
        }
        if !user.token.is_empty() && tables.tokens.contains_key(&user.token) {
            return Err(RepositoryError::Conflict("token already issued".to_owned()));
        }

        let id = UserId::new(Tables::next_id(&mut tables.next_user_id));
        let now = Utc::now();
        let created = User {
            id,
            name: user.name,
            email: user.email,
            avatar_url: String::new(),
            params: None,
            created_at: now,
            updated_at: now,
        };
        if !user.token.is_empty() {
            tables.tokens.insert(user.token, id);
        }
        tables.users.insert(id, created.clone());

        tracing::info!(user_id = %id, "user created");
        Ok(created)
    }

    async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn get_by_token(&self, token: &str) -> Result<Option<User>, RepositoryError> {
        if token.is_empty() {
            return Ok(None);
        }
        let tables = self.tables.read().await;
        Ok(tables
            .tokens
            .get(token)
            .and_then(|id| tables.users.get(id))
            .cloned())
    }

    async fn update_params(
        &self,
        id: UserId,
        params: &ProfileParams,
    ) -> Result<User, RepositoryError> {
        params.check_constraints()?;

        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        user.params = Some(params.clone());
        user.updated_at = Utc::now();

        tracing::info!(user_id = %id, "profile parameters updated");
        Ok(user.clone())
    }

    async fn update_name(&self, id: UserId, name: &str) -> Result<User, RepositoryError> {
        let name = checked_name(name)?;

        let mut tables = self.tables.write().await;
        let user = tables.users.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        name.clone_into(&mut user.name);
        user.updated_at = Utc::now();

        tracing::info!(user_id = %id, "user renamed");
        Ok(user.clone())
    }
}
