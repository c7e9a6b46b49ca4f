//! Exercise catalog import.
//!
//! # Usage
//!
//! ```bash
//! fd-cli exercises import exercises.json
//! ```
//!
//! The file holds a JSON array of exercises:
//!
//! ```json
//! [
//!   {
//!     "name": "3/4 sit-up",
//!     "bodyPart": "waist",
//!     "target": "abs",
//!     "equipment": "body weight",
//!     "gifUrl": "https://example.com/0001.gif",
//!     "burnedCalories": 220,
//!     "timeMinutes": 3
//!   }
//! ]
//! ```
//!
//! Exercises whose name is already in the catalog are skipped.

use std::path::Path;

use fitness_diary_api::db::{ExerciseCatalog, PgExerciseCatalog, RepositoryError};
use fitness_diary_core::NewExercise;

use super::{CommandError, connect};

/// Parse the import file contents.
fn parse(path: &Path, contents: &str) -> Result<Vec<NewExercise>, CommandError> {
    serde_json::from_str(contents).map_err(|source| CommandError::Json {
        path: path.display().to_string(),
        source,
    })
}

/// Import every exercise in `path` into the catalog.
pub async fn import(path: &Path) -> Result<(), CommandError> {
    let contents = std::fs::read_to_string(path).map_err(|source| CommandError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let exercises = parse(path, &contents)?;
    tracing::info!(count = exercises.len(), "Importing exercises");

    let catalog = PgExerciseCatalog::new(connect().await?);

    let mut imported = 0_usize;
    let mut skipped = 0_usize;
    for exercise in exercises {
        let name = exercise.name.clone();
        match catalog.insert(exercise).await {
            Ok(created) => {
                imported += 1;
                tracing::debug!(exercise_id = %created.id, %name, "Imported");
            }
            Err(RepositoryError::Conflict(_)) => {
                skipped += 1;
                tracing::warn!(%name, "Already in catalog, skipped");
            }
            Err(err) => return Err(err.into()),
        }
    }

    tracing::info!(imported, skipped, "Exercise import complete");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_import_file() {
        let contents = r#"[
            {
                "name": "air bike",
                "bodyPart": "waist",
                "target": "abs",
                "equipment": "body weight",
                "burnedCalories": 312,
                "timeMinutes": 3
            }
        ]"#;

        let exercises = parse(Path::new("exercises.json"), contents).unwrap();
        assert_eq!(exercises.len(), 1);
        assert_eq!(exercises[0].name, "air bike");
        assert_eq!(exercises[0].burned_calories, 312);
    }

    #[test]
    fn test_parse_rejects_non_array() {
        let err = parse(Path::new("bad.json"), r#"{"name": "air bike"}"#).unwrap_err();
        assert!(matches!(err, CommandError::Json { .. }));
        assert!(err.to_string().contains("bad.json"));
    }
}
