//! Exercise catalog records.

use serde::{Deserialize, Serialize};

use crate::types::id::ExerciseId;

/// A catalog exercise. Shared reference data with no owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: ExerciseId,
    pub name: String,
    /// Body region worked (e.g., "waist", "upper legs").
    pub body_part: String,
    /// Primary target muscle.
    pub target: String,
    pub equipment: String,
    /// Illustration of the movement.
    pub gif_url: String,
    /// Calories burned over `time_minutes` of the exercise.
    pub burned_calories: i32,
    /// Reference duration for `burned_calories`, in minutes.
    pub time_minutes: i32,
}

/// An exercise to be added to the catalog (import format).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    pub name: String,
    pub body_part: String,
    pub target: String,
    pub equipment: String,
    #[serde(default)]
    pub gif_url: String,
    pub burned_calories: i32,
    pub time_minutes: i32,
}

impl NewExercise {
    /// Attach an identifier, producing the catalog record.
    #[must_use]
    pub fn into_exercise(self, id: ExerciseId) -> Exercise {
        Exercise {
            id,
            name: self.name,
            body_part: self.body_part,
            target: self.target,
            equipment: self.equipment,
            gif_url: self.gif_url,
            burned_calories: self.burned_calories,
            time_minutes: self.time_minutes,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_import_format_defaults_gif_url() {
        let new: NewExercise = serde_json::from_str(
            r#"{"name":"air bike","bodyPart":"waist","target":"abs",
                "equipment":"body weight","burnedCalories":312,"timeMinutes":3}"#,
        )
        .unwrap();
        assert!(new.gif_url.is_empty());

        let exercise = new.into_exercise(ExerciseId::new(4));
        assert_eq!(exercise.id, ExerciseId::new(4));
        assert_eq!(exercise.body_part, "waist");
    }
}
