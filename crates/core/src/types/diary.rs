//! Diary entry records and listing pagination.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::types::id::{DiaryEntryId, ExerciseId, UserId};
use crate::validation::{ValidationErrors, ViolationKind};

/// A dated log record of an exercise a user performed.
///
/// This is the projection returned to callers; audit timestamps stay in the
/// store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: DiaryEntryId,
    /// Account the entry belongs to.
    pub owner: UserId,
    pub date: NaiveDate,
    pub exercise_id: ExerciseId,
    /// How long the exercise was performed, in seconds.
    pub duration_secs: i32,
    /// Calories burned.
    pub calories: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sets: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reps: Option<i32>,
}

/// Fields a client supplies when logging an exercise.
///
/// Has no `owner` field. The owner always comes from the authenticated caller
/// and any `owner` key in a request body is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewDiaryEntry {
    pub date: NaiveDate,
    pub exercise_id: ExerciseId,
    pub duration_secs: i32,
    pub calories: i32,
    #[serde(default)]
    pub sets: Option<i32>,
    #[serde(default)]
    pub reps: Option<i32>,
}

impl NewDiaryEntry {
    /// Check the quantitative fields.
    ///
    /// # Errors
    ///
    /// Returns every field below its minimum.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_at_least(&mut errors, "durationSecs", Some(self.duration_secs), 1);
        check_at_least(&mut errors, "calories", Some(self.calories), 0);
        check_at_least(&mut errors, "sets", self.sets, 1);
        check_at_least(&mut errors, "reps", self.reps, 1);
        errors.into_result(())
    }

    /// Attach an owner and identifier, producing the stored record.
    #[must_use]
    pub fn into_entry(self, id: DiaryEntryId, owner: UserId) -> DiaryEntry {
        DiaryEntry {
            id,
            owner,
            date: self.date,
            exercise_id: self.exercise_id,
            duration_secs: self.duration_secs,
            calories: self.calories,
            sets: self.sets,
            reps: self.reps,
        }
    }
}

fn check_at_least(errors: &mut ValidationErrors, field: &'static str, value: Option<i32>, min: i32) {
    if value.is_some_and(|v| v < min) {
        errors.push(
            field,
            ViolationKind::RangeViolation {
                min: i64::from(min),
            },
        );
    }
}

/// Page-based window over a listing.
///
/// Pages are 1-based. The window starts at `(page - 1) * limit`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    limit: u32,
}

impl Pagination {
    /// Page used when the caller does not ask for one.
    pub const DEFAULT_PAGE: u32 = 1;
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT_LIMIT: u32 = 10;

    /// Build a window, applying defaults for absent values.
    ///
    /// # Errors
    ///
    /// Returns a range violation for `page` or `limit` below 1 (or too large
    /// to represent).
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let page = positive(&mut errors, "page", page, Self::DEFAULT_PAGE);
        let limit = positive(&mut errors, "limit", limit, Self::DEFAULT_LIMIT);
        errors.into_result(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u32 {
        self.page
    }

    /// Maximum number of items in the window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of items skipped before the window.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page as u64 - 1) * self.limit as u64
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            limit: Self::DEFAULT_LIMIT,
        }
    }
}

fn positive(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<i64>,
    default: u32,
) -> u32 {
    match value.map(u32::try_from) {
        None => default,
        Some(Ok(v)) if v >= 1 => v,
        Some(_) => {
            errors.push(field, ViolationKind::RangeViolation { min: 1 });
            default
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn new_entry() -> NewDiaryEntry {
        NewDiaryEntry {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            exercise_id: ExerciseId::new(1),
            duration_secs: 180,
            calories: 25,
            sets: None,
            reps: None,
        }
    }

    #[test]
    fn test_pagination_defaults() {
        let page = Pagination::new(None, None).unwrap();
        assert_eq!(page.page(), 1);
        assert_eq!(page.limit(), 10);
        assert_eq!(page.offset(), 0);
        assert_eq!(page, Pagination::default());
    }

    #[test]
    fn test_pagination_offset() {
        let page = Pagination::new(Some(2), Some(10)).unwrap();
        assert_eq!(page.offset(), 10);
        let page = Pagination::new(Some(4), Some(3)).unwrap();
        assert_eq!(page.offset(), 9);
    }

    #[test]
    fn test_pagination_rejects_non_positive() {
        let errors = Pagination::new(Some(0), Some(-5)).unwrap_err();
        assert!(errors.has("page", "range_violation"));
        assert!(errors.has("limit", "range_violation"));
    }

    #[test]
    fn test_pagination_offset_does_not_overflow() {
        let page = Pagination::new(Some(i64::from(u32::MAX)), Some(i64::from(u32::MAX))).unwrap();
        assert!(page.offset() > 0);
    }

    #[test]
    fn test_new_entry_ignores_owner_key() {
        let entry: NewDiaryEntry = serde_json::from_str(
            r#"{"date":"2024-01-01","exerciseId":3,"durationSecs":60,"calories":10,"owner":99}"#,
        )
        .unwrap();
        let stored = entry.into_entry(DiaryEntryId::new(1), UserId::new(5));
        assert_eq!(stored.owner, UserId::new(5));
    }

    #[test]
    fn test_new_entry_validate() {
        assert!(new_entry().validate().is_ok());

        let entry = NewDiaryEntry {
            duration_secs: 0,
            calories: -1,
            sets: Some(0),
            ..new_entry()
        };
        let errors = entry.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.has("durationSecs", "range_violation"));
        assert!(errors.has("calories", "range_violation"));
        assert!(errors.has("sets", "range_violation"));
    }

    #[test]
    fn test_entry_serializes_camel_case() {
        let entry = new_entry().into_entry(DiaryEntryId::new(8), UserId::new(2));
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["exerciseId"], 1);
        assert_eq!(json["date"], "2024-01-01");
        assert!(json.get("sets").is_none());
        assert!(json.get("createdAt").is_none());
    }
}
