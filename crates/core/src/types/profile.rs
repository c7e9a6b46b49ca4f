//! Profile parameters and their validation.
//!
//! There are two layers of checks:
//!
//! - [`ProfileParamsInput::validate`] runs at the request boundary. It reports
//!   missing fields, out-of-range numbers, unknown enum values, future birth
//!   dates and the minimum-age gate, all in one pass.
//! - [`ProfileParams::check_constraints`] is run again by every store before a
//!   write. It repeats the range checks only; enum membership is already
//!   guaranteed by the types, and the age gate belongs to the write-time
//!   boundary.

use core::fmt;
use core::str::FromStr;

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::age::{MINIMUM_AGE, is_eligible};
use crate::validation::{RawValue, ValidationErrors, ViolationKind};

/// Minimum accepted height in centimetres.
pub const MIN_HEIGHT_CM: i64 = 150;

/// Minimum accepted body weight (current or desired) in kilograms.
pub const MIN_WEIGHT_KG: i64 = 35;

/// A value outside an enum's accepted set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{value} is not one of [{allowed}]")]
pub struct UnknownVariant {
    /// Offending input, rendered as text.
    pub value: String,
    /// Accepted values.
    pub allowed: &'static str,
}

/// Blood group, numbered 1-4 on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum BloodType {
    /// Group I (O).
    O = 1,
    /// Group II (A).
    A = 2,
    /// Group III (B).
    B = 3,
    /// Group IV (AB).
    Ab = 4,
}

impl BloodType {
    /// Accepted wire values.
    pub const ALLOWED: &'static str = "1, 2, 3, 4";
}

impl TryFrom<i64> for BloodType {
    type Error = UnknownVariant;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::O),
            2 => Ok(Self::A),
            3 => Ok(Self::B),
            4 => Ok(Self::Ab),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl From<BloodType> for i64 {
    fn from(blood: BloodType) -> Self {
        blood as Self
    }
}

/// Biological sex, `"male"` or `"female"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Accepted wire values.
    pub const ALLOWED: &'static str = "male, female";

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            other => Err(UnknownVariant {
                value: other.to_owned(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

/// Daily activity level, an ordinal from 1 (sedentary) to 5 (very active).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum ActivityLevel {
    Sedentary = 1,
    Light = 2,
    Moderate = 3,
    Active = 4,
    VeryActive = 5,
}

impl ActivityLevel {
    /// Accepted wire values.
    pub const ALLOWED: &'static str = "1, 2, 3, 4, 5";
}

impl TryFrom<i64> for ActivityLevel {
    type Error = UnknownVariant;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Sedentary),
            2 => Ok(Self::Light),
            3 => Ok(Self::Moderate),
            4 => Ok(Self::Active),
            5 => Ok(Self::VeryActive),
            other => Err(UnknownVariant {
                value: other.to_string(),
                allowed: Self::ALLOWED,
            }),
        }
    }
}

impl From<ActivityLevel> for i64 {
    fn from(level: ActivityLevel) -> Self {
        level as Self
    }
}

/// Validated profile parameters, ready to be stored on a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileParams {
    /// Height in centimetres.
    pub height: f64,
    /// Current weight in kilograms.
    pub current_weight: f64,
    /// Target weight in kilograms.
    pub desired_weight: f64,
    /// Date of birth.
    pub birthday: NaiveDate,
    pub blood: BloodType,
    pub sex: Sex,
    pub level_activity: ActivityLevel,
}

impl ProfileParams {
    /// Re-check the numeric ranges before persisting.
    ///
    /// # Errors
    ///
    /// Returns every range violation found.
    pub fn check_constraints(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check_min("height", self.height, MIN_HEIGHT_CM);
        errors.check_min("currentWeight", self.current_weight, MIN_WEIGHT_KG);
        errors.check_min("desiredWeight", self.desired_weight, MIN_WEIGHT_KG);
        errors.into_result(())
    }
}

/// Unvalidated profile parameters as submitted by a client.
///
/// Every field is an optional [`RawValue`] so that an absent or wrongly typed
/// field is reported as its own violation while the other fields are still
/// checked.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileParamsInput {
    pub height: Option<RawValue>,
    pub current_weight: Option<RawValue>,
    pub desired_weight: Option<RawValue>,
    pub birthday: Option<RawValue>,
    pub blood: Option<RawValue>,
    pub sex: Option<RawValue>,
    pub level_activity: Option<RawValue>,
}

impl ProfileParamsInput {
    /// Validate every field against `today` and build the storable record.
    ///
    /// All fields are checked; the error lists every violation, not just the
    /// first one.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationErrors`] describing each missing, mistyped,
    /// out-of-range, unknown, future-dated or under-age field.
    pub fn validate(&self, today: NaiveDate) -> Result<ProfileParams, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let height = required_min(&mut errors, "height", self.height.as_ref(), MIN_HEIGHT_CM);
        let current_weight = required_min(
            &mut errors,
            "currentWeight",
            self.current_weight.as_ref(),
            MIN_WEIGHT_KG,
        );
        let desired_weight = required_min(
            &mut errors,
            "desiredWeight",
            self.desired_weight.as_ref(),
            MIN_WEIGHT_KG,
        );
        let birthday = check_birthday(&mut errors, self.birthday.as_ref(), today);
        let blood = required_enum(
            &mut errors,
            "blood",
            self.blood.as_ref(),
            BloodType::ALLOWED,
            |raw| BloodType::try_from(raw.as_integer()?).ok(),
        );
        let sex = required_enum(&mut errors, "sex", self.sex.as_ref(), Sex::ALLOWED, |raw| {
            raw.as_text()?.parse::<Sex>().ok()
        });
        let level_activity = required_enum(
            &mut errors,
            "levelActivity",
            self.level_activity.as_ref(),
            ActivityLevel::ALLOWED,
            |raw| ActivityLevel::try_from(raw.as_integer()?).ok(),
        );

        match (
            height,
            current_weight,
            desired_weight,
            birthday,
            blood,
            sex,
            level_activity,
        ) {
            (
                Some(height),
                Some(current_weight),
                Some(desired_weight),
                Some(birthday),
                Some(blood),
                Some(sex),
                Some(level_activity),
            ) if errors.is_empty() => Ok(ProfileParams {
                height,
                current_weight,
                desired_weight,
                birthday,
                blood,
                sex,
                level_activity,
            }),
            _ => Err(errors),
        }
    }
}

fn required_min(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&RawValue>,
    min: i64,
) -> Option<f64> {
    let Some(raw) = value else {
        errors.push(field, ViolationKind::MissingField);
        return None;
    };
    let Some(value) = raw.as_number() else {
        errors.push(field, ViolationKind::TypeViolation { expected: "number" });
        return None;
    };
    let before = errors.len();
    errors.check_min(field, value, min);
    (errors.len() == before).then_some(value)
}

fn required_enum<T>(
    errors: &mut ValidationErrors,
    field: &'static str,
    value: Option<&RawValue>,
    allowed: &'static str,
    parse: impl FnOnce(&RawValue) -> Option<T>,
) -> Option<T> {
    let Some(raw) = value else {
        errors.push(field, ViolationKind::MissingField);
        return None;
    };
    let parsed = parse(raw);
    if parsed.is_none() {
        errors.push(field, ViolationKind::EnumViolation { allowed });
    }
    parsed
}

/// `YYYY-MM-DD`, or a full RFC 3339 timestamp whose date part is used.
fn parse_date(raw: &RawValue) -> Option<NaiveDate> {
    let text = raw.as_text()?.trim();
    text.parse::<NaiveDate>().ok().or_else(|| {
        DateTime::parse_from_rfc3339(text)
            .ok()
            .map(|ts| ts.date_naive())
    })
}

fn check_birthday(
    errors: &mut ValidationErrors,
    birthday: Option<&RawValue>,
    today: NaiveDate,
) -> Option<NaiveDate> {
    let Some(raw) = birthday else {
        errors.push("birthday", ViolationKind::MissingField);
        return None;
    };
    let Some(birthday) = parse_date(raw) else {
        errors.push("birthday", ViolationKind::TypeViolation { expected: "date" });
        return None;
    };
    if birthday > today {
        errors.push("birthday", ViolationKind::FutureDateViolation);
        return None;
    }
    if !is_eligible(birthday, today) {
        errors.push(
            "birthday",
            ViolationKind::MinimumAgeViolation {
                min_age: MINIMUM_AGE,
            },
        );
        return None;
    }
    Some(birthday)
}
