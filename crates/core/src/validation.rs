//! Field-level validation errors.
//!
//! Validators collect every violation they find instead of stopping at the
//! first one, so a client can fix all of its input in a single round trip.

use core::fmt;

use serde::Deserialize;

/// The kind of constraint a field violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationKind {
    /// A required field was absent.
    MissingField,
    /// A numeric field was below its minimum.
    RangeViolation {
        /// Smallest accepted value (inclusive).
        min: i64,
    },
    /// A field was not one of its allowed values.
    EnumViolation {
        /// Human-readable list of accepted values.
        allowed: &'static str,
    },
    /// A date field was later than today.
    FutureDateViolation,
    /// A birth date gave an age below the minimum.
    MinimumAgeViolation {
        /// Minimum age in whole years.
        min_age: i32,
    },
    /// A field was present but could not be read as the expected type.
    TypeViolation {
        /// What the field should have been, e.g. `"number"`.
        expected: &'static str,
    },
}

impl ViolationKind {
    /// Stable machine-readable code for this kind.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::RangeViolation { .. } => "range_violation",
            Self::EnumViolation { .. } => "enum_violation",
            Self::FutureDateViolation => "future_date_violation",
            Self::MinimumAgeViolation { .. } => "minimum_age_violation",
            Self::TypeViolation { .. } => "type_violation",
        }
    }
}

/// A single violated constraint on a named field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldViolation {
    /// Field name as it appears on the wire.
    pub field: &'static str,
    /// What was wrong with it.
    pub kind: ViolationKind,
}

impl FieldViolation {
    /// Create a new violation.
    #[must_use]
    pub const fn new(field: &'static str, kind: ViolationKind) -> Self {
        Self { field, kind }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let field = self.field;
        match self.kind {
            ViolationKind::MissingField => write!(f, "missing field '{field}'"),
            ViolationKind::RangeViolation { min } => {
                write!(f, "'{field}' must be greater than or equal to {min}")
            }
            ViolationKind::EnumViolation { allowed } => {
                write!(f, "'{field}' must be one of [{allowed}]")
            }
            ViolationKind::FutureDateViolation => write!(f, "'{field}' must not be in the future"),
            ViolationKind::MinimumAgeViolation { min_age } => {
                write!(f, "user must be {min_age} years or older")
            }
            ViolationKind::TypeViolation { expected } => {
                write!(f, "'{field}' must be a {expected}")
            }
        }
    }
}

/// A submitted field before its type has been checked.
///
/// Request bodies deserialize into these so that a value of the wrong JSON
/// type becomes a violation on that one field instead of failing the whole
/// body. Numeric strings such as `"2"` are read as numbers.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    /// Booleans, arrays and objects. Only their presence is kept.
    Other(serde::de::IgnoredAny),
}

impl RawValue {
    /// The value as a finite number, parsing trimmed strings.
    #[must_use]
    pub fn as_number(&self) -> Option<f64> {
        let number = match self {
            Self::Number(n) => *n,
            Self::Text(s) => s.trim().parse().ok()?,
            Self::Other(_) => return None,
        };
        number.is_finite().then_some(number)
    }

    /// The value as a whole number; `2`, `2.0` and `"2"` all give `2`.
    #[must_use]
    pub fn as_integer(&self) -> Option<i64> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        let number = self.as_number()?;
        if number.fract() != 0.0 || number.abs() > MAX_EXACT {
            return None;
        }
        #[allow(clippy::cast_possible_truncation)]
        let whole = number as i64;
        Some(whole)
    }

    /// The value if it was sent as a JSON string.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) | Self::Other(_) => None,
        }
    }
}

impl From<f64> for RawValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<i32> for RawValue {
    fn from(n: i32) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<&str> for RawValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

/// A non-empty set of field violations.
#[derive(Debug, Clone, Default, PartialEq, Eq, thiserror::Error)]
#[error("validation failed: {}", join(.0))]
pub struct ValidationErrors(Vec<FieldViolation>);

fn join(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    /// Create an empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self(Vec::new())
    }

    /// Record a violation.
    pub fn push(&mut self, field: &'static str, kind: ViolationKind) {
        self.0.push(FieldViolation::new(field, kind));
    }

    /// Record a violation when `value` is below `min`.
    ///
    /// `NaN` never satisfies the minimum.
    pub fn check_min(&mut self, field: &'static str, value: f64, min: i64) {
        #[allow(clippy::cast_precision_loss)] // minimums are small constants
        let satisfied = value >= min as f64;
        if !satisfied {
            self.push(field, ViolationKind::RangeViolation { min });
        }
    }

    /// Whether no violations were recorded.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of recorded violations.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the recorded violations in the order they were found.
    pub fn iter(&self) -> impl Iterator<Item = &FieldViolation> {
        self.0.iter()
    }

    /// Whether `field` has a violation of the given kind code.
    #[must_use]
    pub fn has(&self, field: &str, code: &str) -> bool {
        self.0
            .iter()
            .any(|v| v.field == field && v.kind.code() == code)
    }

    /// `Ok(value)` if nothing was recorded, otherwise `Err(self)`.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one violation was recorded.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl From<FieldViolation> for ValidationErrors {
    fn from(violation: FieldViolation) -> Self {
        Self(vec![violation])
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a FieldViolation;
    type IntoIter = core::slice::Iter<'a, FieldViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
