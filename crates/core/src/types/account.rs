//! Account-level edits that sit outside the profile parameters.

use serde::Deserialize;

use crate::validation::{RawValue, ValidationErrors, ViolationKind};

/// A request to rename an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UsernameInput {
    pub name: Option<RawValue>,
}

impl UsernameInput {
    /// Trim the submitted name and return it.
    ///
    /// # Errors
    ///
    /// `MissingField` when the name is absent or blank after trimming, and
    /// `TypeViolation` when it is not a string.
    pub fn validate(&self) -> Result<String, ValidationErrors> {
        let kind = match self.name.as_ref().map(|raw| raw.as_text().map(str::trim)) {
            Some(Some(name)) if !name.is_empty() => return Ok(name.to_owned()),
            None | Some(Some(_)) => ViolationKind::MissingField,
            Some(None) => ViolationKind::TypeViolation { expected: "string" },
        };
        let mut errors = ValidationErrors::new();
        errors.push("name", kind);
        Err(errors)
    }
}
