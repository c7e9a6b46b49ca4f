//! User domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use fitness_diary_core::{Email, ProfileParams, UserId};

/// A diary user (domain type).
///
/// The session token and password hash are never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// User's email address.
    pub email: Email,
    /// Avatar image URL (empty when unset).
    pub avatar_url: String,
    /// Profile parameters; `None` until the first validated profile write.
    pub params: Option<ProfileParams>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// Data needed to create a user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: Email,
    /// Opaque session token the user will authenticate with.
    pub token: String,
}

/// The authenticated caller, resolved from the request's bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    /// Owner identifier used to scope every diary and profile operation.
    pub id: UserId,
    /// User's email address.
    pub email: Email,
}

impl From<&User> for CurrentUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            email: user.email.clone(),
        }
    }
}
