//! Account email addresses.

use core::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_]+@[a-zA-Z_]+?\.[a-zA-Z]{2,3}$")
        .expect("email pattern is a valid regex")
});

/// Upper bound on a stored address, matching the `users.email` column.
const MAX_EMAIL_LEN: usize = 254;

/// Why a string was refused as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("email cannot be empty")]
    Empty,
    #[error("email is {len} characters, the limit is {MAX_EMAIL_LEN}")]
    TooLong { len: usize },
    #[error("{0:?} is not of the form name@domain.tld")]
    Malformed(String),
}

/// An account email address.
///
/// Only a narrow shape is accepted: a local part of word characters, a single
/// domain label and a two or three letter top-level domain.
///
/// ```
/// use fitness_diary_core::Email;
///
/// assert!(Email::parse("athlete@example.com").is_ok());
/// assert!(Email::parse("first.last@example.com").is_err());
/// assert!(Email::parse("user@mail.example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Check `input` and wrap it.
    ///
    /// # Errors
    ///
    /// Returns [`EmailError`] when the address is empty, too long or does not
    /// have the accepted shape.
    pub fn parse(input: &str) -> Result<Self, EmailError> {
        match input.len() {
            0 => Err(EmailError::Empty),
            len if len > MAX_EMAIL_LEN => Err(EmailError::TooLong { len }),
            _ if EMAIL_PATTERN.is_match(input) => Ok(Self(input.to_owned())),
            _ => Err(EmailError::Malformed(input.to_owned())),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_simple_addresses() {
        for input in ["user@example.com", "user_01@example.io", "a@b.cc"] {
            assert_eq!(Email::parse(input).unwrap().as_str(), input);
        }
    }

    #[test]
    fn test_empty_and_oversized() {
        assert_eq!(Email::parse(""), Err(EmailError::Empty));

        let long = format!("{}@example.com", "a".repeat(250));
        assert_eq!(
            Email::parse(&long),
            Err(EmailError::TooLong { len: long.len() })
        );
    }

    #[test]
    fn test_rejects_other_shapes() {
        for input in [
            "no-at-symbol",
            "é@example.com",
            "usér@example.com",
            "@domain.com",
            "user@",
            "user@domain",
            "user@domain.info",
            "user.name@example.com",
            "user@sub.example.com",
            "user@exa-mple.com",
        ] {
            assert!(
                matches!(Email::parse(input), Err(EmailError::Malformed(_))),
                "{input} should be rejected"
            );
        }
    }

    #[test]
    fn test_json_is_a_plain_string() {
        let email: Email = serde_json::from_str("\"user@example.com\"").unwrap();
        assert_eq!(email.to_string(), "user@example.com");
        assert_eq!(serde_json::to_string(&email).unwrap(), "\"user@example.com\"");
        assert!(serde_json::from_str::<Email>("\"not an email\"").is_err());
    }
}
