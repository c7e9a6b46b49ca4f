//! Row identifiers.
//!
//! Every table is keyed by a `BIGSERIAL`. Each gets its own wrapper so a diary
//! entry id cannot be handed to a catalog lookup.

/// Declare an `i64`-backed identifier type.
///
/// The generated type serializes as a bare number and, with the `postgres`
/// feature, binds and decodes as `BIGINT`.
///
/// ```rust
/// # use fitness_diary_core::define_id;
/// define_id!(SessionId);
///
/// let id = SessionId::new(12);
/// assert_eq!(i64::from(id), 12);
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            PartialOrd,
            Ord,
            Hash,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[cfg_attr(feature = "postgres", derive(::sqlx::Type))]
        #[cfg_attr(feature = "postgres", sqlx(transparent))]
        #[serde(transparent)]
        pub struct $name(i64);

        impl $name {
            #[must_use]
            pub const fn new(raw: i64) -> Self {
                Self(raw)
            }

            #[must_use]
            pub const fn as_i64(self) -> i64 {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Display::fmt(&self.0, f)
            }
        }

        impl From<i64> for $name {
            fn from(raw: i64) -> Self {
                Self(raw)
            }
        }

        impl From<$name> for i64 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(UserId);
define_id!(ExerciseId);
define_id!(DiaryEntryId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_id_converts_to_and_from_i64() {
        let id = ExerciseId::from(42);
        assert_eq!(id.as_i64(), 42);
        assert_eq!(i64::from(id), 42);
    }

    #[test]
    fn test_id_is_a_bare_number_in_json() {
        assert_eq!(serde_json::to_string(&UserId::new(7)).unwrap(), "7");
        let parsed: DiaryEntryId = serde_json::from_str("9").unwrap();
        assert_eq!(parsed, DiaryEntryId::new(9));
    }

    #[test]
    fn test_id_display() {
        assert_eq!(UserId::new(3).to_string(), "3");
    }
}
