//! Domain models for the API.
//!
//! Catalog and diary records live in `fitness_diary_core`; this module only
//! holds types that carry service-side concerns such as audit timestamps.

pub mod user;

pub use user::{CurrentUser, NewUser, User};
