//! Fitness Diary Core - domain types and rules.
//!
//! This crate holds the parts of the fitness diary that do not touch I/O. It
//! is shared by the `api` service and the `cli` tools.
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no database access,
//! no HTTP, no clock reads. Callers pass "today" in explicitly so every rule is
//! reproducible in tests.
//!
//! # Modules
//!
//! - [`age`] - Calendar age arithmetic and the minimum-age gate
//! - [`validation`] - Field-level violation reporting
//! - [`types`] - IDs, emails, profile parameters, diary entries, exercises

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod age;
pub mod types;
pub mod validation;

pub use age::{MINIMUM_AGE, compute_age, is_eligible};
pub use types::*;
pub use validation::{FieldViolation, RawValue, ValidationErrors, ViolationKind};
