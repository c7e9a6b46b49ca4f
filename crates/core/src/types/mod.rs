//! Core types for the fitness diary.
//!
//! This module provides type-safe wrappers and records for the domain.

pub mod account;
pub mod diary;
pub mod email;
pub mod exercise;
pub mod id;
pub mod profile;

pub use account::UsernameInput;
pub use diary::{DiaryEntry, NewDiaryEntry, Pagination};
pub use email::{Email, EmailError};
pub use exercise::{Exercise, NewExercise};
pub use id::*;
pub use profile::{
    ActivityLevel, BloodType, ProfileParams, ProfileParamsInput, Sex, UnknownVariant,
};
