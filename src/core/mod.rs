//! Core types shared by the compiler and the command-line driver
//!
//! At the moment this is the error system:
//! - [`HscriptError`] - enumerated error kinds (parse, schema, type, consistency, driver)
//! - [`ErrorContext`] - user-facing wrapper with details and suggestions
//! - [`user_friendly_error`] - convert any [`anyhow::Error`] for CLI display

pub mod error;

pub use error::{ErrorContext, HscriptError, user_friendly_error};

/// Result alias used throughout the compiler pipeline.
pub type Result<T, E = HscriptError> = std::result::Result<T, E>;
