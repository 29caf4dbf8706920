//! Integration test suite for hscript
//!
//! These tests drive the `hscript` binary end to end inside temporary work
//! areas.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **compile**: script generation, formats, backups and failure handling
//! - **check**: validation reports in text and JSON
//! - **clean**: removal of generated scripts and backup restoration

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod check;
mod clean;
mod compile;
