//! Filesystem helpers for the command-line driver.
//!
//! - [`fs::atomic`] - all-or-nothing file writes
//! - [`fs::discovery`] - locating hscript documents in package directories
//! - [`fs::backup`] - moving hand-written scripts aside and restoring them

pub mod fs;

pub use fs::atomic_write;
