//! Configuration for the hscript driver.
//!
//! The compiler itself takes no ambient configuration: every setting it needs
//! travels in [`crate::hscript::CompileOptions`]. The command-line driver
//! reads an optional user file to pick its defaults and then passes the
//! resulting [`GenConfig`] explicitly to each command.
//!
//! # Configuration file
//!
//! **Location:**
//! - Unix/macOS: `~/.hscript/config.toml`
//! - Windows: `%LOCALAPPDATA%\hscript\config.toml`
//! - Override: `hscript --config <path>`
//!
//! ```toml
//! document_name = "hscript.yml"
//! script_name = "wscript"
//! format = "wscript"          # or "hscript"
//! backup_suffix = ".hscript-orig"
//! ```
//!
//! A missing file is not an error; every key has a default.

mod global;

pub use global::GenConfig;
