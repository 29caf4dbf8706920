//! hscript - a compiler for declarative package build descriptions.
//!
//! Each package of a work area describes its build in an `hscript.yml`
//! document: metadata, dependencies on other packages, toolchain modules,
//! configure-time environment and tags, and build targets. This crate
//! compiles such documents into the python `wscript` consumed by the
//! downstream build engine, or re-emits them in normalized form.
//!
//! # Modules
//!
//! - [`hscript`] - the compiler: loader, schema mapper, model and renderers
//! - [`core`] - error types and user-facing error reporting
//! - [`config`] - driver configuration (`~/.hscript/config.toml`)
//! - [`cli`] - the `hscript` command-line driver
//! - [`utils`] - atomic writes, document discovery, script backups
//!
//! # Example
//!
//! ```rust
//! use hscript_cli::hscript::{CompileOptions, OutputFormat, compile_str};
//!
//! let document = r#"
//! package:
//!   name: hello
//!   deps: {public: [ROOT]}
//! build:
//!   hello:
//!     features: cxx cxxprogram
//!     source: src/hello.cxx
//! "#;
//!
//! let options = CompileOptions { format: OutputFormat::Wscript };
//! let script = compile_str(document, "hello/hscript.yml", &options)?;
//! assert!(script.contains("ctx.use_pkg(\"ROOT\", public=True)"));
//! assert!(script.contains("ctx.hwaf_target("));
//! # Ok::<(), hscript_cli::core::HscriptError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod hscript;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
