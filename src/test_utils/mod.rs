//! Test utilities for hscript.
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use hscript_cli::test_utils::{TestWorkarea, fixtures};
//!
//! let area = TestWorkarea::new().unwrap();
//! let pkg = area.add_package("pkg", fixtures::MINIMAL).unwrap();
//! assert!(pkg.join("hscript.yml").exists());
//! ```

pub mod fixtures;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Uses `level` when given, else `RUST_LOG`; with neither, logging stays off.
///
/// ```bash
/// RUST_LOG=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .try_init();
    });
}

/// A temporary work area holding package directories.
///
/// Removed when dropped.
pub struct TestWorkarea {
    temp: TempDir,
}

impl TestWorkarea {
    pub fn new() -> Result<Self> {
        let temp = TempDir::new().context("Failed to create temporary work area")?;
        Ok(Self {
            temp,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Create `<area>/<name>/hscript.yml` with `document` and return the package directory.
    pub fn add_package(&self, name: &str, document: &str) -> Result<PathBuf> {
        let dir = self.path().join(name);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
        std::fs::write(dir.join("hscript.yml"), document)
            .with_context(|| format!("Failed to write document in {}", dir.display()))?;
        Ok(dir)
    }

    /// Write `content` at `rel` inside the area.
    pub fn write(&self, rel: &str, content: &str) -> Result<PathBuf> {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn read(&self, rel: &str) -> Result<String> {
        let path = self.path().join(rel);
        std::fs::read_to_string(&path).with_context(|| format!("Failed to read {}", path.display()))
    }

    #[must_use]
    pub fn exists(&self, rel: &str) -> bool {
        self.path().join(rel).exists()
    }
}
