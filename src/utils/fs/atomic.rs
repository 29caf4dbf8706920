//! Atomic file writes using a temp-and-rename strategy.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Atomically write `content` to `path`.
///
/// The bytes go to a sibling temporary file first, which is synced and then
/// renamed over `path`. On failure the temporary file is removed and `path`
/// keeps its previous content.
///
/// # Examples
///
/// ```rust,no_run
/// use hscript_cli::utils::fs::atomic_write;
/// use std::path::Path;
///
/// # fn example() -> anyhow::Result<()> {
/// atomic_write(Path::new("pkg/wscript"), b"# -*- python -*-\n")?;
/// # Ok(())
/// # }
/// ```
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let temp_path = temp_path_for(path);
    let written = write_synced(&temp_path, content).and_then(|()| {
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename temp file to: {}", path.display()))
    });

    if written.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    written
}

fn write_synced(temp_path: &Path, content: &[u8]) -> Result<()> {
    let mut file = fs::File::create(temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
    file.write_all(content)
        .with_context(|| format!("Failed to write to temp file: {}", temp_path.display()))?;
    file.sync_all().context("Failed to sync file to disk")?;
    Ok(())
}

/// `dir/.name.tmp` next to `path`.
fn temp_path_for(path: &Path) -> PathBuf {
    let name = path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
