//! Backup and restore of hand-written scripts.
//!
//! A package may already carry a hand-written `wscript`. Before the first
//! generated script replaces it, the file is renamed to `<script><suffix>`;
//! `clean` removes the generated script and moves the original back.
//! Generated files are recognised by [`is_generated`].

use crate::hscript::render::is_generated;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// What [`backup_script`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupOutcome {
    /// No script existed.
    Absent,
    /// The existing script was generated and may be overwritten.
    Generated,
    /// A hand-written script was moved to the backup path.
    BackedUp,
}

/// What [`clean_script`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CleanOutcome {
    pub removed: bool,
    pub restored: bool,
    pub dropped_backup: bool,
}

/// Move a hand-written `script` to `backup` before it gets overwritten.
///
/// Refuses to proceed when both a hand-written script and a backup exist,
/// since one of them would be lost.
pub fn backup_script(script: &Path, backup: &Path) -> Result<BackupOutcome> {
    if !script.exists() {
        return Ok(BackupOutcome::Absent);
    }
    if is_generated_file(script)? {
        return Ok(BackupOutcome::Generated);
    }
    if backup.exists() {
        anyhow::bail!(
            "Refusing to overwrite hand-written {}: backup {} already exists",
            script.display(),
            backup.display()
        );
    }

    fs::rename(script, backup).with_context(|| {
        format!("Failed to back up {} to {}", script.display(), backup.display())
    })?;
    tracing::info!("backed up {} to {}", script.display(), backup.display());
    Ok(BackupOutcome::BackedUp)
}

/// Remove a generated `script` and restore (or delete) its backup.
///
/// A hand-written script is never removed.
pub fn clean_script(script: &Path, backup: &Path, drop_backup: bool) -> Result<CleanOutcome> {
    let mut outcome = CleanOutcome::default();

    if script.exists() {
        if !is_generated_file(script)? {
            tracing::warn!("{} is not generated by hscript, leaving it", script.display());
            return Ok(outcome);
        }
        fs::remove_file(script)
            .with_context(|| format!("Failed to remove {}", script.display()))?;
        outcome.removed = true;
    }

    if backup.exists() {
        if drop_backup {
            fs::remove_file(backup)
                .with_context(|| format!("Failed to remove {}", backup.display()))?;
            outcome.dropped_backup = true;
        } else {
            restore_backup(script, backup)?;
            outcome.restored = true;
        }
    }

    tracing::debug!("cleaned {}: {outcome:?}", script.display());
    Ok(outcome)
}

/// Move `backup` back to `script`.
pub fn restore_backup(script: &Path, backup: &Path) -> Result<()> {
    fs::rename(backup, script).with_context(|| {
        format!("Failed to restore {} from {}", script.display(), backup.display())
    })
}

fn is_generated_file(path: &Path) -> Result<bool> {
    let text = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(is_generated(&String::from_utf8_lossy(&text)))
}
