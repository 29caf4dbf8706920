//! `hscript clean`: remove generated scripts and restore backups.

use crate::config::GenConfig;
use crate::utils::fs::{clean_script, find_documents};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

/// Remove generated scripts.
#[derive(Args, Debug, Clone)]
pub struct CleanCommand {
    /// Documents or package directories (default: current directory)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Search directories recursively for documents
    #[arg(short, long)]
    recursive: bool,

    /// Delete backups of hand-written scripts instead of restoring them
    #[arg(long)]
    drop_backup: bool,
}

impl CleanCommand {
    pub async fn execute(self, config: &GenConfig) -> Result<()> {
        let paths = if self.paths.is_empty() { vec![PathBuf::from(".")] } else { self.paths.clone() };
        let documents = find_documents(&paths, &config.document_name, self.recursive)?;

        let mut cleaned = 0;
        for document in &documents {
            let package_dir = document.parent().unwrap_or_else(|| Path::new("."));
            let script = config.script_path(package_dir);
            let outcome = clean_script(&script, &config.backup_path(&script), self.drop_backup)?;

            if outcome.removed {
                cleaned += 1;
                println!("{} removed {}", "✓".green(), script.display());
            }
            if outcome.restored {
                println!("  restored hand-written {}", script.display());
            }
            if outcome.dropped_backup {
                println!("  {} dropped backup of {}", "note:".yellow(), script.display());
            }
        }

        tracing::debug!("cleaned {cleaned} of {} package(s)", documents.len());
        Ok(())
    }
}
