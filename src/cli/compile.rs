//! `hscript compile`: generate build-engine scripts.
//!
//! Every document is compiled in its own blocking task; results are reported
//! in argument order once all tasks have finished. A document that fails to
//! compile never touches its script or backup, and a hand-written script moved
//! aside is put back when the generated one cannot be written.

use crate::config::GenConfig;
use crate::core::{HscriptError, user_friendly_error};
use crate::hscript::{CompileOptions, OutputFormat, compile_file, compile_to};
use crate::utils::fs::{BackupOutcome, atomic_write, backup_script, find_documents, restore_backup};
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use std::path::{Path, PathBuf};

/// Compile hscript documents.
#[derive(Args, Debug, Clone)]
pub struct CompileCommand {
    /// Documents or package directories (default: current directory)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Output format (default from configuration, else `wscript`)
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Write the result here instead of next to the document (single document only)
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdout")]
    output: Option<PathBuf>,

    /// Search directories recursively for documents
    #[arg(short, long)]
    recursive: bool,

    /// Overwrite hand-written scripts without moving them aside
    #[arg(long)]
    no_backup: bool,

    /// Print the result instead of writing files
    #[arg(long)]
    stdout: bool,
}

/// Result of compiling one document.
#[derive(Debug)]
struct Compiled {
    document: PathBuf,
    script: Option<PathBuf>,
    text: Option<String>,
    backed_up: bool,
}

impl CompileCommand {
    pub async fn execute(self, config: &GenConfig) -> Result<()> {
        let paths = if self.paths.is_empty() { vec![PathBuf::from(".")] } else { self.paths.clone() };
        let documents = find_documents(&paths, &config.document_name, self.recursive)?;
        if documents.is_empty() {
            println!("{}", "No hscript documents found".yellow());
            return Ok(());
        }

        let options = CompileOptions {
            format: self.format.unwrap_or(config.format),
        };

        if let Some(output) = &self.output {
            let [document] = documents.as_slice() else {
                anyhow::bail!("--output requires exactly one document, found {}", documents.len());
            };
            compile_to(document, output, &options)?;
            println!("{} {} -> {}", "✓".green(), document.display(), output.display());
            return Ok(());
        }

        let tasks = documents.iter().cloned().map(|document| {
            let config = config.clone();
            let to_stdout = self.stdout;
            let backup = !self.no_backup;
            tokio::task::spawn_blocking(move || {
                compile_one(&document, &config, &options, to_stdout, backup)
                    .with_context(|| format!("Failed to compile {}", document.display()))
            })
        });
        let results = join_all(tasks).await;

        let total = results.len();
        let mut failed = 0;
        let mut invalid = 0;
        for result in results {
            match result.context("Compile task panicked").and_then(|r| r) {
                Ok(compiled) => self.report(&compiled, total),
                Err(e) => {
                    failed += 1;
                    if is_invalid_document(&e) {
                        invalid += 1;
                    }
                    user_friendly_error(e).display();
                }
            }
        }

        if failed > invalid {
            anyhow::bail!(
                "{failed} of {total} document(s) failed to compile ({} not caused by document content)",
                failed - invalid
            );
        }
        if failed > 0 {
            anyhow::bail!("{failed} of {total} document(s) failed to compile");
        }
        Ok(())
    }

    fn report(&self, compiled: &Compiled, total: usize) {
        if let Some(text) = &compiled.text {
            if total > 1 {
                println!("# ==> {} <==", compiled.document.display());
            }
            print!("{text}");
            return;
        }
        if let Some(script) = &compiled.script {
            println!("{} {} -> {}", "✓".green(), compiled.document.display(), script.display());
        }
        if compiled.backed_up {
            println!("  {} hand-written script moved aside", "note:".yellow());
        }
    }
}

fn compile_one(
    document: &Path,
    config: &GenConfig,
    options: &CompileOptions,
    to_stdout: bool,
    backup: bool,
) -> Result<Compiled> {
    let text = compile_file(document, options)?;
    if to_stdout {
        return Ok(Compiled {
            document: document.to_path_buf(),
            script: None,
            text: Some(text),
            backed_up: false,
        });
    }

    let package_dir = document.parent().unwrap_or_else(|| Path::new("."));
    let script = config.script_path(package_dir);
    let backup_path = config.backup_path(&script);
    let backed_up = backup && backup_script(&script, &backup_path)? == BackupOutcome::BackedUp;
    if let Err(e) = atomic_write(&script, text.as_bytes()) {
        if backed_up {
            restore_backup(&script, &backup_path)?;
        }
        return Err(e);
    }

    Ok(Compiled {
        document: document.to_path_buf(),
        script: Some(script),
        text: None,
        backed_up,
    })
}

/// Whether the failure comes from the document itself rather than the filesystem.
fn is_invalid_document(error: &anyhow::Error) -> bool {
    error
        .chain()
        .filter_map(|cause| cause.downcast_ref::<HscriptError>())
        .any(HscriptError::is_document_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hscript::render::is_generated;
    use std::fs;
    use tempfile::TempDir;

    fn command(paths: Vec<PathBuf>) -> CompileCommand {
        CompileCommand {
            paths,
            format: None,
            output: None,
            recursive: false,
            no_backup: false,
            stdout: false,
        }
    }

    fn package(root: &Path, name: &str, body: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("hscript.yml"), body).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_compile_writes_sibling_script() {
        let temp = TempDir::new().unwrap();
        let dir = package(temp.path(), "pkg", "package: {name: pkg}\n");

        command(vec![dir.clone()]).execute(&GenConfig::default()).await.unwrap();

        let script = fs::read_to_string(dir.join("wscript")).unwrap();
        assert!(is_generated(&script));
        assert!(script.contains("\"pkg\""));
    }

    #[tokio::test]
    async fn test_compile_many_reports_all_failures() {
        let temp = TempDir::new().unwrap();
        package(temp.path(), "a", "package: {name: a}\n");
        package(temp.path(), "b", "options: {}\n");
        package(temp.path(), "c", "package: {name: c}\n");

        let mut cmd = command(vec![temp.path().to_path_buf()]);
        cmd.recursive = true;
        let err = cmd.execute(&GenConfig::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "1 of 3 document(s) failed to compile");

        assert!(temp.path().join("a/wscript").exists());
        assert!(!temp.path().join("b/wscript").exists());
        assert!(temp.path().join("c/wscript").exists());
    }

    #[tokio::test]
    async fn test_failed_compile_keeps_existing_script() {
        let temp = TempDir::new().unwrap();
        let dir = package(temp.path(), "pkg", "package: {name: [bad]}\n");
        fs::write(dir.join("wscript"), "hand written\n").unwrap();

        assert!(command(vec![dir.clone()]).execute(&GenConfig::default()).await.is_err());
        assert_eq!(fs::read_to_string(dir.join("wscript")).unwrap(), "hand written\n");
        assert!(!dir.join("wscript.hscript-orig").exists());
    }

    #[tokio::test]
    async fn test_backup_once() {
        let temp = TempDir::new().unwrap();
        let dir = package(temp.path(), "pkg", "package: {name: pkg}\n");
        fs::write(dir.join("wscript"), "hand written\n").unwrap();

        let config = GenConfig::default();
        command(vec![dir.clone()]).execute(&config).await.unwrap();
        command(vec![dir.clone()]).execute(&config).await.unwrap();

        assert_eq!(fs::read_to_string(dir.join("wscript.hscript-orig")).unwrap(), "hand written\n");
        assert!(is_generated(&fs::read_to_string(dir.join("wscript")).unwrap()));
    }

    #[tokio::test]
    async fn test_failed_write_restores_hand_written_script() {
        let temp = TempDir::new().unwrap();
        let dir = package(temp.path(), "pkg", "package: {name: pkg}\n");
        fs::write(dir.join("wscript"), "hand written\n").unwrap();
        // A directory in place of the temp file makes the write fail after the backup
        fs::create_dir(dir.join(".wscript.tmp")).unwrap();

        let err = command(vec![dir.clone()]).execute(&GenConfig::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "1 of 1 document(s) failed to compile (1 not caused by document content)"
        );
        assert_eq!(fs::read_to_string(dir.join("wscript")).unwrap(), "hand written\n");
        assert!(!dir.join("wscript.hscript-orig").exists());
    }

    #[tokio::test]
    async fn test_summary_separates_document_errors() {
        let temp = TempDir::new().unwrap();
        package(temp.path(), "bad", "package: {name: [bad]}\n");
        let locked = package(temp.path(), "locked", "package: {name: locked}\n");
        fs::write(locked.join("wscript"), "mine\n").unwrap();
        fs::write(locked.join("wscript.hscript-orig"), "older\n").unwrap();

        let mut cmd = command(vec![temp.path().to_path_buf()]);
        cmd.recursive = true;
        let err = cmd.execute(&GenConfig::default()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "2 of 2 document(s) failed to compile (1 not caused by document content)"
        );
        assert_eq!(fs::read_to_string(locked.join("wscript")).unwrap(), "mine\n");
    }

    #[test]
    fn test_is_invalid_document() {
        let document = anyhow::Error::new(HscriptError::schema("missing mandatory package section"))
            .context("Failed to compile pkg/hscript.yml");
        assert!(is_invalid_document(&document));

        let io = anyhow::anyhow!("Failed to create temp file").context("Failed to compile pkg/hscript.yml");
        assert!(!is_invalid_document(&io));
    }

    #[tokio::test]
    async fn test_no_backup_overwrites() {
        let temp = TempDir::new().unwrap();
        let dir = package(temp.path(), "pkg", "package: {name: pkg}\n");
        fs::write(dir.join("wscript"), "hand written\n").unwrap();

        let mut cmd = command(vec![dir.clone()]);
        cmd.no_backup = true;
        cmd.execute(&GenConfig::default()).await.unwrap();

        assert!(!dir.join("wscript.hscript-orig").exists());
        assert!(is_generated(&fs::read_to_string(dir.join("wscript")).unwrap()));
    }

    #[tokio::test]
    async fn test_output_and_format_from_config() {
        let temp = TempDir::new().unwrap();
        let dir = package(temp.path(), "pkg", "package: {name: pkg}\n");
        let output = temp.path().join("out/normalized.yml");

        let mut cmd = command(vec![dir.clone()]);
        cmd.output = Some(output.clone());
        let config = GenConfig {
            format: OutputFormat::Hscript,
            ..GenConfig::default()
        };
        cmd.execute(&config).await.unwrap();

        let text = fs::read_to_string(&output).unwrap();
        assert!(text.contains("package:\n  name: pkg\n"));
        assert!(!dir.join("wscript").exists());
    }

    #[tokio::test]
    async fn test_output_requires_single_document() {
        let temp = TempDir::new().unwrap();
        package(temp.path(), "a", "package: {name: a}\n");
        package(temp.path(), "b", "package: {name: b}\n");

        let mut cmd = command(vec![temp.path().to_path_buf()]);
        cmd.recursive = true;
        cmd.output = Some(temp.path().join("out"));
        let err = cmd.execute(&GenConfig::default()).await.unwrap_err();
        assert!(err.to_string().contains("exactly one document"));
    }

    #[tokio::test]
    async fn test_custom_names() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("pkg");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("pkg.yml"), "package: {name: pkg}\n").unwrap();

        let config = GenConfig {
            document_name: "pkg.yml".to_string(),
            script_name: "wscript.gen".to_string(),
            ..GenConfig::default()
        };
        command(vec![dir.clone()]).execute(&config).await.unwrap();
        assert!(dir.join("wscript.gen").exists());
    }
}
