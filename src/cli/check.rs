//! `hscript check`: validate documents without writing anything.

use crate::config::GenConfig;
use crate::core::user_friendly_error;
use crate::hscript::{Document, parse_document};
use crate::utils::fs::find_documents;
use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use futures::future::join_all;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Validate hscript documents.
#[derive(Args, Debug, Clone)]
pub struct CheckCommand {
    /// Documents or package directories (default: current directory)
    #[arg(value_name = "PATH")]
    paths: Vec<PathBuf>,

    /// Search directories recursively for documents
    #[arg(short, long)]
    recursive: bool,

    /// Print a JSON report instead of text
    #[arg(long)]
    json: bool,
}

/// JSON report of one `check` run.
#[derive(Debug, Serialize)]
struct CheckReport {
    valid: bool,
    documents: Vec<DocumentSummary>,
}

/// What one document declares, or why it is invalid.
#[derive(Debug, Default, Serialize)]
struct DocumentSummary {
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    package: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    dependencies: usize,
    targets: Vec<String>,
    statements: usize,
    applied_tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl DocumentSummary {
    fn from_document(path: &Path, doc: &Document) -> Self {
        Self {
            path: path.display().to_string(),
            package: Some(doc.package.name.clone()),
            version: doc.package.version.clone(),
            dependencies: doc.package.deps.len(),
            targets: doc.build.targets.iter().map(|t| t.name.clone()).collect(),
            statements: doc.configure.stmts.len(),
            applied_tags: doc.configure.applied_tags().into_iter().map(str::to_string).collect(),
            error: None,
        }
    }
}

impl CheckCommand {
    pub async fn execute(self, config: &GenConfig) -> Result<()> {
        let paths = if self.paths.is_empty() { vec![PathBuf::from(".")] } else { self.paths.clone() };
        let documents = find_documents(&paths, &config.document_name, self.recursive)?;

        let tasks = documents.into_iter().map(|document| {
            tokio::task::spawn_blocking(move || {
                let parsed = check_one(&document);
                (document, parsed)
            })
        });

        let mut report = CheckReport {
            valid: true,
            documents: Vec::new(),
        };
        for joined in join_all(tasks).await {
            let (document, parsed) = joined.context("Check task panicked")?;
            match parsed {
                Ok(doc) => {
                    let summary = DocumentSummary::from_document(&document, &doc);
                    if !self.json {
                        println!(
                            "{} {}: {} ({} dependencies, {} targets)",
                            "✓".green(),
                            summary.path,
                            doc.package.name.bold(),
                            summary.dependencies,
                            summary.targets.len()
                        );
                    }
                    report.documents.push(summary);
                }
                Err(e) => {
                    report.valid = false;
                    let summary = DocumentSummary {
                        path: document.display().to_string(),
                        error: Some(format!("{e:#}")),
                        ..DocumentSummary::default()
                    };
                    if !self.json {
                        println!("{} {}", "✗".red(), summary.path);
                        user_friendly_error(e).display();
                    }
                    report.documents.push(summary);
                }
            }
        }

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }

        let failed = report.documents.iter().filter(|d| d.error.is_some()).count();
        if failed > 0 {
            anyhow::bail!("{failed} of {} document(s) are invalid", report.documents.len());
        }
        Ok(())
    }
}

fn check_one(document: &Path) -> Result<Document> {
    let text = std::fs::read_to_string(document)
        .with_context(|| format!("Failed to read {}", document.display()))?;
    let doc = parse_document(&text, &document.display().to_string())
        .with_context(|| format!("Failed to check {}", document.display()))?;
    Ok(doc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_summary_json_shape() {
        let doc = parse_document(
            "package: {name: p, version: \"1.0\", deps: {public: [A, B]}}\nconfigure: {apply-tags: [opt, slc6]}\nbuild: {lib: {}, app: {}}",
            "<input>",
        )
        .unwrap();
        let summary = DocumentSummary::from_document(Path::new("p/hscript.yml"), &doc);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["package"], "p");
        assert_eq!(json["version"], "1.0");
        assert_eq!(json["dependencies"], 2);
        assert_eq!(json["targets"], serde_json::json!(["lib", "app"]));
        assert_eq!(json["applied_tags"], serde_json::json!(["opt", "slc6"]));
        assert!(json.get("error").is_none());
    }

    #[tokio::test]
    async fn test_check_reports_invalid_documents() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("good")).unwrap();
        fs::create_dir_all(temp.path().join("bad")).unwrap();
        fs::write(temp.path().join("good/hscript.yml"), "package: {name: good}\n").unwrap();
        fs::write(temp.path().join("bad/hscript.yml"), "build: {}\n").unwrap();

        let cmd = CheckCommand {
            paths: vec![temp.path().to_path_buf()],
            recursive: true,
            json: true,
        };
        let err = cmd.execute(&GenConfig::default()).await.unwrap_err();
        assert_eq!(err.to_string(), "1 of 2 document(s) are invalid");

        // Nothing is written by check
        assert!(!temp.path().join("good/wscript").exists());
    }

    #[tokio::test]
    async fn test_check_valid() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("hscript.yml"), "package: {name: good}\n").unwrap();

        let cmd = CheckCommand {
            paths: vec![temp.path().to_path_buf()],
            recursive: false,
            json: false,
        };
        cmd.execute(&GenConfig::default()).await.unwrap();
    }
}
