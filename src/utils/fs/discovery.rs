//! Locating hscript documents.
//!
//! A path given on the command line is either a document, or a package
//! directory expected to contain one. With `recursive`, directories are
//! walked and every document found is returned.

use crate::core::HscriptError;
use anyhow::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory names never descended into during a recursive search.
const SKIPPED_DIRS: [&str; 3] = [".git", ".svn", "__pycache__"];

/// Resolve `paths` to document paths named `document_name`.
///
/// Results keep argument order, each recursive search is sorted by path, and
/// a document reached twice is returned once.
///
/// # Errors
///
/// [`HscriptError::DocumentNotFound`] when a path does not exist, or when a
/// non-recursive directory has no document.
pub fn find_documents(paths: &[PathBuf], document_name: &str, recursive: bool) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    let mut seen = HashSet::new();

    for path in paths {
        let documents = if path.is_file() {
            vec![path.clone()]
        } else if path.is_dir() && recursive {
            walk(path, document_name)?
        } else if path.is_dir() {
            let document = path.join(document_name);
            if !document.is_file() {
                return Err(not_found(&document));
            }
            vec![document]
        } else {
            return Err(not_found(path));
        };

        for document in documents {
            if seen.insert(document.clone()) {
                found.push(document);
            }
        }
    }

    tracing::debug!("found {} hscript document(s)", found.len());
    Ok(found)
}

fn walk(root: &Path, document_name: &str) -> Result<Vec<PathBuf>> {
    let mut documents = Vec::new();
    let entries = WalkDir::new(root).sort_by_file_name().into_iter().filter_entry(|entry| {
        !(entry.file_type().is_dir()
            && entry.depth() > 0
            && entry.file_name().to_str().is_some_and(|name| SKIPPED_DIRS.contains(&name)))
    });

    for entry in entries {
        let entry = entry?;
        if entry.file_type().is_file() && entry.file_name() == document_name {
            documents.push(entry.into_path());
        }
    }
    Ok(documents)
}

fn not_found(path: &Path) -> anyhow::Error {
    HscriptError::DocumentNotFound {
        path: path.display().to_string(),
    }
    .into()
}
