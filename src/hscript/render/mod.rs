//! Output backends for a typed [`Document`].
//!
//! Both renderers are pure functions of the document: they walk the model in
//! declaration order and never consult the environment, so rendering the same
//! document twice yields byte-identical text.
//!
//! | Format | Module | Output |
//! |--------|--------|--------|
//! | [`OutputFormat::Wscript`] | [`engine`] | build-engine script (`wscript`) |
//! | [`OutputFormat::Hscript`] | [`normalized`] | normalized hscript document |

pub mod engine;
pub mod normalized;

use super::model::Document;
use serde::{Deserialize, Serialize};
use std::fmt;

/// First line of every generated file after any interpreter header.
///
/// Used to tell generated scripts apart from hand-written ones.
pub const GENERATED_MARKER: &str = "# automatically generated by hscript. do not edit.";

/// Renderer selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Script for the downstream build engine.
    #[default]
    Wscript,
    /// The document itself, normalized.
    Hscript,
}

impl OutputFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Wscript => "wscript",
            Self::Hscript => "hscript",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render `doc` with the backend selected by `format`.
#[must_use]
pub fn render(doc: &Document, format: OutputFormat) -> String {
    tracing::debug!("rendering package '{}' as {format}", doc.package.name);
    match format {
        OutputFormat::Wscript => engine::render(doc),
        OutputFormat::Hscript => normalized::render(doc),
    }
}

/// True when `text` carries the generated-file marker in its header.
#[must_use]
pub fn is_generated(text: &str) -> bool {
    text.lines().take(3).any(|line| line.trim_end() == GENERATED_MARKER)
}
