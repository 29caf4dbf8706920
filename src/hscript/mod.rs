//! The hscript compiler.
//!
//! An hscript document (`hscript.yml`) describes one package: its metadata,
//! declared dependencies, toolchain modules per phase, configure-time
//! environment and tag statements, and build targets. Compiling it produces
//! the script the downstream build engine runs (`wscript`), or a normalized
//! copy of the document.
//!
//! # Pipeline
//!
//! ```text
//! text ──loader──▶ serde_yaml::Value ──mapper──▶ Document ──render──▶ text
//!                                       │
//!                          deps::classify, target::extract_target
//! ```
//!
//! Every stage is synchronous and free of global state, so independent
//! documents can be compiled concurrently by the caller.
//!
//! # Example
//!
//! ```rust
//! use hscript_cli::hscript::{CompileOptions, compile_str};
//!
//! let script = compile_str("package: {name: hello}", "hscript.yml", &CompileOptions::default())?;
//! assert!(script.contains("\"name\": \"hello\""));
//! # Ok::<(), hscript_cli::core::HscriptError>(())
//! ```

pub mod deps;
pub mod loader;
pub mod mapper;
pub mod model;
pub mod render;
pub mod target;
pub mod value;

pub use model::Document;
pub use render::OutputFormat;

use crate::core::Result;
use crate::utils::fs::atomic_write;
use anyhow::Context;
use std::path::Path;

/// Settings for one compile, passed explicitly by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub format: OutputFormat,
}

/// Load and map a document without rendering it.
pub fn parse_document(text: &str, origin: &str) -> Result<Document> {
    let tree = loader::load(text, origin)?;
    mapper::map_document(&tree)
}

/// Compile document text to output text.
pub fn compile_str(text: &str, origin: &str, options: &CompileOptions) -> Result<String> {
    let doc = parse_document(text, origin)?;
    Ok(render::render(&doc, options.format))
}

/// Compile the document at `path` to output text.
pub fn compile_file(path: &Path, options: &CompileOptions) -> anyhow::Result<String> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let output = compile_str(&text, &path.display().to_string(), options)
        .with_context(|| format!("Failed to compile {}", path.display()))?;
    Ok(output)
}

/// Compile `input` and write the result to `output`.
///
/// The output file is replaced atomically, and only once compilation has
/// succeeded; on any error it is left as it was.
pub fn compile_to(input: &Path, output: &Path, options: &CompileOptions) -> anyhow::Result<()> {
    let text = compile_file(input, options)?;
    atomic_write(output, text.as_bytes())?;
    tracing::debug!("wrote {} ({} bytes)", output.display(), text.len());
    Ok(())
}
