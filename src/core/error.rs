//! Error handling for hscript
//!
//! This module provides the error type shared by the compiler pipeline and the
//! command-line driver, plus user-friendly error reporting for the CLI.
//!
//! # Architecture
//!
//! The error system consists of two main types:
//! - [`HscriptError`] - Enumerated error kinds for every failure in hscript
//! - [`ErrorContext`] - Wrapper that adds user-facing details and suggestions
//!
//! # Error Categories
//!
//! - **Compilation**: [`HscriptError::ParseError`], [`HscriptError::SchemaError`],
//!   [`HscriptError::TypeError`], [`HscriptError::ConsistencyError`]. Every
//!   compilation failure is attributable to one malformed input document and is
//!   fixable by editing that document.
//! - **Driver**: [`HscriptError::DocumentNotFound`], [`HscriptError::ConfigError`],
//!   [`HscriptError::IoError`], [`HscriptError::TomlError`].
//!
//! The compiler API returns `Result<T, HscriptError>` so callers can match on
//! the kind. The CLI works with [`anyhow::Error`] and converts failures with
//! [`user_friendly_error`] right before printing them.
//!
//! # Examples
//!
//! ```rust,no_run
//! use hscript_cli::core::{HscriptError, user_friendly_error};
//!
//! let error = HscriptError::SchemaError {
//!     reason: "missing mandatory package section".to_string(),
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display(); // Shows colored error with suggestions
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for hscript operations
///
/// The first four variants are the compile-time error kinds. They abort the
/// compilation of a single document; no output file is written when one of them
/// is returned.
///
/// # Examples
///
/// ```rust,no_run
/// use hscript_cli::core::HscriptError;
///
/// fn describe(error: &HscriptError) -> &'static str {
///     match error {
///         HscriptError::ParseError { .. } => "syntax",
///         HscriptError::SchemaError { .. } => "schema",
///         HscriptError::TypeError { .. } => "type",
///         HscriptError::ConsistencyError { .. } => "consistency",
///         _ => "driver",
///     }
/// }
/// ```
#[derive(Error, Debug)]
pub enum HscriptError {
    /// The document is not well-formed YAML
    #[error("Invalid hscript syntax in {file}: {reason}")]
    ParseError {
        /// Document the parser was reading (`<input>` for in-memory text)
        file: String,
        /// Parser diagnostic, including line and column when available
        reason: String,
    },

    /// A required key is missing or a section name is not recognized
    #[error("Schema error: {reason}")]
    SchemaError {
        /// What is missing or unrecognized
        reason: String,
    },

    /// A field holds a value of the wrong shape
    ///
    /// # Fields
    /// - `path`: dotted location of the field, e.g. `package.authors`
    /// - `expected`: the accepted shapes
    /// - `found`: the shape actually present in the document
    #[error("Type error at '{path}': expected {expected}, found {found}")]
    TypeError {
        /// Dotted path of the offending field
        path: String,
        /// Human readable description of the accepted shapes
        expected: String,
        /// Shape found in the document
        found: String,
    },

    /// Two declarations in the document contradict each other
    #[error("Consistency error: {reason}")]
    ConsistencyError {
        /// Description of the conflict
        reason: String,
    },

    /// No hscript document at the given location
    #[error("No hscript document found at {path}")]
    DocumentNotFound {
        /// Path that was searched
        path: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl HscriptError {
    /// Shorthand for building a [`HscriptError::TypeError`].
    pub fn type_error(
        path: impl Into<String>,
        expected: impl Into<String>,
        found: impl Into<String>,
    ) -> Self {
        Self::TypeError {
            path: path.into(),
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Shorthand for building a [`HscriptError::SchemaError`].
    pub fn schema(reason: impl Into<String>) -> Self {
        Self::SchemaError {
            reason: reason.into(),
        }
    }

    /// Whether this error was caused by the content of a document rather than
    /// by the environment (filesystem, configuration).
    #[must_use]
    pub const fn is_document_error(&self) -> bool {
        matches!(
            self,
            Self::ParseError { .. }
                | Self::SchemaError { .. }
                | Self::TypeError { .. }
                | Self::ConsistencyError { .. }
        )
    }
}

impl Clone for HscriptError {
    fn clone(&self) -> Self {
        match self {
            Self::ParseError {
                file,
                reason,
            } => Self::ParseError {
                file: file.clone(),
                reason: reason.clone(),
            },
            Self::SchemaError {
                reason,
            } => Self::SchemaError {
                reason: reason.clone(),
            },
            Self::TypeError {
                path,
                expected,
                found,
            } => Self::TypeError {
                path: path.clone(),
                expected: expected.clone(),
                found: found.clone(),
            },
            Self::ConsistencyError {
                reason,
            } => Self::ConsistencyError {
                reason: reason.clone(),
            },
            Self::DocumentNotFound {
                path,
            } => Self::DocumentNotFound {
                path: path.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            // For errors that don't implement Clone, convert to Other
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error context wrapper that provides user-friendly error information
///
/// `ErrorContext` wraps a [`HscriptError`] and adds optional details and a
/// suggestion for resolution. This is how the CLI presents errors.
///
/// When displayed, errors show:
/// 1. **Error**: the main error message in red
/// 2. **Details**: additional context in yellow (optional)
/// 3. **Suggestion**: actionable steps in green (optional)
///
/// # Examples
///
/// ```rust,no_run
/// use hscript_cli::core::{ErrorContext, HscriptError};
///
/// let context = ErrorContext::new(HscriptError::DocumentNotFound {
///     path: "pkg/hscript.yml".to_string(),
/// })
/// .with_suggestion("Create an hscript.yml next to the package sources")
/// .with_details("hscript looks for hscript.yml inside each package directory");
///
/// context.display();
/// ```
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying hscript error
    pub error: HscriptError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no details or suggestion.
    #[must_use]
    pub const fn new(error: HscriptError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions
///
/// Recognizes [`HscriptError`] anywhere in the error chain (commands wrap
/// compiler errors with `anyhow::Context`), then [`std::io::Error`], and falls
/// back to printing the full chain.
///
/// # Examples
///
/// ```rust,no_run
/// use hscript_cli::core::user_friendly_error;
///
/// let error = anyhow::anyhow!("Something went wrong");
/// let context = user_friendly_error(error);
/// context.display();
/// ```
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(hscript_error) = error.chain().find_map(|e| e.downcast_ref::<HscriptError>()) {
        let context = create_error_context(hscript_error.clone());
        // Keep the outer context (usually the document path) visible
        let outer = error.to_string();
        if outer == hscript_error.to_string() {
            return context;
        }
        let details = match &context.details {
            Some(details) => format!("{outer}\n{details}"),
            None => outer,
        };
        return context.with_details(details);
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        match io_error.kind() {
            std::io::ErrorKind::PermissionDenied => {
                return ErrorContext::new(HscriptError::Other {
                    message: format!("Permission denied: {io_error}"),
                })
                .with_suggestion("Check ownership and permissions of the package directory")
                .with_details(
                    "hscript needs to read hscript.yml and write the generated script next to it",
                );
            }
            std::io::ErrorKind::NotFound => {
                return ErrorContext::new(HscriptError::Other {
                    message: format!("File not found: {io_error}"),
                })
                .with_suggestion("Check that the file or directory exists and the path is correct");
            }
            _ => {}
        }
    }

    // Generic error - include the full error chain for better diagnostics
    let mut message = error.to_string();

    let chain: Vec<String> =
        error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(HscriptError::Other {
        message,
    })
}

/// Map each [`HscriptError`] variant to an [`ErrorContext`] with suggestions
fn create_error_context(error: HscriptError) -> ErrorContext {
    match &error {
        HscriptError::ParseError { .. } => ErrorContext::new(error)
            .with_suggestion("Check the YAML syntax: indentation, unmatched brackets or braces, and unquoted ':' inside values")
            .with_details("hscript documents are YAML; flow style ({...} and [...]) and block style may be mixed"),

        HscriptError::SchemaError { reason } => {
            let suggestion = if reason.contains("package") {
                "Every hscript document needs a 'package' section with at least a 'name'"
            } else {
                "Valid top-level sections are: package, options, configure, build"
            };
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        HscriptError::TypeError { expected, .. } => {
            let suggestion = format!("Change the field so that it holds {expected}");
            ErrorContext::new(error).with_suggestion(suggestion)
        }

        HscriptError::ConsistencyError { .. } => ErrorContext::new(error)
            .with_suggestion("Remove one of the conflicting declarations")
            .with_details("A target's 'name' must equal its key under 'build', and tag names and target outputs must be unique"),

        HscriptError::DocumentNotFound { .. } => ErrorContext::new(error)
            .with_suggestion("Pass the path of an hscript.yml file, or a package directory that contains one")
            .with_details("Use --recursive to search a whole work area"),

        HscriptError::ConfigError { .. } | HscriptError::TomlError(_) => ErrorContext::new(error)
            .with_suggestion("Check ~/.hscript/config.toml (or the file given with --config)"),

        _ => ErrorContext::new(error),
    }
}
