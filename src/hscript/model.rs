//! Typed model of an hscript document.
//!
//! Produced by [`crate::hscript::mapper::map_document`] and consumed by the
//! renderers. Every collection keeps the declaration order of the source
//! document so that rendering is deterministic.

use super::deps::Dependency;
use super::value::Value;

/// Root of the typed model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub package: Package,
    pub options: Phase,
    pub configure: Configure,
    pub build: Build,
}

/// Package metadata from the `package` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Package {
    pub name: String,
    pub authors: Vec<String>,
    pub managers: Vec<String>,
    pub version: Option<String>,
    pub deps: Vec<Dependency>,
}

/// What every phase section (`options`, `configure`, `build`) carries.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Phase {
    /// Toolchain modules loaded by the engine, in order.
    pub tools: Vec<String>,
    /// Package-relative scripts called during the phase (`hwaf-call`).
    pub hooks: Vec<String>,
}

/// The `configure` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Configure {
    pub phase: Phase,
    /// Environment, tag and path statements in declaration order.
    pub stmts: Vec<Statement>,
}

impl Configure {
    /// Names passed to `apply-tags`, in order.
    #[must_use]
    pub fn applied_tags(&self) -> Vec<&str> {
        self.stmts
            .iter()
            .filter_map(|stmt| match stmt {
                Statement::ApplyTag { name } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }
}

/// A configure-time statement handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    PathDeclare(Value),
    PathAppend(Value),
    PathPrepend(Value),
    PathRemove(Value),
    MacroDeclare(Value),
    MacroAppend(Value),
    MacroRemove(Value),
    TagDeclare { name: String, content: Vec<String> },
    ApplyTag { name: String },
}

impl Statement {
    /// Keyword naming this statement kind in the `configure.statements` list.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PathDeclare(_) => "declare-path",
            Self::PathAppend(_) => "path-append",
            Self::PathPrepend(_) => "path-prepend",
            Self::PathRemove(_) => "path-remove",
            Self::MacroDeclare(_) => "declare-macro",
            Self::MacroAppend(_) => "macro-append",
            Self::MacroRemove(_) => "macro-remove",
            Self::TagDeclare { .. } => "declare-tag",
            Self::ApplyTag { .. } => "apply-tag",
        }
    }

    /// Build a value statement from its `configure.statements` keyword.
    #[must_use]
    pub fn from_kind(kind: &str, value: Value) -> Option<Self> {
        let stmt = match kind {
            "declare-path" => Self::PathDeclare(value),
            "path-append" => Self::PathAppend(value),
            "path-prepend" => Self::PathPrepend(value),
            "path-remove" => Self::PathRemove(value),
            "declare-macro" => Self::MacroDeclare(value),
            "macro-append" => Self::MacroAppend(value),
            "macro-remove" => Self::MacroRemove(value),
            _ => return None,
        };
        Some(stmt)
    }

    /// Keywords accepted by [`Statement::from_kind`].
    pub const VALUE_KINDS: [&'static str; 7] = [
        "declare-path",
        "path-append",
        "path-prepend",
        "path-remove",
        "declare-macro",
        "macro-append",
        "macro-remove",
    ];

    /// Payload of the path and macro statements.
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        match self {
            Self::PathDeclare(v)
            | Self::PathAppend(v)
            | Self::PathPrepend(v)
            | Self::PathRemove(v)
            | Self::MacroDeclare(v)
            | Self::MacroAppend(v)
            | Self::MacroRemove(v) => Some(v),
            Self::TagDeclare { .. } | Self::ApplyTag { .. } => None,
        }
    }
}

/// The `build` section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Build {
    pub phase: Phase,
    pub targets: Vec<Target>,
}

/// Target fields with a fixed meaning for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KnownField {
    Source,
    Use,
    Defines,
    CFlags,
    CxxFlags,
    LinkFlags,
    ShlibFlags,
    StlibFlags,
    RPath,
    Includes,
    ExportIncludes,
    InstallPath,
}

impl KnownField {
    pub const ALL: [Self; 12] = [
        Self::Source,
        Self::Use,
        Self::Defines,
        Self::CFlags,
        Self::CxxFlags,
        Self::LinkFlags,
        Self::ShlibFlags,
        Self::StlibFlags,
        Self::RPath,
        Self::Includes,
        Self::ExportIncludes,
        Self::InstallPath,
    ];

    /// Key used in documents and generated scripts.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Source => "source",
            Self::Use => "use",
            Self::Defines => "defines",
            Self::CFlags => "cflags",
            Self::CxxFlags => "cxxflags",
            Self::LinkFlags => "linkflags",
            Self::ShlibFlags => "shlibflags",
            Self::StlibFlags => "stlibflags",
            Self::RPath => "rpath",
            Self::Includes => "includes",
            Self::ExportIncludes => "export_includes",
            Self::InstallPath => "install_path",
        }
    }

    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// One build target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Target {
    pub name: String,
    /// Overrides `name` as the produced artifact name.
    pub output_name: Option<String>,
    pub features: Vec<String>,
    /// Known fields in declaration order; each value is named by its [`KnownField::key`].
    pub fields: Vec<Value>,
    /// Any other keys, passed through to the engine in declaration order.
    pub extensions: Vec<Value>,
}

impl Target {
    /// Artifact name: `output_name` when given, else `name`.
    #[must_use]
    pub fn output(&self) -> &str {
        self.output_name.as_deref().unwrap_or(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_field_keys_round_trip() {
        for field in KnownField::ALL {
            assert_eq!(KnownField::from_key(field.key()), Some(field));
        }
        assert_eq!(KnownField::from_key("export_includes"), Some(KnownField::ExportIncludes));
        assert_eq!(KnownField::from_key("dict"), None);
    }

    #[test]
    fn test_statement_kinds() {
        for kind in Statement::VALUE_KINDS {
            let stmt = Statement::from_kind(kind, Value::new("X")).unwrap();
            assert_eq!(stmt.kind(), kind);
            assert_eq!(stmt.value().unwrap().name, "X");
        }
        assert!(Statement::from_kind("apply-tag", Value::new("X")).is_none());
        assert!(
            Statement::ApplyTag {
                name: "opt".to_string()
            }
            .value()
            .is_none()
        );
    }

    #[test]
    fn test_target_output_defaults_to_name() {
        let mut target = Target {
            name: "hello".to_string(),
            ..Target::default()
        };
        assert_eq!(target.output(), "hello");
        target.output_name = Some("hello-lib".to_string());
        assert_eq!(target.output(), "hello-lib");
    }

    #[test]
    fn test_applied_tags() {
        let configure = Configure {
            phase: Phase::default(),
            stmts: vec![
                Statement::ApplyTag {
                    name: "slc6".to_string(),
                },
                Statement::TagDeclare {
                    name: "opt".to_string(),
                    content: vec![],
                },
                Statement::ApplyTag {
                    name: "opt".to_string(),
                },
            ],
        };
        assert_eq!(configure.applied_tags(), ["slc6", "opt"]);
    }
}
