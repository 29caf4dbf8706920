//! Build-variant–conditional values.
//!
//! A [`Value`] is a named field whose content depends on which tags are active
//! when the downstream engine configures the package. It is stored as an
//! ordered list of `(tag expression, strings)` bindings; the conventional
//! `default` binding is the fallback. The compiler never chooses a binding.
//!
//! ```rust
//! use hscript_cli::hscript::value::{TagExpr, Value};
//!
//! let mut cflags = Value::with_default("cflags", vec!["-O2".to_string()]);
//! cflags.bind(TagExpr::parse("linux & debug"), ["-g".to_string()]);
//! cflags.bind(TagExpr::parse("linux&debug"), ["-O0".to_string()]);
//!
//! assert_eq!(cflags.bindings().len(), 2);
//! assert_eq!(cflags.get(&TagExpr::parse("linux & debug")).unwrap(), ["-g", "-O0"]);
//! ```

use std::fmt;

/// Keyword naming the fallback binding.
pub const DEFAULT_TAG: &str = "default";

/// Selector of a binding: the fallback, or a conjunction of tag names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TagExpr {
    /// Applies when no other binding matches.
    Default,
    /// Applies when every listed tag is active.
    All(Vec<String>),
}

impl TagExpr {
    /// Parse a source-document tag expression such as `"default"` or `"linux & opt"`.
    ///
    /// Tag names are trimmed and empty fragments dropped, so `"a&b"`, `"a & b"`,
    /// `"b & a"` and `"a & & b"` all compare equal. An expression with no tag name
    /// left is the default.
    #[must_use]
    pub fn parse(expr: &str) -> Self {
        let trimmed = expr.trim();
        if trimmed == DEFAULT_TAG {
            return Self::Default;
        }
        Self::all(trimmed.split('&').map(str::trim).filter(|t| !t.is_empty()))
    }

    /// Build a conjunction from tag names.
    ///
    /// Tags are kept sorted and unique: a conjunction has no order.
    pub fn all<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        tags.sort();
        tags.dedup();
        if tags.is_empty() { Self::Default } else { Self::All(tags) }
    }

    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Default)
    }

    /// Form used in source documents: tags joined with `" & "`.
    #[must_use]
    pub fn to_source(&self) -> String {
        match self {
            Self::Default => DEFAULT_TAG.to_string(),
            Self::All(tags) => tags.join(" & "),
        }
    }
}

/// Compact form used in generated scripts: tags joined with `&`.
impl fmt::Display for TagExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str(DEFAULT_TAG),
            Self::All(tags) => f.write_str(&tags.join("&")),
        }
    }
}

/// One `(tag expression, strings)` pair of a [`Value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValue {
    pub tag: TagExpr,
    pub value: Vec<String>,
}

/// A named, tag-conditional list of strings.
///
/// Invariant: at most one binding per distinct [`TagExpr`]. Binding an
/// expression that already exists appends to its list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    pub name: String,
    set: Vec<KeyValue>,
}

impl Value {
    /// Create a value without any binding.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            set: Vec::new(),
        }
    }

    /// Create a value with a single `default` binding.
    pub fn with_default(name: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            name: name.into(),
            set: vec![KeyValue {
                tag: TagExpr::Default,
                value: values,
            }],
        }
    }

    /// Add strings under `tag`, appending to an existing binding for the same expression.
    pub fn bind<I>(&mut self, tag: TagExpr, values: I)
    where
        I: IntoIterator<Item = String>,
    {
        if let Some(existing) = self.set.iter_mut().find(|kv| kv.tag == tag) {
            existing.value.extend(values);
        } else {
            self.set.push(KeyValue {
                tag,
                value: values.into_iter().collect(),
            });
        }
    }

    /// Bindings in declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[KeyValue] {
        &self.set
    }

    /// Strings bound to exactly `tag`, if any.
    #[must_use]
    pub fn get(&self, tag: &TagExpr) -> Option<&[String]> {
        self.set.iter().find(|kv| &kv.tag == tag).map(|kv| kv.value.as_slice())
    }

    /// Strings bound to `default`, if any.
    #[must_use]
    pub fn default_value(&self) -> Option<&[String]> {
        self.get(&TagExpr::Default)
    }

    /// True when the value is a single `default` binding.
    #[must_use]
    pub fn is_unconditional(&self) -> bool {
        matches!(self.set.as_slice(), [kv] if kv.tag.is_default())
    }
}
