//! Dependency classification.
//!
//! A package declares dependency names in three lists (`public`, `private`,
//! `runtime`). [`classify`] folds them into one ordered list of
//! [`Dependency`] records:
//!
//! - every `public` entry appends a record with [`Visibility::PUBLIC`];
//! - every `private` entry appends a record with [`Visibility::PRIVATE`], even
//!   when the same name was declared public;
//! - a `runtime` entry ORs [`Visibility::RUNTIME`] into the first record with
//!   the same name, or appends a runtime-only record.
//!
//! A list entry may carry a version after the name: `"ROOT 6.02"`.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Set of visibility bits carried by a [`Dependency`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Visibility(u8);

impl Visibility {
    pub const NONE: Self = Self(0);
    pub const PUBLIC: Self = Self(1);
    pub const PRIVATE: Self = Self(1 << 1);
    pub const RUNTIME: Self = Self(1 << 2);

    /// True when every bit of `other` is set in `self`.
    ///
    /// `NONE` has no bits, so only a non-empty `other` can make this
    /// discriminating; all named constants are non-zero.
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[must_use]
    pub const fn is_public(self) -> bool {
        self.contains(Self::PUBLIC)
    }

    #[must_use]
    pub const fn is_private(self) -> bool {
        self.contains(Self::PRIVATE)
    }

    #[must_use]
    pub const fn is_runtime(self) -> bool {
        self.contains(Self::RUNTIME)
    }
}

impl BitOr for Visibility {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Visibility {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (Self::PUBLIC, "public"),
            (Self::PRIVATE, "private"),
            (Self::RUNTIME, "runtime"),
        ]
        .into_iter()
        .filter(|(bit, _)| self.contains(*bit))
        .map(|(_, name)| name)
        .collect();

        if names.is_empty() { f.write_str("none") } else { f.write_str(&names.join("|")) }
    }
}

/// A declared dependency on another package.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dependency {
    pub name: String,
    pub version: Option<String>,
    pub visibility: Visibility,
}

impl Dependency {
    /// Parse a dependency list entry: `"Name"` or `"Name version"`.
    #[must_use]
    pub fn parse(entry: &str, visibility: Visibility) -> Self {
        let entry = entry.trim();
        match entry.split_once(char::is_whitespace) {
            Some((name, version)) if !version.trim().is_empty() => Self {
                name: name.to_string(),
                version: Some(version.trim().to_string()),
                visibility,
            },
            _ => Self {
                name: entry.to_string(),
                version: None,
                visibility,
            },
        }
    }

    /// Source-document form of this dependency, as accepted by [`Dependency::parse`].
    #[must_use]
    pub fn to_source(&self) -> String {
        match &self.version {
            Some(version) => format!("{} {}", self.name, version),
            None => self.name.clone(),
        }
    }
}

/// Fold the three declared lists into one ordered dependency list.
#[must_use]
pub fn classify(public: &[String], private: &[String], runtime: &[String]) -> Vec<Dependency> {
    let mut deps: Vec<Dependency> = Vec::with_capacity(public.len() + private.len() + runtime.len());

    for entry in public {
        deps.push(Dependency::parse(entry, Visibility::PUBLIC));
    }
    for entry in private {
        deps.push(Dependency::parse(entry, Visibility::PRIVATE));
    }
    for entry in runtime {
        let dep = Dependency::parse(entry, Visibility::RUNTIME);
        match deps.iter_mut().find(|d| d.name == dep.name) {
            Some(existing) => {
                tracing::trace!("merging runtime dependency '{}' into existing record", dep.name);
                existing.visibility |= Visibility::RUNTIME;
                if existing.version.is_none() {
                    existing.version = dep.version;
                }
            }
            None => deps.push(dep),
        }
    }

    deps
}
