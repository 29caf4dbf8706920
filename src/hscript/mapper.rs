//! Schema mapping: untyped YAML tree to the typed [`Document`].
//!
//! The mapper walks every section in document order, checks required keys and
//! value shapes, and delegates dependency folding to [`classify`] and target
//! fields to [`extract_target`].
//!
//! # Accepted document
//!
//! ```yaml
//! package:
//!   name: mypkg
//!   authors: [alice, bob]
//!   deps: {public: [ROOT], runtime: [Python]}
//! configure:
//!   tools: [find_root]
//!   env: {PYTHONPATH: "${PYTHONPATH}:${INSTALL_AREA}/python"}
//!   declare-tags: [{opt: [x86_64, linux]}]
//!   apply-tags: opt
//! build:
//!   hello:
//!     features: cxx cxxshlib
//!     source: [src/*.cxx]
//! ```
//!
//! # Environment heuristic
//!
//! `configure.env` values are classified by their shape: `"${NAME}:suffix"`
//! appends `suffix` to the path variable `NAME`, `"prefix:${NAME}"` prepends
//! `prefix`, and anything else declares `NAME` directly.

use super::deps::classify;
use super::loader::{scalar_text, shape};
use super::model::{Build, Configure, Document, Package, Phase, Statement};
use super::target::{extract_target, field_value_of};
use super::value::Value;
use crate::core::{HscriptError, Result};
use serde_yaml::{Mapping, Value as YamlValue};
use std::collections::HashSet;
use strsim::levenshtein;

/// Top-level sections of an hscript document.
pub const SECTIONS: [&str; 4] = ["package", "options", "configure", "build"];

const DEP_LISTS: [&str; 3] = ["public", "private", "runtime"];

/// Maximum edit distance, as a percentage of the key length, for "did you mean" hints.
const SIMILARITY_THRESHOLD_PERCENT: usize = 50;

/// Map a loaded document tree into a typed [`Document`].
pub fn map_document(root: &YamlValue) -> Result<Document> {
    let root = root
        .as_mapping()
        .ok_or_else(|| HscriptError::type_error("<document>", "a map of sections", shape(root)))?;

    for key in root.keys() {
        let key = key_str(key, "<document>")?;
        if !SECTIONS.contains(&key) {
            return Err(HscriptError::schema(unknown_key_message(
                "top-level section",
                key,
                &SECTIONS,
            )));
        }
    }

    let package = root
        .get("package")
        .ok_or_else(|| HscriptError::schema("missing mandatory package section"))?;
    let package = map_package(package)?;
    tracing::debug!("mapping hscript document for package '{}'", package.name);

    let options = match section(root, "options")? {
        Some(options) => map_phase_section(options, "options")?,
        None => Phase::default(),
    };
    let configure = match section(root, "configure")? {
        Some(configure) => map_configure(configure)?,
        None => Configure::default(),
    };
    let build = match section(root, "build")? {
        Some(build) => map_build(build)?,
        None => Build::default(),
    };

    Ok(Document {
        package,
        options,
        configure,
        build,
    })
}

/// Fetch an optional section that must be a map when present.
fn section<'a>(root: &'a Mapping, name: &str) -> Result<Option<&'a Mapping>> {
    match root.get(name) {
        None | Some(YamlValue::Null) => Ok(None),
        Some(YamlValue::Mapping(map)) => Ok(Some(map)),
        Some(other) => Err(HscriptError::type_error(name, "a map", shape(other))),
    }
}

fn map_package(value: &YamlValue) -> Result<Package> {
    let map = value
        .as_mapping()
        .ok_or_else(|| HscriptError::type_error("package", "a map", shape(value)))?;

    let name = match map.get("name") {
        None | Some(YamlValue::Null) => {
            return Err(HscriptError::schema("missing mandatory 'name' in package section"));
        }
        Some(YamlValue::String(name)) => name.trim().to_string(),
        Some(other) => return Err(HscriptError::type_error("package.name", "a string", shape(other))),
    };
    if name.is_empty() {
        return Err(HscriptError::schema("package name must not be empty"));
    }

    let mut package = Package {
        name,
        ..Package::default()
    };

    for (key, value) in map {
        let key = key_str(key, "package")?;
        let path = format!("package.{key}");
        match key {
            "name" => {}
            "authors" => package.authors = string_or_list(value, &path)?,
            "managers" => package.managers = string_or_list(value, &path)?,
            "version" => {
                package.version = match value {
                    YamlValue::Null => None,
                    other => Some(scalar_text(other).ok_or_else(|| {
                        HscriptError::type_error(&path, "a string", shape(other))
                    })?),
                };
            }
            "deps" => package.deps = map_deps(value)?,
            other => tracing::warn!("ignoring unknown key 'package.{other}'"),
        }
    }

    Ok(package)
}

fn map_deps(value: &YamlValue) -> Result<Vec<super::deps::Dependency>> {
    let map = match value {
        YamlValue::Null => return Ok(Vec::new()),
        YamlValue::Mapping(map) => map,
        other => return Err(HscriptError::type_error("package.deps", "a map", shape(other))),
    };

    let mut lists: [Vec<String>; 3] = Default::default();
    for (key, value) in map {
        let key = key_str(key, "package.deps")?;
        let slot = DEP_LISTS.iter().position(|k| *k == key).ok_or_else(|| {
            HscriptError::schema(unknown_key_message("dependency list", key, &DEP_LISTS))
        })?;
        lists[slot] = string_list(value, &format!("package.deps.{key}"))?;
    }

    let [public, private, runtime] = lists;
    Ok(classify(&public, &private, &runtime))
}

/// Handle the keys shared by all phase sections; returns false for other keys.
fn map_phase_key(phase: &mut Phase, key: &str, value: &YamlValue, section: &str) -> Result<bool> {
    match key {
        "tools" => phase.tools = string_list(value, &format!("{section}.tools"))?,
        "hwaf-call" => phase.hooks = string_list(value, &format!("{section}.hwaf-call"))?,
        _ => return Ok(false),
    }
    Ok(true)
}

fn map_phase_section(map: &Mapping, section: &str) -> Result<Phase> {
    let mut phase = Phase::default();
    for (key, value) in map {
        let key = key_str(key, section)?;
        if !map_phase_key(&mut phase, key, value, section)? {
            tracing::warn!("ignoring unknown key '{section}.{key}'");
        }
    }
    Ok(phase)
}

fn map_configure(map: &Mapping) -> Result<Configure> {
    let mut configure = Configure::default();
    let mut declared_tags = HashSet::new();

    for (key, value) in map {
        let key = key_str(key, "configure")?;
        if map_phase_key(&mut configure.phase, key, value, "configure")? {
            continue;
        }
        match key {
            "env" => map_env(value, &mut configure.stmts)?,
            "declare-tags" => map_declare_tags(value, &mut declared_tags, &mut configure.stmts)?,
            "apply-tags" => {
                for name in string_or_list(value, "configure.apply-tags")? {
                    configure.stmts.push(Statement::ApplyTag {
                        name,
                    });
                }
            }
            "statements" => map_statements(value, &mut configure.stmts)?,
            other => tracing::warn!("ignoring unknown key 'configure.{other}'"),
        }
    }

    Ok(configure)
}

fn map_env(value: &YamlValue, stmts: &mut Vec<Statement>) -> Result<()> {
    let map = match value {
        YamlValue::Null => return Ok(()),
        YamlValue::Mapping(map) => map,
        other => return Err(HscriptError::type_error("configure.env", "a map", shape(other))),
    };

    for (name, value) in map {
        let name = key_str(name, "configure.env")?;
        let text = value.as_str().ok_or_else(|| {
            HscriptError::type_error(format!("configure.env.{name}"), "a string", shape(value))
        })?;
        if let Some(stmt) = env_statement(name, text) {
            stmts.push(stmt);
        }
    }
    Ok(())
}

/// Classify one environment entry by the shape of its value.
///
/// Returns `None` for a bare self-reference (`NAME: "${NAME}"`), which has no effect.
#[must_use]
pub fn env_statement(name: &str, text: &str) -> Option<Statement> {
    let self_ref = format!("${{{name}}}");
    if text == self_ref {
        tracing::debug!("env '{name}' only references itself, skipping");
        return None;
    }

    if let Some(suffix) = text.strip_prefix(&format!("{self_ref}:")) {
        return Some(Statement::PathAppend(Value::with_default(name, vec![suffix.to_string()])));
    }
    if let Some(prefix) = text.strip_suffix(&format!(":{self_ref}")) {
        return Some(Statement::PathPrepend(Value::with_default(name, vec![prefix.to_string()])));
    }
    Some(Statement::MacroDeclare(Value::with_default(name, vec![text.to_string()])))
}

fn map_declare_tags(
    value: &YamlValue,
    declared: &mut HashSet<String>,
    stmts: &mut Vec<Statement>,
) -> Result<()> {
    let items = match value {
        YamlValue::Null => return Ok(()),
        YamlValue::Sequence(items) => items,
        other => {
            return Err(HscriptError::type_error(
                "configure.declare-tags",
                "a list of single-key maps",
                shape(other),
            ));
        }
    };

    for (idx, item) in items.iter().enumerate() {
        let path = format!("configure.declare-tags[{idx}]");
        let (name, content) = single_entry(item, &path)?;
        let name = key_str(name, &path)?.to_string();
        let content = string_or_list(content, &format!("{path}.{name}"))?;

        if !declared.insert(name.clone()) {
            return Err(HscriptError::ConsistencyError {
                reason: format!("tag '{name}' is declared more than once in configure.declare-tags"),
            });
        }
        stmts.push(Statement::TagDeclare {
            name,
            content,
        });
    }
    Ok(())
}

fn map_statements(value: &YamlValue, stmts: &mut Vec<Statement>) -> Result<()> {
    let items = match value {
        YamlValue::Null => return Ok(()),
        YamlValue::Sequence(items) => items,
        other => {
            return Err(HscriptError::type_error(
                "configure.statements",
                "a list of single-key maps",
                shape(other),
            ));
        }
    };

    for (idx, item) in items.iter().enumerate() {
        let path = format!("configure.statements[{idx}]");
        let (kind, body) = single_entry(item, &path)?;
        let kind = key_str(kind, &path)?;
        let (name, value) = single_entry(body, &format!("{path}.{kind}"))?;
        let name = key_str(name, &path)?;
        let value = field_value_of(name, value, &format!("{path}.{kind}.{name}"))?;

        let stmt = Statement::from_kind(kind, value).ok_or_else(|| {
            HscriptError::schema(unknown_key_message("statement kind", kind, &Statement::VALUE_KINDS))
        })?;
        stmts.push(stmt);
    }
    Ok(())
}

fn map_build(map: &Mapping) -> Result<Build> {
    let mut build = Build::default();
    let mut outputs: Vec<(String, String)> = Vec::new();

    for (key, value) in map {
        let key = key_str(key, "build")?;
        if map_phase_key(&mut build.phase, key, value, "build")? {
            continue;
        }
        if key == "env" {
            tracing::warn!("ignoring 'build.env': environment belongs to the configure section");
            continue;
        }

        let fields = value.as_mapping().ok_or_else(|| {
            HscriptError::type_error(format!("build.{key}"), "a map of target fields", shape(value))
        })?;
        let target = extract_target(key, fields)?;

        if let Some((other, _)) = outputs.iter().find(|(_, out)| out == target.output()) {
            return Err(HscriptError::ConsistencyError {
                reason: format!(
                    "targets '{other}' and '{}' both produce '{}'",
                    target.name,
                    target.output()
                ),
            });
        }
        outputs.push((target.name.clone(), target.output().to_string()));
        build.targets.push(target);
    }

    Ok(build)
}

/// A string map key, or a type error naming the enclosing path.
fn key_str<'a>(key: &'a YamlValue, path: &str) -> Result<&'a str> {
    key.as_str()
        .ok_or_else(|| HscriptError::type_error(path, "string keys", shape(key)))
}

/// The only `(key, value)` pair of a single-key map.
fn single_entry<'a>(value: &'a YamlValue, path: &str) -> Result<(&'a YamlValue, &'a YamlValue)> {
    match value {
        YamlValue::Mapping(map) if map.len() == 1 => {
            map.iter().next().ok_or_else(|| HscriptError::type_error(path, "a single-key map", "an empty map"))
        }
        YamlValue::Mapping(map) => Err(HscriptError::type_error(
            path,
            "a single-key map",
            format!("a map with {} keys", map.len()),
        )),
        other => Err(HscriptError::type_error(path, "a single-key map", shape(other))),
    }
}

/// A list of scalars. `null` is an empty list; a lone scalar is rejected.
fn string_list(value: &YamlValue, path: &str) -> Result<Vec<String>> {
    match value {
        YamlValue::Null => Ok(Vec::new()),
        YamlValue::Sequence(_) => string_or_list(value, path),
        other => Err(HscriptError::type_error(path, "a list of strings", shape(other))),
    }
}

/// A scalar or a list of scalars, as a list of strings. `null` is an empty list.
fn string_or_list(value: &YamlValue, path: &str) -> Result<Vec<String>> {
    let expected = "a string or a list of strings";
    match value {
        YamlValue::Null => Ok(Vec::new()),
        YamlValue::Sequence(items) => items
            .iter()
            .map(|item| {
                scalar_text(item).ok_or_else(|| HscriptError::type_error(path, expected, shape(item)))
            })
            .collect(),
        other => scalar_text(other)
            .map(|s| vec![s])
            .ok_or_else(|| HscriptError::type_error(path, expected, shape(other))),
    }
}

fn unknown_key_message(what: &str, key: &str, known: &[&str]) -> String {
    let suggestion = known
        .iter()
        .map(|candidate| (*candidate, levenshtein(key, candidate)))
        .filter(|(_, dist)| *dist <= key.len() * SIMILARITY_THRESHOLD_PERCENT / 100)
        .min_by_key(|(_, dist)| *dist)
        .map(|(candidate, _)| candidate);

    match suggestion {
        Some(candidate) => format!("unknown {what} '{key}' (did you mean '{candidate}'?)"),
        None => format!("unknown {what} '{key}' (expected one of: {})", known.join(", ")),
    }
}
