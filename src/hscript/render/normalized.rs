//! Normalized-document renderer.
//!
//! Writes the model back as an hscript document, built as an ordered
//! [`serde_yaml::Mapping`] so that key order follows the model. Empty lists
//! and sections are left out. Configure statements are grouped: those that
//! round-trip through the `env` heuristic go to `env`, tag statements to
//! `declare-tags`/`apply-tags`, and the rest to `statements`. The grouping is
//! stable, so normalizing a normalized document returns it unchanged.

use super::GENERATED_MARKER;
use crate::hscript::deps::Dependency;
use crate::hscript::mapper::env_statement;
use crate::hscript::model::{Configure, Document, Package, Phase, Statement, Target};
use crate::hscript::value::Value;
use serde_yaml::{Mapping, Value as YamlValue};
use std::collections::HashSet;

/// Render `doc` as a normalized hscript document.
#[must_use]
pub fn render(doc: &Document) -> String {
    let mut root = Mapping::new();
    root.insert("package".into(), package(&doc.package));
    insert_map(&mut root, "options", phase(&doc.options));
    insert_map(&mut root, "configure", configure(&doc.configure));

    let mut build = phase(&doc.build.phase);
    for target in &doc.build.targets {
        build.insert(target.name.as_str().into(), YamlValue::Mapping(target_fields(target)));
    }
    insert_map(&mut root, "build", build);

    // Serializing a tree of plain strings, lists and maps cannot fail
    let body = serde_yaml::to_string(&root).unwrap_or_default();
    format!("{GENERATED_MARKER}\n{body}")
}

fn package(pkg: &Package) -> YamlValue {
    let mut map = Mapping::new();
    map.insert("name".into(), pkg.name.as_str().into());
    insert_list(&mut map, "authors", &pkg.authors);
    insert_list(&mut map, "managers", &pkg.managers);
    if let Some(version) = &pkg.version {
        map.insert("version".into(), version.as_str().into());
    }

    let mut deps = Mapping::new();
    let buckets: [(&str, fn(&Dependency) -> bool); 3] = [
        ("public", |d| d.visibility.is_public()),
        ("private", |d| d.visibility.is_private()),
        ("runtime", |d| d.visibility.is_runtime()),
    ];
    for (name, has_bit) in buckets {
        let entries: Vec<String> =
            pkg.deps.iter().filter(|d| has_bit(d)).map(Dependency::to_source).collect();
        insert_list(&mut deps, name, &entries);
    }
    insert_map(&mut map, "deps", deps);

    YamlValue::Mapping(map)
}

fn phase(phase: &Phase) -> Mapping {
    let mut map = Mapping::new();
    insert_list(&mut map, "tools", &phase.tools);
    insert_list(&mut map, "hwaf-call", &phase.hooks);
    map
}

fn configure(configure: &Configure) -> Mapping {
    let mut map = phase(&configure.phase);
    let mut env = Mapping::new();
    let mut env_names = HashSet::new();
    let mut declare_tags = Vec::new();
    let mut apply_tags = Vec::new();
    let mut statements = Vec::new();

    for stmt in &configure.stmts {
        match stmt {
            Statement::TagDeclare { name, content } => {
                let mut entry = Mapping::new();
                entry.insert(name.as_str().into(), strings(content));
                declare_tags.push(YamlValue::Mapping(entry));
            }
            Statement::ApplyTag { name } => apply_tags.push(name.clone()),
            stmt => {
                let value = stmt.value().map(|v| (v, env_text(stmt)));
                match value {
                    Some((v, Some(text))) if env_names.insert(v.name.clone()) => {
                        env.insert(v.name.as_str().into(), text.into());
                    }
                    Some((v, _)) => {
                        let mut body = Mapping::new();
                        body.insert(v.name.as_str().into(), value_node(v));
                        let mut entry = Mapping::new();
                        entry.insert(stmt.kind().into(), YamlValue::Mapping(body));
                        statements.push(YamlValue::Mapping(entry));
                    }
                    None => {}
                }
            }
        }
    }

    insert_map(&mut map, "env", env);
    if !declare_tags.is_empty() {
        map.insert("declare-tags".into(), YamlValue::Sequence(declare_tags));
    }
    insert_list(&mut map, "apply-tags", &apply_tags);
    if !statements.is_empty() {
        map.insert("statements".into(), YamlValue::Sequence(statements));
    }
    map
}

/// The `env` spelling of `stmt`, when reading it back yields the same statement.
fn env_text(stmt: &Statement) -> Option<String> {
    let value = stmt.value()?;
    let single = match value.default_value() {
        Some([single]) if value.is_unconditional() => single,
        _ => return None,
    };
    let self_ref = format!("${{{}}}", value.name);
    let text = match stmt {
        Statement::PathAppend(_) => format!("{self_ref}:{single}"),
        Statement::PathPrepend(_) => format!("{single}:{self_ref}"),
        Statement::MacroDeclare(_) => single.clone(),
        _ => return None,
    };
    (env_statement(&value.name, &text).as_ref() == Some(stmt)).then_some(text)
}

fn target_fields(target: &Target) -> Mapping {
    let mut map = Mapping::new();
    if let Some(output) = &target.output_name {
        map.insert("target".into(), output.as_str().into());
    }
    insert_list(&mut map, "features", &target.features);
    for value in target.fields.iter().chain(&target.extensions) {
        map.insert(value.name.as_str().into(), value_node(value));
    }
    map
}

/// A plain list for an unconditional value, else a map keyed by tag expression.
fn value_node(value: &Value) -> YamlValue {
    if value.is_unconditional() {
        return strings(value.default_value().unwrap_or_default());
    }
    let mut map = Mapping::new();
    for kv in value.bindings() {
        map.insert(kv.tag.to_source().into(), strings(&kv.value));
    }
    YamlValue::Mapping(map)
}

fn strings(items: &[String]) -> YamlValue {
    YamlValue::Sequence(items.iter().map(|s| s.as_str().into()).collect())
}

fn insert_list(map: &mut Mapping, key: &str, items: &[String]) {
    if !items.is_empty() {
        map.insert(key.into(), strings(items));
    }
}

fn insert_map(map: &mut Mapping, key: &str, value: Mapping) {
    if !value.is_empty() {
        map.insert(key.into(), YamlValue::Mapping(value));
    }
}
