//! Build target extraction.
//!
//! Each key of the `build` section other than `tools`, `hwaf-call` and `env`
//! names a target. Its map of fields is split into:
//!
//! - `features`, normalized to a flat list of tokens;
//! - `name` (checked against the key) and `target` (the output name);
//! - known fields ([`KnownField`]) and extensions (every other key), both
//!   turned into [`Value`]s.
//!
//! A field value may be a scalar, a list, a list of lists, or a map from tag
//! expression to any of those:
//!
//! ```yaml
//! hello:
//!   features: cxx cxxshlib
//!   source: [src/*.cxx]
//!   cxxflags: {default: [-O2], "linux & debug": [-g]}
//! ```

use super::loader::{scalar_text, shape};
use super::model::{KnownField, Target};
use super::value::{TagExpr, Value};
use crate::core::{HscriptError, Result};
use serde_yaml::{Mapping, Value as YamlValue};

/// Build a [`Target`] from the field map declared under `build.<key>`.
pub fn extract_target(key: &str, fields: &Mapping) -> Result<Target> {
    let mut target = Target {
        name: key.to_string(),
        ..Target::default()
    };

    for (field_key, field_value) in fields {
        let field = field_key.as_str().ok_or_else(|| {
            HscriptError::type_error(format!("build.{key}"), "string field names", shape(field_key))
        })?;
        let path = format!("build.{key}.{field}");

        match field {
            "features" => collect_features(field_value, &path, &mut target.features)?,
            "name" => {
                let name = field_value
                    .as_str()
                    .ok_or_else(|| HscriptError::type_error(&path, "a string", shape(field_value)))?;
                if name != key {
                    return Err(HscriptError::ConsistencyError {
                        reason: format!(
                            "target declared under 'build.{key}' names itself '{name}'"
                        ),
                    });
                }
            }
            "target" => {
                let output = field_value
                    .as_str()
                    .ok_or_else(|| HscriptError::type_error(&path, "a string", shape(field_value)))?;
                target.output_name = Some(output.to_string());
            }
            other => {
                let value = field_value_of(other, field_value, &path)?;
                if KnownField::from_key(other).is_some() {
                    target.fields.push(value);
                } else {
                    tracing::debug!("target '{key}': passing extension field '{other}' through");
                    target.extensions.push(value);
                }
            }
        }
    }

    Ok(target)
}

/// Flatten a `features` declaration into whitespace-separated tokens.
fn collect_features(value: &YamlValue, path: &str, out: &mut Vec<String>) -> Result<()> {
    match value {
        YamlValue::Null => {}
        YamlValue::Sequence(items) => {
            for item in items {
                collect_features(item, path, out)?;
            }
        }
        scalar => {
            let text = scalar_text(scalar).ok_or_else(|| {
                HscriptError::type_error(
                    path,
                    "a string or a list of strings",
                    shape(scalar),
                )
            })?;
            out.extend(text.split_whitespace().map(ToString::to_string));
        }
    }
    Ok(())
}

/// Turn a field declaration into a [`Value`] named `name`.
///
/// Maps bind each entry under its tag expression; anything else is bound to
/// `default`.
pub(crate) fn field_value_of(name: &str, value: &YamlValue, path: &str) -> Result<Value> {
    match value {
        YamlValue::Mapping(bindings) => {
            let mut out = Value::new(name);
            for (expr, leaves) in bindings {
                let expr = scalar_text(expr).ok_or_else(|| {
                    HscriptError::type_error(path, "tag expressions as map keys", shape(expr))
                })?;
                let mut strings = Vec::new();
                collect_leaves(leaves, &format!("{path}[{expr}]"), &mut strings)?;
                out.bind(TagExpr::parse(&expr), strings);
            }
            Ok(out)
        }
        other => {
            let mut strings = Vec::new();
            collect_leaves(other, path, &mut strings)?;
            Ok(Value::with_default(name, strings))
        }
    }
}

/// Flatten scalars, lists and lists of lists into strings.
fn collect_leaves(value: &YamlValue, path: &str, out: &mut Vec<String>) -> Result<()> {
    match value {
        YamlValue::Null => {}
        YamlValue::Sequence(items) => {
            for item in items {
                collect_leaves(item, path, out)?;
            }
        }
        scalar => {
            let text = scalar_text(scalar).ok_or_else(|| {
                HscriptError::type_error(
                    path,
                    "a string, a list of strings or a list of lists of strings",
                    shape(scalar),
                )
            })?;
            out.push(text);
        }
    }
    Ok(())
}
