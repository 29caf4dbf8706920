//! Document loading: YAML text to an untyped tree.
//!
//! No semantic validation happens here. A document with no content (empty,
//! or only comments) loads as an empty map so that the schema mapper reports
//! the missing `package` section instead of a syntax error.

use crate::core::{HscriptError, Result};
use serde_yaml::{Mapping, Value as YamlValue};

/// Parse `text` into a generic YAML tree.
///
/// `origin` names the document in [`HscriptError::ParseError`] messages.
pub fn load(text: &str, origin: &str) -> Result<YamlValue> {
    if is_blank(text) {
        tracing::debug!("{origin}: empty document");
        return Ok(YamlValue::Mapping(Mapping::new()));
    }

    let tree: YamlValue = serde_yaml::from_str(text).map_err(|e| HscriptError::ParseError {
        file: origin.to_string(),
        reason: e.to_string(),
    })?;

    Ok(match tree {
        YamlValue::Null => YamlValue::Mapping(Mapping::new()),
        other => other,
    })
}

fn is_blank(text: &str) -> bool {
    text.lines().map(str::trim).all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

/// Human readable name of the shape of a YAML node, for type errors.
pub(crate) const fn shape(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "nothing (null)",
        YamlValue::Bool(_) => "a boolean",
        YamlValue::Number(_) => "a number",
        YamlValue::String(_) => "a string",
        YamlValue::Sequence(_) => "a list",
        YamlValue::Mapping(_) => "a map",
        YamlValue::Tagged(_) => "a tagged value",
    }
}

/// Text of a scalar node (string, number or boolean).
pub(crate) fn scalar_text(value: &YamlValue) -> Option<String> {
    match value {
        YamlValue::String(s) => Some(s.clone()),
        YamlValue::Number(n) => Some(n.to_string()),
        YamlValue::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_document() {
        for text in ["", "\n\n", "# only a comment\n", "---\n"] {
            let tree = load(text, "<input>").unwrap();
            assert_eq!(tree, YamlValue::Mapping(Mapping::new()), "input: {text:?}");
        }
    }

    #[test]
    fn test_load_keeps_key_order() {
        let tree = load("build: {b: {}, a: {}, c: {}}", "<input>").unwrap();
        let build = tree.get("build").and_then(YamlValue::as_mapping).unwrap();
        let keys: Vec<&str> = build.keys().filter_map(YamlValue::as_str).collect();
        assert_eq!(keys, ["b", "a", "c"]);
    }

    #[test]
    fn test_load_flow_style() {
        let tree = load(
            "package: {\n  name: \"mypkg\",\n  authors: [\"a\", \"b\"],\n}\n",
            "<input>",
        )
        .unwrap();
        assert_eq!(tree["package"]["name"].as_str(), Some("mypkg"));
    }

    #[test]
    fn test_load_malformed() {
        let err = load("package: {name: [unclosed", "pkg/hscript.yml").unwrap_err();
        match err {
            HscriptError::ParseError { file, .. } => assert_eq!(file, "pkg/hscript.yml"),
            other => panic!("expected ParseError, got {other:?}"),
        }
    }

    #[test]
    fn test_load_does_not_validate() {
        // A list root is syntactically valid; the mapper rejects it later
        let tree = load("- a\n- b\n", "<input>").unwrap();
        assert!(tree.is_sequence());
    }

    #[test]
    fn test_shape_and_scalar_text() {
        assert_eq!(shape(&YamlValue::from("x")), "a string");
        assert_eq!(shape(&YamlValue::Mapping(Mapping::new())), "a map");
        assert_eq!(scalar_text(&YamlValue::from(3)), Some("3".to_string()));
        assert_eq!(scalar_text(&YamlValue::from(true)), Some("true".to_string()));
        assert_eq!(scalar_text(&YamlValue::Null), None);
    }
}
