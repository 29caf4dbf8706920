//! Engine-script renderer.
//!
//! Emits a python module for the downstream build engine: a `PACKAGE`
//! metadata dict, `pkg_deps(ctx)` and one function per phase. Conditional
//! values are written as tuples of `(tag-expression, [strings])` pairs and
//! evaluated by the engine at its own configure step.

use super::GENERATED_MARKER;
use crate::hscript::deps::{Dependency, Visibility};
use crate::hscript::model::{Document, Phase, Statement, Target};
use crate::hscript::value::Value;
use std::fmt::Write;

const INDENT: &str = "    ";
const SEPARATOR: &str = "### ---------------------------------------------------------------------------";

const PY_KEYWORDS: [&str; 35] = [
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Render `doc` as an engine script.
#[must_use]
pub fn render(doc: &Document) -> String {
    let mut out = String::new();
    out.push_str("# -*- python -*-\n");
    out.push_str(GENERATED_MARKER);
    out.push('\n');

    write_package(&mut out, doc);
    write_deps(&mut out, &doc.package.deps);
    write_phase(&mut out, "options", &doc.options, |_| {});
    write_phase(&mut out, "configure", &doc.configure.phase, |out| {
        for stmt in &doc.configure.stmts {
            write_statement(out, stmt);
        }
    });
    write_phase(&mut out, "build", &doc.build.phase, |out| {
        for target in &doc.build.targets {
            write_target(out, target);
        }
    });

    out
}

fn write_package(out: &mut String, doc: &Document) {
    let pkg = &doc.package;
    out.push_str("\n## -- package metadata --\n");
    out.push_str("PACKAGE = {\n");
    let _ = writeln!(out, "{INDENT}\"name\": {},", py_str(&pkg.name));
    let _ = writeln!(out, "{INDENT}\"authors\": {},", py_list(&pkg.authors));
    let _ = writeln!(out, "{INDENT}\"managers\": {},", py_list(&pkg.managers));
    if let Some(version) = &pkg.version {
        let _ = writeln!(out, "{INDENT}\"version\": {},", py_str(version));
    }
    out.push_str("}\n");
}

/// Bucket a dependency is listed under: its strongest visibility.
fn bucket(vis: Visibility) -> &'static str {
    if vis.is_public() {
        "public"
    } else if vis.is_private() {
        "private"
    } else {
        "runtime"
    }
}

fn write_deps(out: &mut String, deps: &[Dependency]) {
    let _ = write!(out, "\n{SEPARATOR}\ndef pkg_deps(ctx):\n");
    for name in ["public", "private", "runtime"] {
        let _ = write!(out, "\n{INDENT}## {name} dependencies\n");
        for dep in deps.iter().filter(|d| bucket(d.visibility) == name) {
            let mut args = vec![py_str(&dep.name)];
            if let Some(version) = &dep.version {
                args.push(format!("version={}", py_str(version)));
            }
            for (bit, flag) in [
                (Visibility::PUBLIC, "public"),
                (Visibility::PRIVATE, "private"),
                (Visibility::RUNTIME, "runtime"),
            ] {
                if dep.visibility.contains(bit) {
                    args.push(format!("{flag}=True"));
                }
            }
            let _ = writeln!(out, "{INDENT}ctx.use_pkg({})", args.join(", "));
        }
    }
    let _ = write!(out, "\n{INDENT}return # pkg_deps\n");
}

fn write_phase(out: &mut String, name: &str, phase: &Phase, body: impl FnOnce(&mut String)) {
    let _ = write!(out, "\n\n{SEPARATOR}\ndef {name}(ctx):\n\n");
    for tool in &phase.tools {
        let _ = writeln!(out, "{INDENT}ctx.load({})", py_str(tool));
    }
    for hook in &phase.hooks {
        let _ = writeln!(
            out,
            "{INDENT}ctx.hwaf_load_fct(PACKAGE[\"name\"], {}, {})",
            py_str(name),
            py_str(hook)
        );
    }
    body(out);
    let _ = write!(out, "\n{INDENT}return # {name}\n");
}

fn write_statement(out: &mut String, stmt: &Statement) {
    let (call, value) = match stmt {
        Statement::PathDeclare(v) => ("hwaf_declare_path", v),
        Statement::PathAppend(v) => ("hwaf_path_append", v),
        Statement::PathPrepend(v) => ("hwaf_path_prepend", v),
        Statement::PathRemove(v) => ("hwaf_path_remove", v),
        Statement::MacroDeclare(v) => ("hwaf_declare_macro", v),
        Statement::MacroAppend(v) => ("hwaf_macro_append", v),
        Statement::MacroRemove(v) => ("hwaf_macro_remove", v),
        Statement::TagDeclare { name, content } => {
            let _ = writeln!(
                out,
                "{INDENT}ctx.hwaf_declare_tag({}, content={})",
                py_str(name),
                py_list(content)
            );
            return;
        }
        Statement::ApplyTag { name } => {
            let _ = writeln!(out, "{INDENT}ctx.hwaf_apply_tag({})", py_str(name));
            return;
        }
    };
    let _ = writeln!(
        out,
        "{INDENT}ctx.{call}({}, {})",
        py_str(&value.name),
        value_literal(value)
    );
}

fn write_target(out: &mut String, target: &Target) {
    let _ = writeln!(out, "\n{INDENT}ctx.hwaf_target(");
    let _ = writeln!(out, "{INDENT}{INDENT}name={},", py_str(&target.name));
    let _ = writeln!(out, "{INDENT}{INDENT}target={},", py_str(target.output()));
    let _ = writeln!(out, "{INDENT}{INDENT}features={},", py_str(&target.features.join(" ")));

    for value in target.fields.iter().chain(&target.extensions) {
        if is_identifier(&value.name) {
            let _ = writeln!(out, "{INDENT}{INDENT}{}={},", value.name, value_literal(value));
        } else {
            let _ = writeln!(
                out,
                "{INDENT}{INDENT}**{{{}: {}}},",
                py_str(&value.name),
                value_literal(value)
            );
        }
    }
    let _ = writeln!(out, "{INDENT})");
}

/// `(("default", [...]), ("linux&opt", [...]),)` in binding order.
fn value_literal(value: &Value) -> String {
    let mut lit = String::from("(");
    for kv in value.bindings() {
        let _ = write!(lit, "({}, {}),", py_str(&kv.tag.to_string()), py_list(&kv.value));
    }
    lit.push(')');
    lit
}

fn py_list(items: &[String]) -> String {
    let items: Vec<String> = items.iter().map(|s| py_str(s)).collect();
    format!("[{}]", items.join(", "))
}

/// Double-quoted python string literal.
fn py_str(s: &str) -> String {
    let mut lit = String::with_capacity(s.len() + 2);
    lit.push('"');
    for c in s.chars() {
        match c {
            '\\' => lit.push_str("\\\\"),
            '"' => lit.push_str("\\\""),
            '\n' => lit.push_str("\\n"),
            '\r' => lit.push_str("\\r"),
            '\t' => lit.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(lit, "\\x{:02x}", u32::from(c));
            }
            c => lit.push(c),
        }
    }
    lit.push('"');
    lit
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
    starts_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_') && !PY_KEYWORDS.contains(&name)
}
