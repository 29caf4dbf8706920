//! Sample hscript documents.

/// Smallest valid document.
pub const MINIMAL: &str = "package: {name: X}\n";

/// A package using every section.
pub const FULL: &str = r#"# Analysis package
package:
  name: Analysis/MyAna
  authors: [alice, bob]
  managers: alice
  version: "1.2.0"
  deps:
    public: ["ROOT 6.02", Boost]
    private: [GoogleTest]
    runtime: [ROOT, Python]

options:
  tools: [compiler_c, compiler_cxx, find_root]
  hwaf-call: [scripts/myana-options.py]

configure:
  tools: [find_root]
  env:
    PYTHONPATH: "${PYTHONPATH}:${INSTALL_AREA}/python"
    PATH: "/opt/myana/bin:${PATH}"
    MYANA_DATA: "${INSTALL_AREA}/share/myana"
  declare-tags:
    - opt: [x86_64, linux]
    - dbg: debug
  apply-tags: [opt]
  statements:
    - macro-append:
        CXXFLAGS: {default: -O2, "linux & dbg": [-g, -O0]}

build:
  tools: [find_root]
  MyAna:
    features: cxx cxxshlib
    source: [src/*.cxx]
    use: [ROOT, Boost]
    cxxflags: {default: [-Wall], "linux & opt": [-march=native]}
    export_includes: inc
  MyAnaDict:
    features: [cxx, [root_dict]]
    source: inc/MyAna.h
    selection_file: dict/selection.xml
  myana-app:
    name: myana-app
    target: myana
    features: cxx cxxprogram
    source: app/main.cxx
    use: MyAna
"#;

/// Named valid fixtures.
pub const VALID: [(&str, &str); 2] = [("minimal", MINIMAL), ("full", FULL)];

/// Documents each rejected with the named error kind.
pub const INVALID: [(&str, &str); 4] = [
    ("ParseError", "package: {name: [unclosed\n"),
    ("SchemaError", "options: {tools: [compiler_c]}\n"),
    ("TypeError", "package: {name: X}\nconfigure: {apply-tags: {}}\n"),
    ("ConsistencyError", "package: {name: X}\nbuild: {t2: {name: t1}}\n"),
];
