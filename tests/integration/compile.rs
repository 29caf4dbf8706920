use hscript_cli::hscript::render::GENERATED_MARKER;
use hscript_cli::test_utils::{TestWorkarea, fixtures};
use predicates::prelude::*;

use crate::common::{hscript, hscript_with_config};

#[test]
fn test_compile_minimal_package() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();

    hscript(&area)
        .args(["compile", "pkg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("pkg/wscript"));

    let script = area.read("pkg/wscript").unwrap();
    assert!(script.contains(GENERATED_MARKER));
    assert!(script.contains("\"name\": \"X\""));
    assert!(script.contains("## public dependencies"));
    assert!(!script.contains("use_pkg"));
}

#[test]
fn test_compile_full_package() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("MyAna", fixtures::FULL).unwrap();

    hscript(&area).args(["compile", "MyAna/hscript.yml"]).assert().success();

    let script = area.read("MyAna/wscript").unwrap();
    for expected in [
        "ctx.use_pkg(\"ROOT\", version=\"6.02\", public=True, runtime=True)",
        "ctx.use_pkg(\"GoogleTest\", private=True)",
        "ctx.use_pkg(\"Python\", runtime=True)",
        "ctx.load(\"find_root\")",
        "ctx.hwaf_load_fct(PACKAGE[\"name\"], \"options\", \"scripts/myana-options.py\")",
        "ctx.hwaf_path_append(\"PYTHONPATH\", ((\"default\", [\"${INSTALL_AREA}/python\"]),))",
        "ctx.hwaf_path_prepend(\"PATH\", ((\"default\", [\"/opt/myana/bin\"]),))",
        "ctx.hwaf_declare_macro(\"MYANA_DATA\"",
        "ctx.hwaf_declare_tag(\"dbg\", content=[\"debug\"])",
        "ctx.hwaf_apply_tag(\"opt\")",
        "(\"dbg&linux\", [\"-g\", \"-O0\"])",
        "features=\"cxx root_dict\"",
        "selection_file=((\"default\", [\"dict/selection.xml\"]),)",
        "target=\"myana\"",
    ] {
        assert!(script.contains(expected), "missing {expected} in\n{script}");
    }
}

#[test]
fn test_compile_recursive_with_failures() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("good", fixtures::MINIMAL).unwrap();
    area.add_package("bad", "build: {}\n").unwrap();

    hscript(&area)
        .args(["compile", "--recursive", "."])
        .assert()
        .failure()
        .stderr(predicate::str::contains("missing mandatory package section"))
        .stderr(predicate::str::contains("1 of 2 document(s) failed to compile"));

    assert!(area.exists("good/wscript"));
    assert!(!area.exists("bad/wscript"));
}

#[test]
fn test_compile_error_kinds_reported() {
    for (kind, document) in fixtures::INVALID {
        let area = TestWorkarea::new().unwrap();
        area.add_package("pkg", document).unwrap();
        area.write("pkg/wscript", "# hand written\n").unwrap();

        hscript(&area)
            .args(["compile", "pkg"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("error:"));

        assert_eq!(area.read("pkg/wscript").unwrap(), "# hand written\n", "{kind}");
        assert!(!area.exists("pkg/wscript.hscript-orig"), "{kind}");
    }
}

#[test]
fn test_compile_backs_up_hand_written_script() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();
    area.write("pkg/wscript", "# hand written\n").unwrap();

    hscript(&area).args(["compile", "pkg"]).assert().success();
    hscript(&area).args(["compile", "pkg"]).assert().success();

    assert_eq!(area.read("pkg/wscript.hscript-orig").unwrap(), "# hand written\n");
    assert!(area.read("pkg/wscript").unwrap().contains(GENERATED_MARKER));
}

#[test]
fn test_compile_to_stdout_writes_nothing() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();

    hscript(&area)
        .args(["compile", "--stdout", "--format", "hscript", "pkg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("package:\n  name: X\n"));

    assert!(!area.exists("pkg/wscript"));
}

#[test]
fn test_compile_output_file() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::FULL).unwrap();

    hscript(&area)
        .args(["compile", "--format", "hscript", "--output", "out/normalized.yml", "pkg"])
        .assert()
        .success();

    // Normalizing the normalized document changes nothing
    area.add_package("again", &area.read("out/normalized.yml").unwrap()).unwrap();
    hscript(&area)
        .args(["compile", "--format", "hscript", "--output", "out/again.yml", "again"])
        .assert()
        .success();
    assert_eq!(area.read("out/normalized.yml").unwrap(), area.read("out/again.yml").unwrap());
}

#[test]
fn test_compile_output_and_stdout_conflict() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();

    hscript(&area).args(["compile", "--stdout", "--output", "x", "pkg"]).assert().failure();
}

#[test]
fn test_compile_uses_config_file() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();

    hscript_with_config(&area, "script_name = \"wscript.gen\"\nformat = \"hscript\"\n")
        .args(["compile", "pkg"])
        .assert()
        .success();

    assert!(!area.exists("pkg/wscript"));
    assert!(area.read("pkg/wscript.gen").unwrap().contains("package:\n  name: X\n"));
}

#[test]
fn test_compile_invalid_config() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();

    hscript_with_config(&area, "scriptname = \"x\"\n")
        .args(["compile", "pkg"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn test_compile_missing_document() {
    let area = TestWorkarea::new().unwrap();

    hscript(&area)
        .args(["compile", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No hscript document found"));
}
