use hscript_cli::test_utils::{TestWorkarea, fixtures};
use predicates::prelude::*;

use crate::common::hscript;

#[test]
fn test_clean_restores_hand_written_script() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();
    area.write("pkg/wscript", "# hand written\n").unwrap();

    hscript(&area).args(["compile", "pkg"]).assert().success();
    assert!(area.exists("pkg/wscript.hscript-orig"));

    hscript(&area)
        .args(["clean", "pkg"])
        .assert()
        .success()
        .stdout(predicate::str::contains("restored"));

    assert_eq!(area.read("pkg/wscript").unwrap(), "# hand written\n");
    assert!(!area.exists("pkg/wscript.hscript-orig"));
}

#[test]
fn test_clean_drop_backup() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();
    area.write("pkg/wscript", "# hand written\n").unwrap();

    hscript(&area).args(["compile", "pkg"]).assert().success();
    hscript(&area).args(["clean", "--drop-backup", "pkg"]).assert().success();

    assert!(!area.exists("pkg/wscript"));
    assert!(!area.exists("pkg/wscript.hscript-orig"));
}

#[test]
fn test_clean_leaves_hand_written_script() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", fixtures::MINIMAL).unwrap();
    area.write("pkg/wscript", "# hand written\n").unwrap();

    hscript(&area).args(["clean", "pkg"]).assert().success();
    assert_eq!(area.read("pkg/wscript").unwrap(), "# hand written\n");
}

#[test]
fn test_clean_recursive() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("a", fixtures::MINIMAL).unwrap();
    area.add_package("nested/b", fixtures::MINIMAL).unwrap();

    hscript(&area).args(["compile", "-r", "."]).assert().success();
    assert!(area.exists("nested/b/wscript"));

    hscript(&area).args(["clean", "-r"]).assert().success();
    assert!(!area.exists("a/wscript"));
    assert!(!area.exists("nested/b/wscript"));
}
