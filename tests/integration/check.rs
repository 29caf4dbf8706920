use hscript_cli::test_utils::{TestWorkarea, fixtures};
use predicates::prelude::*;

use crate::common::hscript;

#[test]
fn test_check_text_summary() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("MyAna", fixtures::FULL).unwrap();

    hscript(&area)
        .args(["check", "MyAna"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Analysis/MyAna (4 dependencies, 3 targets)"));

    assert!(!area.exists("MyAna/wscript"));
}

#[test]
fn test_check_json_report() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("good", fixtures::MINIMAL).unwrap();
    area.add_package("bad", "package: {name: X}\nconfigure: {apply-tags: {}}\n").unwrap();

    let output = hscript(&area).args(["check", "--recursive", "--json", "."]).output().unwrap();
    assert!(!output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["valid"], false);

    let documents = report["documents"].as_array().unwrap();
    assert_eq!(documents.len(), 2);
    // Recursive discovery is sorted by path
    assert!(documents[0]["path"].as_str().unwrap().ends_with("bad/hscript.yml"));
    assert!(documents[0]["error"].as_str().unwrap().contains("configure.apply-tags"));
    assert_eq!(documents[1]["package"], "X");
    assert!(documents[1].get("error").is_none());
}

#[test]
fn test_check_unknown_section_suggestion() {
    let area = TestWorkarea::new().unwrap();
    area.add_package("pkg", "package: {name: X}\nconfigur: {}\n").unwrap();

    hscript(&area)
        .args(["check", "pkg"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("✗"))
        .stderr(predicate::str::contains("did you mean 'configure'"));
}
