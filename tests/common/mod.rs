//! Common helpers for hscript integration tests

// Not every helper is used by every test module
#![allow(dead_code)]

use assert_cmd::Command;
use hscript_cli::test_utils::TestWorkarea;

/// `hscript` run inside `area`, isolated from the user's configuration.
pub fn hscript(area: &TestWorkarea) -> Command {
    with_config_path(area, &area.path().join(".no-config.toml"))
}

/// `hscript` run inside `area` with a configuration file holding `content`.
pub fn hscript_with_config(area: &TestWorkarea, content: &str) -> Command {
    let path = area.write(".hscript.toml", content).unwrap();
    with_config_path(area, &path)
}

fn with_config_path(area: &TestWorkarea, config: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("hscript").unwrap();
    cmd.current_dir(area.path())
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .arg("--config")
        .arg(config);
    cmd
}
