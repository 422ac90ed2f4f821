//! Integration tests for shls

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use tempfile::TempDir;

/// Helper to create a test directory structure
fn create_test_tree() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    fs::create_dir(root.join("src")).unwrap();
    fs::create_dir(root.join("docs")).unwrap();

    let mut file = File::create(root.join("README.md")).unwrap();
    writeln!(file, "# Test Project\n\nThis is a test.").unwrap();

    let mut file = File::create(root.join("src/main.rs")).unwrap();
    writeln!(file, "fn main() {{}}").unwrap();

    File::create(root.join("notes.txt~")).unwrap();
    File::create(root.join("my file.txt")).unwrap();
    File::create(root.join(".gitignore")).unwrap();

    temp_dir
}

/// Command with an isolated config and the tree as working directory
fn shls(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("shls").unwrap();
    cmd.arg("--config")
        .arg(temp_dir.path().join("no-such-config.toml"))
        .arg("--cwd")
        .arg(temp_dir.path());
    cmd
}

#[test]
fn test_basic_listing() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md"))
        .stdout(predicate::str::contains("src"))
        .stdout(predicate::str::contains(".gitignore").not());
}

#[test]
fn test_almost_all_long() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -lA"])
        .assert()
        .success()
        .stdout(predicate::str::contains(".gitignore"))
        .stdout(predicate::str::is_match(r"(?m) \.$").unwrap().not());
}

#[test]
fn test_ignore_backups() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -1B"])
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.txt~").not());
}

#[test]
fn test_quote_name() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -1Q"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"my file.txt\""));
}

#[test]
fn test_wildcard_expansion() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -l *"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\nsrc:\n"))
        .stdout(predicate::str::contains("main.rs"));
}

#[test]
fn test_name_glob() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -1 *.md"])
        .assert()
        .success()
        .stdout("\nREADME.md\n");
}

#[test]
fn test_help() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls --help"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("Usage: ls"));
}

#[test]
fn test_redirect() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls -m > out.txt"])
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(temp_dir.path().join("out.txt")).unwrap();
    assert!(written.contains("README.md, docs"));
}

#[test]
fn test_unknown_option_prints_diagnostic() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls --bogus"])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "'ls --bogus' is not recognized as an internal or external command",
        ));
}

#[test]
fn test_invalid_value_prints_diagnostic() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "ls --sort=name"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("is not recognized"));
}

#[test]
fn test_cd_then_ls() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .args(["-c", "cd src", "-c", "ls -1"])
        .assert()
        .success()
        .stdout("\nmain.rs\n");
}

#[test]
fn test_interactive_loop() {
    let temp_dir = create_test_tree();

    shls(&temp_dir)
        .write_stdin("ls -1 docs\nfrobnicate\nexit\nls -1\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("'frobnicate' is not recognized"))
        .stdout(predicate::str::contains("README.md").not());
}

#[test]
fn test_config_prompt_and_columns() {
    let temp_dir = create_test_tree();
    let config_path = temp_dir.path().join("shls.toml");
    fs::write(
        &config_path,
        "[display]\ncolumns = 1\ncolumn_padding = 0\n\n[shell]\nprompt = \"$ \"\n",
    )
    .unwrap();

    Command::cargo_bin("shls")
        .unwrap()
        .arg("--config")
        .arg(&config_path)
        .arg("--cwd")
        .arg(temp_dir.path())
        .write_stdin("ls src\n")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("$ \nmain.rs\n\n$ "));
}
