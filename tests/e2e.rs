//! End-to-end tests driving the compiled binary against synthetic class
//! files, with `sh -c` scripts standing in for the JVM.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![cfg(unix)]


use std::path::Path;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use classgen::{class, fork_test, junit_ignore, junit_test, method};

/// Fail any target whose method name contains "Boom", pass the rest.
const SELECTIVE_SCRIPT: &str =
    r#"case "$3" in *Boom) echo boom-output; echo boom-trace >&2; exit 1;; *) exit 0;; esac"#;

fn forktest(classes_dir: &Path, script: &str) -> Command {
    let mut cmd = Command::cargo_bin("forktest").unwrap();
    cmd.current_dir(classes_dir)
        .arg(classes_dir)
        .arg("--java")
        .arg("/bin/sh")
        .arg("--jvm-option=-c")
        .arg(format!("--jvm-option={script}"))
        .env_remove("FORKTEST_CONFIG")
        .env_remove("FORKTEST_SKIP");
    cmd
}

fn two_passing_classes(dir: &Path) {
    class("some.Alpha")
        .method(method("testOne").annotate(junit_test()))
        .method(method("testTwo").annotate(junit_test()))
        .write_to(dir);
    class("some.Beta")
        .method(method("testOnly").annotate(junit_test()))
        .write_to(dir);
}

#[test]
fn passing_run_renders_trees_and_exits_zero() {
    let dir = TempDir::new().unwrap();
    two_passing_classes(dir.path());

    forktest(dir.path(), "exit 0")
        .assert()
        .success()
        .stdout(predicate::str::contains("some.Alpha"))
        .stdout(predicate::str::contains("some.Beta"))
        .stdout(predicate::str::contains("\u{251C}\u{2500}testOne"))
        .stdout(predicate::str::contains("\u{2514}\u{2500}testTwo"))
        .stdout(predicate::str::contains("OK"))
        .stdout(predicate::str::contains(
            "Tests run: 3, Errors: 0, Skipped: 0, Total time:",
        ));
}

#[test]
fn failing_test_prints_console_block_and_exits_one() {
    let dir = TempDir::new().unwrap();
    class("some.Gamma")
        .method(method("testBoom").annotate(junit_test()))
        .method(method("testFine").annotate(junit_test()))
        .write_to(dir.path());

    forktest(dir.path(), SELECTIVE_SCRIPT)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("ERROR"))
        .stdout(predicate::str::contains(" >>>Console\n boom-output"))
        .stdout(predicate::str::contains(" >>>Errors\n boom-trace"))
        .stdout(predicate::str::contains("Tests run: 2, Errors: 1"));
}

#[test]
fn ignored_test_is_skipped_without_spawning() {
    let dir = TempDir::new().unwrap();
    class("some.Delta")
        .method(
            method("testIgnored")
                .annotate(junit_test())
                .annotate(junit_ignore()),
        )
        .method(method("testLive").annotate(junit_test()))
        .write_to(dir.path());

    forktest(dir.path(), "exit 0")
        .assert()
        .success()
        .stdout(predicate::str::contains("testIgnored"))
        .stdout(predicate::str::contains("SKIPPED"))
        .stdout(predicate::str::contains("Tests run: 1, Errors: 0, Skipped: 1"));
}

#[test]
fn concurrent_batch_renders_the_double_rail() {
    let dir = TempDir::new().unwrap();
    class("some.Parallel")
        .method(
            method("testLeft")
                .annotate(junit_test())
                .annotate(fork_test().int("order", 5)),
        )
        .method(
            method("testRight")
                .annotate(junit_test())
                .annotate(fork_test().int("order", 5)),
        )
        .write_to(dir.path());

    forktest(dir.path(), "exit 0")
        .assert()
        .success()
        .stdout(predicate::str::contains("\u{2550}testLeft").or(
            predicate::str::contains("\u{2550}testRight"),
        ));
}

#[test]
fn focus_filter_limits_the_run_to_one_test() {
    let dir = TempDir::new().unwrap();
    two_passing_classes(dir.path());

    forktest(dir.path(), "exit 0")
        .arg("--test")
        .arg("some.Alpha#testOne")
        .assert()
        .success()
        .stdout(predicate::str::contains("testOne"))
        .stdout(predicate::str::contains("testTwo").not())
        .stdout(predicate::str::contains("some.Beta").not())
        .stdout(predicate::str::contains("Tests run: 1,"));
}

#[test]
fn only_annotated_mode_runs_native_tests_only() {
    let dir = TempDir::new().unwrap();
    class("some.Mixed")
        .method(method("testFramework").annotate(junit_test()))
        .method(method("testNative").annotate(fork_test()))
        .write_to(dir.path());

    forktest(dir.path(), "exit 0")
        .arg("--only-annotated")
        .assert()
        .success()
        .stdout(predicate::str::contains("testNative"))
        .stdout(predicate::str::contains("testFramework").not());
}

#[test]
fn skip_flag_short_circuits_before_discovery() {
    let dir = TempDir::new().unwrap();
    // No class files at all; discovery would warn if reached.
    forktest(dir.path(), "exit 0")
        .arg("--skip")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests are skipped."));
}

#[test]
fn config_file_supplies_run_settings() {
    let dir = TempDir::new().unwrap();
    let classes = dir.path().join("classes");
    std::fs::create_dir_all(&classes).unwrap();
    class("some.Configured")
        .method(method("testOne").annotate(junit_test()))
        .write_to(&classes);

    let config = dir.path().join("forktest.toml");
    std::fs::write(
        &config,
        format!(
            "classes-dir = {:?}\njava = \"/bin/sh\"\njvm-options = [\"-c\", \"exit 0\"]\n",
            classes
        ),
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("forktest").unwrap();
    cmd.arg("-C")
        .arg(&config)
        .env_remove("FORKTEST_SKIP")
        .assert()
        .success()
        .stdout(predicate::str::contains("some.Configured"))
        .stdout(predicate::str::contains("Tests run: 1, Errors: 0"));
}

#[test]
fn timeout_annotation_terminates_the_child() {
    let dir = TempDir::new().unwrap();
    class("some.Hanging")
        .method(
            method("testHang")
                .annotate(junit_test())
                .annotate(fork_test().long("timeout", 300)),
        )
        .write_to(dir.path());

    forktest(dir.path(), "sleep 5")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("TIMEOUT"))
        .stdout(predicate::str::contains("Errors: 1"));
}

#[test]
fn corrupt_class_file_aborts_with_internal_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("Broken.class"), b"garbage").unwrap();

    forktest(dir.path(), "exit 0")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("class format error"));
}

#[test]
fn empty_classes_dir_runs_zero_tests() {
    let dir = TempDir::new().unwrap();
    forktest(dir.path(), "exit 0")
        .assert()
        .success()
        .stdout(predicate::str::contains("Tests run: 0, Errors: 0"));
}
