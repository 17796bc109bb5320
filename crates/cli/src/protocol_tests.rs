//! Unit tests for the child runner argv/exit contract.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::path::PathBuf;

use super::*;
use crate::descriptor::TestDescriptor;

fn descriptor() -> TestDescriptor {
    let base = TestDescriptor::global("java", Vec::new(), "", false, 0);
    TestDescriptor::derive(&base, PathBuf::from("T.class"), "some.T", "testX")
}

#[test]
fn framework_tests_use_the_junit_runner() {
    let mut d = descriptor();
    d.junit_test = true;
    assert_eq!(RunnerKind::select(&d), RunnerKind::Junit);
    assert_eq!(RunnerKind::select(&d).main_class(), JUNIT_RUNNER_MAIN);
}

#[test]
fn native_and_ignorable_tests_use_the_fork_runner() {
    let mut d = descriptor();
    d.fork_test = true;
    assert_eq!(RunnerKind::select(&d), RunnerKind::Fork);

    d.junit_test = true;
    d.junit_ignore = true;
    assert_eq!(
        RunnerKind::select(&d),
        RunnerKind::Fork,
        "ignored framework test forced to run goes through the native runner"
    );
    assert_eq!(RunnerKind::select(&d).main_class(), FORK_RUNNER_MAIN);
}

#[test]
fn target_argument_joins_class_and_method_with_a_hash() {
    assert_eq!(descriptor().target(), "some.T#testX");
}

#[test]
fn exit_codes_match_the_wire_contract() {
    assert_eq!(EXIT_SUCCESS, 0);
    assert_eq!(EXIT_FAILURE, 1);
    assert_eq!(EXIT_INFRASTRUCTURE, 2);
    assert_eq!(EXIT_BAD_INVOCATION, 999);
}
