//! Unit tests for class-file discovery.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::fs;

use tempfile::TempDir;

use super::*;

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn touch(root: &std::path::Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, b"").unwrap();
}

fn no_filter() -> ClassFileFilter {
    ClassFileFilter::compile(&[], &[]).unwrap()
}

#[test]
fn collects_only_class_files_recursively() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "some/DefaultTest.class");
    touch(dir.path(), "some/nested/OtherTest.class");
    touch(dir.path(), "some/DefaultTest.java");
    touch(dir.path(), "README.md");

    let files = collect_class_files(dir.path(), &no_filter()).unwrap();
    let names: Vec<String> = files
        .iter()
        .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["some/DefaultTest.class", "some/nested/OtherTest.class"]);
}

#[test]
fn output_is_sorted_and_stable() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "b/B.class");
    touch(dir.path(), "a/A.class");
    touch(dir.path(), "c/C.class");

    let first = collect_class_files(dir.path(), &no_filter()).unwrap();
    let second = collect_class_files(dir.path(), &no_filter()).unwrap();
    assert_eq!(first, second);
    assert!(first.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn include_patterns_limit_discovery() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "some/AlphaTest.class");
    touch(dir.path(), "some/BetaCheck.class");

    let filter = ClassFileFilter::compile(&strings(&["*Test.class"]), &[]).unwrap();
    let files = collect_class_files(dir.path(), &filter).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("AlphaTest.class"));
}

#[test]
fn exclude_patterns_win_over_includes() {
    let dir = TempDir::new().unwrap();
    touch(dir.path(), "some/AlphaTest.class");
    touch(dir.path(), "some/SlowTest.class");

    let filter =
        ClassFileFilter::compile(&strings(&["*Test.class"]), &strings(&["*Slow*"])).unwrap();
    let files = collect_class_files(dir.path(), &filter).unwrap();
    assert_eq!(files.len(), 1);
    assert!(files[0].ends_with("AlphaTest.class"));
}

#[test]
fn java_suffix_patterns_are_normalized_to_class() {
    let filter = ClassFileFilter::compile(&strings(&["some/DefaultTest.java"]), &[]).unwrap();
    assert!(filter.accepts("some/DefaultTest.class"));
}

#[test]
fn empty_directory_yields_empty_list() {
    let dir = TempDir::new().unwrap();
    let files = collect_class_files(dir.path(), &no_filter()).unwrap();
    assert!(files.is_empty());
}
