//! # Discovery Module Unit Tests / Discovery 模块单元测试

mod common;

use better_testing::core::discovery::{discover_tests, discovery_order};
use better_testing::models::DriverPattern;
use common::touch_files;
use std::cmp::Ordering;
use std::path::Path;
use tempfile::tempdir;

#[test]
fn test_finds_drivers_recursively_in_canonical_order() {
    let dir = tempdir().unwrap();
    touch_files(
        dir.path(),
        &[
            "b/z_driver.c",
            "a/y_driver.c",
            "a/x_driver.c",
            "c/nested/w_driver.c",
            "a/x.c",
            "a/notes.txt",
            "b/helper.h",
        ],
    );

    let cases = discover_tests(dir.path(), &DriverPattern::default()).unwrap();
    let drivers: Vec<_> = cases
        .iter()
        .map(|case| case.driver.strip_prefix(dir.path()).unwrap().to_path_buf())
        .collect();

    assert_eq!(
        drivers,
        vec![
            Path::new("a/x_driver.c"),
            Path::new("a/y_driver.c"),
            Path::new("b/z_driver.c"),
            Path::new("c/nested/w_driver.c"),
        ]
    );
    assert_eq!(cases[0].subject, dir.path().join("a/x.c"));
}

#[test]
fn test_order_uses_parent_name_not_full_path() {
    let dir = tempdir().unwrap();
    touch_files(dir.path(), &["z_outer/alpha/t_driver.c", "a_outer/beta/t_driver.c"]);

    let cases = discover_tests(dir.path(), &DriverPattern::default()).unwrap();

    // "alpha" sorts before "beta" even though "a_outer" < "z_outer".
    assert!(cases[0].driver.ends_with("z_outer/alpha/t_driver.c"));
    assert!(cases[1].driver.ends_with("a_outer/beta/t_driver.c"));
}

#[test]
fn test_equal_keys_are_ordered_by_full_path() {
    let dir = tempdir().unwrap();
    touch_files(dir.path(), &["two/same/t_driver.c", "one/same/t_driver.c"]);

    let cases = discover_tests(dir.path(), &DriverPattern::default()).unwrap();

    assert_eq!(cases.len(), 2);
    assert!(cases[0].driver.ends_with("one/same/t_driver.c"));
    assert!(cases[1].driver.ends_with("two/same/t_driver.c"));
}

#[test]
fn test_empty_root_yields_no_cases() {
    let dir = tempdir().unwrap();
    touch_files(dir.path(), &["only/readme.md"]);

    let cases = discover_tests(dir.path(), &DriverPattern::default()).unwrap();
    assert!(cases.is_empty());
}

#[test]
fn test_missing_root_is_an_error() {
    let dir = tempdir().unwrap();
    let result = discover_tests(&dir.path().join("absent"), &DriverPattern::default());
    assert!(result.is_err());
}

#[test]
fn test_file_as_root_is_an_error() {
    let dir = tempdir().unwrap();
    touch_files(dir.path(), &["x_driver.c"]);

    let result = discover_tests(&dir.path().join("x_driver.c"), &DriverPattern::default());
    assert!(result.is_err());
}

#[test]
fn test_custom_pattern() {
    let dir = tempdir().unwrap();
    touch_files(dir.path(), &["s/parse_main.cpp", "s/parse_driver.c"]);

    let cases = discover_tests(dir.path(), &DriverPattern::new("_main", "cpp")).unwrap();

    assert_eq!(cases.len(), 1);
    assert_eq!(cases[0].subject, dir.path().join("s/parse.cpp"));
}

#[test]
fn test_discovery_order_is_total() {
    let a = Path::new("/x/dir/a_driver.c");
    let b = Path::new("/y/dir/a_driver.c");

    assert_eq!(discovery_order(a, b), Ordering::Less);
    assert_eq!(discovery_order(b, a), Ordering::Greater);
    assert_eq!(discovery_order(a, a), Ordering::Equal);
    assert_eq!(
        discovery_order(Path::new("/z/a/k_driver.c"), Path::new("/a/b/a_driver.c")),
        Ordering::Less
    );
}
