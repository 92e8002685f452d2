//! Integration tests for VERSION propagation into runtime display.

use std::fs;

use fakecheck_app::{APP_VERSION, app_version};

#[test]
fn version_display_tests_matches_root_version_file() {
    let root_version_path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../VERSION");
    let root_version = fs::read_to_string(root_version_path).expect("VERSION should be readable");
    assert_eq!(app_version(), root_version.trim());
}

#[test]
fn version_display_tests_version_is_dotted_triple() {
    let parts: Vec<&str> = APP_VERSION.split('.').collect();
    assert_eq!(parts.len(), 3, "version should be MAJOR.MINOR.PATCH");
    assert!(parts.iter().all(|part| part.parse::<u64>().is_ok()));
}
