//! Conformance tests: runs every YAML fixture through the registry loader.
//!
//! Run with: cargo test -p typematcher-test --test conformance --features fixtures

#![cfg(feature = "fixtures")]

use std::fs;
use std::path::{Path, PathBuf};
use typematcher::{Registry, RegistryBuilder};
use typematcher_test::fixture::Fixture;

/// The `fixtures/` directory of this crate.
fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

fn registry() -> Registry {
    typematcher_test::register(RegistryBuilder::new()).build()
}

/// Load every fixture in a YAML file.
fn load_file(name: &str) -> Vec<Fixture> {
    let path = fixtures_dir().join(name);
    let yaml = fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read {}: {e}", path.display()));
    Fixture::from_yaml_multi(&yaml)
        .unwrap_or_else(|e| panic!("Failed to parse {}: {e}", path.display()))
}

fn run_file(name: &str) {
    let registry = registry();
    let fixtures = load_file(name);
    assert!(!fixtures.is_empty(), "{name} has no fixtures");
    for fixture in fixtures {
        println!("  Running: {}", fixture.name);
        fixture.run_and_assert(&registry);
    }
}

#[test]
fn test_dispatch_fixtures() {
    run_file("dispatch.yaml");
}

#[test]
fn test_matcher_fixtures() {
    run_file("matchers.yaml");
}

#[test]
fn test_config_error_fixtures() {
    let registry = registry();
    for fixture in load_file("config_errors.yaml") {
        assert!(fixture.expect_error, "{} should be an error fixture", fixture.name);
        let err = fixture.load(&registry).unwrap_err();
        println!("  {}: {err}", fixture.name);
    }
}

#[test]
fn test_every_fixture_file_is_covered() {
    let mut files: Vec<String> = fs::read_dir(fixtures_dir())
        .expect("read fixtures dir")
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            let ext = path.extension()?;
            (ext == "yaml" || ext == "yml")
                .then(|| path.file_name()?.to_str().map(str::to_owned))
                .flatten()
        })
        .collect();
    files.sort();
    assert_eq!(
        files,
        ["config_errors.yaml", "dispatch.yaml", "matchers.yaml"]
    );
}

#[test]
fn test_unknown_matcher_message_lists_names() {
    let fixture = load_file("config_errors.yaml")
        .into_iter()
        .find(|f| f.name == "unknown_matcher")
        .expect("unknown_matcher fixture");
    let err = fixture.load(&registry()).unwrap_err();
    assert!(err.contains("is_strng"), "{err}");
    assert!(err.contains("is_string"), "{err}");
}
