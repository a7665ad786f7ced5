/*
 * include_tree.rs
 *
 * Resolution of real directory trees through FileSystemSource.
 */

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use yamlinc_core::{FileSystemSource, ResolveError, Resolver, resolve_file, transform_file};
use yamlinc_yaml::{ParseOptions, parse};

/// Helper to get the path to test fixtures
fn fixture_path(name: &str) -> PathBuf {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    Path::new(manifest_dir).join("tests/fixtures").join(name)
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_includes_resolve_relative_to_including_document() {
    let yaml = resolve_file(fixture_path("project/main.yaml")).unwrap();

    assert_eq!(yaml["name"].as_str(), Some("project"));

    // main -> config/settings -> shared/defaults, merged through `<<`
    let settings = &yaml["settings"];
    assert_eq!(settings["retries"].as_i64(), Some(3));
    assert_eq!(settings["debug"].as_bool(), Some(true));
    assert!(settings["<<"].is_badvalue());

    let plugins: Vec<_> = yaml["plugins"]
        .as_vec()
        .unwrap()
        .iter()
        .map(|p| p.as_str().unwrap())
        .collect();
    assert_eq!(plugins, vec!["core", "lint", "format"]);
}

#[test]
fn test_relative_paths_against_source_root() {
    let temp = tempfile::TempDir::new().unwrap();
    write(temp.path(), "app/main.yaml", "db: !include ../db/conn.yaml\n");
    write(temp.path(), "db/conn.yaml", "host: localhost\nport: 5432\n");

    let mut resolver = Resolver::new(FileSystemSource::with_root(temp.path()));
    let yaml = resolver.resolve_file("app/main.yaml").unwrap();

    assert_eq!(yaml["db"]["port"].as_i64(), Some(5432));

    // Both spellings name the same cached document
    let again = resolver.resolve_file("db/../app/./main.yaml").unwrap();
    assert!(Arc::ptr_eq(&yaml, &again));
}

#[test]
fn test_cycle_across_directories() {
    let temp = tempfile::TempDir::new().unwrap();
    let a = write(temp.path(), "a/a.yaml", "next: !include ../b/b.yaml\n");
    write(temp.path(), "b/b.yaml", "next: !include ../a/a.yaml\n");

    let err = resolve_file(&a).unwrap_err();

    match err {
        ResolveError::CircularReference { document, chain } => {
            assert_eq!(document.path(), a.as_path());
            assert_eq!(chain.len(), 2);
        }
        other => panic!("expected circular reference, got {other:?}"),
    }
}

#[test]
fn test_missing_include_reports_path() {
    let temp = tempfile::TempDir::new().unwrap();
    let main = write(temp.path(), "main.yaml", "x: !include gone.yaml\n");

    let err = resolve_file(&main).unwrap_err();

    match err {
        ResolveError::SourceUnavailable { path, .. } => {
            assert_eq!(path, temp.path().join("gone.yaml"));
        }
        other => panic!("expected unavailable source, got {other:?}"),
    }
}

#[test]
fn test_transform_file_writes_resolved_text() {
    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join("resolved.yaml");

    let result = transform_file(fixture_path("project/main.yaml"), &output).unwrap();

    let written = fs::read_to_string(&output).unwrap();
    assert_eq!(written, result.serialized);
    assert!(!written.starts_with("---"));
    assert!(!written.contains("!include"));

    let reparsed = parse(&written, &ParseOptions::default()).unwrap();
    assert_eq!(reparsed, *result.resolved);
}

#[test]
fn test_transform_into_missing_directory_fails() {
    let temp = tempfile::TempDir::new().unwrap();
    let output = temp.path().join("no/such/dir/out.yaml");

    let err = transform_file(fixture_path("project/main.yaml"), &output).unwrap_err();

    assert!(matches!(err, ResolveError::OutputUnwritable { .. }));
}
