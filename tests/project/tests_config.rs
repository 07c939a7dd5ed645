#![allow(clippy::unwrap_used)]

use crate::helpers::workspace::write_file;
use aggsync::{PackageUpdater, SyncConfig, SyncError};
use rstest::rstest;
use std::path::PathBuf;

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "aggsync.toml",
        r#"
[paths]
upstream_dir = "vendor/elastic"

[package]
dependencies = ["aggs_injectable.go"]
export_patterns = ['^search_aggs_(.*)\.go$', '^search_aggs_pipeline_(.*)\.go$']

[origin]
name = "es"
path = "github.com/olivere/elastic/v7"
"#,
    );

    let config = SyncConfig::load(Some(path.as_path())).unwrap();
    assert_eq!(config.paths.upstream_dir, PathBuf::from("vendor/elastic"));
    assert_eq!(config.paths.build_dir, PathBuf::from("build-tmp"));
    assert_eq!(config.package.export_patterns.len(), 2);
    assert_eq!(config.origin.name, "es");
    assert!(PackageUpdater::new(config).is_ok());
}

#[test]
fn test_malformed_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "aggsync.toml", "[repair]\nmax_iterations = \"many\"\n");
    assert!(matches!(SyncConfig::load(Some(path.as_path())), Err(SyncError::Config(_))));
}

#[test]
fn test_updater_requires_dependencies() {
    let err = PackageUpdater::new(SyncConfig::default()).unwrap_err();
    assert!(matches!(err, SyncError::Config(_)));
}

#[rstest]
#[case::same_as_project(".", ".", "upstream")]
#[case::parent_of_project(".", "./pkg", "upstream")]
#[case::grandparent_of_project("..", "pkg", "upstream")]
#[case::dotted_project("work", "work/sub/../pkg", "upstream")]
#[case::parent_of_upstream("vendor", "pkg", "vendor/elastic")]
fn test_build_dir_containing_inputs_rejected(
    #[case] build: &str,
    #[case] project: &str,
    #[case] upstream: &str,
) {
    let mut config = SyncConfig::default();
    config.package.dependencies = vec!["aggs_injectable.go".into()];
    config.paths.build_dir = PathBuf::from(build);
    config.paths.project_dir = PathBuf::from(project);
    config.paths.upstream_dir = PathBuf::from(upstream);

    let err = PackageUpdater::new(config).unwrap_err();
    assert!(matches!(err, SyncError::Config(_)));
    assert!(err.to_string().contains("must not contain"));
}

#[test]
fn test_build_dir_inside_project_accepted() {
    let mut config = SyncConfig::default();
    config.package.dependencies = vec!["aggs_injectable.go".into()];
    config.paths.project_dir = PathBuf::from("pkg");
    config.paths.build_dir = PathBuf::from("pkg/build-tmp");
    assert!(PackageUpdater::new(config).is_ok());
}
