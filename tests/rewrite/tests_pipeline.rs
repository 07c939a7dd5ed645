#![allow(clippy::unwrap_used)]

use crate::helpers::go_fixtures::{COMMENTED_AGGREGATION, FOO_AGGREGATION, TWO_AGGREGATIONS};
use crate::helpers::workspace::{file_names, write_file};
use aggsync::{FileTransformPipeline, SourceUnit, Strategy, SyncConfig, SyncError, SyncRecord};

fn pipeline() -> FileTransformPipeline {
    FileTransformPipeline::from_config(&SyncConfig::default()).unwrap()
}

#[test]
fn test_staged_file_is_published() {
    let dir = tempfile::tempdir().unwrap();
    let staged = write_file(dir.path(), "search_aggs_foo.go", FOO_AGGREGATION);

    let record = pipeline().run(&staged).unwrap();
    assert_eq!(
        record,
        Some(SyncRecord::new(Strategy::Injectable, "NewFooAggregation"))
    );
    assert_eq!(file_names(dir.path()), vec!["aggs_foo.go"]);

    let published = SourceUnit::open(dir.path().join("aggs_foo.go")).unwrap();
    assert_eq!(published.package_name(), "aggretastic");
}

#[test]
fn test_last_aggregation_in_file_is_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let staged = write_file(dir.path(), "search_aggs_pair.go", TWO_AGGREGATIONS);

    let record = pipeline().run(&staged).unwrap().unwrap();
    assert_eq!(record.symbol, "NewSecondAggregation");
    assert_eq!(record.category, Strategy::Injectable);

    let text = std::fs::read_to_string(dir.path().join("aggs_pair.go")).unwrap();
    assert!(text.contains("type FirstAggregation struct {\n\tfield string\n}"));
    assert!(text.contains("\treturn &FirstAggregation{}\n"));
}

#[test]
fn test_block_comments_pass_through() {
    let dir = tempfile::tempdir().unwrap();
    let staged = write_file(dir.path(), "search_aggs_baz.go", COMMENTED_AGGREGATION);

    let record = pipeline().run(&staged).unwrap();
    assert_eq!(
        record,
        Some(SyncRecord::new(Strategy::NotInjectable, "NewBazAggregation"))
    );

    let text = std::fs::read_to_string(dir.path().join("aggs_baz.go")).unwrap();
    assert!(text.contains("/* Copyright 2012-present Oliver Eilhard. All rights reserved. */"));
    assert!(text.contains("BazAggregation counts distinct values.\nSee the reference docs.\n*/"));
    assert!(text.contains("/** NewBazAggregation creates a new BazAggregation. **/"));
    assert!(SourceUnit::parse("aggs_baz.go", &text).is_ok());
}

#[test]
fn test_file_without_aggregation_is_still_published() {
    let dir = tempfile::tempdir().unwrap();
    let staged = write_file(
        dir.path(),
        "search_aggs_util.go",
        "package elastic\n\nfunc bucketKey(v interface{}) string {\n\treturn \"\"\n}\n",
    );

    assert_eq!(pipeline().run(&staged).unwrap(), None);
    let published = SourceUnit::open(dir.path().join("aggs_util.go")).unwrap();
    assert_eq!(published.package_name(), "aggretastic");
    assert!(!staged.exists());
}

#[test]
fn test_unsupported_constructor_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let staged = write_file(
        dir.path(),
        "search_aggs_odd.go",
        "package elastic\n\ntype OddAggregation struct{}\n\nfunc NewOddAggregation() *OddAggregation {\n\treturn build()\n}\n",
    );

    let err = pipeline().run(&staged).unwrap_err();
    assert!(matches!(err, SyncError::StrategyPrecondition { .. }));
    assert!(err.to_string().contains("NewOddAggregation"));
}

#[test]
fn test_parse_error_reports_position() {
    let dir = tempfile::tempdir().unwrap();
    let staged = write_file(dir.path(), "search_aggs_bad.go", "package elastic\n\nfunc (\n");

    let err = pipeline().run(&staged).unwrap_err();
    let SyncError::Parse { path, line, .. } = err else {
        panic!("expected a parse error, got {err}");
    };
    assert_eq!(path, staged);
    assert!(line >= 3);
}
