#![allow(clippy::unwrap_used)]

use crate::helpers::go_fixtures::{BAR_AGGREGATION, FOO_AGGREGATION, WRAPPERS};
use crate::helpers::workspace::{SyncLayout, file_names, write_file};
use aggsync::{PackageUpdater, SemanticVerifier, SourceUnit, Strategy, SyncConfig, SyncRecord};

fn layout() -> SyncLayout {
    let layout = SyncLayout::new();
    write_file(&layout.upstream(), "search_aggs_foo.go", FOO_AGGREGATION);
    write_file(&layout.upstream(), "search_aggs_bar.go", BAR_AGGREGATION);
    write_file(
        &layout.upstream(),
        "search_queries_term.go",
        "package elastic\n\ntype TermQuery struct{}\n",
    );
    write_file(&layout.project(), "aggs_injectable.go", WRAPPERS);
    write_file(
        &layout.project(),
        "aggs_removed.go",
        "package aggretastic\n\ntype RemovedAggregation struct{}\n",
    );
    layout
}

fn config(layout: &SyncLayout) -> SyncConfig {
    let mut config = SyncConfig::default();
    config.paths.upstream_dir = layout.upstream();
    config.paths.build_dir = layout.build();
    config.paths.project_dir = layout.project();
    config.package.dependencies = vec!["aggs_injectable.go".to_string()];
    config
}

#[test]
fn test_full_run_publishes_package() {
    let layout = layout();
    let report = PackageUpdater::new(config(&layout)).unwrap().run().unwrap();

    assert_eq!(
        report.records,
        vec![
            SyncRecord::new(Strategy::NotInjectable, "NewBarAggregation"),
            SyncRecord::new(Strategy::Injectable, "NewFooAggregation"),
        ]
    );
    assert_eq!(report.repairs, 3);
    assert_eq!(report.mapping, layout.build().join("generated-aggregations-mapping.go"));
    assert_eq!(report.deprecated, vec![layout.project().join("aggs_removed.go")]);
    assert_eq!(
        file_names(&layout.project()),
        vec![
            "aggs_bar.go",
            "aggs_foo.go",
            "aggs_injectable.go",
            "generated-aggregations-mapping.go",
        ]
    );

    let foo = SourceUnit::open(layout.project().join("aggs_foo.go")).unwrap();
    assert_eq!(foo.package_name(), "aggretastic");
    assert!(foo.has_import("github.com/olivere/elastic"));
    assert!(foo.render().contains("\tscript *elastic.Script\n\t*Injectable\n}"));

    let mapping = std::fs::read_to_string(layout.project().join("generated-aggregations-mapping.go")).unwrap();
    assert!(mapping.contains("\t\t\"NewFooAggregation\": NewFooAggregation,\n"));
    assert!(mapping.contains("\t\t\"NewBarAggregation\": NewBarAggregation,\n"));
}

#[test]
fn test_published_package_verifies_clean() {
    let layout = layout();
    PackageUpdater::new(config(&layout)).unwrap().run().unwrap();
    assert_eq!(SemanticVerifier::new().verify_dir(&layout.project()).unwrap(), None);
}

#[test]
fn test_second_run_is_stable() {
    let layout = layout();
    let updater = PackageUpdater::new(config(&layout)).unwrap();
    let first = updater.run().unwrap();
    let published = std::fs::read_to_string(layout.project().join("aggs_foo.go")).unwrap();

    let second = updater.run().unwrap();
    assert_eq!(second.records, first.records);
    assert!(second.deprecated.is_empty());
    assert_eq!(
        std::fs::read_to_string(layout.project().join("aggs_foo.go")).unwrap(),
        published
    );
}

#[test]
fn test_stale_build_files_are_cleared() {
    let layout = layout();
    write_file(&layout.build(), "aggs_leftover.go", "package aggretastic\n\nvar x = Missing\n");
    PackageUpdater::new(config(&layout)).unwrap().run().unwrap();
    assert!(!layout.project().join("aggs_leftover.go").exists());
}

#[test]
fn test_missing_dependency_stops_run() {
    let layout = layout();
    let mut config = config(&layout);
    config.package.dependencies = vec!["aggs_missing.go".to_string()];

    let err = PackageUpdater::new(config).unwrap().run().unwrap_err();
    assert!(matches!(err, aggsync::SyncError::Io { op: aggsync::IoOp::Copy, .. }));
    assert!(layout.project().join("aggs_removed.go").exists());
}
