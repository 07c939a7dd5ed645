#![allow(clippy::unwrap_used)]

use crate::helpers::workspace::write_file;
use aggsync::{Position, SourceUnit, SyncError};

const ORIGIN: &str = "github.com/olivere/elastic";

#[test]
fn test_import_added_once_across_saves() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "aggs_terms.go", "package aggretastic\n\nvar x = 1\n");

    for _ in 0..3 {
        let mut unit = SourceUnit::open(&path).unwrap();
        unit.add_import(None, ORIGIN);
        unit.save().unwrap();
    }

    let unit = SourceUnit::open(&path).unwrap();
    let count = unit.imports().filter(|import| import.path_value() == ORIGIN).count();
    assert_eq!(count, 1);
}

#[test]
fn test_qualification_ignores_import_shift() {
    let mut unit = SourceUnit::parse(
        "aggs_terms.go",
        "package aggretastic\n\nfunc f() interface{} {\n\treturn Script{}\n}\n",
    )
    .unwrap();
    assert!(unit.add_import(None, ORIGIN));
    assert_eq!(
        unit.qualify_ident_at(Position::new(4, 9), "elastic").as_deref(),
        Some("Script")
    );

    let reparsed = SourceUnit::parse("aggs_terms.go", &unit.render()).unwrap();
    assert!(reparsed.render().contains("\treturn elastic.Script{}\n"));
    assert!(reparsed.has_import(ORIGIN));
}

#[test]
fn test_comments_survive_rewrite() {
    let text = "// Package elastic is upstream.\npackage elastic\n\n// Terms aggregates.\ntype Terms struct {\n\tfield string // the field\n}\n";
    let mut unit = SourceUnit::parse("a.go", text).unwrap();
    unit.rename_package("aggretastic");
    let rendered = unit.render();
    assert!(rendered.contains("// Terms aggregates.\ntype Terms struct {"));
    assert!(rendered.contains("\tfield string // the field\n"));
    assert!(rendered.contains("package aggretastic\n"));
}

#[test]
fn test_open_missing_file() {
    let err = SourceUnit::open("/nonexistent/aggs_terms.go").unwrap_err();
    assert!(matches!(err, SyncError::Io { .. }));
    assert!(err.to_string().starts_with("cannot open /nonexistent/aggs_terms.go"));
}

#[test]
fn test_out_of_range_column_qualifies_nothing() {
    let text = "package aggretastic\n\nvar x = Bar\n";
    let mut unit = SourceUnit::parse("aggs_bar.go", text).unwrap();

    assert_eq!(unit.qualify_ident_at(Position::new(3, usize::MAX), "elastic"), None);
    // 2^32 + 9 truncates to column 9, the start of `Bar`
    let wrapped = usize::try_from(u64::from(u32::MAX) + 10).unwrap_or(usize::MAX);
    assert_eq!(unit.qualify_ident_at(Position::new(3, wrapped), "elastic"), None);
    assert!(unit.render().contains("var x = Bar\n"));
}
