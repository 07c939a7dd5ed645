#![allow(clippy::unwrap_used)]

use crate::helpers::go_fixtures::WRAPPERS;
use crate::helpers::workspace::write_file;
use aggsync::{Position, SemanticVerifier};

#[test]
fn test_clean_package() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "aggs_injectable.go", WRAPPERS);
    write_file(
        dir.path(),
        "aggs_terms.go",
        "package aggretastic\n\ntype TermsAggregation struct {\n\t*Injectable\n}\n\nfunc NewTermsAggregation() *TermsAggregation {\n\ta := &TermsAggregation{}\n\ta.Injectable = newInjectable(a)\n\treturn a\n}\n",
    );
    assert_eq!(SemanticVerifier::new().verify_dir(dir.path()).unwrap(), None);
}

#[test]
fn test_first_diagnostic_only() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar a = Script{}\n");
    write_file(dir.path(), "aggs_b.go", "package aggretastic\n\nvar b = Query(nil)\n");

    let diagnostic = SemanticVerifier::new().verify_dir(dir.path()).unwrap().unwrap();
    assert_eq!(diagnostic.path, dir.path().join("aggs_a.go"));
    assert_eq!(diagnostic.position, Position::new(3, 9));
    assert_eq!(diagnostic.message, "undefined: Script");
}

#[test]
fn test_subdirectories_are_not_checked() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar a = 1\n");
    write_file(dir.path(), "nested/aggs_b.go", "package nested\n\nvar b = Missing\n");
    assert_eq!(SemanticVerifier::new().verify_dir(dir.path()).unwrap(), None);
}

#[test]
fn test_parse_failure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar = 1\n");
    let err = SemanticVerifier::new().verify_dir(dir.path()).unwrap_err();
    assert!(matches!(err, aggsync::SyncError::Parse { .. }));
}
