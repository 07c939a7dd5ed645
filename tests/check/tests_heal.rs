#![allow(clippy::unwrap_used)]

use crate::helpers::workspace::write_file;
use aggsync::check::UndefinedNameAnalyzer;
use aggsync::config::OriginConfig;
use aggsync::{
    HealStep, Position, Result, SelfHealingLoop, SemanticAnalyzer, SemanticVerifier, SourceUnit,
    SyncError,
};
use rstest::rstest;
use std::path::{Path, PathBuf};

const ORIGIN_PATH: &str = "github.com/olivere/elastic";

fn origin() -> OriginConfig {
    OriginConfig {
        name: "elastic".to_string(),
        path: ORIGIN_PATH.to_string(),
    }
}

fn origin_imports(path: &Path) -> usize {
    SourceUnit::open(path)
        .unwrap()
        .imports()
        .filter(|import| import.path_value() == ORIGIN_PATH)
        .count()
}

/// Always reports the same diagnostic.
struct Stuck(String);

impl SemanticAnalyzer for Stuck {
    fn analyze(&self, _files: &[PathBuf]) -> Result<Option<String>> {
        Ok(Some(self.0.clone()))
    }
}

#[test]
fn test_reported_identifier_is_qualified() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "pkg/foo.go",
        "package pkg\n\nimport \"fmt\"\n\nfunc fn(v interface{}) {\n\tfmt.Println(v)\n}\n\nfunc run() {\n\tfn(Bar)\n}\n",
    );
    let files = vec![path.clone()];

    let verifier = SemanticVerifier::new();
    let diagnostic = verifier.verify(&files).unwrap().unwrap();
    assert_eq!(diagnostic.to_string(), format!("{}:10:5: undefined: Bar", path.display()));

    let healer = SelfHealingLoop::new(origin(), 16);
    let step = healer.heal_once(&files).unwrap();
    assert_eq!(step, HealStep::Repaired(diagnostic));

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\tfn(elastic.Bar)\n"));
    assert!(text.contains("import (\n\t\"fmt\"\n\t\"github.com/olivere/elastic\"\n)"));
    assert_eq!(origin_imports(&path), 1);

    assert_eq!(healer.heal_once(&files).unwrap(), HealStep::Clean);
}

#[test]
fn test_import_inserted_once_for_many_repairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "aggs_terms.go",
        "package aggretastic\n\ntype TermsAggregation struct {\n\tscript *Script\n\tquery  Query\n}\n\nfunc (a *TermsAggregation) Source() (interface{}, error) {\n\treturn NewScript(\"x\"), nil\n}\n",
    );

    let repairs = SelfHealingLoop::new(origin(), 16).run(dir.path()).unwrap();
    assert_eq!(repairs, 3);
    assert_eq!(origin_imports(&path), 1);

    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.contains("\tscript *elastic.Script\n"));
    assert!(text.contains("\tquery elastic.Query\n"));
    assert!(text.contains("\treturn elastic.NewScript(\"x\"), nil\n"));
}

#[test]
fn test_clean_directory_needs_no_repairs() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar a = len(\"x\")\n");
    let before = std::fs::read_to_string(&path).unwrap();

    assert_eq!(SelfHealingLoop::new(origin(), 1).run(dir.path()).unwrap(), 0);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[rstest]
#[case::keyword("1:1")]
#[case::inside_identifier("3:10")]
#[case::past_end("40:2")]
fn test_unmatched_position_is_unrepaired(#[case] position: &str) {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar a = Missing\n");
    let before = std::fs::read_to_string(&path).unwrap();

    let report = format!("{}:{position}: undefined: Missing", path.display());
    let healer = SelfHealingLoop::with_verifier(SemanticVerifier::with_analyzer(Stuck(report)), origin(), 4);

    let step = healer.heal_once(&[path.clone()]).unwrap();
    assert!(matches!(step, HealStep::Unrepaired(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
}

#[test]
fn test_non_convergence_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar a = Missing\n");
    let report = format!("{}:1:1: undefined: package", path.display());
    let healer = SelfHealingLoop::with_verifier(SemanticVerifier::with_analyzer(Stuck(report.clone())), origin(), 5);

    let err = healer.run(dir.path()).unwrap_err();
    let SyncError::NotConverged {
        iterations,
        diagnostic,
    } = err
    else {
        panic!("expected non-convergence, got {err}");
    };
    assert_eq!(iterations, 5);
    assert_eq!(diagnostic, report);
}

#[test]
fn test_default_analyzer_reports_resolved_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "aggs_a.go", "package aggretastic\n\nvar a = Missing\n");
    let files = vec![path.clone()];
    let healer = SelfHealingLoop::with_verifier(
        SemanticVerifier::with_analyzer(UndefinedNameAnalyzer),
        origin(),
        4,
    );

    let step = healer.heal_once(&files).unwrap();
    let HealStep::Repaired(diagnostic) = step else {
        panic!("expected a repair, got {step:?}");
    };
    assert_eq!(diagnostic.position, Position::new(3, 9));
    assert_eq!(diagnostic.undefined_name(), Some("Missing"));
}
