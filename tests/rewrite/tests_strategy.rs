#![allow(clippy::unwrap_used)]

use crate::helpers::go_fixtures::{BAR_AGGREGATION, FOO_AGGREGATION};
use aggsync::rewrite::SUB_AGGREGATIONS;
use aggsync::syntax::printer::print_stmt;
use aggsync::{FileTransformPipeline, PatternLocator, SourceUnit, Strategy, SyncRecord};
use rstest::rstest;

fn pipeline() -> FileTransformPipeline {
    FileTransformPipeline::new("aggretastic", "(.*)Aggregation$", "^New(.*)Aggregation$").unwrap()
}

fn transformed(text: &str) -> (SourceUnit, Option<SyncRecord>) {
    let mut unit = SourceUnit::parse("search_aggs_test.go", text).unwrap();
    let record = pipeline().transform(&mut unit).unwrap();
    (unit, record)
}

fn structure_fields(unit: &mut SourceUnit) -> (Vec<String>, Vec<String>) {
    let locator = PatternLocator::new("(.*)Aggregation$").unwrap();
    let structure = unit.find_structure(&locator).unwrap();
    let named = structure
        .fields()
        .iter()
        .flat_map(|field| field.names.iter().map(|name| name.name.to_string()))
        .collect();
    let embedded = structure
        .fields()
        .iter()
        .filter_map(|field| field.embedded_name().map(str::to_string))
        .collect();
    (named, embedded)
}

fn constructor_body(unit: &mut SourceUnit) -> Vec<String> {
    let locator = PatternLocator::new("^New(.*)Aggregation$").unwrap();
    let mut function = unit.find_function(&locator).unwrap();
    let body = function.body().unwrap();
    body.statements().iter().map(print_stmt).collect()
}

#[test]
fn test_injectable_structure_fields() {
    let (mut unit, record) = transformed(FOO_AGGREGATION);
    assert_eq!(record.unwrap().category, Strategy::Injectable);

    let (named, embedded) = structure_fields(&mut unit);
    assert!(!named.iter().any(|name| name == SUB_AGGREGATIONS));
    assert_eq!(named, vec!["script"]);
    assert_eq!(embedded, vec!["Injectable"]);
}

#[test]
fn test_not_injectable_structure_fields() {
    let (mut unit, record) = transformed(BAR_AGGREGATION);
    assert_eq!(record.unwrap().category, Strategy::NotInjectable);

    let (named, embedded) = structure_fields(&mut unit);
    assert_eq!(named, vec!["field", "meta"]);
    assert_eq!(embedded, vec!["NotInjectable"]);
}

#[rstest]
#[case::composite_return(FOO_AGGREGATION, "a := &FooAggregation{}", "Injectable")]
#[case::identifier_return(BAR_AGGREGATION, "a := &BarAggregation{field: field}", "NotInjectable")]
fn test_constructor_has_three_statements(
    #[case] text: &str,
    #[case] initializer: &str,
    #[case] wrapper: &str,
) {
    let (mut unit, _) = transformed(text);
    let body = constructor_body(&mut unit);
    assert_eq!(
        body,
        vec![
            initializer.to_string(),
            format!("a.{wrapper} = new{wrapper}(a)"),
            "return a".to_string(),
        ]
    );
}

#[rstest]
#[case::injectable(FOO_AGGREGATION)]
#[case::not_injectable(BAR_AGGREGATION)]
fn test_second_transform_is_a_no_op(#[case] text: &str) {
    let (once, first) = transformed(text);
    let rendered = once.render();

    let (twice, second) = transformed(&rendered);
    assert_eq!(first, second);
    assert_eq!(twice.render(), rendered);
}

#[test]
fn test_remaining_initializers_are_kept() {
    let text = "package elastic\n\ntype TermsAggregation struct {\n\tsize int\n\tsubAggregations map[string]Aggregation\n}\n\nfunc NewTermsAggregation() *TermsAggregation {\n\treturn &TermsAggregation{\n\t\tsize: 10,\n\t\tsubAggregations: make(map[string]Aggregation),\n\t}\n}\n";
    let (mut unit, _) = transformed(text);
    let body = constructor_body(&mut unit);
    assert_eq!(body[0], "a := &TermsAggregation{\n\tsize: 10,\n}");
}

#[test]
fn test_sub_aggregations_outrank_existing_wrapper() {
    let text = "package aggretastic\n\ntype QuxAggregation struct {\n\tsubAggregations map[string]Aggregation\n\t*NotInjectable\n}\n\nfunc NewQuxAggregation() *QuxAggregation {\n\ta := &QuxAggregation{}\n\ta.NotInjectable = newNotInjectable(a)\n\treturn a\n}\n";
    let (mut unit, record) = transformed(text);
    assert_eq!(record, Some(SyncRecord::new(Strategy::Injectable, "NewQuxAggregation")));

    let (named, embedded) = structure_fields(&mut unit);
    assert!(named.is_empty());
    assert_eq!(embedded, vec!["Injectable"]);
    assert_eq!(constructor_body(&mut unit)[1], "a.Injectable = newInjectable(a)");
}
