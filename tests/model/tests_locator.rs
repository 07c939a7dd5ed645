#![allow(clippy::unwrap_used)]

use crate::helpers::go_fixtures::TWO_AGGREGATIONS;
use aggsync::{PatternLocator, SourceUnit};
use rstest::rstest;

fn unit(text: &str) -> SourceUnit {
    SourceUnit::parse("search_aggs_test.go", text).unwrap()
}

#[test]
fn test_last_structure_in_file_is_found() {
    let mut unit = unit(TWO_AGGREGATIONS);
    let locator = PatternLocator::new("(.*)Aggregation$").unwrap();
    let structure = unit.find_structure(&locator).unwrap();
    assert_eq!(structure.name(), "SecondAggregation");
}

#[test]
fn test_last_constructor_in_file_is_found() {
    let mut unit = unit(TWO_AGGREGATIONS);
    let locator = PatternLocator::new("^New(.*)Aggregation$").unwrap();
    let function = unit.find_function(&locator).unwrap();
    assert_eq!(function.name(), "NewSecondAggregation");
}

#[test]
fn test_group_is_represented_by_its_first_match() {
    let mut unit = unit(
        "package elastic\n\ntype (\n\tAAggregation struct{}\n\tBAggregation struct{}\n)\n\ntype helper struct{}\n",
    );
    let locator = PatternLocator::new("(.*)Aggregation$").unwrap();
    assert_eq!(unit.find_structure(&locator).unwrap().name(), "AAggregation");
}

#[rstest]
#[case::non_struct_type("package p\n\ntype FooAggregation int\n")]
#[case::no_declarations("package p\n")]
#[case::only_functions("package p\n\nfunc FooAggregation() {}\n")]
fn test_no_structure(#[case] text: &str) {
    let mut unit = unit(text);
    let locator = PatternLocator::new("(.*)Aggregation$").unwrap();
    assert!(unit.find_structure(&locator).is_none());
}

#[test]
fn test_methods_are_candidates() {
    let mut unit = unit(
        "package p\n\nfunc NewFooAggregation() {}\n\nfunc (b *builder) NewBarAggregation() {}\n",
    );
    let locator = PatternLocator::new("^New(.*)Aggregation$").unwrap();
    let function = unit.find_function(&locator).unwrap();
    assert_eq!(function.name(), "NewBarAggregation");
    assert!(function.is_method());
}

#[test]
fn test_invalid_pattern_is_rejected() {
    assert!(matches!(
        PatternLocator::new("(unclosed"),
        Err(aggsync::SyncError::Pattern(_))
    ));
}
