//! Go sources shaped like the upstream aggregation files.

/// Aggregation that accepts sub-aggregations; its constructor returns a
/// composite literal.
pub const FOO_AGGREGATION: &str = r#"package elastic

// FooAggregation is a bucket aggregation.
type FooAggregation struct {
	script          *Script
	subAggregations map[string]Aggregation
}

// NewFooAggregation creates a new FooAggregation.
func NewFooAggregation() *FooAggregation {
	return &FooAggregation{
		subAggregations: make(map[string]Aggregation),
	}
}

// WithScript sets the script.
func (a *FooAggregation) WithScript(script *Script) *FooAggregation {
	a.script = script
	return a
}
"#;

/// Metrics aggregation whose constructor returns a local variable.
pub const BAR_AGGREGATION: &str = r#"package elastic

type BarAggregation struct {
	field string
	meta  map[string]interface{}
}

func NewBarAggregation(field string) *BarAggregation {
	agg := &BarAggregation{field: field}
	return agg
}

func (a *BarAggregation) Source() (interface{}, error) {
	return NewTermsQuery(a.field), nil
}
"#;

/// Wrapper types the generated package provides.
pub const WRAPPERS: &str = r#"package aggretastic

type Injectable struct {
	root            interface{}
	subAggregations map[string]interface{}
}

func newInjectable(root interface{}) *Injectable {
	return &Injectable{root: root, subAggregations: make(map[string]interface{})}
}

type NotInjectable struct {
	root interface{}
}

func newNotInjectable(root interface{}) *NotInjectable {
	return &NotInjectable{root: root}
}
"#;

/// A file with two aggregations in separate declarations.
pub const TWO_AGGREGATIONS: &str = r#"package elastic

type FirstAggregation struct {
	field string
}

func NewFirstAggregation() *FirstAggregation {
	return &FirstAggregation{}
}

type SecondAggregation struct {
	subAggregations map[string]Aggregation
}

func NewSecondAggregation() *SecondAggregation {
	return &SecondAggregation{subAggregations: nil}
}
"#;

/// Aggregation whose file carries block comments: a license header, a
/// multi-line doc and one closed by a run of stars.
pub const COMMENTED_AGGREGATION: &str = r#"/* Copyright 2012-present Oliver Eilhard. All rights reserved. */

package elastic

/*
BazAggregation counts distinct values.
See the reference docs.
*/
type BazAggregation struct {
	field string /* source field */
}

/** NewBazAggregation creates a new BazAggregation. **/
func NewBazAggregation() *BazAggregation {
	return &BazAggregation{}
}
"#;
