//! Generated source built from sync records.

use crate::error::{IoOp, Result, SyncError};
use crate::rewrite::{Strategy, SyncRecord};
use crate::syntax::ast::*;
use crate::syntax::{make, print_file};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const GENERATED_HEADER: &str = "// Code generated by aggsync. DO NOT EDIT.";

/// Writes a generated file from the records of one run.
pub trait CodeEmitter {
    /// Write into `dir`; returns the path written.
    fn emit(&self, records: &[SyncRecord], dir: &Path) -> Result<PathBuf>;
}

/// Emits a map from strategy name to constructor name to constructor:
///
/// ```go
/// var aggMap = map[string]map[string]interface{}{
/// 	"Injectable": map[string]interface{}{
/// 		"NewFooAggregation": NewFooAggregation,
/// 	},
/// 	"NotInjectable": map[string]interface{}{},
/// }
/// ```
///
/// Keys are sorted so the output is stable across runs.
#[derive(Debug, Clone)]
pub struct LookupTableEmitter {
    package: String,
    file_name: String,
    variable: String,
}

impl LookupTableEmitter {
    pub fn new(package: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            file_name: file_name.into(),
            variable: "aggMap".to_string(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The generated file as a tree.
    pub fn build(&self, records: &[SyncRecord]) -> File {
        let mut table: BTreeMap<Strategy, Vec<&str>> = [Strategy::Injectable, Strategy::NotInjectable]
            .into_iter()
            .map(|strategy| (strategy, Vec::new()))
            .collect();
        for record in records {
            table.entry(record.category).or_default().push(&record.symbol);
        }

        let categories = table
            .into_iter()
            .map(|(strategy, mut symbols)| {
                symbols.sort_unstable();
                symbols.dedup();
                let constructors = symbols
                    .into_iter()
                    .map(|symbol| key_value(symbol, make::name_expr(symbol)))
                    .collect();
                key_value(strategy.name(), map_literal(inner_map_type(), constructors))
            })
            .collect();

        let outer = Expr::MapType {
            key: Box::new(make::name_expr("string")),
            value: Box::new(inner_map_type()),
        };
        let spec = ValueSpec {
            doc: Vec::new(),
            names: vec![make::ident(&self.variable)],
            ty: None,
            values: vec![map_literal(outer, categories)],
            comment: None,
        };

        File {
            doc: vec![Comment::new(GENERATED_HEADER)],
            package: make::ident(&self.package),
            decls: vec![Decl::Gen(GenDecl {
                doc: Vec::new(),
                keyword: DeclKeyword::Var,
                grouped: false,
                specs: vec![Spec::Value(spec)],
                pos: None,
            })],
            trailing: Vec::new(),
        }
    }

    pub fn render(&self, records: &[SyncRecord]) -> String {
        print_file(&self.build(records))
    }
}

impl CodeEmitter for LookupTableEmitter {
    fn emit(&self, records: &[SyncRecord], dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, self.render(records)).map_err(|e| SyncError::io(IoOp::Write, &path, e))?;
        tracing::info!(path = %path.display(), records = records.len(), "lookup table written");
        Ok(path)
    }
}

/// `map[string]interface{}`
fn inner_map_type() -> Expr {
    Expr::MapType {
        key: Box::new(make::name_expr("string")),
        value: Box::new(Expr::InterfaceType(FieldList::default())),
    }
}

fn map_literal(ty: Expr, elts: Vec<Expr>) -> Expr {
    Expr::CompositeLit(CompositeLit {
        ty: Some(Box::new(ty)),
        multiline: !elts.is_empty(),
        elts,
    })
}

fn key_value(key: &str, value: Expr) -> Expr {
    Expr::KeyValue {
        key: Box::new(Expr::BasicLit(make::string_lit(key))),
        value: Box::new(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_render_sorted_table() {
        let records = vec![
            SyncRecord::new(Strategy::NotInjectable, "NewSumAggregation"),
            SyncRecord::new(Strategy::Injectable, "NewTermsAggregation"),
            SyncRecord::new(Strategy::NotInjectable, "NewAvgAggregation"),
        ];
        let text = LookupTableEmitter::new("aggretastic", "generated-aggregations-mapping.go").render(&records);
        let expected = "\
// Code generated by aggsync. DO NOT EDIT.
package aggretastic

var aggMap = map[string]map[string]interface{}{
\t\"Injectable\": map[string]interface{}{
\t\t\"NewTermsAggregation\": NewTermsAggregation,
\t},
\t\"NotInjectable\": map[string]interface{}{
\t\t\"NewAvgAggregation\": NewAvgAggregation,
\t\t\"NewSumAggregation\": NewSumAggregation,
\t},
}
";
        assert_eq!(text, expected);
        assert!(parse(&text).is_ok());
    }

    #[test]
    fn test_empty_categories_are_kept() {
        let text = LookupTableEmitter::new("aggretastic", "m.go").render(&[]);
        assert!(text.contains("\t\"Injectable\": map[string]interface{}{},\n"));
        assert!(text.contains("\t\"NotInjectable\": map[string]interface{}{},\n"));
    }

    #[test]
    fn test_emit_writes_into_dir() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = LookupTableEmitter::new("aggretastic", "generated-aggregations-mapping.go");
        let path = emitter.emit(&[], dir.path()).unwrap();
        assert_eq!(path, dir.path().join(emitter.file_name()));
        assert!(std::fs::read_to_string(path).unwrap().starts_with(GENERATED_HEADER));
    }
}
