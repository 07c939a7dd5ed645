//! Find a declaration by name pattern.

use super::declarations::{Function, StructureDeclaration};
use crate::error::Result;
use crate::syntax::ast::{File, Spec};
use crate::syntax::walk;
use regex::Regex;

/// Searches a whole file for structures or functions whose name matches a
/// pattern.
///
/// The search never stops early: every match in document order replaces the
/// previous one, so the result is the *last* match. Within a single grouped
/// `type (...)` declaration the first matching struct stands for the group.
#[derive(Debug, Clone)]
pub struct PatternLocator {
    pattern: Regex,
}

impl PatternLocator {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn find_structure<'a>(&self, file: &'a mut File) -> Option<StructureDeclaration<'a>> {
        walk::type_decls_mut(file)
            .into_iter()
            .filter_map(|decl| {
                decl.specs.iter_mut().find_map(|spec| match spec {
                    Spec::Type(spec) if self.pattern.is_match(&spec.name.name) => {
                        StructureDeclaration::new(spec)
                    }
                    _ => None,
                })
            })
            .last()
    }

    pub fn find_function<'a>(&self, file: &'a mut File) -> Option<Function<'a>> {
        walk::func_decls_mut(file)
            .into_iter()
            .filter(|func| self.pattern.is_match(&func.name.name))
            .last()
            .map(Function::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_last_structure_match_wins() {
        let mut file = parse(
            "package p\ntype FirstAggregation struct{}\ntype Other struct{}\ntype SecondAggregation struct{}\ntype ThirdAggregation int\n",
        )
        .unwrap();
        let locator = PatternLocator::new("(.*)Aggregation$").unwrap();
        let found = locator.find_structure(&mut file).unwrap();
        assert_eq!(found.name(), "SecondAggregation");
    }

    #[test]
    fn test_last_function_match_wins() {
        let mut file = parse(
            "package p\nfunc NewAAggregation() {}\nfunc NewBAggregation() {}\nfunc helper() {}\n",
        )
        .unwrap();
        let locator = PatternLocator::new("^New(.*)Aggregation$").unwrap();
        assert_eq!(
            locator.find_function(&mut file).map(|f| f.name().to_string()),
            Some("NewBAggregation".to_string())
        );
    }

    #[test]
    fn test_no_match() {
        let mut file = parse("package p\ntype Foo struct{}\n").unwrap();
        let locator = PatternLocator::new("(.*)Aggregation$").unwrap();
        assert!(locator.find_structure(&mut file).is_none());
        assert!(locator.find_function(&mut file).is_none());
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(PatternLocator::new("(").is_err());
    }
}
