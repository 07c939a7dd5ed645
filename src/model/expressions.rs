//! Decorators over statements and expressions inside constructor bodies.

use crate::syntax::ast::*;

/// A `return` statement.
#[derive(Debug)]
pub struct ReturnStatement<'a> {
    stmt: &'a mut ReturnStmt,
}

impl<'a> ReturnStatement<'a> {
    pub fn new(stmt: &'a mut ReturnStmt) -> Self {
        Self { stmt }
    }

    pub fn results(&self) -> &[Expr] {
        &self.stmt.results
    }

    /// The first result that is a bare identifier.
    pub fn identifier(&self) -> Option<&Ident> {
        self.stmt.results.iter().find_map(Expr::as_ident)
    }

    /// The first result that is a unary expression.
    pub fn unary_expression(&mut self) -> Option<UnaryExpression<'_>> {
        self.stmt.results.iter_mut().find_map(|result| match result {
            Expr::Unary(unary) => Some(UnaryExpression::new(unary)),
            _ => None,
        })
    }
}

/// A unary expression such as `&T{...}`.
#[derive(Debug)]
pub struct UnaryExpression<'a> {
    expr: &'a mut UnaryExpr,
}

impl<'a> UnaryExpression<'a> {
    pub fn new(expr: &'a mut UnaryExpr) -> Self {
        Self { expr }
    }

    pub fn op(&self) -> UnaryOp {
        self.expr.op
    }

    /// The operand when it is a composite literal.
    pub fn composite_literal(&mut self) -> Option<CompositeLiteral<'_>> {
        match self.expr.x.as_mut() {
            Expr::CompositeLit(lit) => Some(CompositeLiteral::new(lit)),
            _ => None,
        }
    }

    /// A detached copy of the whole expression.
    pub fn extract(&self) -> Expr {
        Expr::Unary(self.expr.clone())
    }

    pub fn replace(&mut self, expr: UnaryExpr) {
        *self.expr = expr;
    }
}

/// A composite literal `T{...}`.
#[derive(Debug)]
pub struct CompositeLiteral<'a> {
    lit: &'a mut CompositeLit,
}

impl<'a> CompositeLiteral<'a> {
    pub fn new(lit: &'a mut CompositeLit) -> Self {
        Self { lit }
    }

    pub fn elements(&self) -> &[Expr] {
        &self.lit.elts
    }

    /// Index of the `key: value` element whose key is the identifier `key`.
    /// Positional elements never match.
    pub fn key_index(&self, key: &str) -> Option<usize> {
        self.lit.elts.iter().position(|element| match element {
            Expr::KeyValue { key: k, .. } => k.as_ident().is_some_and(|ident| ident.name == key),
            _ => false,
        })
    }

    /// Remove the element keyed by `key`; returns whether one was removed.
    pub fn remove_element_by_key(&mut self, key: &str) -> bool {
        match self.key_index(key) {
            Some(index) => self.remove_element_by_index(index).is_some(),
            None => false,
        }
    }

    /// Remove the element at `index`; out-of-range indices are ignored.
    pub fn remove_element_by_index(&mut self, index: usize) -> Option<Expr> {
        (index < self.lit.elts.len()).then(|| self.lit.elts.remove(index))
    }
}
