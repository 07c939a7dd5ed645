//! The two wrapping strategies and constructor normalisation.

use crate::error::{Result, SyncError};
use crate::model::{Function, FunctionBody, StructureDeclaration};
use crate::syntax::ast::{AssignOp, Expr};
use crate::syntax::make;

/// Field whose presence marks an aggregation that accepts sub-aggregations.
pub const SUB_AGGREGATIONS: &str = "subAggregations";

/// Local binding the rewritten constructor builds its value in.
const BINDING: &str = "a";

/// How a structure is wrapped, chosen from its field set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Strategy {
    /// Embeds `*Injectable` in place of the `subAggregations` map.
    Injectable,
    /// Embeds `*NotInjectable`.
    NotInjectable,
}

impl Strategy {
    /// Name of the embedded wrapper type, also used as the record category.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::Injectable => "Injectable",
            Strategy::NotInjectable => "NotInjectable",
        }
    }

    /// Function that builds the wrapper around the constructed value.
    pub fn wrapper_constructor(self) -> &'static str {
        match self {
            Strategy::Injectable => "newInjectable",
            Strategy::NotInjectable => "newNotInjectable",
        }
    }

    /// Pick the strategy for `structure`.
    ///
    /// A `subAggregations` field always selects `Injectable`. Otherwise a
    /// structure that already embeds a wrapper keeps its strategy, so a
    /// second run over transformed output changes nothing.
    pub fn select(structure: &StructureDeclaration<'_>) -> Self {
        if structure.has_field(SUB_AGGREGATIONS) || structure.embeds(Strategy::Injectable.name()) {
            Strategy::Injectable
        } else {
            Strategy::NotInjectable
        }
    }

    /// Embed the wrapper and, for injectable structures, drop the
    /// `subAggregations` field and any `NotInjectable` wrapper.
    pub fn enrich_structure(self, structure: &mut StructureDeclaration<'_>) -> Result<()> {
        if self == Strategy::Injectable {
            structure.remove_embedded(Strategy::NotInjectable.name());
        }
        if !structure.embeds(self.name()) {
            structure.add_embedded(make::pointer(make::name_expr(self.name())));
        }
        if self == Strategy::Injectable && structure.has_field(SUB_AGGREGATIONS) {
            structure.remove_field(SUB_AGGREGATIONS)?;
        }
        Ok(())
    }

    /// Replace the constructor body with
    ///
    /// ```go
    /// a := <initializer>
    /// a.Injectable = newInjectable(a)
    /// return a
    /// ```
    pub fn rewrite_constructor(self, function: &mut Function<'_>) -> Result<()> {
        let name = function.name().to_string();
        let mut body = function.body()?;
        let initializer = structure_initializer(&name, &mut body)?;

        body.wipe();
        body.append_assignment(BINDING, AssignOp::Define, initializer);
        self.init_wrapper(&mut body);
        body.append_return(vec![make::name_expr(BINDING)]);
        Ok(())
    }

    fn init_wrapper(self, body: &mut FunctionBody<'_>) {
        body.append_assignment(
            &format!("{BINDING}.{}", self.name()),
            AssignOp::Assign,
            make::call(self.wrapper_constructor(), &[BINDING]),
        );
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The expression that builds the structure value.
///
/// `return x` means the value was built by the first assignment, whose
/// right-hand side must be a unary expression. Otherwise the first unary
/// result of the return must wrap a composite literal, which loses its
/// `subAggregations` element.
fn structure_initializer(function: &str, body: &mut FunctionBody<'_>) -> Result<Expr> {
    let mut ret = body
        .first_return()
        .ok_or_else(|| SyncError::precondition(function, "no return statement"))?;

    if ret.identifier().is_some() {
        let assign = body.first_assignment().ok_or_else(|| {
            SyncError::precondition(function, "returns an identifier but has no assignment")
        })?;
        return match assign.rhs.first() {
            Some(unary @ Expr::Unary(_)) => Ok(unary.clone()),
            _ => Err(SyncError::precondition(
                function,
                "first assignment is not a unary expression",
            )),
        };
    }

    let mut unary = ret.unary_expression().ok_or_else(|| {
        SyncError::precondition(function, "return has neither an identifier nor a unary expression")
    })?;
    let mut literal = unary.composite_literal().ok_or_else(|| {
        SyncError::precondition(function, "returned unary expression does not wrap a composite literal")
    })?;
    if literal.remove_element_by_key(SUB_AGGREGATIONS) {
        tracing::trace!(function, "dropped subAggregations initializer");
    }
    Ok(unary.extract())
}
