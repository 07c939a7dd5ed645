//! Decorators over declarations: structures, functions and function bodies.

use super::expressions::ReturnStatement;
use crate::error::{Result, SyncError};
use crate::syntax::ast::*;
use crate::syntax::make;

/// A `type Name struct { ... }` spec.
///
/// Holds the name and the field list as two disjoint borrows of the spec, so
/// field edits never alias the identifier.
#[derive(Debug)]
pub struct StructureDeclaration<'a> {
    name: &'a mut Ident,
    fields: &'a mut FieldList,
}

impl<'a> StructureDeclaration<'a> {
    /// Decorate a type spec; `None` when it does not declare a struct.
    pub fn new(spec: &'a mut TypeSpec) -> Option<Self> {
        let TypeSpec {
            name,
            ty: Expr::StructType(fields),
            ..
        } = spec
        else {
            return None;
        };
        Some(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name.name
    }

    /// Change the declared name only; references elsewhere are left as is.
    pub fn rename(&mut self, name: &str) {
        self.name.name = name.into();
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields.fields
    }

    /// Index of the first field line that declares `name` explicitly.
    pub fn find_field(&self, name: &str) -> Option<usize> {
        self.fields
            .fields
            .iter()
            .position(|field| field.names.iter().any(|ident| ident.name == name))
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.find_field(name).is_some()
    }

    /// Check for an embedded field accessed as `name` (`T`, `*T`, `pkg.T`).
    pub fn embeds(&self, name: &str) -> bool {
        self.fields
            .fields
            .iter()
            .any(|field| field.embedded_name() == Some(name))
    }

    /// Append a named field.
    pub fn add_field(&mut self, name: &str, ty: Expr) {
        self.fields.fields.push(make::field(Some(name), ty));
    }

    /// Append an embedded field.
    pub fn add_embedded(&mut self, ty: Expr) {
        self.fields.fields.push(make::field(None, ty));
    }

    /// Remove every embedded field accessed as `name`; reports whether any
    /// was present.
    pub fn remove_embedded(&mut self, name: &str) -> bool {
        let before = self.fields.fields.len();
        self.fields.fields.retain(|field| field.embedded_name() != Some(name));
        self.fields.fields.len() != before
    }

    /// Remove the field `name`. When one line declares several names only
    /// `name` is dropped from it.
    pub fn remove_field(&mut self, name: &str) -> Result<()> {
        let Some(index) = self.find_field(name) else {
            return Err(SyncError::FieldNotFound {
                structure: self.name().to_string(),
                field: name.to_string(),
            });
        };
        let field = &mut self.fields.fields[index];
        if field.names.len() > 1 {
            field.names.retain(|ident| ident.name != name);
        } else {
            self.fields.fields.remove(index);
        }
        Ok(())
    }
}

/// A function or method declaration.
#[derive(Debug)]
pub struct Function<'a> {
    decl: &'a mut FuncDecl,
}

impl<'a> Function<'a> {
    pub fn new(decl: &'a mut FuncDecl) -> Self {
        Self { decl }
    }

    pub fn name(&self) -> &str {
        &self.decl.name.name
    }

    pub fn rename(&mut self, name: &str) {
        self.decl.name.name = name.into();
    }

    pub fn is_method(&self) -> bool {
        self.decl.recv.is_some()
    }

    pub fn body(&mut self) -> Result<FunctionBody<'_>> {
        match &mut self.decl.body {
            Some(block) => Ok(FunctionBody::new(block)),
            None => Err(SyncError::MissingBody {
                function: self.decl.name.name.to_string(),
            }),
        }
    }
}

/// The statement list of a function.
#[derive(Debug)]
pub struct FunctionBody<'a> {
    block: &'a mut Block,
}

impl<'a> FunctionBody<'a> {
    pub fn new(block: &'a mut Block) -> Self {
        Self { block }
    }

    pub fn statements(&self) -> &[Stmt] {
        &self.block.stmts
    }

    /// The first `return` directly in the body.
    pub fn first_return(&mut self) -> Option<ReturnStatement<'_>> {
        self.block.stmts.iter_mut().find_map(|stmt| match &mut stmt.kind {
            StmtKind::Return(ret) => Some(ReturnStatement::new(ret)),
            _ => None,
        })
    }

    /// The first assignment or short variable declaration directly in the body.
    pub fn first_assignment(&mut self) -> Option<&mut AssignStmt> {
        self.block.stmts.iter_mut().find_map(|stmt| match &mut stmt.kind {
            StmtKind::Assign(assign) => Some(assign),
            _ => None,
        })
    }

    /// Drop every statement and comment.
    pub fn wipe(&mut self) {
        self.block.stmts.clear();
        self.block.end_comments.clear();
    }

    pub fn append_assignment(&mut self, target: &str, op: AssignOp, value: Expr) {
        self.block.stmts.push(make::assign(target, op, value));
    }

    pub fn append_return(&mut self, results: Vec<Expr>) {
        self.block.stmts.push(make::ret(results));
    }
}
