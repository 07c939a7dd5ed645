//! Identifier resolution over a package.

use super::diagnostic::Diagnostic;
use super::scope::{FileScope, LocalScopes, PackageScope, is_predeclared};
use crate::base::TextSize;
use crate::model::SourceUnit;
use crate::syntax::ast::*;
use smol_str::SmolStr;

/// Named types are followed at most this many times when looking for the
/// shape of a composite literal.
const MAX_TYPE_INDIRECTIONS: usize = 16;

/// A use of a name that no enclosing scope declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Unresolved {
    pub name: SmolStr,
    pub pos: Option<TextSize>,
}

type Walk = Result<(), Unresolved>;

/// The first undefined name in `units`, checked as one package.
///
/// Files are visited in path order and declarations in source order.
pub fn first_undefined(units: &[SourceUnit]) -> Option<Diagnostic> {
    let package = PackageScope::collect(units.iter().map(SourceUnit::file));
    tracing::trace!(files = units.len(), names = package.len(), "package scope collected");

    let mut ordered: Vec<&SourceUnit> = units.iter().collect();
    ordered.sort_by(|a, b| a.path().cmp(b.path()));

    ordered.into_iter().find_map(|unit| {
        let unresolved = Resolver::new(&package, unit.file()).first_unresolved(unit.file())?;
        let position = unit.index().position(unresolved.pos.unwrap_or_default());
        Some(Diagnostic::undefined(unit.path(), position, &unresolved.name))
    })
}

/// Shape of a composite literal's type, which decides how keys resolve.
#[derive(Debug, Clone, Copy)]
enum Shape<'a> {
    /// Keys are field names.
    Struct,
    Map { key: &'a Expr, value: &'a Expr },
    /// Keys are indices.
    Array { elem: &'a Expr },
    Unknown,
}

impl<'a> Shape<'a> {
    /// Type of an element whose literal type is elided.
    fn element(self) -> Option<&'a Expr> {
        match self {
            Shape::Map { value, .. } => Some(value),
            Shape::Array { elem } => Some(elem),
            Shape::Struct | Shape::Unknown => None,
        }
    }
}

/// Resolves every name used in one file.
pub struct Resolver<'a, 'p> {
    package: &'p PackageScope<'a>,
    imports: FileScope,
    locals: LocalScopes<'a>,
}

impl<'a, 'p> Resolver<'a, 'p> {
    pub fn new(package: &'p PackageScope<'a>, file: &'a File) -> Self {
        Self {
            package,
            imports: FileScope::new(file),
            locals: LocalScopes::default(),
        }
    }

    /// The first unresolved use in `file`. Files with a dot import are not
    /// checked since their unqualified names cannot be told apart.
    pub fn first_unresolved(mut self, file: &'a File) -> Option<Unresolved> {
        if self.imports.has_dot_import() {
            return None;
        }
        self.file(file).err()
    }

    fn is_declared(&self, name: &str) -> bool {
        self.locals.contains(name)
            || self.imports.contains(name)
            || self.package.contains(name)
            || is_predeclared(name)
    }

    fn use_ident(&self, ident: &'a Ident) -> Walk {
        if ident.is_blank() {
            return Ok(());
        }
        // A name qualified in memory resolves through its package part.
        let name = ident.name.split_once('.').map_or(ident.name.as_str(), |(pkg, _)| pkg);
        if self.is_declared(name) {
            return Ok(());
        }
        tracing::trace!(name, depth = self.locals.depth(), "unresolved");
        Err(Unresolved {
            name: name.into(),
            pos: ident.pos,
        })
    }

    // ========================================================================
    // DECLARATIONS
    // ========================================================================

    fn file(&mut self, file: &'a File) -> Walk {
        for decl in &file.decls {
            match decl {
                Decl::Gen(gen_decl) => self.gen_decl(gen_decl, false)?,
                Decl::Func(func) => self.func_decl(func)?,
            }
        }
        Ok(())
    }

    /// Top-level names are already in the package scope; local ones are
    /// declared here. A variable is visible after its spec, a type inside it.
    fn gen_decl(&mut self, decl: &'a GenDecl, local: bool) -> Walk {
        for spec in &decl.specs {
            match spec {
                Spec::Import(_) => {}
                Spec::Value(value) => {
                    if let Some(ty) = &value.ty {
                        self.expr(ty)?;
                    }
                    self.exprs(&value.values)?;
                    if local {
                        value.names.iter().for_each(|name| self.locals.declare(name));
                    }
                }
                Spec::Type(ty) => {
                    if local {
                        self.locals.declare(&ty.name);
                    }
                    self.expr(&ty.ty)?;
                }
            }
        }
        Ok(())
    }

    fn func_decl(&mut self, func: &'a FuncDecl) -> Walk {
        self.locals.push();
        self.signature(func.recv.as_ref(), &func.ty)?;
        if let Some(body) = &func.body {
            self.stmts(&body.stmts)?;
        }
        self.locals.pop();
        Ok(())
    }

    /// Resolve parameter types, then declare the parameter names.
    fn signature(&mut self, recv: Option<&'a FieldList>, ty: &'a FuncType) -> Walk {
        let lists: Vec<&'a FieldList> = recv
            .into_iter()
            .chain(Some(&ty.params))
            .chain(ty.results.as_ref())
            .collect();
        for &list in &lists {
            self.field_types(list)?;
        }
        for field in lists.into_iter().flat_map(|list| &list.fields) {
            field.names.iter().for_each(|name| self.locals.declare(name));
        }
        Ok(())
    }

    fn field_types(&mut self, list: &'a FieldList) -> Walk {
        list.fields.iter().try_for_each(|field| self.expr(&field.ty))
    }

    // ========================================================================
    // STATEMENTS
    // ========================================================================

    fn block(&mut self, block: &'a Block) -> Walk {
        self.scoped(|this| this.stmts(&block.stmts))
    }

    fn scoped(&mut self, f: impl FnOnce(&mut Self) -> Walk) -> Walk {
        self.locals.push();
        f(self)?;
        self.locals.pop();
        Ok(())
    }

    fn stmts(&mut self, stmts: &'a [Stmt]) -> Walk {
        stmts.iter().try_for_each(|stmt| self.stmt(stmt))
    }

    fn opt_stmt(&mut self, stmt: Option<&'a Stmt>) -> Walk {
        stmt.map_or(Ok(()), |stmt| self.stmt(stmt))
    }

    fn stmt(&mut self, stmt: &'a Stmt) -> Walk {
        match &stmt.kind {
            StmtKind::Decl(decl) => self.gen_decl(decl, true),
            StmtKind::Empty | StmtKind::Branch { .. } => Ok(()),
            StmtKind::Labeled { stmt, .. } => self.stmt(stmt),
            StmtKind::Expr(expr) | StmtKind::Go(expr) | StmtKind::Defer(expr) => self.expr(expr),
            StmtKind::Send { chan, value } => {
                self.expr(chan)?;
                self.expr(value)
            }
            StmtKind::IncDec { x, .. } => self.expr(x),
            StmtKind::Assign(assign) => self.assign(assign),
            StmtKind::Return(ret) => self.exprs(&ret.results),
            StmtKind::Block(block) => self.block(block),
            StmtKind::If(if_stmt) => self.scoped(|this| {
                this.opt_stmt(if_stmt.init.as_deref())?;
                this.expr(&if_stmt.cond)?;
                this.block(&if_stmt.then)?;
                this.opt_stmt(if_stmt.els.as_deref())
            }),
            StmtKind::Switch(switch) => self.scoped(|this| {
                this.opt_stmt(switch.init.as_deref())?;
                if let Some(tag) = &switch.tag {
                    this.expr(tag)?;
                }
                switch
                    .clauses
                    .iter()
                    .try_for_each(|clause| this.case_clause(clause, None))
            }),
            StmtKind::TypeSwitch(switch) => self.scoped(|this| {
                this.opt_stmt(switch.init.as_deref())?;
                this.expr(&switch.subject)?;
                switch
                    .clauses
                    .iter()
                    .try_for_each(|clause| this.case_clause(clause, switch.binding.as_ref()))
            }),
            StmtKind::Select(clauses) => clauses.iter().try_for_each(|clause| {
                self.scoped(|this| {
                    this.opt_stmt(clause.comm.as_deref())?;
                    this.stmts(&clause.body)
                })
            }),
            StmtKind::For(for_stmt) => self.scoped(|this| {
                this.opt_stmt(for_stmt.init.as_deref())?;
                if let Some(cond) = &for_stmt.cond {
                    this.expr(cond)?;
                }
                this.opt_stmt(for_stmt.post.as_deref())?;
                this.block(&for_stmt.body)
            }),
            StmtKind::Range(range) => self.scoped(|this| {
                this.expr(&range.x)?;
                for var in [&range.key, &range.value].into_iter().flatten() {
                    match var {
                        Expr::Ident(ident) if range.define => this.locals.declare(ident),
                        other => this.expr(other)?,
                    }
                }
                this.block(&range.body)
            }),
        }
    }

    fn case_clause(&mut self, clause: &'a CaseClause, binding: Option<&'a Ident>) -> Walk {
        self.scoped(|this| {
            if let Some(list) = &clause.list {
                this.exprs(list)?;
            }
            if let Some(binding) = binding {
                this.locals.declare(binding);
            }
            this.stmts(&clause.body)
        })
    }

    /// `:=` declares its plain identifiers after the right-hand side.
    fn assign(&mut self, assign: &'a AssignStmt) -> Walk {
        if assign.op != AssignOp::Define {
            self.exprs(&assign.lhs)?;
            return self.exprs(&assign.rhs);
        }
        self.exprs(&assign.rhs)?;
        for lhs in &assign.lhs {
            match lhs {
                Expr::Ident(ident) => self.locals.declare(ident),
                other => self.expr(other)?,
            }
        }
        Ok(())
    }

    // ========================================================================
    // EXPRESSIONS
    // ========================================================================

    fn exprs(&mut self, exprs: &'a [Expr]) -> Walk {
        exprs.iter().try_for_each(|expr| self.expr(expr))
    }

    fn expr(&mut self, expr: &'a Expr) -> Walk {
        match expr {
            Expr::Ident(ident) => self.use_ident(ident),
            Expr::BasicLit(_) => Ok(()),
            Expr::CompositeLit(lit) => self.composite(lit, None),
            Expr::FuncLit(func) => self.scoped(|this| {
                this.signature(None, &func.ty)?;
                this.stmts(&func.body.stmts)
            }),
            Expr::Paren(x) | Expr::Star(x) | Expr::Ellipsis(x) => self.expr(x),
            Expr::Selector(selector) => self.expr(&selector.x),
            Expr::Index { x, index } => {
                self.expr(x)?;
                self.expr(index)
            }
            Expr::Slice { x, low, high, max } => {
                self.expr(x)?;
                [low, high, max]
                    .into_iter()
                    .flatten()
                    .try_for_each(|bound| self.expr(bound))
            }
            Expr::TypeAssert { x, ty } => {
                self.expr(x)?;
                ty.as_deref().map_or(Ok(()), |ty| self.expr(ty))
            }
            Expr::Call(call) => {
                self.expr(&call.fun)?;
                self.exprs(&call.args)
            }
            Expr::Unary(unary) => self.expr(&unary.x),
            Expr::Binary(binary) => {
                self.expr(&binary.x)?;
                self.expr(&binary.y)
            }
            Expr::KeyValue { key, value } => {
                self.expr(key)?;
                self.expr(value)
            }
            Expr::ArrayType { len, elem } => {
                if let ArrayLen::Fixed(len) = len {
                    self.expr(len)?;
                }
                self.expr(elem)
            }
            Expr::MapType { key, value } => {
                self.expr(key)?;
                self.expr(value)
            }
            Expr::ChanType { value, .. } => self.expr(value),
            Expr::FuncType(func) => {
                self.field_types(&func.params)?;
                func.results.as_ref().map_or(Ok(()), |results| self.field_types(results))
            }
            // Field and method names are not uses.
            Expr::StructType(fields) | Expr::InterfaceType(fields) => self.field_types(fields),
        }
    }

    /// `hint` is the type an elided literal type stands for.
    fn composite(&mut self, lit: &'a CompositeLit, hint: Option<&'a Expr>) -> Walk {
        if let Some(ty) = &lit.ty {
            self.expr(ty)?;
        }
        let shape = lit
            .ty
            .as_deref()
            .or(hint)
            .map_or(Shape::Unknown, |ty| self.shape(ty));

        for elt in &lit.elts {
            let Expr::KeyValue { key, value } = elt else {
                self.element(elt, shape.element())?;
                continue;
            };
            match shape {
                Shape::Struct => {}
                Shape::Map { key: key_ty, .. } => self.element(key, Some(key_ty))?,
                Shape::Array { .. } => self.expr(key)?,
                // Could be a field of a type declared elsewhere.
                Shape::Unknown if matches!(**key, Expr::Ident(_)) => {}
                Shape::Unknown => self.expr(key)?,
            }
            self.element(value, shape.element())?;
        }
        Ok(())
    }

    fn element(&mut self, expr: &'a Expr, hint: Option<&'a Expr>) -> Walk {
        match expr {
            Expr::CompositeLit(lit) if lit.ty.is_none() => self.composite(lit, hint),
            other => self.expr(other),
        }
    }

    fn shape(&self, ty: &'a Expr) -> Shape<'a> {
        let mut ty = ty;
        for _ in 0..MAX_TYPE_INDIRECTIONS {
            match ty {
                Expr::Paren(inner) | Expr::Star(inner) => ty = inner.as_ref(),
                Expr::StructType(_) => return Shape::Struct,
                Expr::MapType { key, value } => return Shape::Map { key, value },
                Expr::ArrayType { elem, .. } => return Shape::Array { elem },
                Expr::Ident(ident) if !self.locals.contains(&ident.name) => {
                    match self.package.declared_type(&ident.name) {
                        Some(declared) => ty = declared,
                        None => return Shape::Unknown,
                    }
                }
                _ => return Shape::Unknown,
            }
        }
        Shape::Unknown
    }
}
