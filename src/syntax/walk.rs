//! Depth-first traversal over a mutable tree.
//!
//! A [`Collect`] sink receives nodes in document order with the lifetime of
//! the tree borrow, so it may keep `&mut` references to what it finds. A sink
//! that keeps a declaration returns `None` and the walk does not descend into
//! it, which keeps every stored reference disjoint.

use super::ast::*;
use text_size::TextSize;

pub trait Collect<'a> {
    fn gen_decl(&mut self, decl: &'a mut GenDecl) -> Option<&'a mut GenDecl> {
        Some(decl)
    }

    fn func_decl(&mut self, func: &'a mut FuncDecl) -> Option<&'a mut FuncDecl> {
        Some(func)
    }

    fn ident(&mut self, _ident: &'a mut Ident) {}
}

/// All `type` declarations, including function-local ones.
pub fn type_decls_mut(file: &mut File) -> Vec<&mut GenDecl> {
    struct TypeDecls<'a>(Vec<&'a mut GenDecl>);

    impl<'a> Collect<'a> for TypeDecls<'a> {
        fn gen_decl(&mut self, decl: &'a mut GenDecl) -> Option<&'a mut GenDecl> {
            if decl.keyword == DeclKeyword::Type {
                self.0.push(decl);
                None
            } else {
                Some(decl)
            }
        }
    }

    let mut sink = TypeDecls(Vec::new());
    walk_file(file, &mut sink);
    sink.0
}

/// All function and method declarations.
pub fn func_decls_mut(file: &mut File) -> Vec<&mut FuncDecl> {
    struct FuncDecls<'a>(Vec<&'a mut FuncDecl>);

    impl<'a> Collect<'a> for FuncDecls<'a> {
        fn func_decl(&mut self, func: &'a mut FuncDecl) -> Option<&'a mut FuncDecl> {
            self.0.push(func);
            None
        }
    }

    let mut sink = FuncDecls(Vec::new());
    walk_file(file, &mut sink);
    sink.0
}

/// The first identifier whose name starts at `offset`.
pub fn ident_at_mut(file: &mut File, offset: TextSize) -> Option<&mut Ident> {
    struct IdentAt<'a> {
        offset: TextSize,
        found: Option<&'a mut Ident>,
    }

    impl<'a> Collect<'a> for IdentAt<'a> {
        fn ident(&mut self, ident: &'a mut Ident) {
            if self.found.is_none() && ident.pos == Some(self.offset) {
                self.found = Some(ident);
            }
        }
    }

    let mut sink = IdentAt {
        offset,
        found: None,
    };
    walk_file(file, &mut sink);
    sink.found
}

pub fn walk_file<'a, S: Collect<'a> + ?Sized>(file: &'a mut File, sink: &mut S) {
    sink.ident(&mut file.package);
    for decl in &mut file.decls {
        match decl {
            Decl::Gen(decl) => walk_gen_decl(decl, sink),
            Decl::Func(func) => walk_func_decl(func, sink),
        }
    }
}

pub fn walk_gen_decl<'a, S: Collect<'a> + ?Sized>(decl: &'a mut GenDecl, sink: &mut S) {
    let Some(decl) = sink.gen_decl(decl) else {
        return;
    };
    for spec in &mut decl.specs {
        match spec {
            Spec::Import(import) => {
                if let Some(name) = &mut import.name {
                    sink.ident(name);
                }
            }
            Spec::Value(value) => {
                for name in &mut value.names {
                    sink.ident(name);
                }
                if let Some(ty) = &mut value.ty {
                    walk_expr(ty, sink);
                }
                for expr in &mut value.values {
                    walk_expr(expr, sink);
                }
            }
            Spec::Type(ty) => {
                sink.ident(&mut ty.name);
                walk_expr(&mut ty.ty, sink);
            }
        }
    }
}

pub fn walk_func_decl<'a, S: Collect<'a> + ?Sized>(func: &'a mut FuncDecl, sink: &mut S) {
    let Some(func) = sink.func_decl(func) else {
        return;
    };
    if let Some(recv) = &mut func.recv {
        walk_field_list(recv, sink);
    }
    sink.ident(&mut func.name);
    walk_func_type(&mut func.ty, sink);
    if let Some(body) = &mut func.body {
        walk_block(body, sink);
    }
}

fn walk_func_type<'a, S: Collect<'a> + ?Sized>(ty: &'a mut FuncType, sink: &mut S) {
    walk_field_list(&mut ty.params, sink);
    if let Some(results) = &mut ty.results {
        walk_field_list(results, sink);
    }
}

fn walk_field_list<'a, S: Collect<'a> + ?Sized>(list: &'a mut FieldList, sink: &mut S) {
    for field in &mut list.fields {
        for name in &mut field.names {
            sink.ident(name);
        }
        walk_expr(&mut field.ty, sink);
    }
}

pub fn walk_block<'a, S: Collect<'a> + ?Sized>(block: &'a mut Block, sink: &mut S) {
    for stmt in &mut block.stmts {
        walk_stmt(stmt, sink);
    }
}

fn walk_stmts<'a, S: Collect<'a> + ?Sized>(stmts: &'a mut [Stmt], sink: &mut S) {
    for stmt in stmts {
        walk_stmt(stmt, sink);
    }
}

fn walk_exprs<'a, S: Collect<'a> + ?Sized>(exprs: &'a mut [Expr], sink: &mut S) {
    for expr in exprs {
        walk_expr(expr, sink);
    }
}

pub fn walk_stmt<'a, S: Collect<'a> + ?Sized>(stmt: &'a mut Stmt, sink: &mut S) {
    match &mut stmt.kind {
        StmtKind::Decl(decl) => walk_gen_decl(decl, sink),
        StmtKind::Empty => {}
        StmtKind::Labeled { label, stmt } => {
            sink.ident(label);
            walk_stmt(stmt, sink);
        }
        StmtKind::Expr(expr) | StmtKind::Go(expr) | StmtKind::Defer(expr) => walk_expr(expr, sink),
        StmtKind::Send { chan, value } => {
            walk_expr(chan, sink);
            walk_expr(value, sink);
        }
        StmtKind::IncDec { x, .. } => walk_expr(x, sink),
        StmtKind::Assign(assign) => {
            walk_exprs(&mut assign.lhs, sink);
            walk_exprs(&mut assign.rhs, sink);
        }
        StmtKind::Return(ret) => walk_exprs(&mut ret.results, sink),
        StmtKind::Branch { label, .. } => {
            if let Some(label) = label {
                sink.ident(label);
            }
        }
        StmtKind::Block(block) => walk_block(block, sink),
        StmtKind::If(stmt) => {
            if let Some(init) = &mut stmt.init {
                walk_stmt(init, sink);
            }
            walk_expr(&mut stmt.cond, sink);
            walk_block(&mut stmt.then, sink);
            if let Some(els) = &mut stmt.els {
                walk_stmt(els, sink);
            }
        }
        StmtKind::Switch(stmt) => {
            if let Some(init) = &mut stmt.init {
                walk_stmt(init, sink);
            }
            if let Some(tag) = &mut stmt.tag {
                walk_expr(tag, sink);
            }
            walk_case_clauses(&mut stmt.clauses, sink);
        }
        StmtKind::TypeSwitch(stmt) => {
            if let Some(init) = &mut stmt.init {
                walk_stmt(init, sink);
            }
            if let Some(binding) = &mut stmt.binding {
                sink.ident(binding);
            }
            walk_expr(&mut stmt.subject, sink);
            walk_case_clauses(&mut stmt.clauses, sink);
        }
        StmtKind::Select(clauses) => {
            for clause in clauses {
                if let Some(comm) = &mut clause.comm {
                    walk_stmt(comm, sink);
                }
                walk_stmts(&mut clause.body, sink);
            }
        }
        StmtKind::For(stmt) => {
            if let Some(init) = &mut stmt.init {
                walk_stmt(init, sink);
            }
            if let Some(cond) = &mut stmt.cond {
                walk_expr(cond, sink);
            }
            if let Some(post) = &mut stmt.post {
                walk_stmt(post, sink);
            }
            walk_block(&mut stmt.body, sink);
        }
        StmtKind::Range(stmt) => {
            if let Some(key) = &mut stmt.key {
                walk_expr(key, sink);
            }
            if let Some(value) = &mut stmt.value {
                walk_expr(value, sink);
            }
            walk_expr(&mut stmt.x, sink);
            walk_block(&mut stmt.body, sink);
        }
    }
}

fn walk_case_clauses<'a, S: Collect<'a> + ?Sized>(clauses: &'a mut [CaseClause], sink: &mut S) {
    for clause in clauses {
        if let Some(list) = &mut clause.list {
            walk_exprs(list, sink);
        }
        walk_stmts(&mut clause.body, sink);
    }
}

pub fn walk_expr<'a, S: Collect<'a> + ?Sized>(expr: &'a mut Expr, sink: &mut S) {
    match expr {
        Expr::Ident(ident) => sink.ident(ident),
        Expr::BasicLit(_) => {}
        Expr::CompositeLit(lit) => {
            if let Some(ty) = &mut lit.ty {
                walk_expr(ty, sink);
            }
            walk_exprs(&mut lit.elts, sink);
        }
        Expr::FuncLit(lit) => {
            walk_func_type(&mut lit.ty, sink);
            walk_block(&mut lit.body, sink);
        }
        Expr::Paren(x) | Expr::Star(x) | Expr::Ellipsis(x) => walk_expr(x, sink),
        Expr::Selector(sel) => {
            walk_expr(&mut sel.x, sink);
            sink.ident(&mut sel.sel);
        }
        Expr::Index { x, index } => {
            walk_expr(x, sink);
            walk_expr(index, sink);
        }
        Expr::Slice { x, low, high, max } => {
            walk_expr(x, sink);
            for part in [low, high, max].into_iter().flatten() {
                walk_expr(part, sink);
            }
        }
        Expr::TypeAssert { x, ty } => {
            walk_expr(x, sink);
            if let Some(ty) = ty {
                walk_expr(ty, sink);
            }
        }
        Expr::Call(call) => {
            walk_expr(&mut call.fun, sink);
            walk_exprs(&mut call.args, sink);
        }
        Expr::Unary(unary) => walk_expr(&mut unary.x, sink),
        Expr::Binary(binary) => {
            walk_expr(&mut binary.x, sink);
            walk_expr(&mut binary.y, sink);
        }
        Expr::KeyValue { key, value } => {
            walk_expr(key, sink);
            walk_expr(value, sink);
        }
        Expr::ArrayType { len, elem } => {
            if let ArrayLen::Fixed(len) = len {
                walk_expr(len, sink);
            }
            walk_expr(elem, sink);
        }
        Expr::MapType { key, value } => {
            walk_expr(key, sink);
            walk_expr(value, sink);
        }
        Expr::ChanType { value, .. } => walk_expr(value, sink),
        Expr::FuncType(ty) => walk_func_type(ty, sink),
        Expr::StructType(fields) | Expr::InterfaceType(fields) => walk_field_list(fields, sink),
    }
}
