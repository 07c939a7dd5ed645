//! Constructors for synthesized nodes.
//!
//! Nodes built here carry no source offset; they are positioned when the file
//! is printed and re-parsed.

use super::ast::*;

/// Check that `name` is a single Go identifier.
pub fn is_valid_ident(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {
            chars.all(unicode_ident::is_xid_continue)
        }
        _ => false,
    }
}

pub fn ident(name: &str) -> Ident {
    debug_assert!(
        name.split('.').all(is_valid_ident),
        "not an identifier: {name:?}"
    );
    Ident::new(name)
}

/// `pkg.Name` kept as one identifier node, the way a qualified rename leaves it.
pub fn qualified(package: &str, name: &str) -> Ident {
    Ident::new(format!("{package}.{name}"))
}

/// A type or value name, splitting `pkg.T` into a selector.
pub fn name_expr(name: &str) -> Expr {
    match name.split_once('.') {
        Some((package, sel)) => selector(Expr::Ident(ident(package)), sel),
        None => Expr::Ident(ident(name)),
    }
}

pub fn selector(x: Expr, sel: &str) -> Expr {
    Expr::Selector(SelectorExpr {
        x: Box::new(x),
        sel: ident(sel),
    })
}

pub fn pointer(ty: Expr) -> Expr {
    Expr::Star(Box::new(ty))
}

/// `fun(args...)` with identifier arguments.
pub fn call(fun: &str, args: &[&str]) -> Expr {
    Expr::Call(CallExpr {
        fun: Box::new(name_expr(fun)),
        args: args.iter().map(|arg| name_expr(arg)).collect(),
        ellipsis: false,
    })
}

pub fn assign(target: &str, op: AssignOp, value: Expr) -> Stmt {
    Stmt::new(StmtKind::Assign(AssignStmt {
        lhs: vec![name_expr(target)],
        op,
        rhs: vec![value],
    }))
}

pub fn ret(results: Vec<Expr>) -> Stmt {
    Stmt::new(StmtKind::Return(ReturnStmt { results }))
}

pub fn string_lit(value: &str) -> BasicLit {
    BasicLit {
        kind: LitKind::String,
        value: format!("{value:?}").into(),
        pos: None,
    }
}

pub fn import_spec(alias: Option<&str>, path: &str) -> ImportSpec {
    ImportSpec {
        doc: Vec::new(),
        name: alias.filter(|a| !a.is_empty()).map(ident),
        path: string_lit(path),
        comment: None,
    }
}

/// A parenthesised import block holding `specs`.
pub fn import_decl(specs: Vec<ImportSpec>) -> GenDecl {
    GenDecl {
        doc: Vec::new(),
        keyword: DeclKeyword::Import,
        grouped: true,
        specs: specs.into_iter().map(Spec::Import).collect(),
        pos: None,
    }
}

/// A named struct field, or an embedded one when `name` is `None`.
pub fn field(name: Option<&str>, ty: Expr) -> Field {
    Field {
        doc: Vec::new(),
        names: name.map(ident).into_iter().collect(),
        ty,
        tag: None,
        comment: None,
    }
}
