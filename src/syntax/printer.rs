//! Render a syntax tree back to Go source in gofmt layout.
//!
//! Tabs for indentation, one declaration per paragraph, grouped declarations
//! one spec per line, and composite literals broken across lines when they
//! were written that way. Column alignment of fields is not reproduced.

use super::ast::*;

/// Render a whole file.
pub fn print_file(file: &File) -> String {
    let mut p = Printer::default();
    p.file(file);
    p.out
}

/// Render a single expression at indentation level zero.
pub fn print_expr(expr: &Expr) -> String {
    let mut p = Printer::default();
    p.expr(expr);
    p.out
}

/// Render a single statement at indentation level zero.
pub fn print_stmt(stmt: &Stmt) -> String {
    let mut p = Printer::default();
    p.stmt(stmt);
    p.out
}

#[derive(Default)]
struct Printer {
    out: String,
    indent: usize,
}

impl Printer {
    fn write(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn newline(&mut self) {
        self.out.push('\n');
        for _ in 0..self.indent {
            self.out.push('\t');
        }
    }

    fn doc(&mut self, comments: &[Comment]) {
        for comment in comments {
            self.write(&comment.text);
            self.newline();
        }
    }

    fn trailing(&mut self, comment: &Option<Comment>) {
        if let Some(comment) = comment {
            self.write(" ");
            self.write(&comment.text);
        }
    }

    fn separated<T>(&mut self, items: &[T], sep: &str, mut each: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(sep);
            }
            each(self, item);
        }
    }

    // ========================================================================
    // FILE AND DECLARATIONS
    // ========================================================================

    fn file(&mut self, file: &File) {
        self.doc(&file.doc);
        self.write("package ");
        self.write(&file.package.name);
        self.write("\n");

        for decl in &file.decls {
            self.write("\n");
            match decl {
                Decl::Gen(gen_decl) => self.gen_decl(gen_decl),
                Decl::Func(func) => self.func_decl(func),
            }
            self.write("\n");
        }

        if !file.trailing.is_empty() {
            self.write("\n");
            for comment in &file.trailing {
                self.write(&comment.text);
                self.write("\n");
            }
        }
    }

    fn gen_decl(&mut self, decl: &GenDecl) {
        self.doc(&decl.doc);
        self.write(decl.keyword.as_str());
        if decl.grouped || decl.specs.len() != 1 {
            self.write(" (");
            self.indent += 1;
            for spec in &decl.specs {
                self.newline();
                self.spec(spec);
            }
            self.indent -= 1;
            self.newline();
            self.write(")");
        } else {
            self.write(" ");
            self.spec(&decl.specs[0]);
        }
    }

    fn spec(&mut self, spec: &Spec) {
        match spec {
            Spec::Import(import) => {
                self.doc(&import.doc);
                if let Some(name) = &import.name {
                    self.write(&name.name);
                    self.write(" ");
                }
                self.write(&import.path.value);
                self.trailing(&import.comment);
            }
            Spec::Value(value) => {
                self.doc(&value.doc);
                self.separated(&value.names, ", ", |p, name| p.write(&name.name));
                if let Some(ty) = &value.ty {
                    self.write(" ");
                    self.expr(ty);
                }
                if !value.values.is_empty() {
                    self.write(" = ");
                    self.separated(&value.values, ", ", Self::expr);
                }
                self.trailing(&value.comment);
            }
            Spec::Type(ty) => {
                self.doc(&ty.doc);
                self.write(&ty.name.name);
                self.write(if ty.alias { " = " } else { " " });
                self.expr(&ty.ty);
                self.trailing(&ty.comment);
            }
        }
    }

    fn func_decl(&mut self, func: &FuncDecl) {
        self.doc(&func.doc);
        self.write("func ");
        if let Some(recv) = &func.recv {
            self.write("(");
            self.params(recv);
            self.write(") ");
        }
        self.write(&func.name.name);
        self.signature(&func.ty);
        if let Some(body) = &func.body {
            self.write(" ");
            self.block(body);
        }
    }

    fn signature(&mut self, ty: &FuncType) {
        self.write("(");
        self.params(&ty.params);
        self.write(")");
        if let Some(results) = &ty.results {
            match results.fields.as_slice() {
                [single] if single.names.is_empty() => {
                    self.write(" ");
                    self.expr(&single.ty);
                }
                _ => {
                    self.write(" (");
                    self.params(results);
                    self.write(")");
                }
            }
        }
    }

    fn params(&mut self, list: &FieldList) {
        self.separated(&list.fields, ", ", |p, field| {
            if !field.names.is_empty() {
                p.separated(&field.names, ", ", |p, name| p.write(&name.name));
                p.write(" ");
            }
            p.expr(&field.ty);
        });
    }

    /// Struct fields or interface methods, one per line.
    fn member_list(&mut self, keyword: &str, list: &FieldList, methods: bool) {
        self.write(keyword);
        if list.fields.is_empty() && list.end_comments.is_empty() {
            self.write("{}");
            return;
        }
        self.write(" {");
        self.indent += 1;
        for field in &list.fields {
            self.newline();
            self.doc(&field.doc);
            match (&field.ty, methods) {
                (Expr::FuncType(sig), true) if !field.names.is_empty() => {
                    self.write(&field.names[0].name);
                    self.signature(sig);
                }
                _ => {
                    if !field.names.is_empty() {
                        self.separated(&field.names, ", ", |p, name| p.write(&name.name));
                        self.write(" ");
                    }
                    self.expr(&field.ty);
                }
            }
            if let Some(tag) = &field.tag {
                self.write(" ");
                self.write(&tag.value);
            }
            self.trailing(&field.comment);
        }
        for comment in &list.end_comments {
            self.newline();
            self.write(&comment.text);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    // ========================================================================
    // STATEMENTS
    // ========================================================================

    fn block(&mut self, block: &Block) {
        if block.stmts.is_empty() && block.end_comments.is_empty() {
            self.write("{}");
            return;
        }
        self.write("{");
        self.indent += 1;
        self.stmt_list(&block.stmts);
        for comment in &block.end_comments {
            self.newline();
            self.write(&comment.text);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn stmt_list(&mut self, stmts: &[Stmt]) {
        for stmt in stmts {
            self.newline();
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.doc(&stmt.doc);
        self.stmt_kind(&stmt.kind);
        self.trailing(&stmt.comment);
    }

    fn stmt_kind(&mut self, kind: &StmtKind) {
        match kind {
            StmtKind::Decl(decl) => self.gen_decl(decl),
            StmtKind::Empty => {}
            StmtKind::Labeled { label, stmt } => {
                self.write(&label.name);
                self.write(":");
                if !matches!(stmt.kind, StmtKind::Empty) {
                    self.newline();
                    self.stmt(stmt);
                }
            }
            StmtKind::Expr(expr) => self.expr(expr),
            StmtKind::Send { chan, value } => {
                self.expr(chan);
                self.write(" <- ");
                self.expr(value);
            }
            StmtKind::IncDec { x, inc } => {
                self.expr(x);
                self.write(if *inc { "++" } else { "--" });
            }
            StmtKind::Assign(assign) => {
                self.separated(&assign.lhs, ", ", Self::expr);
                self.write(" ");
                self.write(assign.op.as_str());
                self.write(" ");
                self.separated(&assign.rhs, ", ", Self::expr);
            }
            StmtKind::Go(expr) => {
                self.write("go ");
                self.expr(expr);
            }
            StmtKind::Defer(expr) => {
                self.write("defer ");
                self.expr(expr);
            }
            StmtKind::Return(ret) => {
                self.write("return");
                if !ret.results.is_empty() {
                    self.write(" ");
                    self.separated(&ret.results, ", ", Self::expr);
                }
            }
            StmtKind::Branch { keyword, label } => {
                self.write(keyword.as_str());
                if let Some(label) = label {
                    self.write(" ");
                    self.write(&label.name);
                }
            }
            StmtKind::Block(block) => self.block(block),
            StmtKind::If(stmt) => self.if_stmt(stmt),
            StmtKind::Switch(stmt) => {
                self.write("switch ");
                self.header_init(&stmt.init);
                if let Some(tag) = &stmt.tag {
                    self.expr(tag);
                    self.write(" ");
                }
                self.case_clauses(&stmt.clauses);
            }
            StmtKind::TypeSwitch(stmt) => {
                self.write("switch ");
                self.header_init(&stmt.init);
                if let Some(binding) = &stmt.binding {
                    self.write(&binding.name);
                    self.write(" := ");
                }
                self.expr(&stmt.subject);
                self.write(".(type) ");
                self.case_clauses(&stmt.clauses);
            }
            StmtKind::Select(clauses) => {
                self.write("select {");
                for clause in clauses {
                    self.newline();
                    self.doc(&clause.doc);
                    match &clause.comm {
                        Some(comm) => {
                            self.write("case ");
                            self.stmt(comm);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.indent += 1;
                    self.stmt_list(&clause.body);
                    self.indent -= 1;
                }
                self.newline();
                self.write("}");
            }
            StmtKind::For(stmt) => {
                self.write("for ");
                match (&stmt.init, &stmt.cond, &stmt.post) {
                    (None, None, None) => {}
                    (None, Some(cond), None) => {
                        self.expr(cond);
                        self.write(" ");
                    }
                    (init, cond, post) => {
                        if let Some(init) = init {
                            self.stmt(init);
                        }
                        self.write("; ");
                        if let Some(cond) = cond {
                            self.expr(cond);
                        }
                        self.write(";");
                        if let Some(post) = post {
                            self.write(" ");
                            self.stmt(post);
                        }
                        self.write(" ");
                    }
                }
                self.block(&stmt.body);
            }
            StmtKind::Range(stmt) => {
                self.write("for ");
                if let Some(key) = &stmt.key {
                    self.expr(key);
                    if let Some(value) = &stmt.value {
                        self.write(", ");
                        self.expr(value);
                    }
                    self.write(if stmt.define { " := " } else { " = " });
                }
                self.write("range ");
                self.expr(&stmt.x);
                self.write(" ");
                self.block(&stmt.body);
            }
        }
    }

    fn header_init(&mut self, init: &Option<Box<Stmt>>) {
        if let Some(init) = init {
            self.stmt(init);
            self.write("; ");
        }
    }

    fn if_stmt(&mut self, stmt: &IfStmt) {
        self.write("if ");
        self.header_init(&stmt.init);
        self.expr(&stmt.cond);
        self.write(" ");
        self.block(&stmt.then);
        if let Some(els) = &stmt.els {
            self.write(" else ");
            match &els.kind {
                StmtKind::If(nested) => self.if_stmt(nested),
                other => self.stmt_kind(other),
            }
        }
    }

    fn case_clauses(&mut self, clauses: &[CaseClause]) {
        self.write("{");
        for clause in clauses {
            self.newline();
            self.doc(&clause.doc);
            match &clause.list {
                Some(list) => {
                    self.write("case ");
                    self.separated(list, ", ", Self::expr);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.indent += 1;
            self.stmt_list(&clause.body);
            self.indent -= 1;
        }
        self.newline();
        self.write("}");
    }

    // ========================================================================
    // EXPRESSIONS
    // ========================================================================

    fn expr(&mut self, expr: &Expr) {
        match expr {
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::BasicLit(lit) => self.write(&lit.value),
            Expr::CompositeLit(lit) => self.composite_lit(lit),
            Expr::FuncLit(lit) => {
                self.write("func");
                self.signature(&lit.ty);
                self.write(" ");
                self.block(&lit.body);
            }
            Expr::Paren(inner) => {
                self.write("(");
                self.expr(inner);
                self.write(")");
            }
            Expr::Selector(sel) => {
                self.expr(&sel.x);
                self.write(".");
                self.write(&sel.sel.name);
            }
            Expr::Index { x, index } => {
                self.expr(x);
                self.write("[");
                self.expr(index);
                self.write("]");
            }
            Expr::Slice { x, low, high, max } => {
                self.expr(x);
                self.write("[");
                if let Some(low) = low {
                    self.expr(low);
                }
                self.write(":");
                if let Some(high) = high {
                    self.expr(high);
                }
                if let Some(max) = max {
                    self.write(":");
                    self.expr(max);
                }
                self.write("]");
            }
            Expr::TypeAssert { x, ty } => {
                self.expr(x);
                self.write(".(");
                match ty {
                    Some(ty) => self.expr(ty),
                    None => self.write("type"),
                }
                self.write(")");
            }
            Expr::Call(call) => {
                self.expr(&call.fun);
                self.write("(");
                self.separated(&call.args, ", ", Self::expr);
                if call.ellipsis {
                    self.write("...");
                }
                self.write(")");
            }
            Expr::Star(inner) => {
                self.write("*");
                self.expr(inner);
            }
            Expr::Unary(unary) => {
                self.write(unary.op.as_str());
                // `- -x` must not collapse into a decrement token
                let doubled = matches!(unary.x.as_ref(), Expr::Unary(inner) if inner.op == unary.op);
                if doubled && matches!(unary.op, UnaryOp::Pos | UnaryOp::Neg | UnaryOp::Addr) {
                    self.write(" ");
                }
                self.expr(&unary.x);
            }
            Expr::Binary(binary) => {
                self.expr(&binary.x);
                self.write(" ");
                self.write(binary.op.as_str());
                self.write(" ");
                self.expr(&binary.y);
            }
            Expr::KeyValue { key, value } => {
                self.expr(key);
                self.write(": ");
                self.expr(value);
            }
            Expr::ArrayType { len, elem } => {
                match len {
                    ArrayLen::Slice => self.write("[]"),
                    ArrayLen::Ellipsis => self.write("[...]"),
                    ArrayLen::Fixed(len) => {
                        self.write("[");
                        self.expr(len);
                        self.write("]");
                    }
                }
                self.expr(elem);
            }
            Expr::MapType { key, value } => {
                self.write("map[");
                self.expr(key);
                self.write("]");
                self.expr(value);
            }
            Expr::ChanType { dir, value } => {
                self.write(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Send => "chan<- ",
                    ChanDir::Recv => "<-chan ",
                });
                self.expr(value);
            }
            Expr::FuncType(ty) => {
                self.write("func");
                self.signature(ty);
            }
            Expr::StructType(fields) => self.member_list("struct", fields, false),
            Expr::InterfaceType(methods) => self.member_list("interface", methods, true),
            Expr::Ellipsis(elem) => {
                self.write("...");
                self.expr(elem);
            }
        }
    }

    fn composite_lit(&mut self, lit: &CompositeLit) {
        if let Some(ty) = &lit.ty {
            self.expr(ty);
        }
        self.write("{");
        if lit.multiline && !lit.elts.is_empty() {
            self.indent += 1;
            for elt in &lit.elts {
                self.newline();
                self.expr(elt);
                self.write(",");
            }
            self.indent -= 1;
            self.newline();
        } else {
            self.separated(&lit.elts, ", ", Self::expr);
        }
        self.write("}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn roundtrip(source: &str) -> String {
        let file = parse(source).expect("source parses");
        print_file(&file)
    }

    #[test]
    fn test_canonical_source_is_stable() {
        let source = "\
// Package foo is generated.
package foo

import (
\t\"fmt\"
\tes \"github.com/olivere/elastic\"
)

// FooAggregation does things.
type FooAggregation struct {
\tfield string // trailing
\t*Injectable
\tmeta map[string]interface{} `json:\"meta\"`
}

func NewFooAggregation() *FooAggregation {
\ta := &FooAggregation{
\t\tmeta: make(map[string]interface{}),
\t}
\ta.Injectable = newInjectable(a)
\treturn a
}

func (a *FooAggregation) Source() (interface{}, error) {
\tif a.meta == nil {
\t\treturn nil, fmt.Errorf(\"missing %s\", es.Version)
\t}
\tfor k, v := range a.meta {
\t\t_ = k
\t\t_ = v
\t}
\treturn a.meta, nil
}
";
        assert_eq!(roundtrip(source), source);
    }

    #[test]
    fn test_printed_output_reparses_to_same_tree() {
        let source = "package p\nfunc f(xs ...int) (n int, err error) {\n\tswitch v := interface{}(xs).(type) {\n\tcase []int:\n\t\tn = len(v[1:])\n\tdefault:\n\t}\n\tselect {\n\tcase <-make(chan int):\n\t}\n\treturn - -n, nil\n}\n";
        let first = parse(source).unwrap();
        let printed = print_file(&first);
        let second = parse(&printed).unwrap();
        assert_eq!(print_file(&second), printed);
        assert!(printed.contains("- -n"));
    }

    #[test]
    fn test_print_single_expression() {
        let file = parse("package p\nvar x = a.b(c, d...)[1:2]\n").unwrap();
        let Decl::Gen(decl) = &file.decls[0] else {
            panic!("expected var")
        };
        let Spec::Value(spec) = &decl.specs[0] else {
            panic!("expected value spec")
        };
        assert_eq!(print_expr(&spec.values[0]), "a.b(c, d...)[1:2]");
    }
}
