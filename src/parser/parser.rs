//! Recursive descent parser for Go
//!
//! Builds an owned [`ast::File`] from the token stream produced by
//! [`super::lexer::lex`]. The first syntax error aborts the parse: a file the
//! engine cannot read must never be rewritten.

use super::lexer::{Token, lex};
use super::syntax_kind::SyntaxKind;
use crate::base::LineIndex;
use crate::syntax::ast::*;
use text_size::TextSize;

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub offset: TextSize,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, offset: TextSize) -> Self {
        Self {
            message: message.into(),
            offset,
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for SyntaxError {}

type PResult<T> = Result<T, SyntaxError>;

/// Parse Go source code into a [`File`]
pub fn parse(input: &str) -> PResult<File> {
    let lexed = lex(input);
    let mut parser = Parser::new(input, lexed.tokens, lexed.comments);
    parser.parse_file()
}

/// Result of a simple statement in a `for` header, which may turn out to be
/// a range clause.
enum SimpleStmt {
    Stmt(StmtKind),
    Range {
        key: Option<Expr>,
        value: Option<Expr>,
        define: bool,
        x: Expr,
    },
}

/// The parser state
struct Parser<'a> {
    tokens: Vec<Token<'a>>,
    comments: Vec<Token<'a>>,
    next_comment: usize,
    pos: usize,
    eof: Token<'a>,
    line_index: LineIndex,
    prev_end: TextSize,
    /// Below zero inside statement headers, where `T {` opens a block rather
    /// than a composite literal.
    expr_level: i32,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str, tokens: Vec<Token<'a>>, comments: Vec<Token<'a>>) -> Self {
        Self {
            tokens,
            comments,
            next_comment: 0,
            pos: 0,
            eof: Token {
                kind: SyntaxKind::EOF,
                text: "",
                offset: TextSize::of(input),
            },
            line_index: LineIndex::new(input),
            prev_end: TextSize::new(0),
            expr_level: 0,
        }
    }

    // =========================================================================
    // Token inspection
    // =========================================================================

    fn current(&self) -> &Token<'a> {
        self.tokens.get(self.pos).unwrap_or(&self.eof)
    }

    fn current_kind(&self) -> SyntaxKind {
        self.current().kind
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    fn at_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.tokens
            .get(self.pos + n)
            .map(|t| t.kind)
            .unwrap_or(SyntaxKind::EOF)
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn bump(&mut self) -> Token<'a> {
        let token = self.current().clone();
        if !self.at_eof() {
            if !(token.kind == SyntaxKind::SEMICOLON && token.text != ";") {
                self.prev_end = token.end();
            }
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> PResult<Token<'a>> {
        if self.at(kind) {
            Ok(self.bump())
        } else {
            Err(self.error(format!("expected {}", describe(kind))))
        }
    }

    /// A statement terminator; may be omitted before a closing `)` or `}`.
    fn expect_semi(&mut self) -> PResult<()> {
        if self.eat(SyntaxKind::SEMICOLON)
            || self.at_any(&[SyntaxKind::R_PAREN, SyntaxKind::R_BRACE, SyntaxKind::EOF])
        {
            Ok(())
        } else {
            Err(self.error(format!(
                "expected ';', found {}",
                describe(self.current_kind())
            )))
        }
    }

    fn error(&self, message: impl Into<String>) -> SyntaxError {
        SyntaxError::new(message, self.current().offset)
    }

    // =========================================================================
    // Comments
    // =========================================================================

    /// Take every pending comment that precedes the current token.
    fn take_doc(&mut self) -> Vec<Comment> {
        let limit = self.current().offset;
        let mut doc = Vec::new();
        while let Some(comment) = self.comments.get(self.next_comment) {
            if comment.offset >= limit {
                break;
            }
            doc.push(Comment {
                text: comment.text.to_string(),
                offset: Some(comment.offset),
            });
            self.next_comment += 1;
        }
        doc
    }

    /// Take a comment that sits on the same line as the previous token.
    fn take_trailing(&mut self) -> Option<Comment> {
        let comment = self.comments.get(self.next_comment)?;
        if comment.offset >= self.current().offset
            || self.line_index.position(comment.offset).line
                != self.line_index.position(self.prev_end).line
        {
            return None;
        }
        let comment = Comment {
            text: comment.text.to_string(),
            offset: Some(comment.offset),
        };
        self.next_comment += 1;
        Some(comment)
    }

    fn take_remaining_comments(&mut self) -> Vec<Comment> {
        let rest = self.comments[self.next_comment..]
            .iter()
            .map(|c| Comment {
                text: c.text.to_string(),
                offset: Some(c.offset),
            })
            .collect();
        self.next_comment = self.comments.len();
        rest
    }

    // =========================================================================
    // File and declarations
    // =========================================================================

    fn parse_file(&mut self) -> PResult<File> {
        let doc = self.take_doc();
        self.expect(SyntaxKind::PACKAGE_KW)?;
        let package = self.ident()?;
        self.expect_semi()?;

        let mut decls = Vec::new();
        while self.at(SyntaxKind::IMPORT_KW) {
            let doc = self.take_doc();
            decls.push(Decl::Gen(self.gen_decl(doc, DeclKeyword::Import)?));
            self.expect_semi()?;
        }

        while !self.at_eof() {
            let doc = self.take_doc();
            let decl = match self.current_kind() {
                SyntaxKind::CONST_KW => Decl::Gen(self.gen_decl(doc, DeclKeyword::Const)?),
                SyntaxKind::VAR_KW => Decl::Gen(self.gen_decl(doc, DeclKeyword::Var)?),
                SyntaxKind::TYPE_KW => Decl::Gen(self.gen_decl(doc, DeclKeyword::Type)?),
                SyntaxKind::FUNC_KW => Decl::Func(self.func_decl(doc)?),
                SyntaxKind::IMPORT_KW => {
                    return Err(self.error("imports must appear before other declarations"));
                }
                kind => {
                    return Err(self.error(format!(
                        "non-declaration statement outside function body: {}",
                        describe(kind)
                    )));
                }
            };
            decls.push(decl);
            self.expect_semi()?;
        }

        Ok(File {
            doc,
            package,
            decls,
            trailing: self.take_remaining_comments(),
        })
    }

    fn gen_decl(&mut self, doc: Vec<Comment>, keyword: DeclKeyword) -> PResult<GenDecl> {
        let pos = self.bump().offset;
        let mut specs = Vec::new();
        let grouped = self.eat(SyntaxKind::L_PAREN);

        if grouped {
            while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
                let spec_doc = self.take_doc();
                specs.push(self.spec(spec_doc, keyword)?);
                self.expect_semi()?;
            }
            self.expect(SyntaxKind::R_PAREN)?;
        } else {
            specs.push(self.spec(Vec::new(), keyword)?);
        }

        Ok(GenDecl {
            doc,
            keyword,
            grouped,
            specs,
            pos: Some(pos),
        })
    }

    fn spec(&mut self, doc: Vec<Comment>, keyword: DeclKeyword) -> PResult<Spec> {
        let spec = match keyword {
            DeclKeyword::Import => {
                let name = match self.current_kind() {
                    SyntaxKind::IDENT => Some(self.ident()?),
                    SyntaxKind::DOT => {
                        let dot = self.bump();
                        Some(Ident::at(".", dot.offset))
                    }
                    _ => None,
                };
                let path = self.expect(SyntaxKind::STRING)?;
                Spec::Import(ImportSpec {
                    doc,
                    name,
                    path: BasicLit {
                        kind: LitKind::String,
                        value: path.text.into(),
                        pos: Some(path.offset),
                    },
                    comment: self.take_trailing(),
                })
            }
            DeclKeyword::Const | DeclKeyword::Var => {
                let names = self.ident_list()?;
                let ty = if self.at_any(&[
                    SyntaxKind::EQ,
                    SyntaxKind::SEMICOLON,
                    SyntaxKind::R_PAREN,
                ]) {
                    None
                } else {
                    Some(self.parse_type()?)
                };
                let values = if self.eat(SyntaxKind::EQ) {
                    self.expr_list()?
                } else {
                    Vec::new()
                };
                Spec::Value(ValueSpec {
                    doc,
                    names,
                    ty,
                    values,
                    comment: self.take_trailing(),
                })
            }
            DeclKeyword::Type => {
                let name = self.ident()?;
                let alias = self.eat(SyntaxKind::EQ);
                let ty = self.parse_type()?;
                Spec::Type(TypeSpec {
                    doc,
                    name,
                    alias,
                    ty,
                    comment: self.take_trailing(),
                })
            }
        };
        Ok(spec)
    }

    fn func_decl(&mut self, doc: Vec<Comment>) -> PResult<FuncDecl> {
        self.expect(SyntaxKind::FUNC_KW)?;
        let recv = if self.at(SyntaxKind::L_PAREN) {
            Some(self.parameters()?)
        } else {
            None
        };
        let name = self.ident()?;
        let ty = self.signature()?;
        let body = if self.at(SyntaxKind::L_BRACE) {
            Some(self.function_body()?)
        } else {
            None
        };
        Ok(FuncDecl {
            doc,
            recv,
            name,
            ty,
            body,
        })
    }

    fn function_body(&mut self) -> PResult<Block> {
        let saved = self.expr_level;
        self.expr_level = 0;
        let body = self.block();
        self.expr_level = saved;
        body
    }

    fn ident(&mut self) -> PResult<Ident> {
        let token = self.expect(SyntaxKind::IDENT)?;
        Ok(Ident::at(token.text, token.offset))
    }

    fn ident_list(&mut self) -> PResult<Vec<Ident>> {
        let mut names = vec![self.ident()?];
        while self.eat(SyntaxKind::COMMA) {
            names.push(self.ident()?);
        }
        Ok(names)
    }

    // =========================================================================
    // Types
    // =========================================================================

    fn signature(&mut self) -> PResult<FuncType> {
        let params = self.parameters()?;
        let results = if self.at(SyntaxKind::L_PAREN) {
            Some(self.parameters()?)
        } else if can_start_type(self.current_kind()) {
            let ty = self.parse_type()?;
            Some(FieldList {
                fields: vec![Field {
                    doc: Vec::new(),
                    names: Vec::new(),
                    ty,
                    tag: None,
                    comment: None,
                }],
                end_comments: Vec::new(),
            })
        } else {
            None
        };
        Ok(FuncType { params, results })
    }

    /// `(a, b int, c ...string)` or `(int, error)`
    fn parameters(&mut self) -> PResult<FieldList> {
        self.expect(SyntaxKind::L_PAREN)?;
        let saved = self.expr_level;
        self.expr_level = 0;

        let mut entries: Vec<(Expr, Option<Expr>)> = Vec::new();
        while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
            let first = self.param_type()?;
            if self.at_any(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]) {
                entries.push((first, None));
            } else {
                let ty = self.param_type()?;
                entries.push((first, Some(ty)));
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expr_level = saved;
        let close = self.expect(SyntaxKind::R_PAREN)?;

        let named = entries.iter().any(|(_, ty)| ty.is_some());
        let mut fields = Vec::new();
        if named {
            let mut names = Vec::new();
            for (first, ty) in entries {
                let Expr::Ident(name) = first else {
                    return Err(SyntaxError::new(
                        "mixed named and unnamed parameters",
                        close.offset,
                    ));
                };
                names.push(name);
                if let Some(ty) = ty {
                    fields.push(Field {
                        doc: Vec::new(),
                        names: std::mem::take(&mut names),
                        ty,
                        tag: None,
                        comment: None,
                    });
                }
            }
            if !names.is_empty() {
                return Err(SyntaxError::new(
                    "mixed named and unnamed parameters",
                    close.offset,
                ));
            }
        } else {
            fields = entries
                .into_iter()
                .map(|(ty, _)| Field {
                    doc: Vec::new(),
                    names: Vec::new(),
                    ty,
                    tag: None,
                    comment: None,
                })
                .collect();
        }

        Ok(FieldList {
            fields,
            end_comments: Vec::new(),
        })
    }

    fn param_type(&mut self) -> PResult<Expr> {
        if self.eat(SyntaxKind::ELLIPSIS) {
            Ok(Expr::Ellipsis(Box::new(self.parse_type()?)))
        } else {
            self.parse_type()
        }
    }

    fn parse_type(&mut self) -> PResult<Expr> {
        match self.current_kind() {
            SyntaxKind::IDENT => self.type_name(),
            SyntaxKind::STAR => {
                self.bump();
                Ok(Expr::Star(Box::new(self.parse_type()?)))
            }
            SyntaxKind::L_BRACKET => {
                self.bump();
                let len = if self.eat(SyntaxKind::R_BRACKET) {
                    ArrayLen::Slice
                } else if self.eat(SyntaxKind::ELLIPSIS) {
                    self.expect(SyntaxKind::R_BRACKET)?;
                    ArrayLen::Ellipsis
                } else {
                    self.expr_level += 1;
                    let len = self.expr();
                    self.expr_level -= 1;
                    self.expect(SyntaxKind::R_BRACKET)?;
                    ArrayLen::Fixed(Box::new(len?))
                };
                let elem = self.parse_type()?;
                Ok(Expr::ArrayType {
                    len,
                    elem: Box::new(elem),
                })
            }
            SyntaxKind::MAP_KW => {
                self.bump();
                self.expect(SyntaxKind::L_BRACKET)?;
                let key = self.parse_type()?;
                self.expect(SyntaxKind::R_BRACKET)?;
                let value = self.parse_type()?;
                Ok(Expr::MapType {
                    key: Box::new(key),
                    value: Box::new(value),
                })
            }
            SyntaxKind::CHAN_KW => {
                self.bump();
                let dir = if self.eat(SyntaxKind::ARROW) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                let value = self.parse_type()?;
                Ok(Expr::ChanType {
                    dir,
                    value: Box::new(value),
                })
            }
            SyntaxKind::ARROW => {
                self.bump();
                self.expect(SyntaxKind::CHAN_KW)?;
                let value = self.parse_type()?;
                Ok(Expr::ChanType {
                    dir: ChanDir::Recv,
                    value: Box::new(value),
                })
            }
            SyntaxKind::FUNC_KW => {
                self.bump();
                Ok(Expr::FuncType(self.signature()?))
            }
            SyntaxKind::STRUCT_KW => self.struct_type(),
            SyntaxKind::INTERFACE_KW => self.interface_type(),
            SyntaxKind::L_PAREN => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(SyntaxKind::R_PAREN)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            kind => Err(self.error(format!("expected type, found {}", describe(kind)))),
        }
    }

    /// `T` or `pkg.T`
    fn type_name(&mut self) -> PResult<Expr> {
        let name = self.ident()?;
        if self.eat(SyntaxKind::DOT) {
            let sel = self.ident()?;
            Ok(Expr::Selector(SelectorExpr {
                x: Box::new(Expr::Ident(name)),
                sel,
            }))
        } else {
            Ok(Expr::Ident(name))
        }
    }

    fn struct_type(&mut self) -> PResult<Expr> {
        self.expect(SyntaxKind::STRUCT_KW)?;
        self.expect(SyntaxKind::L_BRACE)?;
        let mut fields = Vec::new();

        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            let doc = self.take_doc();
            let (names, ty) = match (self.current_kind(), self.nth(1)) {
                (SyntaxKind::STAR, _) => {
                    self.bump();
                    (Vec::new(), Expr::Star(Box::new(self.type_name()?)))
                }
                (
                    SyntaxKind::IDENT,
                    SyntaxKind::DOT
                    | SyntaxKind::STRING
                    | SyntaxKind::SEMICOLON
                    | SyntaxKind::R_BRACE,
                ) => (Vec::new(), self.type_name()?),
                _ => {
                    let names = self.ident_list()?;
                    (names, self.parse_type()?)
                }
            };
            let tag = if self.at(SyntaxKind::STRING) {
                let token = self.bump();
                Some(BasicLit {
                    kind: LitKind::String,
                    value: token.text.into(),
                    pos: Some(token.offset),
                })
            } else {
                None
            };
            let comment = self.take_trailing();
            fields.push(Field {
                doc,
                names,
                ty,
                tag,
                comment,
            });
            self.expect_semi()?;
        }

        let end_comments = self.take_doc();
        self.expect(SyntaxKind::R_BRACE)?;
        Ok(Expr::StructType(FieldList {
            fields,
            end_comments,
        }))
    }

    fn interface_type(&mut self) -> PResult<Expr> {
        self.expect(SyntaxKind::INTERFACE_KW)?;
        self.expect(SyntaxKind::L_BRACE)?;
        let mut fields = Vec::new();

        while !self.at(SyntaxKind::R_BRACE) && !self.at_eof() {
            let doc = self.take_doc();
            let (names, ty) = if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::L_PAREN
            {
                let name = self.ident()?;
                (vec![name], Expr::FuncType(self.signature()?))
            } else {
                (Vec::new(), self.parse_type()?)
            };
            let comment = self.take_trailing();
            fields.push(Field {
                doc,
                names,
                ty,
                tag: None,
                comment,
            });
            self.expect_semi()?;
        }

        let end_comments = self.take_doc();
        self.expect(SyntaxKind::R_BRACE)?;
        Ok(Expr::InterfaceType(FieldList {
            fields,
            end_comments,
        }))
    }

    // =========================================================================
    // Statements
    // =========================================================================

    fn block(&mut self) -> PResult<Block> {
        self.expect(SyntaxKind::L_BRACE)?;
        let stmts = self.stmt_list()?;
        let end_comments = self.take_doc();
        self.expect(SyntaxKind::R_BRACE)?;
        Ok(Block {
            stmts,
            end_comments,
        })
    }

    fn stmt_list(&mut self) -> PResult<Vec<Stmt>> {
        let mut stmts = Vec::new();
        while !self.at_any(&[
            SyntaxKind::R_BRACE,
            SyntaxKind::CASE_KW,
            SyntaxKind::DEFAULT_KW,
            SyntaxKind::EOF,
        ]) {
            if self.eat(SyntaxKind::SEMICOLON) {
                continue;
            }
            let doc = self.take_doc();
            let kind = self.stmt()?;
            let comment = self.take_trailing();
            stmts.push(Stmt { doc, kind, comment });
            if !self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
                self.expect_semi()?;
            }
        }
        Ok(stmts)
    }

    fn stmt(&mut self) -> PResult<StmtKind> {
        match self.current_kind() {
            SyntaxKind::CONST_KW => Ok(StmtKind::Decl(self.gen_decl(Vec::new(), DeclKeyword::Const)?)),
            SyntaxKind::VAR_KW => Ok(StmtKind::Decl(self.gen_decl(Vec::new(), DeclKeyword::Var)?)),
            SyntaxKind::TYPE_KW => Ok(StmtKind::Decl(self.gen_decl(Vec::new(), DeclKeyword::Type)?)),
            SyntaxKind::IDENT if self.nth(1) == SyntaxKind::COLON => {
                let label = self.ident()?;
                self.bump();
                let stmt = if self.at(SyntaxKind::R_BRACE) {
                    StmtKind::Empty
                } else {
                    self.stmt()?
                };
                Ok(StmtKind::Labeled {
                    label,
                    stmt: Box::new(Stmt::new(stmt)),
                })
            }
            SyntaxKind::GO_KW => {
                self.bump();
                Ok(StmtKind::Go(self.expr()?))
            }
            SyntaxKind::DEFER_KW => {
                self.bump();
                Ok(StmtKind::Defer(self.expr()?))
            }
            SyntaxKind::RETURN_KW => {
                self.bump();
                let results = if self.at_any(&[SyntaxKind::SEMICOLON, SyntaxKind::R_BRACE]) {
                    Vec::new()
                } else {
                    self.expr_list()?
                };
                Ok(StmtKind::Return(ReturnStmt { results }))
            }
            SyntaxKind::BREAK_KW | SyntaxKind::CONTINUE_KW | SyntaxKind::GOTO_KW => {
                let keyword = match self.bump().kind {
                    SyntaxKind::BREAK_KW => BranchKeyword::Break,
                    SyntaxKind::CONTINUE_KW => BranchKeyword::Continue,
                    _ => BranchKeyword::Goto,
                };
                let label = if self.at(SyntaxKind::IDENT) {
                    Some(self.ident()?)
                } else {
                    None
                };
                Ok(StmtKind::Branch { keyword, label })
            }
            SyntaxKind::FALLTHROUGH_KW => {
                self.bump();
                Ok(StmtKind::Branch {
                    keyword: BranchKeyword::Fallthrough,
                    label: None,
                })
            }
            SyntaxKind::L_BRACE => Ok(StmtKind::Block(self.block()?)),
            SyntaxKind::IF_KW => Ok(StmtKind::If(self.if_stmt()?)),
            SyntaxKind::SWITCH_KW => self.switch_stmt(),
            SyntaxKind::SELECT_KW => self.select_stmt(),
            SyntaxKind::FOR_KW => self.for_stmt(),
            _ => match self.simple_stmt(false)? {
                SimpleStmt::Stmt(kind) => Ok(kind),
                SimpleStmt::Range { .. } => Err(self.error("unexpected range clause")),
            },
        }
    }

    fn simple_stmt(&mut self, range_ok: bool) -> PResult<SimpleStmt> {
        if range_ok && self.eat(SyntaxKind::RANGE_KW) {
            let x = self.expr()?;
            return Ok(SimpleStmt::Range {
                key: None,
                value: None,
                define: false,
                x,
            });
        }

        let mut lhs = self.expr_list()?;
        let kind = self.current_kind();

        if kind.is_assign_op() {
            let op = assign_op(self.bump().kind);
            if range_ok && matches!(op, AssignOp::Assign | AssignOp::Define) && self.eat(SyntaxKind::RANGE_KW) {
                if lhs.len() > 2 {
                    return Err(self.error("range clause permits at most two iteration variables"));
                }
                let x = self.expr()?;
                let mut vars = lhs.into_iter();
                return Ok(SimpleStmt::Range {
                    key: vars.next(),
                    value: vars.next(),
                    define: op == AssignOp::Define,
                    x,
                });
            }
            let rhs = self.expr_list()?;
            return Ok(SimpleStmt::Stmt(StmtKind::Assign(AssignStmt { lhs, op, rhs })));
        }

        if lhs.len() > 1 {
            return Err(self.error(format!(
                "expected assignment operator, found {}",
                describe(kind)
            )));
        }
        let x = lhs.remove(0);

        match kind {
            SyntaxKind::ARROW => {
                self.bump();
                let value = self.expr()?;
                Ok(SimpleStmt::Stmt(StmtKind::Send { chan: x, value }))
            }
            SyntaxKind::PLUS_PLUS | SyntaxKind::MINUS_MINUS => {
                let inc = self.bump().kind == SyntaxKind::PLUS_PLUS;
                Ok(SimpleStmt::Stmt(StmtKind::IncDec { x, inc }))
            }
            _ => Ok(SimpleStmt::Stmt(StmtKind::Expr(x))),
        }
    }

    fn header_stmt(&mut self) -> PResult<StmtKind> {
        match self.simple_stmt(false)? {
            SimpleStmt::Stmt(kind) => Ok(kind),
            SimpleStmt::Range { .. } => Err(self.error("unexpected range clause")),
        }
    }

    fn if_stmt(&mut self) -> PResult<IfStmt> {
        self.expect(SyntaxKind::IF_KW)?;
        let saved = self.expr_level;
        self.expr_level = -1;

        let mut init = None;
        let first = self.header_stmt()?;
        let cond = if self.eat(SyntaxKind::SEMICOLON) {
            init = Some(Box::new(Stmt::new(first)));
            self.expr()?
        } else {
            match first {
                StmtKind::Expr(cond) => cond,
                _ => {
                    self.expr_level = saved;
                    return Err(self.error("expected condition in if statement"));
                }
            }
        };
        self.expr_level = saved;

        let then = self.block()?;
        let els = if self.eat(SyntaxKind::ELSE_KW) {
            let stmt = match self.current_kind() {
                SyntaxKind::IF_KW => StmtKind::If(self.if_stmt()?),
                SyntaxKind::L_BRACE => StmtKind::Block(self.block()?),
                kind => {
                    return Err(self.error(format!(
                        "expected if statement or block, found {}",
                        describe(kind)
                    )));
                }
            };
            Some(Box::new(Stmt::new(stmt)))
        } else {
            None
        };

        Ok(IfStmt {
            init,
            cond,
            then,
            els,
        })
    }

    fn switch_stmt(&mut self) -> PResult<StmtKind> {
        self.expect(SyntaxKind::SWITCH_KW)?;
        let saved = self.expr_level;
        self.expr_level = -1;

        let mut init = None;
        let mut tag_stmt = None;
        if !self.at(SyntaxKind::L_BRACE) {
            let first = if self.at(SyntaxKind::SEMICOLON) {
                None
            } else {
                Some(self.header_stmt()?)
            };
            if self.eat(SyntaxKind::SEMICOLON) {
                init = first.map(|kind| Box::new(Stmt::new(kind)));
                if !self.at(SyntaxKind::L_BRACE) {
                    tag_stmt = Some(self.header_stmt()?);
                }
            } else {
                tag_stmt = first;
            }
        }
        self.expr_level = saved;

        self.expect(SyntaxKind::L_BRACE)?;
        let mut clauses = Vec::new();
        while self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
            let doc = self.take_doc();
            let list = if self.eat(SyntaxKind::CASE_KW) {
                Some(self.expr_list()?)
            } else {
                self.bump();
                None
            };
            self.expect(SyntaxKind::COLON)?;
            let body = self.stmt_list()?;
            clauses.push(CaseClause { doc, list, body });
        }
        self.expect(SyntaxKind::R_BRACE)?;

        match tag_stmt {
            Some(StmtKind::Expr(Expr::TypeAssert { x, ty: None })) => {
                Ok(StmtKind::TypeSwitch(TypeSwitchStmt {
                    init,
                    binding: None,
                    subject: *x,
                    clauses,
                }))
            }
            Some(StmtKind::Assign(assign)) => match type_switch_guard(assign) {
                Some((binding, subject)) => Ok(StmtKind::TypeSwitch(TypeSwitchStmt {
                    init,
                    binding: Some(binding),
                    subject,
                    clauses,
                })),
                None => Err(self.error("switch expression must be an expression")),
            },
            Some(StmtKind::Expr(tag)) => Ok(StmtKind::Switch(SwitchStmt {
                init,
                tag: Some(tag),
                clauses,
            })),
            None => Ok(StmtKind::Switch(SwitchStmt {
                init,
                tag: None,
                clauses,
            })),
            Some(_) => Err(self.error("switch expression must be an expression")),
        }
    }

    fn select_stmt(&mut self) -> PResult<StmtKind> {
        self.expect(SyntaxKind::SELECT_KW)?;
        self.expect(SyntaxKind::L_BRACE)?;
        let mut clauses = Vec::new();
        while self.at_any(&[SyntaxKind::CASE_KW, SyntaxKind::DEFAULT_KW]) {
            let doc = self.take_doc();
            let comm = if self.eat(SyntaxKind::CASE_KW) {
                Some(Box::new(Stmt::new(self.header_stmt()?)))
            } else {
                self.bump();
                None
            };
            self.expect(SyntaxKind::COLON)?;
            let body = self.stmt_list()?;
            clauses.push(CommClause { doc, comm, body });
        }
        self.expect(SyntaxKind::R_BRACE)?;
        Ok(StmtKind::Select(clauses))
    }

    fn for_stmt(&mut self) -> PResult<StmtKind> {
        self.expect(SyntaxKind::FOR_KW)?;
        let saved = self.expr_level;
        self.expr_level = -1;

        let mut init = None;
        let mut cond = None;
        let mut post = None;

        if !self.at(SyntaxKind::L_BRACE) {
            let first = if self.at(SyntaxKind::SEMICOLON) {
                None
            } else {
                Some(self.simple_stmt(true)?)
            };

            if let Some(SimpleStmt::Range {
                key,
                value,
                define,
                x,
            }) = first
            {
                self.expr_level = saved;
                let body = self.block()?;
                return Ok(StmtKind::Range(RangeStmt {
                    key,
                    value,
                    define,
                    x,
                    body,
                }));
            }

            let first = first.map(|simple| match simple {
                SimpleStmt::Stmt(kind) => kind,
                SimpleStmt::Range { .. } => StmtKind::Empty,
            });

            if self.eat(SyntaxKind::SEMICOLON) {
                init = first.map(|kind| Box::new(Stmt::new(kind)));
                if !self.at(SyntaxKind::SEMICOLON) {
                    cond = Some(self.expr()?);
                }
                self.expect(SyntaxKind::SEMICOLON)?;
                if !self.at(SyntaxKind::L_BRACE) {
                    post = Some(Box::new(Stmt::new(self.header_stmt()?)));
                }
            } else {
                match first {
                    Some(StmtKind::Expr(expr)) => cond = Some(expr),
                    Some(_) => {
                        self.expr_level = saved;
                        return Err(self.error("expected for loop condition"));
                    }
                    None => {}
                }
            }
        }
        self.expr_level = saved;

        let body = self.block()?;
        Ok(StmtKind::For(ForStmt {
            init,
            cond,
            post,
            body,
        }))
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    fn expr_list(&mut self) -> PResult<Vec<Expr>> {
        let mut exprs = vec![self.expr()?];
        while self.eat(SyntaxKind::COMMA) {
            exprs.push(self.expr()?);
        }
        Ok(exprs)
    }

    fn expr(&mut self) -> PResult<Expr> {
        self.binary_expr(1)
    }

    fn binary_expr(&mut self, min_precedence: u8) -> PResult<Expr> {
        let mut x = self.unary_expr()?;
        loop {
            let precedence = self.current_kind().binary_precedence();
            if precedence == 0 || precedence < min_precedence {
                return Ok(x);
            }
            let op = binary_op(self.bump().kind);
            let y = self.binary_expr(precedence + 1)?;
            x = Expr::Binary(BinaryExpr {
                x: Box::new(x),
                op,
                y: Box::new(y),
            });
        }
    }

    fn unary_expr(&mut self) -> PResult<Expr> {
        let op = match self.current_kind() {
            SyntaxKind::PLUS => UnaryOp::Pos,
            SyntaxKind::MINUS => UnaryOp::Neg,
            SyntaxKind::BANG => UnaryOp::Not,
            SyntaxKind::CARET => UnaryOp::Xor,
            SyntaxKind::AMP => UnaryOp::Addr,
            SyntaxKind::TILDE => UnaryOp::Tilde,
            SyntaxKind::ARROW if self.nth(1) == SyntaxKind::CHAN_KW => {
                let ty = self.parse_type()?;
                return self.primary_after(ty);
            }
            SyntaxKind::ARROW => UnaryOp::Recv,
            SyntaxKind::STAR => {
                self.bump();
                return Ok(Expr::Star(Box::new(self.unary_expr()?)));
            }
            _ => return self.primary_expr(),
        };
        self.bump();
        let x = self.unary_expr()?;
        Ok(Expr::Unary(UnaryExpr { op, x: Box::new(x) }))
    }

    fn primary_expr(&mut self) -> PResult<Expr> {
        let operand = self.operand()?;
        self.primary_after(operand)
    }

    fn primary_after(&mut self, mut x: Expr) -> PResult<Expr> {
        loop {
            match self.current_kind() {
                SyntaxKind::DOT => {
                    self.bump();
                    if self.at(SyntaxKind::IDENT) {
                        let sel = self.ident()?;
                        x = Expr::Selector(SelectorExpr {
                            x: Box::new(x),
                            sel,
                        });
                    } else {
                        self.expect(SyntaxKind::L_PAREN)?;
                        let ty = if self.eat(SyntaxKind::TYPE_KW) {
                            None
                        } else {
                            Some(Box::new(self.parse_type()?))
                        };
                        self.expect(SyntaxKind::R_PAREN)?;
                        x = Expr::TypeAssert { x: Box::new(x), ty };
                    }
                }
                SyntaxKind::L_BRACKET => {
                    self.bump();
                    self.expr_level += 1;
                    let indexed = self.index_or_slice(x);
                    self.expr_level -= 1;
                    x = indexed?;
                    self.expect(SyntaxKind::R_BRACKET)?;
                }
                SyntaxKind::L_PAREN => {
                    self.bump();
                    self.expr_level += 1;
                    let call = self.call_args(x);
                    self.expr_level -= 1;
                    x = call?;
                    self.expect(SyntaxKind::R_PAREN)?;
                }
                SyntaxKind::L_BRACE
                    if is_literal_type(&x) && (self.expr_level >= 0 || !is_type_name(&x)) =>
                {
                    x = Expr::CompositeLit(self.composite_lit(Some(x))?);
                }
                _ => return Ok(x),
            }
        }
    }

    fn index_or_slice(&mut self, x: Expr) -> PResult<Expr> {
        let low = if self.at(SyntaxKind::COLON) {
            None
        } else {
            Some(Box::new(self.expr()?))
        };
        if !self.eat(SyntaxKind::COLON) {
            let Some(index) = low else {
                return Err(self.error("expected operand"));
            };
            return Ok(Expr::Index {
                x: Box::new(x),
                index,
            });
        }
        let high = if self.at_any(&[SyntaxKind::COLON, SyntaxKind::R_BRACKET]) {
            None
        } else {
            Some(Box::new(self.expr()?))
        };
        let max = if self.eat(SyntaxKind::COLON) {
            Some(Box::new(self.expr()?))
        } else {
            None
        };
        Ok(Expr::Slice {
            x: Box::new(x),
            low,
            high,
            max,
        })
    }

    fn call_args(&mut self, fun: Expr) -> PResult<Expr> {
        let mut args = Vec::new();
        let mut ellipsis = false;
        while !self.at(SyntaxKind::R_PAREN) && !self.at_eof() {
            args.push(self.expr_or_type()?);
            if self.eat(SyntaxKind::ELLIPSIS) {
                ellipsis = true;
            }
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        Ok(Expr::Call(CallExpr {
            fun: Box::new(fun),
            args,
            ellipsis,
        }))
    }

    /// Builtins like `make` and `new` take types as arguments.
    fn expr_or_type(&mut self) -> PResult<Expr> {
        match self.current_kind() {
            SyntaxKind::CHAN_KW | SyntaxKind::INTERFACE_KW => {
                let ty = self.parse_type()?;
                self.primary_after(ty)
            }
            _ => self.expr(),
        }
    }

    fn operand(&mut self) -> PResult<Expr> {
        match self.current_kind() {
            SyntaxKind::IDENT => Ok(Expr::Ident(self.ident()?)),
            SyntaxKind::INT
            | SyntaxKind::FLOAT
            | SyntaxKind::IMAG
            | SyntaxKind::CHAR
            | SyntaxKind::STRING => {
                let token = self.bump();
                let kind = match token.kind {
                    SyntaxKind::INT => LitKind::Int,
                    SyntaxKind::FLOAT => LitKind::Float,
                    SyntaxKind::IMAG => LitKind::Imag,
                    SyntaxKind::CHAR => LitKind::Char,
                    _ => LitKind::String,
                };
                Ok(Expr::BasicLit(BasicLit {
                    kind,
                    value: token.text.into(),
                    pos: Some(token.offset),
                }))
            }
            SyntaxKind::L_PAREN => {
                self.bump();
                self.expr_level += 1;
                let inner = self.expr_or_type();
                self.expr_level -= 1;
                let inner = inner?;
                self.expect(SyntaxKind::R_PAREN)?;
                Ok(Expr::Paren(Box::new(inner)))
            }
            SyntaxKind::FUNC_KW => {
                self.bump();
                let ty = self.signature()?;
                if self.at(SyntaxKind::L_BRACE) {
                    let body = self.function_body()?;
                    Ok(Expr::FuncLit(FuncLit { ty, body }))
                } else {
                    Ok(Expr::FuncType(ty))
                }
            }
            SyntaxKind::L_BRACKET
            | SyntaxKind::MAP_KW
            | SyntaxKind::CHAN_KW
            | SyntaxKind::STRUCT_KW
            | SyntaxKind::INTERFACE_KW => self.parse_type(),
            kind => Err(self.error(format!("expected operand, found {}", describe(kind)))),
        }
    }

    fn composite_lit(&mut self, ty: Option<Expr>) -> PResult<CompositeLit> {
        let open = self.expect(SyntaxKind::L_BRACE)?;
        let saved = self.expr_level;
        self.expr_level = 0;

        let mut elts = Vec::new();
        let result = loop {
            if self.at(SyntaxKind::R_BRACE) || self.at_eof() {
                break Ok(());
            }
            let element = match self.element() {
                Ok(element) => element,
                Err(err) => break Err(err),
            };
            let element = if self.eat(SyntaxKind::COLON) {
                match self.element() {
                    Ok(value) => Expr::KeyValue {
                        key: Box::new(element),
                        value: Box::new(value),
                    },
                    Err(err) => break Err(err),
                }
            } else {
                element
            };
            elts.push(element);
            if !self.eat(SyntaxKind::COMMA) {
                break Ok(());
            }
        };
        self.expr_level = saved;
        result?;

        let close = self.expect(SyntaxKind::R_BRACE)?;
        let multiline =
            self.line_index.position(open.offset).line != self.line_index.position(close.offset).line;
        Ok(CompositeLit {
            ty: ty.map(Box::new),
            elts,
            multiline,
        })
    }

    fn element(&mut self) -> PResult<Expr> {
        if self.at(SyntaxKind::L_BRACE) {
            Ok(Expr::CompositeLit(self.composite_lit(None)?))
        } else {
            self.expr()
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Split `v := x.(type)` into its binding and subject.
fn type_switch_guard(assign: AssignStmt) -> Option<(Ident, Expr)> {
    if assign.op != AssignOp::Define {
        return None;
    }
    let [Expr::Ident(binding)] = <[Expr; 1]>::try_from(assign.lhs).ok()? else {
        return None;
    };
    let [Expr::TypeAssert { x, ty: None }] = <[Expr; 1]>::try_from(assign.rhs).ok()? else {
        return None;
    };
    Some((binding, *x))
}

fn can_start_type(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::IDENT
            | SyntaxKind::STAR
            | SyntaxKind::L_BRACKET
            | SyntaxKind::MAP_KW
            | SyntaxKind::CHAN_KW
            | SyntaxKind::FUNC_KW
            | SyntaxKind::STRUCT_KW
            | SyntaxKind::INTERFACE_KW
            | SyntaxKind::ARROW
    )
}

fn is_type_name(x: &Expr) -> bool {
    match x {
        Expr::Ident(_) => true,
        Expr::Selector(selector) => matches!(*selector.x, Expr::Ident(_)),
        _ => false,
    }
}

fn is_literal_type(x: &Expr) -> bool {
    is_type_name(x)
        || matches!(
            x,
            Expr::ArrayType { .. } | Expr::MapType { .. } | Expr::StructType(_)
        )
}

fn assign_op(kind: SyntaxKind) -> AssignOp {
    match kind {
        SyntaxKind::COLON_EQ => AssignOp::Define,
        SyntaxKind::PLUS_EQ => AssignOp::Add,
        SyntaxKind::MINUS_EQ => AssignOp::Sub,
        SyntaxKind::STAR_EQ => AssignOp::Mul,
        SyntaxKind::SLASH_EQ => AssignOp::Quo,
        SyntaxKind::PERCENT_EQ => AssignOp::Rem,
        SyntaxKind::AMP_EQ => AssignOp::And,
        SyntaxKind::PIPE_EQ => AssignOp::Or,
        SyntaxKind::CARET_EQ => AssignOp::Xor,
        SyntaxKind::SHL_EQ => AssignOp::Shl,
        SyntaxKind::SHR_EQ => AssignOp::Shr,
        SyntaxKind::AMP_CARET_EQ => AssignOp::AndNot,
        _ => AssignOp::Assign,
    }
}

fn binary_op(kind: SyntaxKind) -> BinaryOp {
    match kind {
        SyntaxKind::PIPE_PIPE => BinaryOp::LogOr,
        SyntaxKind::AMP_AMP => BinaryOp::LogAnd,
        SyntaxKind::EQ_EQ => BinaryOp::Eq,
        SyntaxKind::BANG_EQ => BinaryOp::Ne,
        SyntaxKind::LT => BinaryOp::Lt,
        SyntaxKind::LT_EQ => BinaryOp::Le,
        SyntaxKind::GT => BinaryOp::Gt,
        SyntaxKind::GT_EQ => BinaryOp::Ge,
        SyntaxKind::PLUS => BinaryOp::Add,
        SyntaxKind::MINUS => BinaryOp::Sub,
        SyntaxKind::PIPE => BinaryOp::Or,
        SyntaxKind::CARET => BinaryOp::Xor,
        SyntaxKind::STAR => BinaryOp::Mul,
        SyntaxKind::SLASH => BinaryOp::Quo,
        SyntaxKind::PERCENT => BinaryOp::Rem,
        SyntaxKind::SHL => BinaryOp::Shl,
        SyntaxKind::SHR => BinaryOp::Shr,
        SyntaxKind::AMP => BinaryOp::And,
        _ => BinaryOp::AndNot,
    }
}

fn describe(kind: SyntaxKind) -> String {
    match kind {
        SyntaxKind::SEMICOLON => "';'".to_string(),
        SyntaxKind::EOF => "EOF".to_string(),
        SyntaxKind::IDENT => "identifier".to_string(),
        kind => format!("{:?}", kind).to_lowercase().replace("_kw", ""),
    }
}
