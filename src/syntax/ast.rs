//! Owned Go syntax tree.
//!
//! Every node is a plain value owned by its parent, so a [`File`] can be
//! mutated in place and printed back with [`super::printer`]. Nodes created by
//! the parser carry the byte offset of their first token; nodes built by
//! [`super::make`] carry `None`.

use smol_str::SmolStr;
use text_size::TextSize;

/// A comment, including its `//` or `/* */` delimiters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub offset: Option<TextSize>,
}

impl Comment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            offset: None,
        }
    }

    /// Check if this is a `//` comment (must be followed by a line break)
    pub fn is_line(&self) -> bool {
        self.text.starts_with("//")
    }
}

/// An identifier occurrence.
///
/// The name may contain a dot after qualification (`elastic.Bar`); the
/// printer emits it verbatim and the next parse turns it into a selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ident {
    pub name: SmolStr,
    pub pos: Option<TextSize>,
}

impl Ident {
    pub fn new(name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            pos: None,
        }
    }

    pub fn at(name: impl Into<SmolStr>, pos: TextSize) -> Self {
        Self {
            name: name.into(),
            pos: Some(pos),
        }
    }

    pub fn is_blank(&self) -> bool {
        self.name == "_"
    }

    /// Exported identifiers start with an upper-case letter.
    pub fn is_exported(&self) -> bool {
        self.name.chars().next().is_some_and(char::is_uppercase)
    }
}

// ============================================================================
// FILE AND DECLARATIONS
// ============================================================================

/// One Go source file.
#[derive(Debug, Clone, PartialEq)]
pub struct File {
    /// Comments above the package clause.
    pub doc: Vec<Comment>,
    pub package: Ident,
    pub decls: Vec<Decl>,
    /// Comments after the last declaration.
    pub trailing: Vec<Comment>,
}

impl File {
    /// All import specs, in declaration order.
    pub fn imports(&self) -> impl Iterator<Item = &ImportSpec> {
        self.decls
            .iter()
            .filter_map(|decl| match decl {
                Decl::Gen(gen_decl) if gen_decl.keyword == DeclKeyword::Import => {
                    Some(gen_decl.specs.iter())
                }
                _ => None,
            })
            .flatten()
            .filter_map(|spec| match spec {
                Spec::Import(import) => Some(import),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Decl {
    Gen(GenDecl),
    Func(FuncDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclKeyword {
    Import,
    Const,
    Type,
    Var,
}

impl DeclKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Import => "import",
            Self::Const => "const",
            Self::Type => "type",
            Self::Var => "var",
        }
    }
}

/// `import`, `const`, `type` or `var` declaration, grouped or single.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub doc: Vec<Comment>,
    pub keyword: DeclKeyword,
    /// Written with parentheses.
    pub grouped: bool,
    pub specs: Vec<Spec>,
    pub pos: Option<TextSize>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub doc: Vec<Comment>,
    pub name: Option<Ident>,
    pub path: BasicLit,
    pub comment: Option<Comment>,
}

impl ImportSpec {
    /// The import path without quotes.
    pub fn path_value(&self) -> &str {
        self.path.value.trim_matches(|c| c == '"' || c == '`')
    }
}

/// `const` or `var` spec.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub doc: Vec<Comment>,
    pub names: Vec<Ident>,
    pub ty: Option<Expr>,
    pub values: Vec<Expr>,
    pub comment: Option<Comment>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub doc: Vec<Comment>,
    pub name: Ident,
    /// `type A = B`
    pub alias: bool,
    pub ty: Expr,
    pub comment: Option<Comment>,
}

impl TypeSpec {
    pub fn is_struct(&self) -> bool {
        matches!(self.ty, Expr::StructType(_))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub doc: Vec<Comment>,
    pub recv: Option<FieldList>,
    pub name: Ident,
    pub ty: FuncType,
    pub body: Option<Block>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FuncType {
    pub params: FieldList,
    pub results: Option<FieldList>,
}

/// Parameter, result, struct field or interface method list.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub fields: Vec<Field>,
    /// Comments before the closing delimiter.
    pub end_comments: Vec<Comment>,
}

impl FieldList {
    /// Number of declared names, counting unnamed entries once.
    pub fn arity(&self) -> usize {
        self.fields.iter().map(|f| f.names.len().max(1)).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub doc: Vec<Comment>,
    /// Empty for embedded fields and unnamed parameters.
    pub names: Vec<Ident>,
    pub ty: Expr,
    pub tag: Option<BasicLit>,
    pub comment: Option<Comment>,
}

impl Field {
    /// The name an embedded field is accessed by: the type name without
    /// pointer or package qualifier.
    pub fn embedded_name(&self) -> Option<&str> {
        if !self.names.is_empty() {
            return None;
        }
        let mut ty = &self.ty;
        loop {
            match ty {
                Expr::Star(inner) => ty = inner,
                Expr::Ident(ident) => return ident.name.rsplit('.').next(),
                Expr::Selector(selector) => return Some(selector.sel.name.as_str()),
                _ => return None,
            }
        }
    }

    /// Check if this field declares (or embeds) the given name.
    pub fn declares(&self, name: &str) -> bool {
        self.names.iter().any(|ident| ident.name == name) || self.embedded_name() == Some(name)
    }
}

// ============================================================================
// STATEMENTS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// Comments before the closing brace.
    pub end_comments: Vec<Comment>,
}

/// A statement with its attached comments.
#[derive(Debug, Clone, PartialEq)]
pub struct Stmt {
    pub doc: Vec<Comment>,
    pub kind: StmtKind,
    pub comment: Option<Comment>,
}

impl Stmt {
    pub fn new(kind: StmtKind) -> Self {
        Self {
            doc: Vec::new(),
            kind,
            comment: None,
        }
    }
}

impl From<StmtKind> for Stmt {
    fn from(kind: StmtKind) -> Self {
        Self::new(kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum StmtKind {
    Decl(GenDecl),
    Empty,
    Labeled {
        label: Ident,
        stmt: Box<Stmt>,
    },
    Expr(Expr),
    Send {
        chan: Expr,
        value: Expr,
    },
    IncDec {
        x: Expr,
        inc: bool,
    },
    Assign(AssignStmt),
    Go(Expr),
    Defer(Expr),
    Return(ReturnStmt),
    Branch {
        keyword: BranchKeyword,
        label: Option<Ident>,
    },
    Block(Block),
    If(IfStmt),
    Switch(SwitchStmt),
    TypeSwitch(TypeSwitchStmt),
    Select(Vec<CommClause>),
    For(ForStmt),
    Range(RangeStmt),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `:=`
    Define,
    Add,
    Sub,
    Mul,
    Quo,
    Rem,
    And,
    Or,
    Xor,
    Shl,
    Shr,
    AndNot,
}

impl AssignOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Assign => "=",
            Self::Define => ":=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Quo => "/=",
            Self::Rem => "%=",
            Self::And => "&=",
            Self::Or => "|=",
            Self::Xor => "^=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
            Self::AndNot => "&^=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignStmt {
    pub lhs: Vec<Expr>,
    pub op: AssignOp,
    pub rhs: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReturnStmt {
    pub results: Vec<Expr>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BranchKeyword {
    Break,
    Continue,
    Goto,
    Fallthrough,
}

impl BranchKeyword {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Break => "break",
            Self::Continue => "continue",
            Self::Goto => "goto",
            Self::Fallthrough => "fallthrough",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Expr,
    pub then: Block,
    /// Either another `If` or a `Block`.
    pub els: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SwitchStmt {
    pub init: Option<Box<Stmt>>,
    pub tag: Option<Expr>,
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSwitchStmt {
    pub init: Option<Box<Stmt>>,
    /// Variable bound by `v := x.(type)`.
    pub binding: Option<Ident>,
    /// The `x` of `x.(type)`.
    pub subject: Expr,
    pub clauses: Vec<CaseClause>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub doc: Vec<Comment>,
    /// `None` for `default`.
    pub list: Option<Vec<Expr>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CommClause {
    pub doc: Vec<Comment>,
    /// `None` for `default`.
    pub comm: Option<Box<Stmt>>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<Box<Stmt>>,
    pub cond: Option<Expr>,
    pub post: Option<Box<Stmt>>,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangeStmt {
    pub key: Option<Expr>,
    pub value: Option<Expr>,
    pub define: bool,
    pub x: Expr,
    pub body: Block,
}

// ============================================================================
// EXPRESSIONS AND TYPES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LitKind {
    Int,
    Float,
    Imag,
    Char,
    String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicLit {
    pub kind: LitKind,
    /// Source text, quotes included.
    pub value: SmolStr,
    pub pos: Option<TextSize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Pos,
    Neg,
    Not,
    Xor,
    Addr,
    Recv,
    Tilde,
}

impl UnaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pos => "+",
            Self::Neg => "-",
            Self::Not => "!",
            Self::Xor => "^",
            Self::Addr => "&",
            Self::Recv => "<-",
            Self::Tilde => "~",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    LogOr,
    LogAnd,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    Add,
    Sub,
    Or,
    Xor,
    Mul,
    Quo,
    Rem,
    Shl,
    Shr,
    And,
    AndNot,
}

impl BinaryOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LogOr => "||",
            Self::LogAnd => "&&",
            Self::Eq => "==",
            Self::Ne => "!=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Or => "|",
            Self::Xor => "^",
            Self::Mul => "*",
            Self::Quo => "/",
            Self::Rem => "%",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::And => "&",
            Self::AndNot => "&^",
        }
    }

    pub fn precedence(self) -> u8 {
        match self {
            Self::LogOr => 1,
            Self::LogAnd => 2,
            Self::Eq | Self::Ne | Self::Lt | Self::Le | Self::Gt | Self::Ge => 3,
            Self::Add | Self::Sub | Self::Or | Self::Xor => 4,
            _ => 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub x: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub x: Box<Expr>,
    pub op: BinaryOp,
    pub y: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompositeLit {
    /// Elided inside other composite literals.
    pub ty: Option<Box<Expr>>,
    pub elts: Vec<Expr>,
    /// One element per line when printed.
    pub multiline: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub fun: Box<Expr>,
    pub args: Vec<Expr>,
    /// `f(xs...)`
    pub ellipsis: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SelectorExpr {
    pub x: Box<Expr>,
    pub sel: Ident,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncLit {
    pub ty: FuncType,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ArrayLen {
    /// `[]T`
    Slice,
    /// `[...]T`
    Ellipsis,
    Fixed(Box<Expr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Ident(Ident),
    BasicLit(BasicLit),
    CompositeLit(CompositeLit),
    FuncLit(FuncLit),
    Paren(Box<Expr>),
    Selector(SelectorExpr),
    Index {
        x: Box<Expr>,
        index: Box<Expr>,
    },
    Slice {
        x: Box<Expr>,
        low: Option<Box<Expr>>,
        high: Option<Box<Expr>>,
        max: Option<Box<Expr>>,
    },
    /// `x.(T)`, or `x.(type)` when `ty` is `None`.
    TypeAssert {
        x: Box<Expr>,
        ty: Option<Box<Expr>>,
    },
    Call(CallExpr),
    /// Pointer type or dereference.
    Star(Box<Expr>),
    Unary(UnaryExpr),
    Binary(BinaryExpr),
    KeyValue {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ArrayType {
        len: ArrayLen,
        elem: Box<Expr>,
    },
    MapType {
        key: Box<Expr>,
        value: Box<Expr>,
    },
    ChanType {
        dir: ChanDir,
        value: Box<Expr>,
    },
    FuncType(FuncType),
    StructType(FieldList),
    InterfaceType(FieldList),
    /// `...T` in a parameter list.
    Ellipsis(Box<Expr>),
}

impl Expr {
    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Strip any number of enclosing parentheses.
    pub fn unparen(&self) -> &Expr {
        match self {
            Expr::Paren(inner) => inner.unparen(),
            other => other,
        }
    }
}

impl From<Ident> for Expr {
    fn from(ident: Ident) -> Self {
        Expr::Ident(ident)
    }
}
