//! Logos-based lexer for Go
//!
//! Fast tokenization using the logos crate, followed by the automatic
//! semicolon insertion pass the Go grammar relies on.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use text_size::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

impl Token<'_> {
    /// Offset one past the last byte of the token
    pub fn end(&self) -> TextSize {
        self.offset + TextSize::of(self.text)
    }
}

/// Lexer wrapping the logos-generated tokenizer
///
/// Yields every token, trivia included.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.inner.span().start as u32);

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Significant tokens plus the comments found between them
#[derive(Debug, Clone, Default)]
pub struct Lexed<'a> {
    pub tokens: Vec<Token<'a>>,
    pub comments: Vec<Token<'a>>,
}

/// Tokenize an entire string, inserting semicolons where Go does.
///
/// A semicolon is inserted at a newline (or a comment spanning one) and at
/// end of input when the previous significant token can end a statement.
/// Inserted semicolons carry the text `"\n"`, or `""` at end of input.
pub fn lex(input: &str) -> Lexed<'_> {
    let mut lexed = Lexed::default();
    let mut pending_semi = false;

    for token in Lexer::new(input) {
        match token.kind {
            SyntaxKind::NEWLINE => {
                if pending_semi {
                    lexed.tokens.push(auto_semicolon(token.offset, "\n"));
                    pending_semi = false;
                }
            }
            SyntaxKind::LINE_COMMENT | SyntaxKind::BLOCK_COMMENT => {
                let spans_line =
                    token.kind == SyntaxKind::BLOCK_COMMENT && token.text.contains('\n');
                lexed.comments.push(token.clone());
                if pending_semi && spans_line {
                    lexed.tokens.push(auto_semicolon(token.offset, "\n"));
                    pending_semi = false;
                }
            }
            kind => {
                pending_semi = kind.ends_statement();
                lexed.tokens.push(token);
            }
        }
    }

    if pending_semi {
        lexed.tokens.push(auto_semicolon(TextSize::of(input), ""));
    }
    lexed
}

fn auto_semicolon(offset: TextSize, text: &'static str) -> Token<'static> {
    Token {
        kind: SyntaxKind::SEMICOLON,
        text,
        offset,
    }
}

/// Consume a block comment up to and including the first `*/`.
///
/// An unterminated comment swallows the rest of the input and lexes as an
/// error.
fn block_comment(lex: &mut logos::Lexer<'_, LogosToken>) -> bool {
    let rest = lex.remainder();
    match rest.find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            true
        }
        None => {
            lex.bump(rest.len());
            false
        }
    }
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\f]+")]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[token("\n")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("/*", block_comment)]
    BlockComment,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9_]+")]
    Float,

    #[regex(r"([0-9][0-9_]*|[0-9][0-9_]*\.[0-9_]*([eE][+-]?[0-9_]+)?|\.[0-9][0-9_]*([eE][+-]?[0-9_]+)?)i")]
    Imag,

    #[regex(r"'([^'\\\n]|\\[^\n])+'")]
    Char,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    #[regex(r"`[^`]*`")]
    String,

    // =========================================================================
    // MULTI-CHARACTER OPERATORS (longest match wins in logos)
    // =========================================================================
    #[token("&^=")]
    AmpCaretEq,
    #[token("<<=")]
    ShlEq,
    #[token(">>=")]
    ShrEq,
    #[token("...")]
    Ellipsis,
    #[token("&^")]
    AmpCaret,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,
    #[token("^=")]
    CaretEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,
    #[token("<-")]
    Arrow,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token(":=")]
    ColonEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Eq,
    #[token("!")]
    Bang,
    #[token("~")]
    Tilde,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    #[token("break")]
    BreakKw,
    #[token("case")]
    CaseKw,
    #[token("chan")]
    ChanKw,
    #[token("const")]
    ConstKw,
    #[token("continue")]
    ContinueKw,
    #[token("default")]
    DefaultKw,
    #[token("defer")]
    DeferKw,
    #[token("else")]
    ElseKw,
    #[token("fallthrough")]
    FallthroughKw,
    #[token("for")]
    ForKw,
    #[token("func")]
    FuncKw,
    #[token("go")]
    GoKw,
    #[token("goto")]
    GotoKw,
    #[token("if")]
    IfKw,
    #[token("import")]
    ImportKw,
    #[token("interface")]
    InterfaceKw,
    #[token("map")]
    MapKw,
    #[token("package")]
    PackageKw,
    #[token("range")]
    RangeKw,
    #[token("return")]
    ReturnKw,
    #[token("select")]
    SelectKw,
    #[token("struct")]
    StructKw,
    #[token("switch")]
    SwitchKw,
    #[token("type")]
    TypeKw,
    #[token("var")]
    VarKw,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        match token {
            LogosToken::Newline => SyntaxKind::NEWLINE,
            LogosToken::LineComment => SyntaxKind::LINE_COMMENT,
            LogosToken::BlockComment => SyntaxKind::BLOCK_COMMENT,

            LogosToken::Ident => SyntaxKind::IDENT,
            LogosToken::Int => SyntaxKind::INT,
            LogosToken::Float => SyntaxKind::FLOAT,
            LogosToken::Imag => SyntaxKind::IMAG,
            LogosToken::Char => SyntaxKind::CHAR,
            LogosToken::String => SyntaxKind::STRING,

            LogosToken::AmpCaretEq => SyntaxKind::AMP_CARET_EQ,
            LogosToken::ShlEq => SyntaxKind::SHL_EQ,
            LogosToken::ShrEq => SyntaxKind::SHR_EQ,
            LogosToken::Ellipsis => SyntaxKind::ELLIPSIS,
            LogosToken::AmpCaret => SyntaxKind::AMP_CARET,
            LogosToken::Shl => SyntaxKind::SHL,
            LogosToken::Shr => SyntaxKind::SHR,
            LogosToken::PlusEq => SyntaxKind::PLUS_EQ,
            LogosToken::MinusEq => SyntaxKind::MINUS_EQ,
            LogosToken::StarEq => SyntaxKind::STAR_EQ,
            LogosToken::SlashEq => SyntaxKind::SLASH_EQ,
            LogosToken::PercentEq => SyntaxKind::PERCENT_EQ,
            LogosToken::AmpEq => SyntaxKind::AMP_EQ,
            LogosToken::PipeEq => SyntaxKind::PIPE_EQ,
            LogosToken::CaretEq => SyntaxKind::CARET_EQ,
            LogosToken::AmpAmp => SyntaxKind::AMP_AMP,
            LogosToken::PipePipe => SyntaxKind::PIPE_PIPE,
            LogosToken::Arrow => SyntaxKind::ARROW,
            LogosToken::PlusPlus => SyntaxKind::PLUS_PLUS,
            LogosToken::MinusMinus => SyntaxKind::MINUS_MINUS,
            LogosToken::EqEq => SyntaxKind::EQ_EQ,
            LogosToken::BangEq => SyntaxKind::BANG_EQ,
            LogosToken::LtEq => SyntaxKind::LT_EQ,
            LogosToken::GtEq => SyntaxKind::GT_EQ,
            LogosToken::ColonEq => SyntaxKind::COLON_EQ,

            LogosToken::Plus => SyntaxKind::PLUS,
            LogosToken::Minus => SyntaxKind::MINUS,
            LogosToken::Star => SyntaxKind::STAR,
            LogosToken::Slash => SyntaxKind::SLASH,
            LogosToken::Percent => SyntaxKind::PERCENT,
            LogosToken::Amp => SyntaxKind::AMP,
            LogosToken::Pipe => SyntaxKind::PIPE,
            LogosToken::Caret => SyntaxKind::CARET,
            LogosToken::Lt => SyntaxKind::LT,
            LogosToken::Gt => SyntaxKind::GT,
            LogosToken::Eq => SyntaxKind::EQ,
            LogosToken::Bang => SyntaxKind::BANG,
            LogosToken::Tilde => SyntaxKind::TILDE,
            LogosToken::LParen => SyntaxKind::L_PAREN,
            LogosToken::RParen => SyntaxKind::R_PAREN,
            LogosToken::LBracket => SyntaxKind::L_BRACKET,
            LogosToken::RBracket => SyntaxKind::R_BRACKET,
            LogosToken::LBrace => SyntaxKind::L_BRACE,
            LogosToken::RBrace => SyntaxKind::R_BRACE,
            LogosToken::Comma => SyntaxKind::COMMA,
            LogosToken::Semicolon => SyntaxKind::SEMICOLON,
            LogosToken::Dot => SyntaxKind::DOT,
            LogosToken::Colon => SyntaxKind::COLON,

            LogosToken::BreakKw => SyntaxKind::BREAK_KW,
            LogosToken::CaseKw => SyntaxKind::CASE_KW,
            LogosToken::ChanKw => SyntaxKind::CHAN_KW,
            LogosToken::ConstKw => SyntaxKind::CONST_KW,
            LogosToken::ContinueKw => SyntaxKind::CONTINUE_KW,
            LogosToken::DefaultKw => SyntaxKind::DEFAULT_KW,
            LogosToken::DeferKw => SyntaxKind::DEFER_KW,
            LogosToken::ElseKw => SyntaxKind::ELSE_KW,
            LogosToken::FallthroughKw => SyntaxKind::FALLTHROUGH_KW,
            LogosToken::ForKw => SyntaxKind::FOR_KW,
            LogosToken::FuncKw => SyntaxKind::FUNC_KW,
            LogosToken::GoKw => SyntaxKind::GO_KW,
            LogosToken::GotoKw => SyntaxKind::GOTO_KW,
            LogosToken::IfKw => SyntaxKind::IF_KW,
            LogosToken::ImportKw => SyntaxKind::IMPORT_KW,
            LogosToken::InterfaceKw => SyntaxKind::INTERFACE_KW,
            LogosToken::MapKw => SyntaxKind::MAP_KW,
            LogosToken::PackageKw => SyntaxKind::PACKAGE_KW,
            LogosToken::RangeKw => SyntaxKind::RANGE_KW,
            LogosToken::ReturnKw => SyntaxKind::RETURN_KW,
            LogosToken::SelectKw => SyntaxKind::SELECT_KW,
            LogosToken::StructKw => SyntaxKind::STRUCT_KW,
            LogosToken::SwitchKw => SyntaxKind::SWITCH_KW,
            LogosToken::TypeKw => SyntaxKind::TYPE_KW,
            LogosToken::VarKw => SyntaxKind::VAR_KW,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        lex(input).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_lex_package_clause() {
        assert_eq!(
            kinds("package foo\n"),
            vec![SyntaxKind::PACKAGE_KW, SyntaxKind::IDENT, SyntaxKind::SEMICOLON]
        );
    }

    #[test]
    fn test_semicolon_inserted_at_eof() {
        let lexed = lex("return x");
        let last = lexed.tokens.last().unwrap();
        assert_eq!(last.kind, SyntaxKind::SEMICOLON);
        assert_eq!(last.text, "");
    }

    #[test]
    fn test_no_semicolon_after_operator() {
        assert_eq!(
            kinds("a +\nb"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::PLUS,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON
            ]
        );
    }

    #[test]
    fn test_comments_go_to_side_channel() {
        let lexed = lex("x := 1 // one\n/* two */ y");
        assert_eq!(lexed.comments.len(), 2);
        assert_eq!(lexed.comments[0].text, "// one");
        assert!(lexed.tokens.iter().all(|t| !t.kind.is_trivia()));
        // the line comment does not swallow the newline, so `1` still ends the line
        assert_eq!(lexed.tokens[3].kind, SyntaxKind::SEMICOLON);
    }

    #[test]
    fn test_multiline_block_comment_acts_as_newline() {
        assert_eq!(
            kinds("x /* a\nb */ y"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON
            ]
        );
    }

    #[test]
    fn test_block_comment_closed_by_run_of_stars() {
        let lexed = lex("/** doc **/ x /* a * b */");
        let texts: Vec<_> = lexed.comments.iter().map(|c| c.text).collect();
        assert_eq!(texts, vec!["/** doc **/", "/* a * b */"]);
        assert_eq!(kinds("/** doc **/ x"), vec![SyntaxKind::IDENT, SyntaxKind::SEMICOLON]);
    }

    #[test]
    fn test_unterminated_block_comment_is_error() {
        let lexed = lex("x /* never closed");
        assert_eq!(lexed.tokens[1].kind, SyntaxKind::ERROR);
        assert_eq!(lexed.tokens[1].text, "/* never closed");
    }

    #[test]
    fn test_literals() {
        assert_eq!(
            kinds(r#"42 0x1F 3.14 .5 1e9 2i 'a' '\n' "s\"q" `raw`"#)[..10],
            [
                SyntaxKind::INT,
                SyntaxKind::INT,
                SyntaxKind::FLOAT,
                SyntaxKind::FLOAT,
                SyntaxKind::FLOAT,
                SyntaxKind::IMAG,
                SyntaxKind::CHAR,
                SyntaxKind::CHAR,
                SyntaxKind::STRING,
                SyntaxKind::STRING,
            ]
        );
    }

    #[test]
    fn test_longest_operator_wins() {
        assert_eq!(
            kinds("a &^= b <<= c ... d := e <- f"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::AMP_CARET_EQ,
                SyntaxKind::IDENT,
                SyntaxKind::SHL_EQ,
                SyntaxKind::IDENT,
                SyntaxKind::ELLIPSIS,
                SyntaxKind::IDENT,
                SyntaxKind::COLON_EQ,
                SyntaxKind::IDENT,
                SyntaxKind::ARROW,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON
            ]
        );
    }

    #[test]
    fn test_keywords_are_not_identifiers() {
        assert_eq!(kinds("func")[0], SyntaxKind::FUNC_KW);
        assert_eq!(kinds("funcs")[0], SyntaxKind::IDENT);
        assert_eq!(kinds("gopher")[0], SyntaxKind::IDENT);
    }

    #[test]
    fn test_token_offsets() {
        let lexed = lex("var  x");
        assert_eq!(lexed.tokens[1].offset, TextSize::new(5));
        assert_eq!(lexed.tokens[1].end(), TextSize::new(6));
    }
}
