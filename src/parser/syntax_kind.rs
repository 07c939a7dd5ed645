//! Token kinds for the Go front end
//!
//! The parser only ever sees significant tokens; comments travel on a side
//! channel and whitespace is dropped by the lexer.

/// All token kinds produced by the lexer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    NEWLINE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,
    INT,
    FLOAT,
    IMAG,
    CHAR,
    STRING,

    // =========================================================================
    // OPERATORS
    // =========================================================================
    PLUS,         // +
    MINUS,        // -
    STAR,         // *
    SLASH,        // /
    PERCENT,      // %
    AMP,          // &
    PIPE,         // |
    CARET,        // ^
    SHL,          // <<
    SHR,          // >>
    AMP_CARET,    // &^
    PLUS_EQ,      // +=
    MINUS_EQ,     // -=
    STAR_EQ,      // *=
    SLASH_EQ,     // /=
    PERCENT_EQ,   // %=
    AMP_EQ,       // &=
    PIPE_EQ,      // |=
    CARET_EQ,     // ^=
    SHL_EQ,       // <<=
    SHR_EQ,       // >>=
    AMP_CARET_EQ, // &^=
    AMP_AMP,      // &&
    PIPE_PIPE,    // ||
    ARROW,        // <-
    PLUS_PLUS,    // ++
    MINUS_MINUS,  // --
    EQ_EQ,        // ==
    LT,           // <
    GT,           // >
    EQ,           // =
    BANG,         // !
    TILDE,        // ~
    BANG_EQ,      // !=
    LT_EQ,        // <=
    GT_EQ,        // >=
    COLON_EQ,     // :=
    ELLIPSIS,     // ...

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,
    R_PAREN,
    L_BRACKET,
    R_BRACKET,
    L_BRACE,
    R_BRACE,
    COMMA,
    SEMICOLON,
    DOT,
    COLON,

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    BREAK_KW,
    CASE_KW,
    CHAN_KW,
    CONST_KW,
    CONTINUE_KW,
    DEFAULT_KW,
    DEFER_KW,
    ELSE_KW,
    FALLTHROUGH_KW,
    FOR_KW,
    FUNC_KW,
    GO_KW,
    GOTO_KW,
    IF_KW,
    IMPORT_KW,
    INTERFACE_KW,
    MAP_KW,
    PACKAGE_KW,
    RANGE_KW,
    RETURN_KW,
    SELECT_KW,
    STRUCT_KW,
    SWITCH_KW,
    TYPE_KW,
    VAR_KW,

    // =========================================================================
    // SPECIAL
    // =========================================================================
    ERROR,
    EOF,
}

impl SyntaxKind {
    /// Check if this is trivia (newlines and comments)
    pub fn is_trivia(self) -> bool {
        matches!(self, Self::NEWLINE | Self::LINE_COMMENT | Self::BLOCK_COMMENT)
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::BREAK_KW as u16) && (self as u16) <= (Self::VAR_KW as u16)
    }

    /// Check if a newline after this token terminates the statement.
    pub fn ends_statement(self) -> bool {
        matches!(
            self,
            Self::IDENT
                | Self::INT
                | Self::FLOAT
                | Self::IMAG
                | Self::CHAR
                | Self::STRING
                | Self::BREAK_KW
                | Self::CONTINUE_KW
                | Self::FALLTHROUGH_KW
                | Self::RETURN_KW
                | Self::PLUS_PLUS
                | Self::MINUS_MINUS
                | Self::R_PAREN
                | Self::R_BRACKET
                | Self::R_BRACE
        )
    }

    /// Check if this is an assignment operator (`=`, `:=` or `op=`)
    pub fn is_assign_op(self) -> bool {
        matches!(
            self,
            Self::EQ
                | Self::COLON_EQ
                | Self::PLUS_EQ
                | Self::MINUS_EQ
                | Self::STAR_EQ
                | Self::SLASH_EQ
                | Self::PERCENT_EQ
                | Self::AMP_EQ
                | Self::PIPE_EQ
                | Self::CARET_EQ
                | Self::SHL_EQ
                | Self::SHR_EQ
                | Self::AMP_CARET_EQ
        )
    }

    /// Binary operator precedence as defined by the Go grammar, 0 when the
    /// token is not a binary operator.
    pub fn binary_precedence(self) -> u8 {
        match self {
            Self::PIPE_PIPE => 1,
            Self::AMP_AMP => 2,
            Self::EQ_EQ | Self::BANG_EQ | Self::LT | Self::LT_EQ | Self::GT | Self::GT_EQ => 3,
            Self::PLUS | Self::MINUS | Self::PIPE | Self::CARET => 4,
            Self::STAR
            | Self::SLASH
            | Self::PERCENT
            | Self::SHL
            | Self::SHR
            | Self::AMP
            | Self::AMP_CARET => 5,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_range() {
        assert!(SyntaxKind::BREAK_KW.is_keyword());
        assert!(SyntaxKind::VAR_KW.is_keyword());
        assert!(SyntaxKind::FUNC_KW.is_keyword());
        assert!(!SyntaxKind::IDENT.is_keyword());
        assert!(!SyntaxKind::ERROR.is_keyword());
    }

    #[test]
    fn test_precedence_order() {
        assert!(SyntaxKind::STAR.binary_precedence() > SyntaxKind::PLUS.binary_precedence());
        assert!(SyntaxKind::PLUS.binary_precedence() > SyntaxKind::EQ_EQ.binary_precedence());
        assert!(SyntaxKind::AMP_AMP.binary_precedence() > SyntaxKind::PIPE_PIPE.binary_precedence());
        assert_eq!(SyntaxKind::ARROW.binary_precedence(), 0);
    }
}
