//! Go front end
//!
//! ```text
//! Source Text
//!     ↓
//! Lexer (logos) → Tokens with SyntaxKind, semicolons inserted, comments aside
//!     ↓
//! Parser → owned syntax::ast::File
//! ```
//!
//! The tree is owned rather than lossless: rewrites mutate it in place and
//! [`crate::syntax::printer`] renders it back in canonical layout.

#[allow(clippy::module_inception)]
mod parser;

mod lexer;
mod syntax_kind;

pub use lexer::{Lexed, Lexer, Token, lex};
pub use parser::{SyntaxError, parse};
pub use syntax_kind::SyntaxKind;
