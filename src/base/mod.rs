//! Foundation types shared by every layer of the sync engine.
//!
//! - [`Position`] - 1-based line/column as reported by Go tooling
//! - [`LineIndex`] - byte offset ↔ line/column conversion
//! - [`TextSize`], [`TextRange`] - byte offsets into a source file
//!
//! This module has NO dependencies on other aggsync modules.

mod position;

pub use position::{LineIndex, Position};

pub use text_size::{TextRange, TextSize};
