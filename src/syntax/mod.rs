//! Owned Go syntax tree with builders, traversal and a printer.

pub mod ast;
pub mod make;
pub mod printer;
pub mod walk;

pub use ast::*;
pub use printer::print_file;
