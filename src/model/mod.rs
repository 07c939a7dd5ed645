//! Typed, mutable views over a parsed Go file.
//!
//! Decorators borrow the node they wrap and edit it in place; nothing here
//! copies the tree or knows about naming policy.

mod declarations;
mod expressions;
mod locate;
mod source;

pub use declarations::{Function, FunctionBody, StructureDeclaration};
pub use expressions::{CompositeLiteral, ReturnStatement, UnaryExpression};
pub use locate::PatternLocator;
pub use source::{PositionIndex, SourceUnit};
