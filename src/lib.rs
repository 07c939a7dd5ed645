//! # aggsync
//!
//! Keeps a generated Go aggregation package in sync with an upstream library.
//! Exported upstream files are parsed, rewritten to wrap each aggregation in
//! an injectable or non-injectable helper, then repaired until every name
//! they use resolves.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! project   → Directory layout, lookup table emission, full run
//!   ↓
//! check     → Semantic verification and self-healing
//!   ↓
//! rewrite   → Strategies and the per-file transform pipeline
//!   ↓
//! model     → Typed mutable views, pattern locator, source units
//!   ↓
//! syntax    → Owned Go AST, builders, printer, mutable walker
//!   ↓
//! parser    → Logos lexer, recursive-descent parser
//!   ↓
//! base      → Primitives (Position, LineIndex, TextSize)
//! ```

// ============================================================================
// MODULES (dependency order: base → parser → syntax → model → rewrite → check → project)
// ============================================================================

/// Foundation types: Position, LineIndex, TextRange
pub mod base;

/// Parser: Logos lexer with semicolon insertion, recursive-descent parser
pub mod parser;

/// Syntax: owned AST, node builders, printer
pub mod syntax;

/// Decorators over parsed files and the pattern locator
pub mod model;

/// Wrapping strategies and the file transform pipeline
pub mod rewrite;

/// Identifier resolution, diagnostics and the healing loop
pub mod check;

/// Filesystem collaborators and the package updater
pub mod project;

/// Run configuration
pub mod config;

/// Error types
pub mod error;

// Re-export commonly needed items
pub use base::{LineIndex, Position, TextRange, TextSize};
pub use check::{Diagnostic, HealStep, SelfHealingLoop, SemanticAnalyzer, SemanticVerifier};
pub use config::SyncConfig;
pub use error::{IoOp, Result, SyncError};
pub use model::{PatternLocator, SourceUnit};
pub use project::{PackageUpdater, UpdateReport};
pub use rewrite::{FileTransformPipeline, Strategy, SyncRecord};
