//! Semantic verification and self-healing.
//!
//! The verifier checks the whole working set as one package and reports the
//! first undefined name; the healing loop qualifies that name with the
//! origin package and verifies again.

mod diagnostic;
mod heal;
mod resolver;
mod scope;
mod verify;

pub use diagnostic::Diagnostic;
pub use heal::{HealStep, SelfHealingLoop};
pub use resolver::{Resolver, Unresolved, first_undefined};
pub use scope::{FileScope, LocalScopes, PackageScope, import_name};
pub use verify::{SemanticAnalyzer, SemanticVerifier, UndefinedNameAnalyzer};
