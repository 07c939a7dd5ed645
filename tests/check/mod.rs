//! Check layer tests
//!
//! Batch verification and diagnostic-driven repair over real directories.

mod tests_heal;
mod tests_verifier;
