//! Rewrite layer tests
//!
//! Strategy selection, structure enrichment, constructor normalisation and
//! the per-file pipeline.

mod tests_pipeline;
mod tests_strategy;
