//! Model layer tests
//!
//! Decorators, pattern location and source units over parsed files.

mod tests_locator;
mod tests_source_unit;
