//! Project layer tests
//!
//! Configuration loading and complete sync runs over temporary layouts.

mod tests_config;
mod tests_updater;
