//! Shared fixtures for integration tests.

pub mod go_fixtures;
pub mod workspace;
