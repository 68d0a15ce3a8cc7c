//! Core module tests
//!
//! Contains test suites for core functionality:
//! - Field completeness tests
//! - Label construction and validation tests
//! - Export path resolution and safe-write tests

#[cfg(test)]
mod resolver_tests;
