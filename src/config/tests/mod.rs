//! Config module tests
//!
//! - Settings file loading fallbacks and rewrites
//! - Persistent store behaviour
