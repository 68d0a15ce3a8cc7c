//! Panel module tests
//!
//! - Export panel gating, deferred enablement and conflict warnings
//! - New library dialog naming and creation

#[cfg(test)]
mod controller_tests;
#[cfg(test)]
mod library_dialog_tests;
