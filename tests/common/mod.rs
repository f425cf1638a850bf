//! Common test utilities for adaptive-router
//!
//! - Test fixtures and data factories
//! - Provider behaviour helpers
//! - Custom assertions and helpers

pub mod assertions;
pub mod fixtures;
pub mod providers;

// Re-export commonly used items
pub use fixtures::{ProviderSetFactory, RequestFactory, SelectorFactory};
pub use providers::{drive_failing, drive_healthy, selection_counts};

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
