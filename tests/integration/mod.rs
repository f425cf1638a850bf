//! Integration tests for adaptive-router
//!
//! These tests verify the interaction between multiple components and test
//! real system behavior without mocking.

pub mod concurrency_tests;
pub mod config_tests;
pub mod persistence_tests;
pub mod router_tests;
pub mod selector_tests;
