//! Configuration validation
//!
//! The validation is organized into several submodules:
//! - `trait_def`: Core Validate trait definition
//! - `router_validators`: Load balancer, circuit breaker and health validators
//! - `selector_validators`: Model selector validators
//! - `tests`: Test suite for all validators

mod router_validators;
mod selector_validators;
mod trait_def;

pub use trait_def::Validate;
