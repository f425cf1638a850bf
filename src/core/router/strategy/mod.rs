//! Routing strategies for provider selection
//!
//! This module ranks the providers that survived filtering. Filtering itself
//! (circuit breakers, capabilities, health floor) lives in the load balancer.

mod executor;
mod selection;
pub mod types;

pub use executor::StrategyExecutor;
pub use types::{Candidate, Strategy};
