//! Core type definition module
//!
//! Request and outcome types shared by the load balancer and the model selector.

pub mod request;

pub use request::{AIRequest, DEFAULT_QUALITY_TIER, QUALITY_TIER_KEY, RequestOutcome};
