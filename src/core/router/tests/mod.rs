//! Router tests module
//!
//! Behaviour tests for the load balancer across strategies and failure modes.
