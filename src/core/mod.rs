//! Core routing logic
//!
//! - `router`: provider health, circuit breaking and load balancing
//! - `selector`: per-provider model selection with a UCB1 bandit
//! - `pipeline`: both, composed in request order
//! - `types`: requests and outcomes shared by all of the above

pub mod pipeline;
pub mod router;
pub mod selector;
pub mod types;
