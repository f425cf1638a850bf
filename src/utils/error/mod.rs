//! Error handling for the router
//!
//! Selection never fails: only configuration loading and persistence surface
//! errors. Everything else degrades to a documented default.

mod helpers;
mod types;


pub use types::{Result, RouterError};
