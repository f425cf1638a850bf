//! Utility modules for the router
//!
//! - **error**: Error type and result alias
//! - **logging**: Subscriber installation for binaries and tests

pub mod error;
pub mod logging;

/// Clamp a score into `[0, 1]`, mapping NaN to 0
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Normalize `value` against `ceiling` into `[0, 1]`
///
/// A non-positive ceiling saturates everything above zero.
pub fn normalize(value: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return if value > 0.0 { 1.0 } else { 0.0 };
    }
    clamp01(value / ceiling)
}
