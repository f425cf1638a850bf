//! Custom test assertions
//!
//! Provides domain-specific assertions for testing adaptive-router components.

use adaptive_router::ProviderStats;

/// Assertions for provider statistics
pub trait ProviderStatsAssertions {
    /// Assert every score lies in `[0, 1]`
    fn assert_scores_bounded(&self);

    /// Assert reliability equals successes over total requests
    fn assert_reliability_consistent(&self);
}

impl ProviderStatsAssertions for ProviderStats {
    fn assert_scores_bounded(&self) {
        for (label, score) in [
            ("health", self.health_score),
            ("availability", self.availability_score),
            ("reliability", self.reliability_score),
            ("ewma_latency", self.ewma_latency),
        ] {
            assert!(
                (0.0..=1.0).contains(&score),
                "{} score {} out of range for {}",
                label,
                score,
                self.name
            );
        }
    }

    fn assert_reliability_consistent(&self) {
        if self.total_requests > 0 {
            let expected = self.success_count as f64 / self.total_requests as f64;
            assert!(
                (self.reliability_score - expected).abs() < 1e-12,
                "reliability {} != {}",
                self.reliability_score,
                expected
            );
        }
    }
}

/// Assert two values are approximately equal (for floats)
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr) => {
        assert_approx_eq!($left, $right, 1e-6_f64)
    };
    ($left:expr, $right:expr, $epsilon:expr) => {
        let left_val: f64 = $left as f64;
        let right_val: f64 = $right as f64;
        let diff = (left_val - right_val).abs();
        assert!(
            diff < $epsilon,
            "assertion failed: `(left ~ right)`\n  left: `{:?}`,\n right: `{:?}`,\n  diff: `{:?}` (epsilon: `{:?}`)",
            left_val,
            right_val,
            diff,
            $epsilon
        );
    };
}

/// Assert a collection contains an item matching a predicate
#[macro_export]
macro_rules! assert_contains {
    ($collection:expr, $predicate:expr) => {
        assert!(
            $collection.iter().any($predicate),
            "no item in `{}` matched the predicate",
            stringify!($collection)
        );
    };
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_approx_eq_macro() {
        assert_approx_eq!(1.0, 1.0);
        assert_approx_eq!(1.0, 1.0000001);
        assert_approx_eq!(0.1 + 0.2, 0.3, 1e-10_f64);
    }

    #[test]
    #[should_panic(expected = "assertion failed")]
    fn test_approx_eq_failure() {
        assert_approx_eq!(1.0, 2.0);
    }

    #[test]
    fn test_contains_macro() {
        let items = [1, 2, 3, 4, 5];
        assert_contains!(items, |&x| x == 3);
    }
}
