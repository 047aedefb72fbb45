use crate::error::{Result, SimulationError};
use crate::neighborhood::NeighborCounts;
use segregation_common::config::MOORE_NEIGHBORS;

/// True if `different <= threshold * total`. An agent with no occupied neighbors is always satisfied.
#[inline(always)]
pub fn is_satisfied(same: u32, total: u32, threshold: f64) -> bool {
    let different = total.saturating_sub(same);
    f64::from(different) <= threshold * f64::from(total)
}

/// [`is_satisfied`] applied to a neighbor count pair.
#[inline(always)]
pub fn counts_satisfied(counts: NeighborCounts, threshold: f64) -> bool {
    is_satisfied(counts.same, counts.total, threshold)
}

/// Converts a tolerated number of dissimilar neighbors (out of 8) into a threshold fraction.
pub fn threshold_from_neighbors(max_dissimilar: f64) -> f64 {
    max_dissimilar / MOORE_NEIGHBORS
}

/// Checks that `threshold` is a finite fraction in `[0, 1]`.
///
/// `1.0` is accepted: `different <= total` always holds, so every agent starts satisfied.
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(SimulationError::InvalidConfiguration(format!(
            "threshold must be within [0, 1], got {}",
            threshold
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn isolated_agent_is_always_satisfied() {
        for t in [0.0, 0.125, 0.5, 0.99, 1.0] {
            assert!(is_satisfied(0, 0, t));
        }
    }

    #[test]
    fn zero_threshold_requires_all_matching() {
        assert!(is_satisfied(3, 3, 0.0));
        assert!(!is_satisfied(2, 3, 0.0));
    }

    #[test]
    fn boundary_is_inclusive() {
        // 2 different out of 8 with T = 2/8 sits exactly on the limit.
        assert!(is_satisfied(6, 8, 0.25));
        assert!(!is_satisfied(5, 8, 0.25));
        assert!(is_satisfied(0, 8, 1.0));
    }

    #[test]
    fn reference_threshold_tolerates_one_of_eight() {
        let t = threshold_from_neighbors(1.25);
        assert!((t - 0.15625).abs() < 1e-12);
        assert!(is_satisfied(7, 8, t));
        assert!(!is_satisfied(6, 8, t));
        assert!(counts_satisfied(NeighborCounts { same: 4, total: 5 }, 0.2));
    }

    #[test]
    fn threshold_range_is_checked() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(matches!(validate_threshold(-0.1), Err(SimulationError::InvalidConfiguration(_))));
        assert!(validate_threshold(1.5).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
        assert!(validate_threshold(f64::INFINITY).is_err());
    }
}
