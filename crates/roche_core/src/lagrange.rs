//! The three collinear Lagrangian points of the binary.
//!
//! Each point is a root of the axial derivative of the corotating
//! effective potential, confined to its own bracket: L1 strictly between
//! the stars, L2 beyond the secondary, L3 on the far side of the primary.
//! For q > 0 a sign change always exists across each bracket, so plain
//! bisection suffices.

use crate::error::{Result, RocheError};
use crate::potential::axis_potential_slope;
use crate::solvers::bisect;

const EDGE: f64 = 1e-7;
const TOL: f64 = 1e-13;

/// x-coordinate of the inner Lagrangian point, strictly inside (0, 1).
/// Decreases monotonically with q: a heavier secondary pulls the saddle
/// toward the primary, with l1(1) = 1/2 by symmetry.
pub fn l1(q: f64) -> Result<f64> {
    validate(q)?;
    Ok(l1_unchecked(q))
}

/// x-coordinate of L2, beyond the secondary (x > 1).
pub fn l2(q: f64) -> Result<f64> {
    validate(q)?;
    if q == 0.0 {
        return Ok(1.0);
    }
    Ok(bisect(|x| axis_potential_slope(q, x), 1.0 + EDGE, 3.0, TOL))
}

/// x-coordinate of L3, on the far side of the primary (x < 0).
pub fn l3(q: f64) -> Result<f64> {
    validate(q)?;
    if q == 0.0 {
        return Ok(-1.0);
    }
    Ok(bisect(|x| axis_potential_slope(q, x), -3.0, -EDGE, TOL))
}

/// L1 solve for internal callers that have already validated q.
pub(crate) fn l1_unchecked(q: f64) -> f64 {
    if q == 0.0 {
        return 1.0;
    }
    bisect(|x| axis_potential_slope(q, x), EDGE, 1.0 - EDGE, TOL)
}

fn validate(q: f64) -> Result<()> {
    if !q.is_finite() || q < 0.0 {
        return Err(RocheError::invalid("mass ratio q must be non-negative"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{l1, l2, l3};
    use crate::error::RocheError;
    use crate::potential::axis_potential_slope;

    #[test]
    fn equal_masses_place_the_inner_point_at_the_midpoint() {
        let x = l1(1.0).expect("l1 should solve");
        assert!((x - 0.5).abs() < 1e-10, "expected 0.5, got {x}");
    }

    #[test]
    fn inner_point_stays_inside_the_binary_and_decreases_with_q() {
        let mut previous = 1.0;
        for q in [0.01, 0.1, 0.5, 1.0, 2.0, 10.0] {
            let x = l1(q).expect("l1 should solve");
            assert!(x > 0.0 && x < 1.0, "L1 out of range for q = {q}: {x}");
            assert!(
                x < previous,
                "L1 should decrease with q, got {x} after {previous}"
            );
            previous = x;
        }
    }

    #[test]
    fn outer_points_bracket_the_binary() {
        for q in [0.2, 1.0, 5.0] {
            let x2 = l2(q).expect("l2 should solve");
            let x3 = l3(q).expect("l3 should solve");
            assert!(x2 > 1.0, "L2 should lie beyond the secondary, got {x2}");
            assert!(x3 < 0.0, "L3 should lie behind the primary, got {x3}");
        }
    }

    #[test]
    fn points_are_stationary_points_of_the_axial_potential() {
        for q in [0.3, 1.0, 4.0] {
            for x in [
                l1(q).expect("l1 should solve"),
                l2(q).expect("l2 should solve"),
                l3(q).expect("l3 should solve"),
            ] {
                let slope = axis_potential_slope(q, x);
                assert!(
                    slope.abs() < 1e-8,
                    "slope at Lagrangian point x = {x} (q = {q}) is {slope}"
                );
            }
        }
    }

    #[test]
    fn equal_masses_give_symmetric_outer_points() {
        let x2 = l2(1.0).expect("l2 should solve");
        let x3 = l3(1.0).expect("l3 should solve");
        assert!(
            ((x2 - 1.0) + x3).abs() < 1e-9,
            "outer points should mirror for q = 1: {x2}, {x3}"
        );
    }

    #[test]
    fn massless_secondary_degenerates_analytically() {
        assert_eq!(l1(0.0).expect("l1 should solve"), 1.0);
        assert_eq!(l2(0.0).expect("l2 should solve"), 1.0);
        assert_eq!(l3(0.0).expect("l3 should solve"), -1.0);
    }

    #[test]
    fn negative_mass_ratio_is_rejected() {
        for result in [l1(-0.5), l2(-0.5), l3(-0.5)] {
            assert!(matches!(result, Err(RocheError::InvalidArgument(_))));
        }
    }
}
