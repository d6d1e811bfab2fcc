//! Traces the closed Roche-lobe boundary of either star in the orbital
//! plane, and its image in velocity space.

use nalgebra::Vector3;

use crate::error::{Result, RocheError};
use crate::frame::inertial_velocity;
use crate::lagrange;
use crate::potential::{critical_potential, lagrangian_distance, roche_potential};
use crate::solvers::bisect;
use crate::types::{PlanePoint, PlaneVelocity, Star};

const RADIUS_TOL: f64 = 1e-11;
const WALK_LIMIT: usize = 2000;

/// Traces the star's Roche lobe as a closed curve of exactly `n` points.
///
/// The curve is parametrized by angle about the star's centre with the
/// first and last points coinciding at the inner Lagrangian point, so the
/// samples connect into a simple closed polygon. Each interior sample
/// solves for the radius at which the effective potential reaches the
/// critical value, seeded from the previous sample's radius.
pub fn lobe(star: Star, q: f64, n: usize) -> Result<Vec<PlanePoint>> {
    validate(q, n)?;
    let xl1 = lagrange::l1_unchecked(q);
    let cpot = critical_potential(q);
    let reach = match star {
        Star::Primary => xl1,
        Star::Secondary => 1.0 - xl1,
    };

    let mut points = Vec::with_capacity(n);
    let mut radius = reach;
    for k in 0..n {
        let theta = 2.0 * std::f64::consts::PI * k as f64 / (n - 1) as f64;
        // The potential is tangent to the critical level along the exact
        // L1 direction, so the endpoints are taken analytically.
        if k > 0 && k + 1 < n {
            radius = boundary_radius(q, star, theta, cpot, radius, reach);
        } else {
            radius = reach;
        }
        points.push(sample(star, theta, radius));
    }
    Ok(points)
}

/// The Roche lobe mapped to velocity space under rigid rotation, in the
/// inertial frame of the centre of mass.
pub fn velocity_lobe(star: Star, q: f64, n: usize) -> Result<Vec<PlaneVelocity>> {
    let curve = lobe(star, q, n)?;
    Ok(curve
        .into_iter()
        .map(|p| inertial_velocity(q, p.x, p.y, 0.0, 0.0))
        .collect())
}

fn validate(q: f64, n: usize) -> Result<()> {
    if !q.is_finite() || q <= 0.0 {
        return Err(RocheError::invalid("mass ratio q must be positive"));
    }
    if n < 2 {
        return Err(RocheError::invalid("sample count n must be at least 2"));
    }
    Ok(())
}

/// Position of the boundary sample at angle `theta` and the given radius.
/// Angle zero points from the star's centre toward L1 for either star.
fn sample(star: Star, theta: f64, radius: f64) -> PlanePoint {
    match star {
        Star::Primary => PlanePoint {
            x: radius * theta.cos(),
            y: radius * theta.sin(),
        },
        Star::Secondary => PlanePoint {
            x: 1.0 - radius * theta.cos(),
            y: radius * theta.sin(),
        },
    }
}

/// Solves potential(radius) = critical along one ray from the star's
/// centre. The lobe interior is below the critical level, so the boundary
/// is the first crossing going outward; a short walk from the previous
/// sample's radius brackets it, with a full radial scan as fallback for
/// a stale seed.
fn boundary_radius(q: f64, star: Star, theta: f64, cpot: f64, seed: f64, reach: f64) -> f64 {
    let level = |r: f64| {
        let p = sample(star, theta, r);
        roche_potential(q, &Vector3::new(p.x, p.y, 0.0)) - cpot
    };
    let step = 1e-3 * reach;
    let mut r = seed.clamp(step, reach);

    if level(r) < 0.0 {
        // Inside the lobe: walk outward to the first crossing.
        for _ in 0..WALK_LIMIT {
            let next = r + step;
            if level(next) >= 0.0 {
                return bisect(level, r, next, RADIUS_TOL);
            }
            r = next;
            if r > 1.05 * reach {
                break;
            }
        }
    } else {
        // Outside: walk inward until the interior is found.
        for _ in 0..WALK_LIMIT {
            let next = r - step;
            if next <= 0.0 {
                break;
            }
            if level(next) < 0.0 {
                return bisect(level, next, r, RADIUS_TOL);
            }
            r = next;
        }
    }

    // Stale seed; rescan the whole ray for the first crossing.
    let mut inner = step;
    while inner < 1.05 * reach {
        let outer = inner + step;
        if level(inner) < 0.0 && level(outer) >= 0.0 {
            return bisect(level, inner, outer, RADIUS_TOL);
        }
        inner = outer;
    }
    seed
}

#[cfg(test)]
mod tests {
    use super::{lobe, velocity_lobe};
    use crate::error::RocheError;
    use crate::frame::mass_fraction;
    use crate::lagrange;
    use crate::potential::critical_potential;
    use crate::potential::roche_potential;
    use crate::types::Star;
    use nalgebra::Vector3;

    #[test]
    fn curve_has_the_requested_length_and_closes() {
        for n in [2, 17, 200] {
            let curve = lobe(Star::Secondary, 0.7, n).expect("lobe should trace");
            assert_eq!(curve.len(), n);
            let first = curve.first().expect("curve should be non-empty");
            let last = curve.last().expect("curve should be non-empty");
            assert!((first.x - last.x).abs() < 1e-12);
            assert!((first.y - last.y).abs() < 1e-12);
        }
    }

    #[test]
    fn every_sample_sits_on_the_critical_equipotential() {
        let q = 0.45;
        let cpot = critical_potential(q);
        for star in [Star::Primary, Star::Secondary] {
            for p in lobe(star, q, 73).expect("lobe should trace") {
                let value = roche_potential(q, &Vector3::new(p.x, p.y, 0.0));
                assert!(
                    (value - cpot).abs() < 1e-7,
                    "sample ({}, {}) off the lobe: {value} vs {cpot}",
                    p.x,
                    p.y
                );
            }
        }
    }

    #[test]
    fn lobes_touch_only_at_the_inner_lagrangian_point() {
        let q = 1.0;
        let xl1 = lagrange::l1(q).expect("l1 should solve");
        let primary = lobe(Star::Primary, q, 101).expect("lobe should trace");
        let secondary = lobe(Star::Secondary, q, 101).expect("lobe should trace");
        // Shared point at L1.
        assert!((primary[0].x - xl1).abs() < 1e-9);
        assert!((secondary[0].x - xl1).abs() < 1e-9);
        // No interior sample of the primary lobe crosses past L1.
        for p in &primary[1..100] {
            assert!(p.x < xl1 + 1e-9);
        }
        for p in &secondary[1..100] {
            assert!(p.x > xl1 - 1e-9);
        }
    }

    #[test]
    fn equal_mass_lobes_are_mirror_images() {
        let primary = lobe(Star::Primary, 1.0, 81).expect("lobe should trace");
        let secondary = lobe(Star::Secondary, 1.0, 81).expect("lobe should trace");
        for (p, s) in primary.iter().zip(&secondary) {
            assert!(
                (p.x - (1.0 - s.x)).abs() < 1e-8 && (p.y - s.y).abs() < 1e-8,
                "mirror violated: ({}, {}) vs ({}, {})",
                p.x,
                p.y,
                s.x,
                s.y
            );
        }
    }

    #[test]
    fn samples_stay_within_the_lagrangian_reach_of_their_star() {
        let q = 2.3;
        let xl1 = lagrange::l1(q).expect("l1 should solve");
        for p in lobe(Star::Primary, q, 200).expect("lobe should trace") {
            let r = (p.x * p.x + p.y * p.y).sqrt();
            assert!(r <= xl1 + 1e-9, "sample radius {r} exceeds L1 reach {xl1}");
        }
        for p in lobe(Star::Secondary, q, 200).expect("lobe should trace") {
            let r = ((p.x - 1.0).powi(2) + p.y * p.y).sqrt();
            assert!(r <= (1.0 - xl1) + 1e-9);
        }
    }

    #[test]
    fn velocity_lobe_centres_on_the_star_orbital_velocity() {
        let q = 0.5;
        let mu = mass_fraction(q);
        let curve = velocity_lobe(Star::Secondary, q, 120).expect("lobe should trace");
        let vy_min = curve.iter().map(|v| v.vy).fold(f64::INFINITY, f64::min);
        let vy_max = curve.iter().map(|v| v.vy).fold(f64::NEG_INFINITY, f64::max);
        // The secondary's centre maps to (0, 1 - mu).
        assert!(
            vy_min < 1.0 - mu && 1.0 - mu < vy_max,
            "expected K2 = {} inside [{vy_min}, {vy_max}]",
            1.0 - mu
        );
    }

    #[test]
    fn equal_mass_velocity_lobes_mirror_across_vy() {
        let primary = velocity_lobe(Star::Primary, 1.0, 61).expect("lobe should trace");
        let secondary = velocity_lobe(Star::Secondary, 1.0, 61).expect("lobe should trace");
        for (p, s) in primary.iter().zip(&secondary) {
            assert!((p.vx - s.vx).abs() < 1e-8);
            assert!((p.vy + s.vy).abs() < 1e-8);
        }
    }

    #[test]
    fn undersized_sample_counts_are_rejected() {
        assert!(matches!(
            lobe(Star::Primary, 1.0, 1),
            Err(RocheError::InvalidArgument(_))
        ));
        assert!(matches!(
            velocity_lobe(Star::Primary, 1.0, 0),
            Err(RocheError::InvalidArgument(_))
        ));
    }

    #[test]
    fn non_positive_mass_ratios_are_rejected() {
        assert!(matches!(
            lobe(Star::Secondary, 0.0, 50),
            Err(RocheError::InvalidArgument(_))
        ));
        assert!(matches!(
            lobe(Star::Secondary, -1.0, 50),
            Err(RocheError::InvalidArgument(_))
        ));
    }
}
