//! The corotating effective potential of the binary and the ballistic
//! vector field derived from it.

use nalgebra::Vector3;

use crate::frame::mass_fraction;
use crate::lagrange;
use crate::solvers::{PhaseState, PlanarSystem};
use crate::types::Star;

const TINY_RADIUS: f64 = 1e-12;

/// Effective potential in the corotating frame:
/// -m1/r1 - m2/r2 - ((x - mu)^2 + y^2) / 2, with the primary (mass
/// m1 = 1 - mu) at the origin and the secondary (mass m2 = mu) at (1, 0, 0).
pub fn roche_potential(q: f64, point: &Vector3<f64>) -> f64 {
    let mu = mass_fraction(q);
    let r1 = point.norm().max(TINY_RADIUS);
    let r2 = (point - Vector3::new(1.0, 0.0, 0.0)).norm().max(TINY_RADIUS);
    -(1.0 - mu) / r1 - mu / r2 - 0.5 * ((point.x - mu).powi(2) + point.y.powi(2))
}

/// d(potential)/dx restricted to the line of centres (y = z = 0).
/// Valid on all three axis segments; singular at the star centres.
pub fn axis_potential_slope(q: f64, x: f64) -> f64 {
    let mu = mass_fraction(q);
    let r1 = x.abs().max(TINY_RADIUS);
    let r2 = (x - 1.0).abs().max(TINY_RADIUS);
    (1.0 - mu) * x / r1.powi(3) + mu * (x - 1.0) / r2.powi(3) - (x - mu)
}

/// The critical potential of the lobe-defining equipotential through L1.
pub fn critical_potential(q: f64) -> f64 {
    let xl1 = lagrange::l1_unchecked(q);
    roche_potential(q, &Vector3::new(xl1, 0.0, 0.0))
}

/// Distance from a star's centre to the inner Lagrangian point, the
/// maximal radius of that star's Roche lobe.
pub fn lagrangian_distance(q: f64, star: Star) -> f64 {
    let xl1 = lagrange::l1_unchecked(q);
    match star {
        Star::Primary => xl1,
        Star::Secondary => 1.0 - xl1,
    }
}

/// Potential level of the photosphere of a star filling `fill_factor` of
/// its Roche lobe: the equipotential through the point on the line of
/// centres at that fraction of the star-to-L1 distance. A fill factor of
/// one recovers the critical potential.
pub fn surface_potential(q: f64, star: Star, fill_factor: f64) -> f64 {
    let reach = fill_factor * lagrangian_distance(q, star);
    let surface_x = match star {
        Star::Primary => reach,
        Star::Secondary => 1.0 - reach,
    };
    roche_potential(q, &Vector3::new(surface_x, 0.0, 0.0))
}

/// Planar ballistic motion in the corotating frame: gravity of both
/// masses plus the centrifugal and Coriolis terms.
#[derive(Debug, Clone, Copy)]
pub struct BallisticStream {
    mu: f64,
}

impl BallisticStream {
    pub fn new(q: f64) -> Self {
        Self {
            mu: mass_fraction(q),
        }
    }
}

impl PlanarSystem for BallisticStream {
    fn derivative(&self, s: PhaseState) -> PhaseState {
        let mu = self.mu;
        let r1 = (s.x * s.x + s.y * s.y).sqrt().max(TINY_RADIUS);
        let dx = s.x - 1.0;
        let r2 = (dx * dx + s.y * s.y).sqrt().max(TINY_RADIUS);
        let r1c = r1.powi(3);
        let r2c = r2.powi(3);
        PhaseState {
            x: s.vx,
            y: s.vy,
            vx: -(1.0 - mu) * s.x / r1c - mu * dx / r2c + (s.x - mu) + 2.0 * s.vy,
            vy: -(1.0 - mu) * s.y / r1c - mu * s.y / r2c + s.y - 2.0 * s.vx,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        axis_potential_slope, critical_potential, roche_potential, surface_potential,
        BallisticStream,
    };
    use crate::lagrange;
    use crate::solvers::{PhaseState, PlanarSystem};
    use crate::types::Star;
    use nalgebra::Vector3;

    #[test]
    fn potential_is_symmetric_for_equal_masses() {
        let q = 1.0;
        let a = roche_potential(q, &Vector3::new(0.3, 0.2, 0.1));
        let b = roche_potential(q, &Vector3::new(0.7, 0.2, 0.1));
        assert!((a - b).abs() < 1e-12, "expected mirror symmetry, {a} vs {b}");
    }

    #[test]
    fn slope_matches_finite_difference_of_potential() {
        let q = 0.6;
        let h = 1e-6;
        for x in [-0.8, 0.37, 0.62, 1.55] {
            let numeric = (roche_potential(q, &Vector3::new(x + h, 0.0, 0.0))
                - roche_potential(q, &Vector3::new(x - h, 0.0, 0.0)))
                / (2.0 * h);
            let analytic = axis_potential_slope(q, x);
            assert!(
                (numeric - analytic).abs() < 1e-5,
                "slope mismatch at x = {x}: {numeric} vs {analytic}"
            );
        }
    }

    #[test]
    fn filled_lobe_surface_recovers_the_critical_potential() {
        for q in [0.3, 1.0, 2.5] {
            for star in [Star::Primary, Star::Secondary] {
                let full = surface_potential(q, star, 1.0);
                assert!((full - critical_potential(q)).abs() < 1e-10);
                // A shrunken photosphere sits deeper in the well.
                assert!(surface_potential(q, star, 0.5) < full);
            }
        }
    }

    #[test]
    fn inner_lagrangian_point_is_a_stream_equilibrium() {
        let q = 0.8;
        let xl1 = lagrange::l1_unchecked(q);
        let field = BallisticStream::new(q);
        let d = field.derivative(PhaseState {
            x: xl1,
            y: 0.0,
            vx: 0.0,
            vy: 0.0,
        });
        assert!(d.vx.abs() < 1e-9, "residual x-force {}", d.vx);
        assert!(d.vy.abs() < 1e-9, "residual y-force {}", d.vy);
    }
}
