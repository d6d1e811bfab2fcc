//! Frame conventions and velocity transforms for the corotating binary.
//!
//! Phase zero places the secondary between the primary and the observer,
//! so a point at the primary's centre is eclipsed by a lobe-filling
//! secondary around phase zero at high inclination.

use nalgebra::Vector3;

use crate::types::{PlaneVelocity, Star};

/// Fractional mass of the secondary, q / (1 + q). This is both the
/// x-coordinate of the centre of mass and the secondary's mass in units
/// where G(M1 + M2) = 1.
pub fn mass_fraction(q: f64) -> f64 {
    q / (1.0 + q)
}

/// Unit vector from the binary toward the observer at the given orbital
/// phase, for an inclination in degrees.
pub fn earth_vector(iangle_deg: f64, phase: f64) -> Vector3<f64> {
    let i = iangle_deg.to_radians();
    let p = 2.0 * std::f64::consts::PI * phase;
    Vector3::new(i.sin() * p.cos(), -i.sin() * p.sin(), i.cos())
}

/// Maps a corotating-frame velocity at (x, y) to the inertial frame of the
/// centre of mass. Rigid rotation contributes (-y, x - mu).
pub fn inertial_velocity(q: f64, x: f64, y: f64, vx: f64, vy: f64) -> PlaneVelocity {
    let mu = mass_fraction(q);
    PlaneVelocity {
        vx: vx - y,
        vy: vy + x - mu,
    }
}

/// Inertial velocity with the selected star's own orbital velocity
/// subtracted, i.e. the velocity seen from that star's centre of mass.
///
/// The primary orbits at (0, -mu) and the secondary at (0, 1 - mu), so the
/// mass fraction cancels out of both expressions.
pub fn velocity_relative_to(star: Star, _q: f64, x: f64, y: f64, vx: f64, vy: f64) -> PlaneVelocity {
    match star {
        Star::Primary => PlaneVelocity {
            vx: vx - y,
            vy: vy + x,
        },
        Star::Secondary => PlaneVelocity {
            vx: vx - y,
            vy: vy + x - 1.0,
        },
    }
}

/// Velocity of a circular prograde Keplerian orbit about the primary at
/// (x, y), expressed in the inertial frame of the centre of mass.
pub fn keplerian_velocity(q: f64, x: f64, y: f64) -> PlaneVelocity {
    let mu = mass_fraction(q);
    let r = (x * x + y * y).sqrt();
    let speed = ((1.0 - mu) / r).sqrt();
    PlaneVelocity {
        vx: -speed * y / r,
        vy: speed * x / r - mu,
    }
}
