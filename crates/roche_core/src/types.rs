//! Shared data model for the Roche geometry routines.
//!
//! All quantities are expressed in the corotating frame of a circular,
//! synchronized binary: lengths in units of the separation, velocities in
//! units of separation times orbital angular frequency, the primary star's
//! centre at the origin and the secondary's centre at (1, 0, 0).

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Selects which star of the binary a computation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Star {
    Primary,
    Secondary,
}

impl Star {
    /// Centre of the star in the corotating frame.
    pub fn centre(self) -> Vector3<f64> {
        match self {
            Star::Primary => Vector3::zeros(),
            Star::Secondary => Vector3::new(1.0, 0.0, 0.0),
        }
    }
}

/// A sample of an orbital-plane curve in position space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlanePoint {
    pub x: f64,
    pub y: f64,
}

/// A sample of an orbital-plane curve in velocity space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneVelocity {
    pub vx: f64,
    pub vy: f64,
}

impl PlaneVelocity {
    pub fn distance(self, other: PlaneVelocity) -> f64 {
        ((self.vx - other.vx).powi(2) + (self.vy - other.vy).powi(2)).sqrt()
    }
}

/// The orbital phases bounding an eclipse of a fixed point.
///
/// `ingress` is normalized to [0, 1); `egress = ingress + width` and may
/// exceed 1 when the eclipse straddles phase zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EclipsePhases {
    pub ingress: f64,
    pub egress: f64,
}

impl EclipsePhases {
    pub fn width(self) -> f64 {
        self.egress - self.ingress
    }

    /// Phase of mid-eclipse, normalized to [0, 1).
    pub fn midpoint(self) -> f64 {
        (0.5 * (self.ingress + self.egress)).rem_euclid(1.0)
    }
}

/// A turning point of the gas stream: the position at a sign change of the
/// radial velocity, plus that velocity expressed relative to each star
/// (the star's own orbital motion about the centre of mass subtracted).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TurningPoint {
    pub x: f64,
    pub y: f64,
    pub primary: PlaneVelocity,
    pub secondary: PlaneVelocity,
}

/// Outcome of inverting an eclipse phase width into a mass ratio.
///
/// The legacy interface collapsed the degenerate outcomes into the numeric
/// sentinels -1 (never eclipsed over the bracket) and -2 (eclipsed
/// throughout the bracket); `sentinel` reproduces that channel for callers
/// that still want a single number.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MassRatioSolution {
    Converged { q: f64 },
    NeverEclipsed,
    AlwaysEclipsed,
}

impl MassRatioSolution {
    pub fn sentinel(self) -> f64 {
        match self {
            MassRatioSolution::Converged { q } => q,
            MassRatioSolution::NeverEclipsed => -1.0,
            MassRatioSolution::AlwaysEclipsed => -2.0,
        }
    }
}

/// Flavour of velocity reported along the gas stream.
///
/// `Stream` is the ballistic velocity of the stream itself; `Keplerian` is
/// the velocity of a circular Keplerian disc about the primary at the
/// stream's position. Both are expressed in the inertial frame of the
/// centre of mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VelocityKind {
    Stream,
    Keplerian,
}

#[cfg(test)]
mod tests {
    use super::{EclipsePhases, MassRatioSolution, Star};

    #[test]
    fn star_centres_are_a_unit_separation_apart() {
        let d = Star::Secondary.centre() - Star::Primary.centre();
        assert_eq!(d.norm(), 1.0);
    }

    #[test]
    fn eclipse_phase_midpoint_wraps_through_phase_zero() {
        let phases = EclipsePhases {
            ingress: 0.95,
            egress: 1.05,
        };
        assert!((phases.width() - 0.1).abs() < 1e-12);
        assert!(phases.midpoint().abs() < 1e-12);
    }

    #[test]
    fn mass_ratio_sentinels_match_legacy_values() {
        assert_eq!(MassRatioSolution::NeverEclipsed.sentinel(), -1.0);
        assert_eq!(MassRatioSolution::AlwaysEclipsed.sentinel(), -2.0);
        assert_eq!(MassRatioSolution::Converged { q: 0.7 }.sentinel(), 0.7);
    }
}
