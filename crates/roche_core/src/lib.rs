//! The `roche_core` crate models the geometry and dynamics of
//! semi-detached binary stars in the corotating Roche approximation.
//! All lengths are in units of the binary separation and angular
//! frequencies in units of the orbital frequency, with the primary at
//! the origin and the secondary at unit distance along x.
//!
//! Key components:
//! - **Lagrange**: bisection solves for the collinear points L1, L2, L3.
//! - **Lobe**: closed-curve traces of either Roche lobe in position and
//!   velocity space.
//! - **Eclipse**: occultation tests, ingress/egress phase searches, and
//!   mass-ratio inversion from an eclipse width.
//! - **Stream**: ballistic gas-stream integration from L1, with its
//!   velocity-space sampling and radial turning points.

pub mod eclipse;
pub mod error;
pub mod frame;
pub mod lagrange;
pub mod lobe;
pub mod potential;
pub mod solvers;
pub mod stream;
pub mod types;

pub use eclipse::{
    ingress_egress, is_eclipsed, mass_ratio_from_eclipse_width, EclipseSettings,
    MassRatioSettings, PhaseSearchSettings,
};
pub use error::{Result, RocheError};
pub use frame::{
    earth_vector, inertial_velocity, keplerian_velocity, mass_fraction, velocity_relative_to,
};
pub use lagrange::{l1, l2, l3};
pub use lobe::{lobe, velocity_lobe};
pub use potential::{critical_potential, roche_potential, surface_potential};
pub use stream::{stream_positions, stream_velocities, turning_point, StreamSettings};
pub use types::{
    EclipsePhases, MassRatioSolution, PlanePoint, PlaneVelocity, Star, TurningPoint, VelocityKind,
};
