//! Numerical stepping and scalar root bracketing used across the crate.

/// Planar phase-space state of a test particle in the corotating frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseState {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
}

impl PhaseState {
    pub fn speed(self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy).sqrt()
    }

    /// Distance from the primary's centre at the origin.
    pub fn radius(self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Radial velocity component relative to the primary.
    pub fn radial_velocity(self) -> f64 {
        let r = self.radius();
        if r == 0.0 {
            0.0
        } else {
            (self.x * self.vx + self.y * self.vy) / r
        }
    }

    fn scaled_add(self, k: PhaseState, h: f64) -> PhaseState {
        PhaseState {
            x: self.x + h * k.x,
            y: self.y + h * k.y,
            vx: self.vx + h * k.vx,
            vy: self.vy + h * k.vy,
        }
    }
}

/// A first-order autonomous vector field on the planar phase space.
pub trait PlanarSystem {
    fn derivative(&self, state: PhaseState) -> PhaseState;
}

/// One classical Runge-Kutta step of size `dt`.
pub fn rk4_step(system: &impl PlanarSystem, state: PhaseState, dt: f64) -> PhaseState {
    let k1 = system.derivative(state);
    let k2 = system.derivative(state.scaled_add(k1, 0.5 * dt));
    let k3 = system.derivative(state.scaled_add(k2, 0.5 * dt));
    let k4 = system.derivative(state.scaled_add(k3, dt));
    PhaseState {
        x: state.x + dt / 6.0 * (k1.x + 2.0 * k2.x + 2.0 * k3.x + k4.x),
        y: state.y + dt / 6.0 * (k1.y + 2.0 * k2.y + 2.0 * k3.y + k4.y),
        vx: state.vx + dt / 6.0 * (k1.vx + 2.0 * k2.vx + 2.0 * k3.vx + k4.vx),
        vy: state.vy + dt / 6.0 * (k1.vy + 2.0 * k2.vy + 2.0 * k3.vy + k4.vy),
    }
}

/// Bisects `f` on [a, b] down to `tol`, assuming a sign change across the
/// bracket. The iteration cap bounds the work for degenerate tolerances.
pub fn bisect(f: impl Fn(f64) -> f64, a: f64, b: f64, tol: f64) -> f64 {
    let mut lo = a;
    let mut hi = b;
    let mut f_lo = f(lo);
    for _ in 0..200 {
        if (hi - lo).abs() <= tol {
            break;
        }
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid);
        if f_mid == 0.0 {
            return mid;
        }
        if (f_lo < 0.0) == (f_mid < 0.0) {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }
    0.5 * (lo + hi)
}
