//! Ballistic integration of the gas stream leaving the inner Lagrangian
//! point: the path in position space, a velocity-space sampling regime,
//! and the turning points of the stream's distance from the primary.

use crate::error::{Result, RocheError};
use crate::frame::{inertial_velocity, keplerian_velocity, velocity_relative_to};
use crate::lagrange;
use crate::potential::BallisticStream;
use crate::solvers::{bisect, rk4_step, PhaseState, PlanarSystem};
use crate::types::{PlanePoint, PlaneVelocity, Star, TurningPoint, VelocityKind};

/// Displacement of the release point below L1, toward the primary. The
/// saddle itself is an equilibrium; material spills from just inside it.
const RELEASE_OFFSET: f64 = 1e-5;

/// Target spatial resolution of one integration step.
const SPATIAL_STEP: f64 = 1e-3;

/// Time-step ceiling for the slow creep away from the saddle.
const MAX_DT: f64 = 0.05;

/// Steps allowed before an integration is declared unable to finish.
const STEP_BUDGET: usize = 500_000;

/// Radius beyond which the trajectory has clearly left the modeled domain.
const ESCAPE_RADIUS: f64 = 2.0;

/// Settings for the velocity-space stream sampler.
#[derive(Debug, Clone, Copy)]
pub struct StreamSettings {
    /// Minimum velocity-space spacing between consecutive samples.
    pub step: f64,
    /// Which diagnostic velocity is reported along the stream.
    pub kind: VelocityKind,
    /// Number of samples requested.
    pub samples: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            step: 0.01,
            kind: VelocityKind::Stream,
            samples: 60,
        }
    }
}

/// Traces the gas stream from L1 inward until its distance from the
/// primary first drops to `max_radius`, resampled by arc length to
/// exactly `n` points.
pub fn stream_positions(q: f64, max_radius: f64, n: usize) -> Result<Vec<PlanePoint>> {
    if !q.is_finite() || q <= 0.0 {
        return Err(RocheError::invalid("mass ratio q must be positive"));
    }
    if !(0.0..=1.0).contains(&max_radius) {
        return Err(RocheError::invalid("max radius out of range 0 to 1"));
    }
    if n < 2 {
        return Err(RocheError::invalid("sample count n must be at least 2"));
    }

    let field = BallisticStream::new(q);
    let mut state = release_state(q);
    if state.radius() <= max_radius {
        return Err(RocheError::no_solution(
            "stream release point already lies inside the requested radius",
        ));
    }

    let mut path = vec![PlanePoint {
        x: state.x,
        y: state.y,
    }];
    let mut reached = false;
    for _ in 0..STEP_BUDGET {
        let previous = state;
        state = rk4_step(&field, state, time_step(state));
        if state.radius() <= max_radius {
            // Land the final sample on the requested radius.
            let f = (previous.radius() - max_radius)
                / (previous.radius() - state.radius()).max(f64::MIN_POSITIVE);
            path.push(PlanePoint {
                x: previous.x + f * (state.x - previous.x),
                y: previous.y + f * (state.y - previous.y),
            });
            reached = true;
            break;
        }
        if state.radius() > ESCAPE_RADIUS {
            return Err(RocheError::no_solution("gas stream left the modeled domain"));
        }
        path.push(PlanePoint {
            x: state.x,
            y: state.y,
        });
    }
    if !reached {
        return Err(RocheError::no_solution(
            "gas stream did not reach the requested radius within the step budget",
        ));
    }
    Ok(resample(&path, n))
}

/// Samples the stream in velocity space at regular velocity intervals,
/// from the release point to the stream's first radial turning point.
pub fn stream_velocities(q: f64, settings: &StreamSettings) -> Result<Vec<PlaneVelocity>> {
    if !q.is_finite() || q <= 0.0 {
        return Err(RocheError::invalid("mass ratio q must be positive"));
    }
    if !(settings.step > 0.0 && settings.step < 1.0) {
        return Err(RocheError::invalid("step out of range 0 to 1"));
    }
    if settings.samples < 2 {
        return Err(RocheError::invalid("sample count n must be at least 2"));
    }

    let field = BallisticStream::new(q);
    let mut state = release_state(q);
    let diagnostic = |s: PhaseState| match settings.kind {
        VelocityKind::Stream => inertial_velocity(q, s.x, s.y, s.vx, s.vy),
        VelocityKind::Keplerian => keplerian_velocity(q, s.x, s.y),
    };

    let mut samples = vec![diagnostic(state)];
    let mut previous_vr = state.radial_velocity();
    for _ in 0..STEP_BUDGET {
        state = rk4_step(&field, state, time_step(state));
        let vr = state.radial_velocity();
        if previous_vr < 0.0 && vr >= 0.0 {
            // First turning point: the sampled branch ends here.
            break;
        }
        previous_vr = vr;
        if state.radius() > ESCAPE_RADIUS {
            break;
        }
        let v = diagnostic(state);
        if v.distance(*samples.last().unwrap_or(&v)) >= settings.step {
            samples.push(v);
            if samples.len() == settings.samples {
                return Ok(samples);
            }
        }
    }
    Err(RocheError::no_solution(format!(
        "gas stream produced {} of {} velocity samples before its first turning point",
        samples.len(),
        settings.samples
    )))
}

/// Position and velocity of the n-th turning point of the stream (n is
/// 1-indexed), with the velocity expressed relative to each star.
pub fn turning_point(q: f64, n: usize, accuracy: f64) -> Result<TurningPoint> {
    if !q.is_finite() || q < 0.0 {
        return Err(RocheError::invalid("mass ratio q must be non-negative"));
    }
    if n < 1 {
        return Err(RocheError::invalid("turning point index n must be at least 1"));
    }
    if !(accuracy > 0.0) {
        return Err(RocheError::invalid("accuracy must be positive"));
    }
    let (_, s) = nth_turning_state(q, n, accuracy)?;
    Ok(TurningPoint {
        x: s.x,
        y: s.y,
        primary: velocity_relative_to(Star::Primary, q, s.x, s.y, s.vx, s.vy),
        secondary: velocity_relative_to(Star::Secondary, q, s.x, s.y, s.vx, s.vy),
    })
}

/// Integrates until the radial velocity has changed sign `n` times,
/// refining the final crossing to the `accuracy` time tolerance. Returns
/// the integration time of the crossing along with the state there.
pub(crate) fn nth_turning_state(q: f64, n: usize, accuracy: f64) -> Result<(f64, PhaseState)> {
    let field = BallisticStream::new(q);
    let mut state = release_state(q);
    let mut t = 0.0;
    let mut crossings = 0usize;
    for _ in 0..STEP_BUDGET {
        let dt = time_step(state);
        let next = rk4_step(&field, state, dt);
        let vr_before = state.radial_velocity();
        let vr_after = next.radial_velocity();
        if vr_before != 0.0 && (vr_before < 0.0) != (vr_after < 0.0) {
            crossings += 1;
            if crossings == n {
                let h = bisect(
                    |h| rk4_step(&field, state, h).radial_velocity(),
                    0.0,
                    dt,
                    accuracy,
                );
                return Ok((t + h, rk4_step(&field, state, h)));
            }
        }
        state = next;
        t += dt;
        if state.radius() > ESCAPE_RADIUS {
            return Err(RocheError::no_solution("gas stream left the modeled domain"));
        }
    }
    Err(RocheError::no_solution(format!(
        "gas stream did not reach turning point {n} within the step budget"
    )))
}

fn release_state(q: f64) -> PhaseState {
    PhaseState {
        x: lagrange::l1_unchecked(q) - RELEASE_OFFSET,
        y: 0.0,
        vx: 0.0,
        vy: 0.0,
    }
}

/// Speed-adaptive time step: constant spatial resolution once the stream
/// is moving, capped for the slow drift near the saddle.
fn time_step(state: PhaseState) -> f64 {
    (SPATIAL_STEP / state.speed().max(SPATIAL_STEP / MAX_DT)).min(MAX_DT)
}

/// Resamples a polyline to exactly `n` points uniform in arc length.
fn resample(path: &[PlanePoint], n: usize) -> Vec<PlanePoint> {
    let mut cumulative = Vec::with_capacity(path.len());
    cumulative.push(0.0);
    for pair in path.windows(2) {
        let d = ((pair[1].x - pair[0].x).powi(2) + (pair[1].y - pair[0].y).powi(2)).sqrt();
        cumulative.push(cumulative.last().copied().unwrap_or(0.0) + d);
    }
    let total = cumulative.last().copied().unwrap_or(0.0);

    let mut out = Vec::with_capacity(n);
    let mut j = 0usize;
    for k in 0..n {
        let target = total * k as f64 / (n - 1) as f64;
        while j + 1 < cumulative.len() - 1 && cumulative[j + 1] < target {
            j += 1;
        }
        let span = cumulative[j + 1] - cumulative[j];
        let f = if span > 0.0 {
            ((target - cumulative[j]) / span).clamp(0.0, 1.0)
        } else {
            0.0
        };
        out.push(PlanePoint {
            x: path[j].x + f * (path[j + 1].x - path[j].x),
            y: path[j].y + f * (path[j + 1].y - path[j].y),
        });
    }
    out
}
