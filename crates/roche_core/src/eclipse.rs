//! Eclipse prediction: whether a point in the corotating frame is hidden
//! behind a star's photosphere, and the two searches built on top of that
//! predicate (ingress/egress phases, mass ratio from eclipse width).

use nalgebra::Vector3;

use crate::error::{Result, RocheError};
use crate::frame::earth_vector;
use crate::potential::{lagrangian_distance, roche_potential, surface_potential};
use crate::types::{EclipsePhases, MassRatioSolution, Star};

/// Resolution of the whole-cycle phase scan that seeds the ingress/egress
/// bisections. Eclipses narrower than one scan step are not resolved.
const PHASE_SCAN: usize = 1000;

/// Samples taken along the sight-line chord before refining its minimum.
const CHORD_SCAN: usize = 32;

const GOLDEN: f64 = 0.381_966_011_250_105_2;

/// Geometry of the eclipsing star for the occlusion predicate.
#[derive(Debug, Clone, Copy)]
pub struct EclipseSettings {
    pub star: Star,
    /// Fraction of the Roche-lobe critical radius filled by the
    /// photosphere; 1.0 is exactly lobe-filling.
    pub fill_factor: f64,
    /// Convergence tolerance of the sight-line search, in units of the
    /// separation.
    pub accuracy: f64,
}

impl Default for EclipseSettings {
    fn default() -> Self {
        Self {
            star: Star::Secondary,
            fill_factor: 1.0,
            accuracy: 1e-4,
        }
    }
}

/// Settings for the ingress/egress phase search.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSearchSettings {
    pub star: Star,
    pub fill_factor: f64,
    /// Phase tolerance to which each transition is refined.
    pub delta: f64,
}

impl Default for PhaseSearchSettings {
    fn default() -> Self {
        Self {
            star: Star::Secondary,
            fill_factor: 1.0,
            delta: 1e-7,
        }
    }
}

/// Settings for inverting an eclipse phase width into a mass ratio.
#[derive(Debug, Clone, Copy)]
pub struct MassRatioSettings {
    /// Sight-line tolerance handed to the eclipse predicate.
    pub accuracy: f64,
    /// Bisection stops once the bracket is narrower than this.
    pub step: f64,
    pub q_lo: f64,
    pub q_hi: f64,
}

impl Default for MassRatioSettings {
    fn default() -> Self {
        Self {
            accuracy: 1e-4,
            step: 1e-5,
            q_lo: 0.001,
            q_hi: 2.0,
        }
    }
}

/// Whether the line of sight from `point` toward the observer crosses the
/// selected star's photosphere at the given phase and inclination.
pub fn is_eclipsed(
    q: f64,
    iangle: f64,
    phase: f64,
    point: Vector3<f64>,
    settings: &EclipseSettings,
) -> Result<bool> {
    if !q.is_finite() || q <= 0.0 {
        return Err(RocheError::invalid("mass ratio q must be positive"));
    }
    validate_geometry(iangle, settings.fill_factor)?;
    if !(settings.accuracy > 0.0 && settings.accuracy <= 0.1) {
        return Err(RocheError::invalid("accuracy out of range 0 to 0.1"));
    }
    Ok(eclipsed(q, iangle, phase, point, settings))
}

/// The orbital phases bounding the eclipse of `point`, found by a fine
/// phase scan followed by independent bisection of the two transitions.
pub fn ingress_egress(
    q: f64,
    iangle: f64,
    point: Vector3<f64>,
    settings: &PhaseSearchSettings,
) -> Result<EclipsePhases> {
    if !q.is_finite() || q <= 0.0 {
        return Err(RocheError::invalid("mass ratio q must be positive"));
    }
    validate_geometry(iangle, settings.fill_factor)?;
    if !(settings.delta > 0.0) {
        return Err(RocheError::invalid("phase tolerance delta must be positive"));
    }

    let blink = EclipseSettings {
        star: settings.star,
        fill_factor: settings.fill_factor,
        ..EclipseSettings::default()
    };
    let test = |phase: f64| eclipsed(q, iangle, phase, point, &blink);

    let scan_step = 1.0 / PHASE_SCAN as f64;
    let seed = (0..PHASE_SCAN)
        .map(|k| k as f64 * scan_step)
        .find(|&phase| test(phase))
        .ok_or_else(|| RocheError::no_solution("point is never eclipsed"))?;

    // Walk each way from the eclipsed seed to the nearest clear phase.
    let mut before = 1;
    while before <= PHASE_SCAN && test(seed - before as f64 * scan_step) {
        before += 1;
    }
    if before > PHASE_SCAN {
        return Err(RocheError::no_solution("point is eclipsed at every phase"));
    }
    let mut after = 1;
    while after <= PHASE_SCAN && test(seed + after as f64 * scan_step) {
        after += 1;
    }

    let ingress = refine_transition(
        &test,
        seed - before as f64 * scan_step,
        seed - (before - 1) as f64 * scan_step,
        settings.delta,
    );
    let egress = refine_transition(
        &test,
        seed + after as f64 * scan_step,
        seed + (after - 1) as f64 * scan_step,
        settings.delta,
    );

    let width = egress - ingress;
    let ingress = ingress.rem_euclid(1.0);
    Ok(EclipsePhases {
        ingress,
        egress: ingress + width,
    })
}

/// Mass ratio for which a point at the primary's centre, offset from
/// conjunction by half the given phase width, lies exactly on the
/// eclipse boundary of the lobe-filling secondary.
pub fn mass_ratio_from_eclipse_width(
    iangle: f64,
    pwidth: f64,
    settings: &MassRatioSettings,
) -> Result<MassRatioSolution> {
    if !(iangle > 0.0 && iangle <= 90.0) {
        return Err(RocheError::invalid("iangle out of range 0 to 90"));
    }
    if !(pwidth > 0.0 && pwidth <= 0.25) {
        return Err(RocheError::invalid("pwidth out of range 0 to 0.25"));
    }
    if !(settings.accuracy > 0.0 && settings.accuracy <= 0.1) {
        return Err(RocheError::invalid("accuracy out of range 0 to 0.1"));
    }
    if !(settings.step > 0.0 && settings.step <= 0.1) {
        return Err(RocheError::invalid("step out of range 0 to 0.1"));
    }
    if !(settings.q_lo > 0.0 && settings.q_lo < settings.q_hi) {
        return Err(RocheError::invalid("mass ratio bracket must satisfy 0 < q_lo < q_hi"));
    }

    let blink = EclipseSettings {
        accuracy: settings.accuracy,
        ..EclipseSettings::default()
    };
    let phase = 0.5 * pwidth;
    let point = Vector3::zeros();
    let test = |q: f64| eclipsed(q, iangle, phase, point, &blink);

    let mut q_lo = settings.q_lo;
    let mut q_hi = settings.q_hi;
    let eclipsed_lo = test(q_lo);
    let eclipsed_hi = test(q_hi);
    if eclipsed_lo && eclipsed_hi {
        return Ok(MassRatioSolution::AlwaysEclipsed);
    }
    if !eclipsed_lo && !eclipsed_hi {
        return Ok(MassRatioSolution::NeverEclipsed);
    }

    while q_hi - q_lo > settings.step {
        let mid = 0.5 * (q_lo + q_hi);
        if test(mid) == eclipsed_lo {
            q_lo = mid;
        } else {
            q_hi = mid;
        }
    }
    Ok(MassRatioSolution::Converged {
        q: 0.5 * (q_lo + q_hi),
    })
}

fn validate_geometry(iangle: f64, fill_factor: f64) -> Result<()> {
    if !(iangle > 0.0 && iangle <= 90.0) {
        return Err(RocheError::invalid("iangle out of range 0 to 90"));
    }
    if !(fill_factor > 0.0 && fill_factor <= 1.0) {
        return Err(RocheError::invalid("fill factor out of range 0 to 1"));
    }
    Ok(())
}

/// The raw predicate, preconditions already checked. Intersects the sight
/// line with the sphere bounding the photosphere, then minimizes the
/// effective potential along the chord: the line crosses the photosphere
/// iff that minimum drops below the surface potential.
pub(crate) fn eclipsed(
    q: f64,
    iangle: f64,
    phase: f64,
    point: Vector3<f64>,
    settings: &EclipseSettings,
) -> bool {
    let toward_earth = earth_vector(iangle, phase);
    let centre = settings.star.centre();
    let radius = settings.fill_factor * lagrangian_distance(q, settings.star);
    let level = surface_potential(q, settings.star, settings.fill_factor);

    let offset = point - centre;
    let b = offset.dot(&toward_earth);
    let disc = b * b - (offset.norm_squared() - radius * radius);
    if disc <= 0.0 {
        return false;
    }
    let sq = disc.sqrt();
    let far = -b + sq;
    if far <= 0.0 {
        // The star lies behind the point as seen by the observer.
        return false;
    }
    let near = (-b - sq).max(0.0);

    let potential_at = |s: f64| roche_potential(q, &(point + s * toward_earth));

    // Coarse scan of the chord, bailing out on the first interior hit.
    let mut best = 0usize;
    let mut best_value = f64::INFINITY;
    for k in 0..=CHORD_SCAN {
        let s = near + (far - near) * k as f64 / CHORD_SCAN as f64;
        let value = potential_at(s);
        if value < level {
            return true;
        }
        if value < best_value {
            best_value = value;
            best = k;
        }
    }

    // Golden-section refinement around the scan minimum.
    let span = (far - near) / CHORD_SCAN as f64;
    let mut a = near + span * best.saturating_sub(1) as f64;
    let mut c = (near + span * (best + 1) as f64).min(far);
    let mut x1 = a + GOLDEN * (c - a);
    let mut x2 = c - GOLDEN * (c - a);
    let mut f1 = potential_at(x1);
    let mut f2 = potential_at(x2);
    for _ in 0..200 {
        if c - a <= settings.accuracy {
            break;
        }
        if f1.min(f2) < level {
            return true;
        }
        if f1 < f2 {
            c = x2;
            x2 = x1;
            f2 = f1;
            x1 = a + GOLDEN * (c - a);
            f1 = potential_at(x1);
        } else {
            a = x1;
            x1 = x2;
            f1 = f2;
            x2 = c - GOLDEN * (c - a);
            f2 = potential_at(x2);
        }
    }
    f1.min(f2) < level
}

/// Bisects one eclipse transition to the phase tolerance. `clear` and
/// `hidden` are phases on opposite sides of the transition; either may be
/// the numerically smaller one.
fn refine_transition(test: &impl Fn(f64) -> bool, mut clear: f64, mut hidden: f64, delta: f64) -> f64 {
    for _ in 0..200 {
        if (hidden - clear).abs() <= delta {
            break;
        }
        let mid = 0.5 * (clear + hidden);
        if test(mid) {
            hidden = mid;
        } else {
            clear = mid;
        }
    }
    0.5 * (clear + hidden)
}
