//! Kepler solver for bound elliptical orbits
//!
//! Converts mean anomaly to eccentric anomaly, true anomaly, radius and a
//! position in the orbital plane. The orbit lies in the X-Z plane with the
//! star at the origin and perihelion on the +X axis.
//!
//! The solver runs a fixed number of Newton-Raphson steps with no
//! convergence test, so every call costs the same.

use log::trace;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_ECCENTRICITY, KEPLER_ITERATIONS, ORBIT_PATH_POINTS, TAU};
use crate::coordinates::{normalize_radians, signed_radians};
use crate::parameters::OrbitParameters;
use crate::{AnalemmaError, Result};

/// Solution of Kepler's equation for one mean anomaly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KeplerSolution {
    /// Mean anomaly the solution was computed for, in radians
    pub mean_anomaly: f64,
    /// Eccentric anomaly E in radians
    pub eccentric_anomaly: f64,
    /// True anomaly ν in radians, in (-π, π]
    pub true_anomaly: f64,
    /// Distance from the star, in the units of the semi-major axis
    pub radius: f64,
}

impl KeplerSolution {
    /// Position in the orbital plane: `(r cos ν, 0, r sin ν)`
    pub fn position(&self) -> Point3<f64> {
        Point3::new(
            self.radius * self.true_anomaly.cos(),
            0.0,
            self.radius * self.true_anomaly.sin(),
        )
    }
}

/// Rejects eccentricities that do not describe a bound ellipse
pub fn validate_eccentricity(eccentricity: f64) -> Result<()> {
    if !eccentricity.is_finite() || !(0.0..1.0).contains(&eccentricity) {
        return Err(AnalemmaError::InvalidParameter(format!(
            "eccentricity {} must lie in [0, 1)",
            eccentricity
        )));
    }
    Ok(())
}

/// Solve Kepler's equation `M = E - e sin(E)` and derive the orbital position
///
/// # Arguments
///
/// * `mean_anomaly` - Mean anomaly M in radians (any sign, any number of turns)
/// * `eccentricity` - Orbital eccentricity, `0 <= e < 1`
/// * `semi_major_axis` - Scale of the orbit
///
/// # Errors
///
/// `InvalidParameter` when the eccentricity is outside `[0, 1)` or the mean
/// anomaly is not finite.
pub fn solve_kepler(
    mean_anomaly: f64,
    eccentricity: f64,
    semi_major_axis: f64,
) -> Result<KeplerSolution> {
    validate_eccentricity(eccentricity)?;
    if !mean_anomaly.is_finite() {
        return Err(AnalemmaError::InvalidParameter(format!(
            "mean anomaly {} is not finite",
            mean_anomaly
        )));
    }

    let e = eccentricity;
    let ecc_anomaly = eccentric_anomaly(mean_anomaly, e);
    let true_anomaly =
        2.0 * (((1.0 + e) / (1.0 - e)).sqrt() * (ecc_anomaly / 2.0).tan()).atan();
    let radius = semi_major_axis * (1.0 - e * ecc_anomaly.cos());

    Ok(KeplerSolution {
        mean_anomaly,
        eccentric_anomaly: ecc_anomaly,
        true_anomaly,
        radius,
    })
}

/// Fixed-iteration Newton-Raphson on Kepler's equation
fn eccentric_anomaly(mean_anomaly: f64, e: f64) -> f64 {
    let mut x = starting_guess(mean_anomaly, e);
    for _ in 0..KEPLER_ITERATIONS {
        x -= (x - e * x.sin() - mean_anomaly) / (1.0 - e * x.cos());
    }
    x
}

/// Seed for the Newton iteration.
///
/// Below `HIGH_ECCENTRICITY` the seed is the mean anomaly itself. Above it,
/// four steps from that seed are not enough near perihelion, so the seed is
/// the real root of the cubic `(1 - e) E + e E³ / 6 = M` (Kepler's equation
/// with `sin E` expanded to third order), taken on the wrapped anomaly.
fn starting_guess(mean_anomaly: f64, e: f64) -> f64 {
    if e < HIGH_ECCENTRICITY {
        return mean_anomaly;
    }

    let m = signed_radians(mean_anomaly);
    let turns = mean_anomaly - m;

    // E³ + pE + q = 0
    let p = 6.0 * (1.0 - e) / e;
    let q = -6.0 * m / e;
    let d = (q * q / 4.0 + p * p * p / 27.0).sqrt();
    turns + (-q / 2.0 + d).cbrt() + (-q / 2.0 - d).cbrt()
}

/// Eccentric anomaly from true anomaly (closed form)
pub fn true_to_eccentric_anomaly(true_anomaly: f64, eccentricity: f64) -> f64 {
    let e = eccentricity;
    2.0 * ((true_anomaly / 2.0).tan() * ((1.0 - e) / (1.0 + e)).sqrt()).atan()
}

/// Mean anomaly from eccentric anomaly (Kepler's equation, forward direction)
pub fn eccentric_to_mean_anomaly(eccentric_anomaly: f64, eccentricity: f64) -> f64 {
    eccentric_anomaly - eccentricity * eccentric_anomaly.sin()
}

/// Mean anomaly for a given true anomaly, normalized into `[0, 2π)`
pub fn true_to_mean_anomaly(true_anomaly: f64, eccentricity: f64) -> Result<f64> {
    validate_eccentricity(eccentricity)?;
    let ecc = true_to_eccentric_anomaly(true_anomaly, eccentricity);
    Ok(normalize_radians(eccentric_to_mean_anomaly(ecc, eccentricity)))
}

/// Live orbital state of the planet at a given simulated time
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitalState {
    /// Clock-driven mean anomaly in `[0, 2π)`
    pub mean_anomaly: f64,
    /// Eccentric anomaly of the solved (retrograde) position
    pub eccentric_anomaly: f64,
    /// True anomaly of the solved (retrograde) position
    pub true_anomaly: f64,
    /// Distance from the star
    pub radius: f64,
    /// Planet position in the orbital X-Z plane
    pub position: Point3<f64>,
}

impl OrbitalState {
    /// Computes the state from scratch for `elapsed_days`.
    ///
    /// The solver is fed the negated mean anomaly: seen from the planet, the
    /// star's apparent motion runs opposite to the orbital motion.
    pub fn at(elapsed_days: f64, params: &OrbitParameters) -> Result<Self> {
        let mean_anomaly = params.mean_anomaly_at(elapsed_days);
        let solution = solve_kepler(-mean_anomaly, params.eccentricity, params.semi_major_axis)?;
        trace!(
            "orbit at day {:.3}: M={:.5} E={:.5} nu={:.5} r={:.4}",
            elapsed_days,
            mean_anomaly,
            solution.eccentric_anomaly,
            solution.true_anomaly,
            solution.radius
        );
        Ok(Self {
            mean_anomaly,
            eccentric_anomaly: solution.eccentric_anomaly,
            true_anomaly: solution.true_anomaly,
            radius: solution.radius,
            position: solution.position(),
        })
    }
}

/// The drawn orbit: one point per degree of mean anomaly, closed at 360°
pub fn orbit_path(params: &OrbitParameters) -> Result<Vec<Point3<f64>>> {
    (0..ORBIT_PATH_POINTS)
        .map(|i| {
            let mean_anomaly = i as f64 * TAU / (ORBIT_PATH_POINTS - 1) as f64;
            solve_kepler(mean_anomaly, params.eccentricity, params.semi_major_axis)
                .map(|s| s.position())
        })
        .collect()
}

/// Closest point of the orbit to the star
pub fn perihelion(params: &OrbitParameters) -> Point3<f64> {
    Point3::new(params.semi_major_axis * (1.0 - params.eccentricity), 0.0, 0.0)
}

/// Farthest point of the orbit from the star
pub fn aphelion(params: &OrbitParameters) -> Point3<f64> {
    Point3::new(-params.semi_major_axis * (1.0 + params.eccentricity), 0.0, 0.0)
}
