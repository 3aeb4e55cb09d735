//! Analemma sampling
//!
//! The analemma is the figure the sun traces when looked at from the mean-sun
//! frame once per period over a full orbit. Each sample places the planet at
//! an evenly spaced mean anomaly, turns the body frame to the mean sun and
//! records the star's direction at the display radius.

use log::{debug, warn};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::constants::{ANALEMMA_BASE_SAMPLES, MAX_ANALEMMA_SAMPLES, TAU};
use crate::framelib::{direction_at_radius, BodyFrame};
use crate::kepler::solve_kepler;
use crate::parameters::OrbitParameters;
use crate::tracker::mean_sun_angle;
use crate::{AnalemmaError, Result};

/// Sampled analemma in the mean-sun body frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalemmaCurve {
    pub points: Vec<Point3<f64>>,
    pub resolution: f64,
}

impl AnalemmaCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points as plain coordinate triples
    pub fn to_triples(&self) -> Vec<[f64; 3]> {
        self.points.iter().map(|p| [p.x, p.y, p.z]).collect()
    }

    /// Largest angular distance of the sun from the body's equator, in degrees
    pub fn max_declination_deg(&self) -> f64 {
        self.points
            .iter()
            .filter_map(|p| {
                let norm = p.coords.norm();
                (norm > 0.0).then(|| (p.y / norm).clamp(-1.0, 1.0).asin().abs())
            })
            .fold(0.0, f64::max)
            .to_degrees()
    }
}

/// Number of samples for a resolution factor: `round(366 × resolution)`,
/// at least one and at most `MAX_ANALEMMA_SAMPLES`
pub fn sample_count(resolution: f64) -> Result<usize> {
    if !resolution.is_finite() || resolution <= 0.0 {
        return Err(AnalemmaError::InvalidParameter(format!(
            "analemma resolution {} must be positive",
            resolution
        )));
    }
    let count = (ANALEMMA_BASE_SAMPLES * resolution).round();
    if count < 1.0 {
        return Err(AnalemmaError::InvalidParameter(format!(
            "analemma resolution {} yields no samples",
            resolution
        )));
    }
    if count > MAX_ANALEMMA_SAMPLES as f64 {
        return Err(AnalemmaError::InvalidParameter(format!(
            "analemma resolution {} asks for {} samples, more than {}",
            resolution, count, MAX_ANALEMMA_SAMPLES
        )));
    }
    Ok(count as usize)
}

/// Samples the analemma over one orbit.
///
/// * `frame` - The live body frame; only a copy of it is moved around
/// * `star` - World position of the star
/// * `resolution` - Samples per day of a 366 day year
/// * `display_radius` - Distance at which the points are drawn
///
/// A sample whose star direction is degenerate is skipped with a warning.
pub fn sample(
    params: &OrbitParameters,
    frame: &BodyFrame,
    star: &Point3<f64>,
    resolution: f64,
    display_radius: f64,
) -> Result<AnalemmaCurve> {
    let count = sample_count(resolution)?;
    let mut scratch = frame.clone();
    scratch.set_orientation(params.obliquity(), params.precession());

    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let mean_anomaly = TAU * i as f64 / count as f64;
        let solution = solve_kepler(-mean_anomaly, params.eccentricity, params.semi_major_axis)?;
        scratch.set_position(solution.position());

        let local = scratch.world_to_mean_sun(star, mean_sun_angle(mean_anomaly, params.precession()));
        match direction_at_radius(&local.coords, display_radius) {
            Ok(direction) => points.push(Point3::from(direction)),
            Err(e) => warn!("skipping analemma sample {}: {}", i, e),
        }
    }

    debug!(
        "sampled analemma: {} points at resolution {}",
        points.len(),
        resolution
    );
    Ok(AnalemmaCurve { points, resolution })
}
