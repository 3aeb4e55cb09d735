//! Apparent sun tracker
//!
//! Each tick the tracker places the planet on its orbit, looks at the star
//! from the planet's body frame and compares the sun's apparent longitude
//! with the uniformly moving mean sun. The difference is the equation of
//! time; its rate of change gives the length of the solar day.

use log::{trace, warn};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::constants::{DAY_S, DEGENERATE_DIRECTION_TOLERANCE, DEG_PER_HOUR, HOUR_S, RAD2DEG};
use crate::coordinates::{normalize_radians, smallest_magnitude_wrap, Angle};
use crate::framelib::BodyFrame;
use crate::kepler::OrbitalState;
use crate::parameters::OrbitParameters;
use crate::{AnalemmaError, Result};

/// Everything the tracker derives in one tick
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApparentSunSample {
    /// Longitude of the star in the body's equatorial plane, `[0, 2π)`
    pub true_anomaly_in_body_frame: f64,
    /// Longitude of the mean sun, `(M - precession)` wrapped into `[0, 2π)`
    pub mean_anomaly_adjusted_for_precession: f64,
    /// Apparent minus mean solar time, in seconds
    pub equation_of_time_seconds: f64,
    /// Length of the current solar day, in seconds
    pub solar_day_seconds: f64,
}

impl Default for ApparentSunSample {
    fn default() -> Self {
        Self {
            true_anomaly_in_body_frame: 0.0,
            mean_anomaly_adjusted_for_precession: 0.0,
            equation_of_time_seconds: 0.0,
            solar_day_seconds: DAY_S,
        }
    }
}

/// What the rendering layer reads about the sun
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ApparentSun {
    /// Apparent solar longitude in the body frame, radians
    pub angle: f64,
    pub equation_of_time_seconds: f64,
    pub solar_day_seconds: f64,
}

impl From<&ApparentSunSample> for ApparentSun {
    fn from(sample: &ApparentSunSample) -> Self {
        Self {
            angle: sample.true_anomaly_in_body_frame,
            equation_of_time_seconds: sample.equation_of_time_seconds,
            solar_day_seconds: sample.solar_day_seconds,
        }
    }
}

/// Longitude of the mean sun in the body frame
pub fn mean_sun_angle(mean_anomaly: f64, precession: Angle) -> f64 {
    normalize_radians(mean_anomaly - precession.to_radians())
}

/// Longitude of `star` in the body's equatorial plane, measured as
/// `atan2(z, -x)` and wrapped into `[0, 2π)`.
///
/// Fails with `NumericDegeneracy` when the star lies on (or within rounding
/// of) the body's axis, or coincides with the planet.
pub fn apparent_angle(frame: &BodyFrame, star: &Point3<f64>) -> Result<f64> {
    let local = frame.world_to_body(star);
    let (x, z) = (local.x, local.z);
    if x.hypot(z) <= DEGENERATE_DIRECTION_TOLERANCE * local.coords.norm() {
        return Err(AnalemmaError::NumericDegeneracy(format!(
            "star direction {:?} has no equatorial component",
            local
        )));
    }
    Ok(normalize_radians(z.atan2(-x)))
}

/// Converts an apparent/mean longitude pair into seconds of solar time.
///
/// The longitude difference is replaced by its ±2π alternative when that
/// one is smaller in magnitude.
pub fn equation_of_time_seconds(apparent_angle: f64, mean_angle: f64) -> f64 {
    let diff = smallest_magnitude_wrap(apparent_angle - mean_angle);
    diff * RAD2DEG / DEG_PER_HOUR * HOUR_S
}

/// Per-tick apparent sun computation
///
/// The tracker's only memory is the previous tick's equation of time, used
/// for the finite-difference solar day.
#[derive(Debug, Clone, Default)]
pub struct ApparentSunTracker {
    previous_equation_of_time: Option<f64>,
    sample: ApparentSunSample,
}

impl ApparentSunTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest sample
    pub fn sample(&self) -> &ApparentSunSample {
        &self.sample
    }

    /// Equation of time of the last advancing tick
    pub fn previous_equation_of_time(&self) -> Option<f64> {
        self.previous_equation_of_time
    }

    /// Drops the finite-difference history; the next tick starts a new one.
    /// Used after a parameter change, when the old value no longer belongs
    /// to the same curve.
    pub fn reset(&mut self) {
        self.previous_equation_of_time = None;
    }

    /// Runs one tick.
    ///
    /// * `elapsed_days` - Simulated time since perihelion
    /// * `delta_days` - Simulated time since the previous tick; zero while
    ///   paused, which freezes the solar day
    /// * `frame` - The live body frame; its position is moved to the planet
    /// * `star` - World position of the star
    ///
    /// When the star direction is degenerate the frame still moves, but the
    /// sample and the solar-day history are left as they were.
    pub fn update(
        &mut self,
        elapsed_days: f64,
        delta_days: f64,
        params: &OrbitParameters,
        frame: &mut BodyFrame,
        star: &Point3<f64>,
    ) -> Result<OrbitalState> {
        let state = OrbitalState::at(elapsed_days, params)?;
        frame.set_position(state.position);

        let apparent = match apparent_angle(frame, star) {
            Ok(angle) => angle,
            Err(AnalemmaError::NumericDegeneracy(reason)) => {
                warn!("skipping sun update at day {:.3}: {}", elapsed_days, reason);
                return Ok(state);
            }
            Err(e) => return Err(e),
        };
        let mean_angle = mean_sun_angle(state.mean_anomaly, params.precession());
        self.sample.true_anomaly_in_body_frame = apparent;
        self.sample.mean_anomaly_adjusted_for_precession = mean_angle;

        let eot = equation_of_time_seconds(self.sample.true_anomaly_in_body_frame, mean_angle);
        self.sample.equation_of_time_seconds = eot;

        if delta_days > 0.0 {
            if let Some(previous) = self.previous_equation_of_time {
                self.sample.solar_day_seconds = DAY_S + (eot - previous) / delta_days;
            }
            self.previous_equation_of_time = Some(eot);
        } else if self.previous_equation_of_time.is_none() {
            self.previous_equation_of_time = Some(eot);
        }

        trace!(
            "sun at day {:.3}: apparent={:.5} mean={:.5} eot={:.2}s day={:.3}s",
            elapsed_days,
            self.sample.true_anomaly_in_body_frame,
            mean_angle,
            eot,
            self.sample.solar_day_seconds
        );
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;
    use std::f64::consts::PI;

    fn params(eccentricity: f64, obliquity_deg: f64, precession_deg: f64) -> OrbitParameters {
        OrbitParameters {
            eccentricity,
            obliquity_deg,
            precession_deg,
            ..OrbitParameters::default()
        }
    }

    /// Largest |EoT| over one orbit, sampled every half day
    fn eot_amplitude(params: &OrbitParameters) -> f64 {
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(params);
        let steps = (params.sidereal_period_days * 2.0) as usize;
        (0..steps)
            .map(|i| {
                tracker
                    .update(i as f64 * 0.5, 0.5, params, &mut frame, &Point3::origin())
                    .unwrap();
                tracker.sample().equation_of_time_seconds.abs()
            })
            .fold(0.0, f64::max)
    }

    #[rstest]
    #[case(0.0)]
    #[case(77.0)]
    #[case(200.0)]
    fn test_circular_untilted_orbit_has_no_equation_of_time(#[case] precession: f64) {
        assert!(eot_amplitude(&params(0.0, 0.0, precession)) < 1e-6);
    }

    #[test]
    fn test_obliquity_component() {
        // tan²(ε/2) radians of longitude at ε = 23.4°: about 9.8 minutes
        let amplitude = eot_amplitude(&params(0.0, 23.4, 0.0));
        assert!((560.0..620.0).contains(&amplitude), "amplitude {}", amplitude);
    }

    #[test]
    fn test_eccentricity_component() {
        // 2e radians of longitude at e = 0.0167: about 7.7 minutes
        let amplitude = eot_amplitude(&params(0.0167, 0.0, 0.0));
        assert!((430.0..490.0).contains(&amplitude), "amplitude {}", amplitude);
    }

    #[test]
    fn test_earth_extremes() {
        let amplitude = eot_amplitude(&OrbitParameters::default());
        // early November peak of roughly 16 minutes
        assert!((900.0..1050.0).contains(&amplitude), "amplitude {}", amplitude);
    }

    #[test]
    fn test_apparent_angle_convention() {
        let mut frame = BodyFrame::new(&params(0.0, 0.0, 0.0));
        frame.set_position(Point3::new(90.0, 0.0, 0.0));
        // star seen along -X: angle zero
        assert_abs_diff_eq!(apparent_angle(&frame, &Point3::origin()).unwrap(), 0.0);

        frame.set_position(Point3::new(0.0, 0.0, -90.0));
        assert_abs_diff_eq!(
            apparent_angle(&frame, &Point3::origin()).unwrap(),
            PI / 2.0,
            epsilon = 1e-12
        );

        frame.set_position(Point3::new(0.0, 0.0, 90.0));
        assert_abs_diff_eq!(
            apparent_angle(&frame, &Point3::origin()).unwrap(),
            1.5 * PI,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_apparent_angle_degenerate_on_axis() {
        let mut frame = BodyFrame::new(&params(0.0, 0.0, 0.0));
        frame.set_position(Point3::new(0.0, 10.0, 0.0));
        assert!(matches!(
            apparent_angle(&frame, &Point3::origin()),
            Err(AnalemmaError::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn test_apparent_angle_degenerate_near_tilted_axis() {
        let p = params(0.0167, 23.4, 0.0);
        let mut frame = BodyFrame::new(&p);
        frame.set_position(Point3::new(40.0, 0.0, -70.0));
        // rounding leaves a tiny equatorial component along the tilted pole
        let star = frame.position() + frame.pole().into_inner() * 10.0;
        assert!(matches!(
            apparent_angle(&frame, &star),
            Err(AnalemmaError::NumericDegeneracy(_))
        ));
    }

    #[test]
    fn test_degenerate_tick_is_skipped() {
        let p = params(0.0167, 23.4, 0.0);
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(&p);
        tracker.update(100.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        tracker.update(101.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        let sample = *tracker.sample();
        let history = tracker.previous_equation_of_time();

        let next = OrbitalState::at(102.0, &p).unwrap();
        let star = next.position + frame.pole().into_inner() * 10.0;
        let state = tracker.update(102.0, 1.0, &p, &mut frame, &star).unwrap();

        assert_eq!(state, next);
        assert_eq!(frame.position(), next.position);
        assert_eq!(*tracker.sample(), sample);
        assert_eq!(tracker.previous_equation_of_time(), history);

        // the next regular tick differences against the last good value
        tracker.update(103.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        let eot = tracker.sample().equation_of_time_seconds;
        assert_abs_diff_eq!(
            tracker.sample().solar_day_seconds,
            DAY_S + (eot - history.unwrap()) / 1.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_equation_of_time_wraps_to_smaller_magnitude() {
        // apparent just past zero, mean just before 2π: a small positive lead
        let eot = equation_of_time_seconds(0.01, 2.0 * PI - 0.01);
        assert_abs_diff_eq!(eot, 0.02 * RAD2DEG / 15.0 * 3600.0, epsilon = 1e-6);

        let eot = equation_of_time_seconds(2.0 * PI - 0.01, 0.01);
        assert_abs_diff_eq!(eot, -0.02 * RAD2DEG / 15.0 * 3600.0, epsilon = 1e-6);

        // one degree of longitude is four minutes
        assert_abs_diff_eq!(
            equation_of_time_seconds(1.0_f64.to_radians(), 0.0),
            240.0,
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_mean_sun_angle() {
        assert_abs_diff_eq!(
            mean_sun_angle(0.0, Angle::from_degrees(90.0)),
            1.5 * PI,
            epsilon = 1e-12
        );
        assert_abs_diff_eq!(mean_sun_angle(PI, Angle::zero()), PI);
    }

    #[test]
    fn test_first_tick_reports_nominal_day() {
        let p = OrbitParameters::default();
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(&p);
        tracker.update(10.0, 0.1, &p, &mut frame, &Point3::origin()).unwrap();
        assert_eq!(tracker.sample().solar_day_seconds, DAY_S);
        assert!(tracker.previous_equation_of_time().is_some());
    }

    #[test]
    fn test_solar_day_from_finite_difference() {
        let p = OrbitParameters::default();
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(&p);
        tracker.update(100.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        let first = tracker.sample().equation_of_time_seconds;
        tracker.update(101.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        let second = tracker.sample().equation_of_time_seconds;
        assert_abs_diff_eq!(
            tracker.sample().solar_day_seconds,
            DAY_S + (second - first),
            epsilon = 1e-9
        );
        // Earth's solar day stays within half a minute of 24 hours
        assert!((tracker.sample().solar_day_seconds - DAY_S).abs() < 30.0);
    }

    #[test]
    fn test_solar_day_independent_of_step_size() {
        let p = OrbitParameters::default();
        let solar_day = |step: f64| {
            let mut tracker = ApparentSunTracker::new();
            let mut frame = BodyFrame::new(&p);
            tracker.update(200.0, step, &p, &mut frame, &Point3::origin()).unwrap();
            tracker
                .update(200.0 + step, step, &p, &mut frame, &Point3::origin())
                .unwrap();
            tracker.sample().solar_day_seconds
        };
        assert_abs_diff_eq!(solar_day(0.01), solar_day(0.1), epsilon = 0.1);
    }

    #[test]
    fn test_zero_delta_freezes_solar_day() {
        let p = OrbitParameters::default();
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(&p);
        tracker.update(50.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        tracker.update(51.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        let frozen = tracker.sample().solar_day_seconds;
        for _ in 0..3 {
            tracker.update(51.0, 0.0, &p, &mut frame, &Point3::origin()).unwrap();
        }
        assert_eq!(tracker.sample().solar_day_seconds, frozen);
        assert!(tracker.sample().solar_day_seconds.is_finite());
    }

    #[test]
    fn test_reset_forgets_history() {
        let p = OrbitParameters::default();
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(&p);
        tracker.update(5.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        tracker.reset();
        assert_eq!(tracker.previous_equation_of_time(), None);
    }

    #[test]
    fn test_update_moves_frame() {
        let p = OrbitParameters::default();
        let mut tracker = ApparentSunTracker::new();
        let mut frame = BodyFrame::new(&p);
        let state = tracker.update(30.0, 1.0, &p, &mut frame, &Point3::origin()).unwrap();
        assert_eq!(frame.position(), state.position);
    }
}
