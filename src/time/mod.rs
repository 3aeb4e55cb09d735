//! Simulation time
//!
//! The simulation measures time in days since perihelion. This module owns
//! the clock that advances it and the mapping from simulated days to calendar
//! dates and display strings.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use log::trace;
use serde::{Deserialize, Serialize};

use crate::constants::{DAY_S, HOUR_S, PERIHELION_DAY_OF_JANUARY, REFERENCE_YEAR, TAU};
use crate::coordinates::normalize_radians;
use crate::{AnalemmaError, Result};

/// Clock driving every orbital phase angle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimulationClock {
    /// Simulated days since perihelion
    pub elapsed_days: f64,
    /// Whether the last tick was paused
    pub is_paused: bool,
    /// Simulated days per wall-clock second
    pub rate: f64,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self {
            elapsed_days: 0.0,
            is_paused: false,
            rate: 1.0,
        }
    }
}

impl SimulationClock {
    /// A clock starting at `elapsed_days`
    pub fn starting_at(elapsed_days: f64) -> Self {
        Self {
            elapsed_days,
            ..Self::default()
        }
    }

    /// Advances the clock by one frame and returns the simulated days that
    /// passed. A paused clock records the settings and returns zero.
    pub fn tick(&mut self, delta_seconds: f64, rate: f64, is_paused: bool) -> Result<f64> {
        if !delta_seconds.is_finite() || delta_seconds < 0.0 {
            return Err(AnalemmaError::InvalidParameter(format!(
                "frame delta {}s must be finite and non-negative",
                delta_seconds
            )));
        }
        if !rate.is_finite() || rate < 0.0 {
            return Err(AnalemmaError::InvalidParameter(format!(
                "clock rate {} must be finite and non-negative",
                rate
            )));
        }

        self.rate = rate;
        self.is_paused = is_paused;
        if is_paused {
            return Ok(0.0);
        }

        let delta_days = delta_seconds * rate;
        self.elapsed_days += delta_days;
        trace!(
            "clock +{:.6} days -> {:.6}",
            delta_days,
            self.elapsed_days
        );
        Ok(delta_days)
    }

    /// Rotation of the planet about its own axis, one turn per day
    pub fn spin_angle(&self) -> f64 {
        normalize_radians(TAU * self.elapsed_days)
    }
}

/// Midnight of the reference year's perihelion day
pub fn reference_perihelion() -> Result<NaiveDateTime> {
    NaiveDate::from_ymd_opt(REFERENCE_YEAR, 1, PERIHELION_DAY_OF_JANUARY)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .ok_or_else(|| {
            AnalemmaError::InvalidParameter(format!(
                "no perihelion date for year {}",
                REFERENCE_YEAR
            ))
        })
}

/// Calendar date reached `days` after the reference perihelion
pub fn date_after_perihelion(days: f64) -> Result<NaiveDateTime> {
    let out_of_range =
        || AnalemmaError::InvalidParameter(format!("{} days is outside the calendar", days));
    if !days.is_finite() {
        return Err(out_of_range());
    }
    let millis = (days * DAY_S * 1000.0).round();
    if millis.abs() >= i64::MAX as f64 {
        return Err(out_of_range());
    }
    let offset = Duration::try_milliseconds(millis as i64).ok_or_else(out_of_range)?;
    reference_perihelion()?
        .checked_add_signed(offset)
        .ok_or_else(out_of_range)
}

/// ISO date string, e.g. `2023-03-21`
pub fn date_label(days: f64) -> Result<String> {
    Ok(date_after_perihelion(days)?.format("%Y-%m-%d").to_string())
}

/// Month and day, e.g. `March 21`
pub fn month_day_label(days: f64) -> Result<String> {
    Ok(date_after_perihelion(days)?.format("%B %-d").to_string())
}

/// Formats an equation-of-time value as `HH:MM:SS`, zero padded, with a
/// ` before` suffix when the apparent sun trails the mean sun.
pub fn format_equation_of_time(seconds: f64) -> String {
    let flag = if seconds < 0.0 { " before" } else { "" };
    let seconds = seconds.abs();
    let hours = (seconds / HOUR_S).floor();
    let minutes = ((seconds - hours * HOUR_S) / 60.0).floor();
    let secs = (seconds - minutes * 60.0 - hours * HOUR_S).floor();
    format!(
        "{:02}:{:02}:{:02}{}",
        hours as u64, minutes as u64, secs as u64, flag
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_tick_advances_by_rate() {
        let mut clock = SimulationClock::default();
        let dt = clock.tick(0.5, 4.0, false).unwrap();
        assert_eq!(dt, 2.0);
        assert_eq!(clock.elapsed_days, 2.0);
        assert_eq!(clock.rate, 4.0);
        assert!(!clock.is_paused);
    }

    #[test]
    fn test_paused_tick_freezes_time() {
        let mut clock = SimulationClock::starting_at(10.0);
        for _ in 0..5 {
            assert_eq!(clock.tick(0.016, 100.0, true).unwrap(), 0.0);
        }
        assert_eq!(clock.elapsed_days, 10.0);
        assert!(clock.is_paused);
    }

    #[test]
    fn test_zero_rate_is_allowed() {
        let mut clock = SimulationClock::default();
        assert_eq!(clock.tick(1.0, 0.0, false).unwrap(), 0.0);
        assert_eq!(clock.elapsed_days, 0.0);
    }

    #[test]
    fn test_invalid_ticks() {
        let mut clock = SimulationClock::default();
        assert!(clock.tick(-1.0, 1.0, false).is_err());
        assert!(clock.tick(f64::NAN, 1.0, false).is_err());
        assert!(clock.tick(1.0, -2.0, false).is_err());
        assert!(clock.tick(1.0, f64::INFINITY, false).is_err());
        assert_eq!(clock, SimulationClock::default());
    }

    #[test]
    fn test_spin_angle() {
        assert_eq!(SimulationClock::starting_at(2.0).spin_angle(), 0.0);
        assert_abs_diff_eq!(
            SimulationClock::starting_at(2.25).spin_angle(),
            TAU / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_reference_perihelion() {
        let date = reference_perihelion().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2023, 1, 4));
        assert_eq!(date.hour(), 0);
    }

    #[test]
    fn test_date_after_perihelion() {
        let date = date_after_perihelion(76.5).unwrap();
        assert_eq!((date.month(), date.day(), date.hour()), (3, 21, 12));
        assert_eq!(date_label(0.0).unwrap(), "2023-01-04");
        assert_eq!(date_label(365.0).unwrap(), "2024-01-04");
        assert_eq!(month_day_label(76.2).unwrap(), "March 21");
        assert_eq!(month_day_label(-4.0).unwrap(), "December 31");
        assert!(date_after_perihelion(f64::NAN).is_err());
        assert!(date_after_perihelion(1e300).is_err());
    }

    #[test]
    fn test_clock_date() {
        let clock = SimulationClock::starting_at(27.0);
        assert_eq!(date_label(clock.elapsed_days).unwrap(), "2023-01-31");
    }

    #[test]
    fn test_format_equation_of_time() {
        assert_eq!(format_equation_of_time(0.0), "00:00:00");
        assert_eq!(format_equation_of_time(443.7), "00:07:23");
        assert_eq!(format_equation_of_time(-443.7), "00:07:23 before");
        assert_eq!(format_equation_of_time(3_725.0), "01:02:05");
        assert_eq!(format_equation_of_time(-59.9), "00:00:59 before");
    }
}
