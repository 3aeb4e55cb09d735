//! # Angle Representation Module
//!
//! Orbital parameters arrive in degrees (obliquity, precession) while every
//! dynamics computation works in radians. The `Angle` type keeps the value in
//! the unit it was given and converts only when asked, so a preset's
//! `23.4` degrees reads back as exactly `23.4`.
//!
//! ## Examples
//!
//! ```rust
//! use analemma::coordinates::Angle;
//!
//! let tilt = Angle::from_degrees(23.4);
//! assert_eq!(tilt.to_degrees(), 23.4);
//! assert!((tilt.to_radians() - 0.408407).abs() < 1e-6);
//! ```

use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{DEG2RAD, RAD2DEG, TAU};

/// Internal storage format for angle values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum AngleFormat {
    /// Angle stored in degrees
    Degrees(f64),
    /// Angle stored in radians
    Radians(f64),
}

/// An angular measurement that remembers the unit it was created in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Angle {
    angle: AngleFormat,
}

impl Angle {
    /// Creates an angle from a value in degrees
    pub fn from_degrees(degrees: f64) -> Self {
        Angle {
            angle: AngleFormat::Degrees(degrees),
        }
    }

    /// Creates an angle from a value in radians
    pub fn from_radians(radians: f64) -> Self {
        Angle {
            angle: AngleFormat::Radians(radians),
        }
    }

    /// The zero angle
    pub fn zero() -> Self {
        Angle::from_radians(0.0)
    }

    /// Returns the angle value in degrees
    pub fn to_degrees(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg,
            AngleFormat::Radians(rad) => rad * RAD2DEG,
        }
    }

    /// Returns the angle value in radians
    pub fn to_radians(&self) -> f64 {
        match self.angle {
            AngleFormat::Degrees(deg) => deg * DEG2RAD,
            AngleFormat::Radians(rad) => rad,
        }
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}°", self.to_degrees())
    }
}

/// Wraps radians into `[0, 2π)`
pub fn normalize_radians(radians: f64) -> f64 {
    let wrapped = radians.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Wraps radians into `[-π, π)`
pub fn signed_radians(radians: f64) -> f64 {
    normalize_radians(radians + PI) - PI
}

/// Picks whichever of `diff`, `diff - 2π` and `diff + 2π` has the smallest
/// magnitude. Ties keep `diff`.
pub fn smallest_magnitude_wrap(diff: f64) -> f64 {
    let mut best = diff;
    for candidate in [diff - TAU, diff + TAU] {
        if candidate.abs() < best.abs() {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_storage_is_exact() {
        assert_eq!(Angle::from_degrees(23.4).to_degrees(), 23.4);
        assert_eq!(Angle::from_radians(1.25).to_radians(), 1.25);
        assert_eq!(Angle::zero().to_degrees(), 0.0);
    }

    #[test]
    fn test_conversions() {
        assert_abs_diff_eq!(Angle::from_degrees(180.0).to_radians(), PI, epsilon = 1e-15);
        assert_abs_diff_eq!(Angle::from_radians(PI / 2.0).to_degrees(), 90.0, epsilon = 1e-12);
    }

    #[test]
    fn test_normalize_radians() {
        assert_abs_diff_eq!(normalize_radians(-PI / 2.0), 1.5 * PI, epsilon = 1e-12);
        assert_abs_diff_eq!(normalize_radians(TAU), 0.0);
        assert_eq!(normalize_radians(-1e-20), 0.0);
    }

    #[test]
    fn test_signed_radians() {
        assert_abs_diff_eq!(signed_radians(1.5 * PI), -PI / 2.0, epsilon = 1e-12);
        assert_abs_diff_eq!(signed_radians(0.25), 0.25, epsilon = 1e-15);
    }

    #[test]
    fn test_smallest_magnitude_wrap() {
        assert_abs_diff_eq!(smallest_magnitude_wrap(0.1), 0.1);
        assert_abs_diff_eq!(smallest_magnitude_wrap(TAU - 0.1), -0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(smallest_magnitude_wrap(-TAU + 0.2), 0.2, epsilon = 1e-12);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Angle::from_degrees(23.4)), "23.400°");
    }
}
