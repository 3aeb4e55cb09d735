//! Orbit parameters and partial updates
//!
//! `OrbitParameters` is the single value every dynamics function reads.
//! It only changes through a `ParameterUpdate`, which is validated as a whole
//! before anything is committed.

use log::debug;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::constants::{MAX_ECCENTRICITY, MAX_OBLIQUITY_DEG, TAU};
use crate::coordinates::{normalize_radians, Angle};
use crate::planetlib::{Planet, CUSTOM_PRESET};
use crate::{AnalemmaError, Result};

/// Shape, orientation and timing of the orbit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrbitParameters {
    /// Orbital eccentricity in `[0, 0.95]`
    pub eccentricity: f64,
    /// Scale of the orbit in scene units
    pub semi_major_axis: f64,
    /// Axial tilt in degrees, `[0, 180]`
    pub obliquity_deg: f64,
    /// Axis precession in degrees, `[0, 360)`
    pub precession_deg: f64,
    /// Length of the orbit in days
    pub sidereal_period_days: f64,
}

impl Default for OrbitParameters {
    fn default() -> Self {
        Planet::Earth.parameters()
    }
}

impl OrbitParameters {
    /// Checks every field against its range
    pub fn validate(&self) -> Result<()> {
        let e = self.eccentricity;
        if !e.is_finite() || !(0.0..=MAX_ECCENTRICITY).contains(&e) {
            return Err(AnalemmaError::InvalidParameter(format!(
                "eccentricity {} is outside [0, {}]",
                e, MAX_ECCENTRICITY
            )));
        }
        if !self.semi_major_axis.is_finite() || self.semi_major_axis <= 0.0 {
            return Err(AnalemmaError::InvalidParameter(format!(
                "semi-major axis {} must be positive",
                self.semi_major_axis
            )));
        }
        if !self.obliquity_deg.is_finite()
            || !(0.0..=MAX_OBLIQUITY_DEG).contains(&self.obliquity_deg)
        {
            return Err(AnalemmaError::InvalidParameter(format!(
                "obliquity {}° is outside [0, {}]",
                self.obliquity_deg, MAX_OBLIQUITY_DEG
            )));
        }
        if !self.precession_deg.is_finite() || !(0.0..360.0).contains(&self.precession_deg) {
            return Err(AnalemmaError::InvalidParameter(format!(
                "precession {}° is outside [0, 360)",
                self.precession_deg
            )));
        }
        if !self.sidereal_period_days.is_finite() || self.sidereal_period_days <= 0.0 {
            return Err(AnalemmaError::InvalidParameter(format!(
                "sidereal period {} days must be positive",
                self.sidereal_period_days
            )));
        }
        Ok(())
    }

    /// Axial tilt
    pub fn obliquity(&self) -> Angle {
        Angle::from_degrees(self.obliquity_deg)
    }

    /// Axis precession
    pub fn precession(&self) -> Angle {
        Angle::from_degrees(self.precession_deg)
    }

    /// Mean motion in radians per day
    pub fn mean_motion(&self) -> f64 {
        TAU / self.sidereal_period_days
    }

    /// Mean anomaly after `elapsed_days`, wrapped into `[0, 2π)`
    pub fn mean_anomaly_at(&self, elapsed_days: f64) -> f64 {
        normalize_radians(self.mean_motion() * elapsed_days)
    }

    /// Days since perihelion at which the clock reaches `mean_anomaly`
    pub fn days_for_mean_anomaly(&self, mean_anomaly: f64) -> f64 {
        normalize_radians(mean_anomaly) / self.mean_motion()
    }
}

/// Partial update of the orbit parameters
///
/// A preset is applied first; any explicit field then overrides it. Setting
/// an explicit field switches the active preset to custom.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterUpdate {
    pub eccentricity: Option<f64>,
    pub obliquity_deg: Option<f64>,
    pub precession_deg: Option<f64>,
    pub sidereal_period_days: Option<f64>,
    pub preset: Option<String>,
}

/// Parameters after an update, along with the preset that is now active
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppliedUpdate {
    pub parameters: OrbitParameters,
    /// `None` means custom values
    pub preset: Option<Planet>,
}

impl ParameterUpdate {
    /// An update selecting a named preset
    pub fn preset(name: &str) -> Self {
        Self {
            preset: Some(name.to_string()),
            ..Self::default()
        }
    }

    pub fn with_eccentricity(mut self, eccentricity: f64) -> Self {
        self.eccentricity = Some(eccentricity);
        self
    }

    pub fn with_obliquity_deg(mut self, obliquity_deg: f64) -> Self {
        self.obliquity_deg = Some(obliquity_deg);
        self
    }

    pub fn with_precession_deg(mut self, precession_deg: f64) -> Self {
        self.precession_deg = Some(precession_deg);
        self
    }

    pub fn with_sidereal_period_days(mut self, days: f64) -> Self {
        self.sidereal_period_days = Some(days);
        self
    }

    /// True when the update names nothing
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// True when any individual parameter is set
    fn has_explicit_values(&self) -> bool {
        self.eccentricity.is_some()
            || self.obliquity_deg.is_some()
            || self.precession_deg.is_some()
            || self.sidereal_period_days.is_some()
    }

    /// Parse an update from a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load an update from a JSON file
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&contents)
    }

    /// Computes the parameters this update produces, without committing them.
    ///
    /// The result is fully validated; on error `current` stays authoritative.
    pub fn apply_to(
        &self,
        current: &OrbitParameters,
        active_preset: Option<Planet>,
    ) -> Result<AppliedUpdate> {
        let mut parameters = *current;
        let mut preset = active_preset;

        if let Some(name) = &self.preset {
            if name.trim().eq_ignore_ascii_case(CUSTOM_PRESET) {
                preset = None;
            } else {
                let planet = Planet::from_name(name).ok_or_else(|| {
                    AnalemmaError::InvalidParameter(format!("unknown preset '{}'", name))
                })?;
                debug!("applying preset {}", planet);
                parameters = planet.parameters_with_axis(current.semi_major_axis);
                preset = Some(planet);
            }
        }

        if let Some(e) = self.eccentricity {
            parameters.eccentricity = e;
        }
        if let Some(obliquity) = self.obliquity_deg {
            parameters.obliquity_deg = obliquity;
        }
        if let Some(precession) = self.precession_deg {
            if !precession.is_finite() {
                return Err(AnalemmaError::InvalidParameter(format!(
                    "precession {}° is not finite",
                    precession
                )));
            }
            parameters.precession_deg = precession.rem_euclid(360.0);
            // rem_euclid of a tiny negative value rounds up to 360
            if parameters.precession_deg >= 360.0 {
                parameters.precession_deg = 0.0;
            }
        }
        if let Some(period) = self.sidereal_period_days {
            parameters.sidereal_period_days = period;
        }
        if self.has_explicit_values() {
            preset = None;
        }

        parameters.validate()?;
        Ok(AppliedUpdate { parameters, preset })
    }
}
