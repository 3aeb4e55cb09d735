//! Planet presets
//!
//! Named bodies of the solar system with the orbital elements the engine
//! needs: eccentricity, axial tilt, axis precession and sidereal period.

use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;

use crate::constants::DEFAULT_SEMI_MAJOR_AXIS;
use crate::parameters::OrbitParameters;

/// Enum representing the planets that have presets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Planet {
    Mercury,
    Venus,
    Earth,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
}

/// Name of the pseudo-preset that keeps the current values
pub const CUSTOM_PRESET: &str = "custom";

lazy_static! {
    /// Map from lowercase preset names to planets
    static ref PLANETS_BY_NAME: HashMap<&'static str, Planet> = {
        let mut m = HashMap::new();
        for planet in Planet::ALL.iter() {
            m.insert(planet.key(), *planet);
        }
        m
    };
}

impl Planet {
    /// Every planet with a preset, in order from the sun
    pub const ALL: [Planet; 9] = [
        Planet::Mercury,
        Planet::Venus,
        Planet::Earth,
        Planet::Mars,
        Planet::Jupiter,
        Planet::Saturn,
        Planet::Uranus,
        Planet::Neptune,
        Planet::Pluto,
    ];

    /// Get the planet's name as a string
    pub fn name(&self) -> &'static str {
        match self {
            Planet::Mercury => "Mercury",
            Planet::Venus => "Venus",
            Planet::Earth => "Earth",
            Planet::Mars => "Mars",
            Planet::Jupiter => "Jupiter",
            Planet::Saturn => "Saturn",
            Planet::Uranus => "Uranus",
            Planet::Neptune => "Neptune",
            Planet::Pluto => "Pluto",
        }
    }

    /// Lowercase preset key
    pub fn key(&self) -> &'static str {
        match self {
            Planet::Mercury => "mercury",
            Planet::Venus => "venus",
            Planet::Earth => "earth",
            Planet::Mars => "mars",
            Planet::Jupiter => "jupiter",
            Planet::Saturn => "saturn",
            Planet::Uranus => "uranus",
            Planet::Neptune => "neptune",
            Planet::Pluto => "pluto",
        }
    }

    /// Look a planet up by name, ignoring case and surrounding whitespace
    pub fn from_name(name: &str) -> Option<Planet> {
        PLANETS_BY_NAME
            .get(name.trim().to_lowercase().as_str())
            .copied()
    }

    /// Orbital eccentricity
    pub fn eccentricity(&self) -> f64 {
        match self {
            Planet::Mercury => 0.2056,
            Planet::Venus => 0.00677,
            Planet::Earth => 0.0167,
            Planet::Mars => 0.0934,
            Planet::Jupiter => 0.0489,
            Planet::Saturn => 0.0565,
            Planet::Uranus => 0.04717,
            Planet::Neptune => 0.008678,
            Planet::Pluto => 0.2488,
        }
    }

    /// Axial tilt in degrees
    pub fn obliquity_deg(&self) -> f64 {
        match self {
            Planet::Mercury => 0.034,
            Planet::Venus => 2.64,
            Planet::Earth => 23.4,
            Planet::Mars => 25.19,
            Planet::Jupiter => 3.13,
            Planet::Saturn => 26.73,
            Planet::Uranus => 97.77,
            Planet::Neptune => 28.3,
            Planet::Pluto => 122.53,
        }
    }

    /// Direction of the tilted axis relative to perihelion, in degrees.
    ///
    /// Only Earth carries a measured value; the other presets start with the
    /// axis aligned to the perihelion direction.
    pub fn precession_deg(&self) -> f64 {
        match self {
            Planet::Earth => 77.0,
            _ => 0.0,
        }
    }

    /// Sidereal orbital period in days
    pub fn sidereal_period_days(&self) -> f64 {
        match self {
            Planet::Mercury => 87.968,
            Planet::Venus => 224.7,
            Planet::Earth => 365.2422,
            Planet::Mars => 686.98,
            Planet::Jupiter => 4332.6,
            Planet::Saturn => 10759.2,
            Planet::Uranus => 30688.5,
            Planet::Neptune => 60195.0,
            Planet::Pluto => 90560.0,
        }
    }

    /// Full parameter set for this planet at the default scene scale
    pub fn parameters(&self) -> OrbitParameters {
        self.parameters_with_axis(DEFAULT_SEMI_MAJOR_AXIS)
    }

    /// Full parameter set for this planet at a given scene scale
    pub fn parameters_with_axis(&self, semi_major_axis: f64) -> OrbitParameters {
        OrbitParameters {
            eccentricity: self.eccentricity(),
            semi_major_axis,
            obliquity_deg: self.obliquity_deg(),
            precession_deg: self.precession_deg(),
            sidereal_period_days: self.sidereal_period_days(),
        }
    }
}

impl fmt::Display for Planet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every accepted preset name, including the custom pseudo-preset
pub fn preset_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Planet::ALL.iter().map(|p| p.key()).collect();
    names.push(CUSTOM_PRESET);
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(Planet::from_name("earth"), Some(Planet::Earth));
        assert_eq!(Planet::from_name("  Mars "), Some(Planet::Mars));
        assert_eq!(Planet::from_name("URANUS"), Some(Planet::Uranus));
        assert_eq!(Planet::from_name("vulcan"), None);
        assert_eq!(Planet::from_name(CUSTOM_PRESET), None);
    }

    #[test]
    fn test_keys_round_trip() {
        for planet in Planet::ALL {
            assert_eq!(Planet::from_name(planet.key()), Some(planet));
            assert_eq!(Planet::from_name(planet.name()), Some(planet));
        }
    }

    #[test]
    fn test_presets_are_valid() {
        for planet in Planet::ALL {
            let params = planet.parameters();
            assert!(params.validate().is_ok(), "{} preset invalid", planet);
        }
    }

    #[test]
    fn test_earth_preset() {
        let params = Planet::Earth.parameters();
        assert_eq!(params.eccentricity, 0.0167);
        assert_eq!(params.obliquity_deg, 23.4);
        assert_eq!(params.precession_deg, 77.0);
        assert_eq!(params.sidereal_period_days, 365.2422);
        assert_eq!(params.semi_major_axis, DEFAULT_SEMI_MAJOR_AXIS);
    }

    #[test]
    fn test_preset_names() {
        let names = preset_names();
        assert_eq!(names.len(), 10);
        assert_eq!(names[0], "mercury");
        assert_eq!(*names.last().unwrap(), "custom");
    }
}
