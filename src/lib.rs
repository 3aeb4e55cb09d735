//! Analemma: orbital dynamics engine for planetary visualizations
//!
//! This crate animates a planet on an idealized two-body Kepler orbit and
//! derives what an observer standing on it would see of the sun: the
//! apparent solar longitude, the equation of time, the length of the solar
//! day, the analemma traced over one orbit, and the dates of the equinoxes
//! and solstices.
//!
//! The rendering layer drives a [`Simulation`] once per frame and reads the
//! positions, angles and labels it produces.
//!
//! ```rust
//! use analemma::{ParameterUpdate, Simulation};
//!
//! let mut sim = Simulation::new(Default::default()).unwrap();
//! sim.set_parameters(&ParameterUpdate::preset("mars")).unwrap();
//!
//! let state = sim.advance(1.0 / 60.0, 10.0, false).unwrap();
//! assert!(state.radius > 0.0);
//! println!("equation of time: {:.1}s", sim.apparent_sun().equation_of_time_seconds);
//! ```

use thiserror::Error;

pub mod almanac;
pub mod analemma;
pub mod constants;
pub mod coordinates;
pub mod framelib;
pub mod kepler;
pub mod parameters;
pub mod planetlib;
pub mod simulation;
pub mod time;
pub mod tracker;

// Re-export commonly used types
pub use almanac::{CardinalEpochs, CardinalPoint};
pub use analemma::AnalemmaCurve;
pub use coordinates::Angle;
pub use framelib::BodyFrame;
pub use kepler::{solve_kepler, KeplerSolution, OrbitalState};
pub use parameters::{OrbitParameters, ParameterUpdate};
pub use planetlib::Planet;
pub use simulation::{Report, Simulation, SimulationConfig, Snapshot};
pub use time::SimulationClock;
pub use tracker::{ApparentSun, ApparentSunSample, ApparentSunTracker};

/// Main error type for the analemma library
#[derive(Debug, Error)]
pub enum AnalemmaError {
    /// A parameter violated its contract; rejected before reaching the solver
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A computation hit a degenerate input (zero-length vector, zero time step)
    #[error("Numeric degeneracy: {0}")]
    NumericDegeneracy(String),

    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

/// Result type for analemma operations
pub type Result<T> = std::result::Result<T, AnalemmaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = AnalemmaError::InvalidParameter("eccentricity 1.2 is outside [0, 0.95]".into());
        assert_eq!(
            err.to_string(),
            "Invalid parameter: eccentricity 1.2 is outside [0, 0.95]"
        );

        let err = AnalemmaError::NumericDegeneracy("zero-length vector".into());
        assert_eq!(err.to_string(), "Numeric degeneracy: zero-length vector");
    }

    #[test]
    fn test_io_error_conversion() {
        fn open_missing() -> Result<std::fs::File> {
            Ok(std::fs::File::open("/definitely/not/here/params.json")?)
        }
        assert!(matches!(open_missing(), Err(AnalemmaError::IoError(_))));
    }
}
