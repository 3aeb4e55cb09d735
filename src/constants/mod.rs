//! Constants module for orbital and calendar calculations

use std::f64::consts::PI;

// Time constants
/// Seconds in a day
pub const DAY_S: f64 = 86_400.0;
/// Seconds in an hour
pub const HOUR_S: f64 = 3_600.0;
/// Degrees of rotation per hour of solar time
pub const DEG_PER_HOUR: f64 = 15.0;

// Angles
/// Degrees to radians conversion factor
pub const DEG2RAD: f64 = PI / 180.0;
/// Radians to degrees conversion factor
pub const RAD2DEG: f64 = 180.0 / PI;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;

// Scene geometry
/// Default semi-major axis of the planet's orbit, in scene units
pub const DEFAULT_SEMI_MAJOR_AXIS: f64 = 90.0;
/// Radius of the celestial sphere the sun markers are drawn on
pub const DISPLAY_RADIUS: f64 = 5.0;
/// Largest eccentricity the engine accepts
pub const MAX_ECCENTRICITY: f64 = 0.95;
/// Largest obliquity in degrees
pub const MAX_OBLIQUITY_DEG: f64 = 180.0;

// Solver
/// Fixed number of Newton-Raphson steps on Kepler's equation
pub const KEPLER_ITERATIONS: usize = 4;
/// Eccentricity above which the solver seeds from the cubic starter
pub const HIGH_ECCENTRICITY: f64 = 0.8;
/// Relative size below which a projected direction counts as zero length
pub const DEGENERATE_DIRECTION_TOLERANCE: f64 = 1e-9;

// Sampling
/// Samples per orbit of the analemma at resolution 1.0
pub const ANALEMMA_BASE_SAMPLES: f64 = 366.0;
/// Most analemma samples a resolution factor may ask for
pub const MAX_ANALEMMA_SAMPLES: usize = 36_600;
/// Degree steps in the drawn orbit path (inclusive of both ends)
pub const ORBIT_PATH_POINTS: usize = 361;

// Calendar constants
/// Reference year used for date labels
pub const REFERENCE_YEAR: i32 = 2023;
/// Day of January on which the reference year's perihelion falls
pub const PERIHELION_DAY_OF_JANUARY: u32 = 4;
