//! Angle handling shared by the dynamics modules

pub mod angle;

pub use angle::{normalize_radians, signed_radians, smallest_magnitude_wrap, Angle};
