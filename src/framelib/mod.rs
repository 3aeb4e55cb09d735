//! Reference frames of the planet
//!
//! - the world frame: star-centred, the orbit lies in its X-Z plane, +Y is
//!   the orbit normal;
//! - the body frame: origin at the planet, +Y along the planet's rotation
//!   axis;
//! - the mean-sun frame: the body frame turned about its axis so that the
//!   uniformly moving "mean sun" sits on a fixed local direction.

pub mod body;

pub use body::{direction_at_radius, BodyFrame};
