//! The planet's body-fixed frame

use nalgebra::{Isometry3, Point3, Translation3, Unit, UnitQuaternion, Vector3};

use crate::coordinates::Angle;
use crate::parameters::OrbitParameters;
use crate::{AnalemmaError, Result};

/// Position and orientation of the planet relative to the star
///
/// The orientation is the precession turn about the orbit normal (+Y)
/// followed by the obliquity tilt about the precessed X axis, i.e.
/// `R = R_y(precession) * R_x(obliquity)` acting on body-frame vectors.
/// Swapping the two factors moves the pole relative to the orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyFrame {
    position: Point3<f64>,
    orientation: UnitQuaternion<f64>,
    obliquity: Angle,
    precession: Angle,
}

impl BodyFrame {
    /// A frame at the origin, oriented for `params`
    pub fn new(params: &OrbitParameters) -> Self {
        let mut frame = Self {
            position: Point3::origin(),
            orientation: UnitQuaternion::identity(),
            obliquity: Angle::zero(),
            precession: Angle::zero(),
        };
        frame.set_orientation(params.obliquity(), params.precession());
        frame
    }

    /// Composes precession and obliquity into a single rotation
    pub fn orientation_for(obliquity: Angle, precession: Angle) -> UnitQuaternion<f64> {
        let precess = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), precession.to_radians());
        let tilt = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), obliquity.to_radians());
        precess * tilt
    }

    /// Re-orients the frame; called whenever obliquity or precession change
    pub fn set_orientation(&mut self, obliquity: Angle, precession: Angle) {
        self.obliquity = obliquity;
        self.precession = precession;
        self.orientation = Self::orientation_for(obliquity, precession);
    }

    /// Moves the frame; called every tick with the orbital position
    pub fn set_position(&mut self, position: Point3<f64>) {
        self.position = position;
    }

    pub fn position(&self) -> Point3<f64> {
        self.position
    }

    pub fn obliquity(&self) -> Angle {
        self.obliquity
    }

    pub fn precession(&self) -> Angle {
        self.precession
    }

    /// Body-to-world transform, rebuilt from the current position and orientation
    pub fn isometry(&self) -> Isometry3<f64> {
        Isometry3::from_parts(Translation3::from(self.position.coords), self.orientation)
    }

    /// Expresses a world point in body coordinates
    pub fn world_to_body(&self, world: &Point3<f64>) -> Point3<f64> {
        self.isometry().inverse_transform_point(world)
    }

    /// The rotation axis of the planet, in world coordinates
    pub fn pole(&self) -> Unit<Vector3<f64>> {
        Unit::new_unchecked(self.orientation * Vector3::y())
    }

    /// Expresses a world point in the mean-sun frame, which is the body
    /// frame turned by `mean_sun_angle` radians about its own axis
    pub fn world_to_mean_sun(&self, world: &Point3<f64>, mean_sun_angle: f64) -> Point3<f64> {
        let turn = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), mean_sun_angle);
        let mean_sun = self.isometry() * Isometry3::from_parts(Translation3::identity(), turn);
        mean_sun.inverse_transform_point(world)
    }
}

/// Scales `direction` to length `radius`.
///
/// Fails with `NumericDegeneracy` for a (near) zero-length input, which has
/// no direction to keep.
pub fn direction_at_radius(direction: &Vector3<f64>, radius: f64) -> Result<Vector3<f64>> {
    direction
        .try_normalize(f64::EPSILON)
        .map(|unit| unit * radius)
        .ok_or_else(|| {
            AnalemmaError::NumericDegeneracy(format!(
                "cannot normalize zero-length vector {:?}",
                direction
            ))
        })
}
