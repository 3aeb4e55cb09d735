//! Equinoxes and solstices
//!
//! The four cardinal points of the year sit at fixed true anomalies once the
//! axis precession is known. Inverting Kepler's equation in closed form gives
//! their mean anomalies, and the clock turns those into calendar dates.

use log::debug;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::coordinates::{normalize_radians, Angle};
use crate::kepler::{solve_kepler, true_to_mean_anomaly};
use crate::parameters::OrbitParameters;
use crate::time::month_day_label;
use crate::Result;

/// One cardinal point of the year
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardinalPoint {
    /// True anomaly of the planet at this point
    pub true_anomaly: Angle,
    /// Closed-form mean anomaly, in `[0, 2π)`
    pub mean_anomaly: f64,
    /// Planet position in the orbital X-Z plane
    pub position: Point3<f64>,
    /// Days after perihelion at which the clock reaches this point
    pub days_after_perihelion: f64,
    /// Month and day, e.g. `March 21`
    pub label: String,
}

/// The four cardinal points
///
/// Field names follow the true-anomaly formulas (`-p`, `90° - p`, `180° - p`,
/// `270° - p`), not a calendar hemisphere: for the Earth preset
/// `summer_solstice` falls in December and `winter_solstice` in June.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardinalEpochs {
    pub vernal_equinox: CardinalPoint,
    pub summer_solstice: CardinalPoint,
    pub autumnal_equinox: CardinalPoint,
    pub winter_solstice: CardinalPoint,
}

impl CardinalEpochs {
    /// Points with display names, in true-anomaly order
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &CardinalPoint)> {
        [
            ("Vernal equinox", &self.vernal_equinox),
            ("Summer solstice", &self.summer_solstice),
            ("Autumnal equinox", &self.autumnal_equinox),
            ("Winter solstice", &self.winter_solstice),
        ]
        .into_iter()
    }
}

/// Locates one cardinal point from its true anomaly.
///
/// The clock drives the planet with the negated mean anomaly, so the date is
/// taken at the clock's mean anomaly `2π - M`.
pub fn cardinal_point(true_anomaly: Angle, params: &OrbitParameters) -> Result<CardinalPoint> {
    let mean_anomaly = true_to_mean_anomaly(true_anomaly.to_radians(), params.eccentricity)?;
    let position = solve_kepler(mean_anomaly, params.eccentricity, params.semi_major_axis)?.position();
    let days_after_perihelion = params.days_for_mean_anomaly(normalize_radians(-mean_anomaly));
    Ok(CardinalPoint {
        true_anomaly,
        mean_anomaly,
        position,
        days_after_perihelion,
        label: month_day_label(days_after_perihelion)?,
    })
}

/// Locates the equinoxes and solstices for `params`.
///
/// The vernal equinox sits at true anomaly `-precession`; each following
/// point is a further quarter turn.
pub fn locate(params: &OrbitParameters) -> Result<CardinalEpochs> {
    let p = params.precession_deg;
    let at = |offset_deg: f64| cardinal_point(Angle::from_degrees(offset_deg - p), params);

    let epochs = CardinalEpochs {
        vernal_equinox: at(0.0)?,
        summer_solstice: at(90.0)?,
        autumnal_equinox: at(180.0)?,
        winter_solstice: at(270.0)?,
    };
    for (name, point) in epochs.iter() {
        debug!(
            "{}: nu={} M={:.4} day {:.2} ({})",
            name, point.true_anomaly, point.mean_anomaly, point.days_after_perihelion, point.label
        );
    }
    Ok(epochs)
}
