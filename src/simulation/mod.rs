//! Per-frame simulation driver
//!
//! [`Simulation`] owns every piece of state the rendering layer reads: the
//! clock, the orbit parameters, the planet's body frame, the apparent sun
//! tracker and the curves derived from the parameters. It is advanced once
//! per rendered frame and reconfigured between frames.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, info, trace};
use nalgebra::Point3;
use serde::{Deserialize, Serialize};

use crate::almanac::{self, CardinalEpochs};
use crate::analemma::{self, AnalemmaCurve};
use crate::constants::DISPLAY_RADIUS;
use crate::framelib::{direction_at_radius, BodyFrame};
use crate::kepler::{self, OrbitalState};
use crate::parameters::{OrbitParameters, ParameterUpdate};
use crate::planetlib::{Planet, CUSTOM_PRESET};
use crate::time::{self, SimulationClock};
use crate::tracker::{ApparentSun, ApparentSunSample, ApparentSunTracker};
use crate::{AnalemmaError, Result};

/// Scene settings fixed for the lifetime of a simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Analemma samples per day of a 366 day year
    pub resolution: f64,
    /// World position of the star
    pub star_position: Point3<f64>,
    /// Distance from the planet at which the sun and the analemma are drawn
    pub display_radius: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            resolution: 1.0,
            star_position: Point3::origin(),
            display_radius: DISPLAY_RADIUS,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<()> {
        analemma::sample_count(self.resolution)?;
        if !self.display_radius.is_finite() || self.display_radius <= 0.0 {
            return Err(AnalemmaError::InvalidParameter(format!(
                "display radius {} must be positive",
                self.display_radius
            )));
        }
        if !self.star_position.coords.iter().all(|c| c.is_finite()) {
            return Err(AnalemmaError::InvalidParameter(format!(
                "star position {:?} is not finite",
                self.star_position
            )));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file; missing fields take defaults
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }
}

/// Everything shown for the current tick
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub elapsed_days: f64,
    pub date: String,
    pub preset: String,
    pub orbit: OrbitalState,
    pub spin_angle: f64,
    pub sun: ApparentSunSample,
    pub equation_of_time: String,
}

/// Parameters and every curve derived from them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub parameters: OrbitParameters,
    pub preset: String,
    pub perihelion: Point3<f64>,
    pub aphelion: Point3<f64>,
    pub cardinal_epochs: CardinalEpochs,
    pub orbit_path: Vec<[f64; 3]>,
    pub analemma: Vec<[f64; 3]>,
    pub snapshot: Snapshot,
}

impl Report {
    /// Writes the report as pretty-printed JSON
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path.as_ref())?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

/// Values recomputed from scratch whenever the parameters change
struct Derived {
    frame: BodyFrame,
    tracker: ApparentSunTracker,
    state: OrbitalState,
    analemma: AnalemmaCurve,
    epochs: CardinalEpochs,
}

impl Derived {
    fn compute(
        params: &OrbitParameters,
        config: &SimulationConfig,
        elapsed_days: f64,
    ) -> Result<Self> {
        let mut frame = BodyFrame::new(params);
        let mut tracker = ApparentSunTracker::new();
        let state = tracker.update(elapsed_days, 0.0, params, &mut frame, &config.star_position)?;
        let analemma = analemma::sample(
            params,
            &frame,
            &config.star_position,
            config.resolution,
            config.display_radius,
        )?;
        let epochs = almanac::locate(params)?;
        Ok(Self {
            frame,
            tracker,
            state,
            analemma,
            epochs,
        })
    }
}

/// The orbital dynamics engine
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    parameters: OrbitParameters,
    preset: Option<Planet>,
    clock: SimulationClock,
    frame: BodyFrame,
    tracker: ApparentSunTracker,
    state: OrbitalState,
    analemma: AnalemmaCurve,
    epochs: CardinalEpochs,
}

impl Simulation {
    /// A simulation of Earth at perihelion
    pub fn new(config: SimulationConfig) -> Result<Self> {
        let mut sim = Self::with_parameters(config, OrbitParameters::default())?;
        sim.preset = Some(Planet::Earth);
        Ok(sim)
    }

    /// A simulation with custom parameters at perihelion
    pub fn with_parameters(config: SimulationConfig, parameters: OrbitParameters) -> Result<Self> {
        config.validate()?;
        parameters.validate()?;
        let clock = SimulationClock::default();
        let derived = Derived::compute(&parameters, &config, clock.elapsed_days)?;
        info!(
            "simulation ready: e={} obliquity={}° precession={}° period={}d",
            parameters.eccentricity,
            parameters.obliquity_deg,
            parameters.precession_deg,
            parameters.sidereal_period_days
        );
        Ok(Self {
            config,
            parameters,
            preset: None,
            clock,
            frame: derived.frame,
            tracker: derived.tracker,
            state: derived.state,
            analemma: derived.analemma,
            epochs: derived.epochs,
        })
    }

    /// Advances the simulation by one rendered frame.
    ///
    /// * `delta_seconds` - Wall-clock time since the previous frame
    /// * `rate` - Simulated days per wall-clock second
    /// * `is_paused` - A paused tick keeps the clock and the solar day still
    pub fn advance(&mut self, delta_seconds: f64, rate: f64, is_paused: bool) -> Result<OrbitalState> {
        let delta_days = self.clock.tick(delta_seconds, rate, is_paused)?;
        if delta_days == 0.0 && !is_paused {
            trace!("zero-length tick at day {:.4}", self.clock.elapsed_days);
        }
        self.state = self.tracker.update(
            self.clock.elapsed_days,
            delta_days,
            &self.parameters,
            &mut self.frame,
            &self.config.star_position,
        )?;
        Ok(self.state)
    }

    /// Applies a parameter update.
    ///
    /// The update is validated and every derived value recomputed before
    /// anything is committed; on error the simulation is unchanged.
    pub fn set_parameters(&mut self, update: &ParameterUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let applied = update.apply_to(&self.parameters, self.preset)?;
        let derived = Derived::compute(&applied.parameters, &self.config, self.clock.elapsed_days)?;

        self.parameters = applied.parameters;
        self.preset = applied.preset;
        self.frame = derived.frame;
        self.tracker = derived.tracker;
        self.state = derived.state;
        self.analemma = derived.analemma;
        self.epochs = derived.epochs;
        debug!(
            "parameters now {:?} (preset {}), analemma {} points",
            self.parameters,
            self.preset_name(),
            self.analemma.len()
        );
        Ok(())
    }

    pub fn parameters(&self) -> &OrbitParameters {
        &self.parameters
    }

    /// Active preset; `None` once any value was set individually
    pub fn preset(&self) -> Option<Planet> {
        self.preset
    }

    /// Active preset key, or `custom`
    pub fn preset_name(&self) -> &'static str {
        self.preset.map(|p| p.key()).unwrap_or(CUSTOM_PRESET)
    }

    pub fn clock(&self) -> &SimulationClock {
        &self.clock
    }

    pub fn elapsed_days(&self) -> f64 {
        self.clock.elapsed_days
    }

    pub fn orbital_state(&self) -> &OrbitalState {
        &self.state
    }

    pub fn body_frame(&self) -> &BodyFrame {
        &self.frame
    }

    pub fn apparent_sun(&self) -> ApparentSun {
        ApparentSun::from(self.tracker.sample())
    }

    pub fn analemma(&self) -> &AnalemmaCurve {
        &self.analemma
    }

    pub fn analemma_points(&self) -> Vec<[f64; 3]> {
        self.analemma.to_triples()
    }

    pub fn cardinal_epochs(&self) -> &CardinalEpochs {
        &self.epochs
    }

    pub fn orbit_path(&self) -> Result<Vec<Point3<f64>>> {
        kepler::orbit_path(&self.parameters)
    }

    pub fn perihelion(&self) -> Point3<f64> {
        kepler::perihelion(&self.parameters)
    }

    pub fn aphelion(&self) -> Point3<f64> {
        kepler::aphelion(&self.parameters)
    }

    /// Rotation of the planet about its axis
    pub fn spin_angle(&self) -> f64 {
        self.clock.spin_angle()
    }

    /// Where the sun is drawn: the display radius from the planet towards
    /// the star, in world coordinates
    pub fn sun_marker(&self) -> Result<Point3<f64>> {
        let planet = self.frame.position();
        let towards_star = self.config.star_position - planet;
        Ok(planet + direction_at_radius(&towards_star, self.config.display_radius)?)
    }

    /// Current date, e.g. `2023-03-21`
    pub fn date_label(&self) -> Result<String> {
        time::date_label(self.clock.elapsed_days)
    }

    /// Current equation of time as `HH:MM:SS`
    pub fn equation_of_time_label(&self) -> String {
        time::format_equation_of_time(self.tracker.sample().equation_of_time_seconds)
    }

    pub fn snapshot(&self) -> Result<Snapshot> {
        Ok(Snapshot {
            elapsed_days: self.clock.elapsed_days,
            date: self.date_label()?,
            preset: self.preset_name().to_string(),
            orbit: self.state,
            spin_angle: self.spin_angle(),
            sun: *self.tracker.sample(),
            equation_of_time: self.equation_of_time_label(),
        })
    }

    pub fn report(&self) -> Result<Report> {
        Ok(Report {
            parameters: self.parameters,
            preset: self.preset_name().to_string(),
            perihelion: self.perihelion(),
            aphelion: self.aphelion(),
            cardinal_epochs: self.epochs.clone(),
            orbit_path: self.orbit_path()?.iter().map(|p| [p.x, p.y, p.z]).collect(),
            analemma: self.analemma_points(),
            snapshot: self.snapshot()?,
        })
    }
}
