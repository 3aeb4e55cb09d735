//! Analemma Table Tool
//!
//! Runs the orbital simulation for one planet setup and prints the dates of
//! the equinoxes and solstices, a daily equation-of-time table and, on
//! request, the analemma points. With `--json` the same data is emitted as a
//! JSON report instead.
//!
//! Usage:
//!   cargo run --bin analemma_table -- [--preset mars] [--obliquity 40] [--json]

use std::path::PathBuf;

use clap::{ArgAction, Parser};
use log::{debug, info};

use analemma::constants::DAY_S;
use analemma::parameters::ParameterUpdate;
use analemma::planetlib::preset_names;
use analemma::time::format_equation_of_time;
use analemma::{Simulation, SimulationConfig};

/// Type alias for the error type used throughout this module
type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Analemma Table Tool
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Prints equinoxes, solstices and the equation of time for a planet",
    long_about = None
)]
struct Args {
    /// Planet preset, or "custom" to start from the parameter flags alone
    #[arg(short, long, default_value = "earth")]
    preset: String,

    /// Orbital eccentricity, overrides the preset
    #[arg(short, long)]
    eccentricity: Option<f64>,

    /// Axial tilt in degrees, overrides the preset
    #[arg(short, long)]
    obliquity: Option<f64>,

    /// Axis precession in degrees, overrides the preset
    #[arg(long)]
    precession: Option<f64>,

    /// Sidereal period in days, overrides the preset
    #[arg(long)]
    period: Option<f64>,

    /// JSON file with a parameter update, applied after the flags above
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Analemma samples per day of a 366 day year
    #[arg(short, long, default_value_t = 1.0)]
    resolution: f64,

    /// Number of rows in the equation-of-time table
    #[arg(long, default_value_t = 365)]
    days: usize,

    /// Simulated days between table rows
    #[arg(long, default_value_t = 1.0)]
    step: f64,

    /// Print the analemma points
    #[arg(short, long, action = ArgAction::SetTrue)]
    analemma: bool,

    /// Emit a JSON report instead of tables
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// Write the JSON report to this file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Log parameter changes and recomputes
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

/// Prints a section header with a title and separator line
fn print_section_header(title: &str) {
    println!("\n{}:", title);
    println!("-------------------------------------------------------");
}

/// Helper to print named values in a formatted way
fn print_named_value(name: &str, value: impl std::fmt::Display) {
    println!("{}: {}", name, value);
}

/// Builds the simulation the arguments describe
fn build_simulation(args: &Args) -> Result<Simulation> {
    let config = SimulationConfig {
        resolution: args.resolution,
        ..SimulationConfig::default()
    };
    let mut sim = Simulation::new(config)?;

    let mut update = ParameterUpdate::preset(&args.preset);
    update.eccentricity = args.eccentricity;
    update.obliquity_deg = args.obliquity;
    update.precession_deg = args.precession;
    update.sidereal_period_days = args.period;
    sim.set_parameters(&update)?;

    if let Some(path) = &args.config {
        debug!("loading parameter update from {}", path.display());
        sim.set_parameters(&ParameterUpdate::from_json_file(path)?)?;
    }
    Ok(sim)
}

/// Displays the orbit parameters in use
fn display_parameters(sim: &Simulation) {
    let params = sim.parameters();
    print_section_header("Orbit");
    print_named_value("Preset", sim.preset_name());
    print_named_value("Eccentricity", params.eccentricity);
    print_named_value("Obliquity", params.obliquity());
    print_named_value("Precession", params.precession());
    print_named_value("Sidereal period", format!("{} days", params.sidereal_period_days));
    print_named_value(
        "Perihelion",
        format!("{:.3} (x), aphelion {:.3} (x)", sim.perihelion().x, sim.aphelion().x),
    );
}

/// Displays the equinoxes and solstices
fn display_epochs(sim: &Simulation) {
    print_section_header("Cardinal Points");
    println!(
        "{:<18} {:>12} {:>12} {:>10}  {}",
        "Point", "True anom.", "Mean anom.", "Day", "Date"
    );
    for (name, point) in sim.cardinal_epochs().iter() {
        println!(
            "{:<18} {:>11.3}° {:>11.3}° {:>10.2}  {}",
            name,
            point.true_anomaly.to_degrees(),
            point.mean_anomaly.to_degrees(),
            point.days_after_perihelion,
            point.label
        );
    }
}

/// Steps the simulation day by day and prints the equation of time
fn display_table(sim: &mut Simulation, days: usize, step: f64) -> Result<()> {
    print_section_header("Equation of Time");
    println!(
        "{:>8}  {:<10} {:>10} {:>16} {:>14}",
        "Day", "Date", "EoT (s)", "EoT", "Solar day (s)"
    );

    let mut longest = f64::MIN;
    let mut shortest = f64::MAX;
    for row in 0..days {
        if row > 0 {
            // one wall-clock second at one day per second
            sim.advance(step, 1.0, false)?;
        }
        let sun = sim.apparent_sun();
        if row > 1 {
            longest = longest.max(sun.solar_day_seconds);
            shortest = shortest.min(sun.solar_day_seconds);
        }
        println!(
            "{:>8.2}  {:<10} {:>10.1} {:>16} {:>14.2}",
            sim.elapsed_days(),
            sim.date_label()?,
            sun.equation_of_time_seconds,
            format_equation_of_time(sun.equation_of_time_seconds),
            sun.solar_day_seconds
        );
    }

    if longest >= shortest {
        println!();
        print_named_value("Longest solar day", format!("{:+.2}s", longest - DAY_S));
        print_named_value("Shortest solar day", format!("{:+.2}s", shortest - DAY_S));
    }
    Ok(())
}

/// Displays the analemma in the mean-sun frame
fn display_analemma(sim: &Simulation) {
    print_section_header("Analemma");
    print_named_value("Points", sim.analemma().len());
    print_named_value(
        "Max declination",
        format!("{:.3}°", sim.analemma().max_declination_deg()),
    );
    for [x, y, z] in sim.analemma_points() {
        println!("{:>10.5} {:>10.5} {:>10.5}", x, y, z);
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if !args.step.is_finite() || args.step <= 0.0 {
        return Err(format!("step must be positive, got {}", args.step).into());
    }

    let mut sim = build_simulation(&args).map_err(|e| {
        eprintln!("Known presets: {}", preset_names().join(", "));
        e
    })?;
    info!("simulating preset {}", sim.preset_name());

    if args.json {
        let report = sim.report()?;
        match &args.output {
            Some(path) => {
                report.write_json(path)?;
                println!("Report written to {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(&report)?),
        }
        return Ok(());
    }

    display_parameters(&sim);
    display_epochs(&sim);
    if args.analemma {
        display_analemma(&sim);
    }
    display_table(&mut sim, args.days, args.step)?;

    Ok(())
}
