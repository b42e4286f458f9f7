use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;

use pass_o_mat::catalog::{Catalog, TleLoader};
use pass_o_mat::config::Config;
use pass_o_mat::geo::ObserverLocation;
use pass_o_mat::predict::{parse_duration, PassReport, SkippedPass, TimeWindow};
use pass_o_mat::sweep::{SatelliteOutcome, Sweeper};

#[derive(Parser)]
#[command(name = "pass-o-mat")]
#[command(about = "Satellite pass prediction for a ground observer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict passes for the configured satellites
    Predict {
        #[command(flatten)]
        opts: Options,
        /// Window start (RFC3339), defaults to now
        #[arg(long)]
        start: Option<String>,
        /// Print reports as JSON
        #[arg(long)]
        json: bool,
    },
    /// Check the config and TLE files without predicting
    Validate {
        #[command(flatten)]
        opts: Options,
    },
}

#[derive(Args)]
struct Options {
    /// YAML config file
    #[arg(short, long)]
    config: Option<String>,
    /// Station as "lat, lon" in degrees
    #[arg(long)]
    station: Option<String>,
    /// Station altitude in metres
    #[arg(long)]
    altitude: Option<f64>,
    /// TLE file or directory (repeatable)
    #[arg(long = "tle")]
    tle: Vec<PathBuf>,
    /// Satellite name to track (repeatable)
    #[arg(long = "satellite")]
    satellites: Vec<String>,
    /// Window length, e.g. 24h
    #[arg(long)]
    window: Option<String>,
    /// Minimum elevation in degrees
    #[arg(long)]
    min_elevation: Option<f64>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { opts } => validate(&opts),
        Commands::Predict { opts, start, json } => predict(&opts, start.as_deref(), json),
    }
}

fn load_config(opts: &Options) -> Result<Config, String> {
    let mut config = match &opts.config {
        Some(path) => Config::from_file(path).map_err(|e| format!("{}: {}", path, e))?,
        None => Config::default(),
    };

    if let Some(station) = &opts.station {
        config.station.name = None;
        config.station.coordinates = station.clone();
    }
    if let Some(altitude) = opts.altitude {
        config.station.altitude_m = altitude;
    }
    if !opts.tle.is_empty() {
        config.tle.paths = opts.tle.clone();
    }
    if !opts.satellites.is_empty() {
        config.tle.satellites = opts.satellites.clone();
    }
    if let Some(window) = &opts.window {
        config.window = parse_duration(window).map_err(|e| format!("window: {}", e))?;
    }
    if let Some(min_elevation) = opts.min_elevation {
        config.predict.min_elevation_deg = min_elevation;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

fn load_catalog(config: &Config) -> Result<Catalog, String> {
    let catalog = TleLoader::new(config.tle.paths.clone())
        .load()
        .map_err(|e| e.to_string())?;
    if config.tle.satellites.is_empty() {
        Ok(catalog)
    } else {
        catalog
            .select(&config.tle.satellites)
            .map_err(|e| e.to_string())
    }
}

fn validate(opts: &Options) -> ExitCode {
    let config = match load_config(opts) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match load_catalog(&config) {
        Ok(catalog) => {
            println!("Config is valid ({} satellites)", catalog.len());
            for entry in catalog.entries() {
                println!(
                    "  {} (NORAD {}) from {}",
                    entry.info.name, entry.info.norad_id, entry.info.source
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("TLE error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn predict(opts: &Options, start: Option<&str>, json: bool) -> ExitCode {
    let config = match load_config(opts) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let start = match start.map(DateTime::parse_from_rfc3339).transpose() {
        Ok(s) => s.map(|dt| dt.with_timezone(&Utc)).unwrap_or_else(Utc::now),
        Err(e) => {
            eprintln!("Invalid start time: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let window = match TimeWindow::checked_starting_at(start, config.window) {
        Some(w) => w,
        None => {
            eprintln!("Config error: window {} from {} is out of range", config.window, start);
            return ExitCode::FAILURE;
        }
    };

    let catalog = match load_catalog(&config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("TLE error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    // Validated in load_config
    let observer = match config.station.observer() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcomes = match Sweeper::new().run(&catalog, &observer, &window, &config.predict) {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Prediction error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let printed = if json {
        print_json(&config, &observer, &window, &outcomes)
    } else {
        print_console(&config, &observer, &window, &outcomes);
        ExitCode::SUCCESS
    };

    if all_failed(&outcomes) {
        eprintln!("Prediction failed for every satellite");
        return ExitCode::FAILURE;
    }
    printed
}

fn all_failed(outcomes: &[SatelliteOutcome]) -> bool {
    outcomes.iter().all(|o| o.result.is_err())
}

fn print_console(
    config: &Config,
    observer: &ObserverLocation,
    window: &TimeWindow,
    outcomes: &[SatelliteOutcome],
) {
    println!(
        "Station {}: {:.4}, {:.4}",
        config.station.name.as_deref().unwrap_or("(unnamed)"),
        observer.position.latitude_deg,
        observer.position.longitude_deg
    );
    println!(
        "Window {} .. {} UTC, min elevation {:.1}°",
        window.start.format("%Y-%m-%d %H:%M:%S"),
        window.end.format("%Y-%m-%d %H:%M:%S"),
        config.predict.min_elevation_deg
    );

    for outcome in outcomes {
        println!("\nChecking satellite: {}", outcome.satellite.name);
        match &outcome.result {
            Ok(passes) => {
                if passes.reports.is_empty() && passes.skipped.is_empty() {
                    println!("  no passes");
                }
                passes.reports.iter().for_each(print_report);
                for skipped in &passes.skipped {
                    eprintln!(
                        "  {}: pass at {} skipped: {}",
                        outcome.satellite.name,
                        skipped.culmination.format("%Y-%m-%d %H:%M:%S"),
                        skipped.error
                    );
                }
            }
            Err(e) => eprintln!("  {}: {}", outcome.satellite.name, e),
        }
    }
}

fn print_report(report: &PassReport) {
    let mut peak = format!(
        "  -> Peak pass at {} UTC",
        report.culmination.format("%Y-%m-%d %H:%M:%S")
    );
    if report.truncated_start || report.truncated_end {
        peak.push_str(" (partial)");
    }
    println!("{}", peak);
    println!(
        "     Rise {} az {:.0}°, set {} az {:.0}°",
        report.rise.format("%H:%M:%S"),
        report.rise_azimuth_deg,
        report.set.format("%H:%M:%S"),
        report.set_azimuth_deg
    );
    println!(
        "     Altitude: {:.1}°, Azimuth: {:.1}°, Distance: {:.1} km, Signal: {}",
        report.peak_altitude_deg, report.peak_azimuth_deg, report.ground_distance_km, report.signal
    );
    let track: Vec<String> = report
        .ground_track
        .iter()
        .map(|p| format!("({:.2}, {:.2})", p.position.latitude_deg, p.position.longitude_deg))
        .collect();
    println!("     Track: {}", track.join(" "));
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    station: Option<&'a str>,
    observer: &'a ObserverLocation,
    window: &'a TimeWindow,
    min_elevation_deg: f64,
    satellites: Vec<JsonSatellite<'a>>,
}

#[derive(Serialize)]
struct JsonSatellite<'a> {
    name: &'a str,
    norad_id: u64,
    passes: &'a [PassReport],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    skipped: Vec<JsonSkipped>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[derive(Serialize)]
struct JsonSkipped {
    culmination: DateTime<Utc>,
    error: String,
}

impl From<&SkippedPass> for JsonSkipped {
    fn from(skipped: &SkippedPass) -> Self {
        Self {
            culmination: skipped.culmination,
            error: skipped.error.to_string(),
        }
    }
}

fn print_json(
    config: &Config,
    observer: &ObserverLocation,
    window: &TimeWindow,
    outcomes: &[SatelliteOutcome],
) -> ExitCode {
    let satellites = outcomes
        .iter()
        .map(|o| match &o.result {
            Ok(passes) => JsonSatellite {
                name: &o.satellite.name,
                norad_id: o.satellite.norad_id,
                passes: &passes.reports,
                skipped: passes.skipped.iter().map(JsonSkipped::from).collect(),
                error: None,
            },
            Err(e) => JsonSatellite {
                name: &o.satellite.name,
                norad_id: o.satellite.norad_id,
                passes: &[],
                skipped: Vec::new(),
                error: Some(e.to_string()),
            },
        })
        .collect();

    let output = JsonOutput {
        station: config.station.name.as_deref(),
        observer,
        window,
        min_elevation_deg: config.predict.min_elevation_deg,
        satellites,
    };

    match serde_json::to_string_pretty(&output) {
        Ok(s) => {
            println!("{}", s);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("JSON error: {}", e);
            ExitCode::FAILURE
        }
    }
}
