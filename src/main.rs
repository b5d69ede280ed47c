//! Command-line entry point for the `agro-telemetry` pipeline.
//!
//! This binary orchestrates one full run:
//! - Loading configuration from environment variables or `.env`, then
//!   applying command-line overrides
//! - Initializing structured logging/tracing
//! - Generating sensor, weather and crop-yield tables from a seeded RNG
//!   (or loading sensor readings from a CSV file with `--input`)
//! - Summarizing sensor patterns and detecting anomalies
//! - Writing every table and result into the output directory
//!
//! # Environment Variables
//! - `AGRO_SEED`, `AGRO_NUM_SENSORS`, `AGRO_DAYS_BACK`, `AGRO_OUTPUT_DIR`
//!   (see `config`)
//! - `AGRO_LOG_LEVEL` (optional) – log verbosity (default: `info`)
//! - `AGRO_SPAN_EVENTS` (optional) – span event mode for tracing
use std::{env, fs, path::PathBuf};

use anyhow::{anyhow, Result};
use chrono::Utc;
use clap::Parser;
use dotenvy::dotenv;
use is_terminal::IsTerminal;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

use agro_telemetry::export::{self, OutputPaths};
use agro_telemetry::generator::{
    generate_crop_yield_data, generate_sensor_data, generate_weather_data,
};
use agro_telemetry::models::validate_readings;
use agro_telemetry::report::DatasetSummary;
use agro_telemetry::{config, detect_anomalies, summarize_patterns};

/// Synthetic agricultural IoT telemetry generator and analyzer
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Random seed (overrides AGRO_SEED)
    #[arg(long)]
    seed: Option<u64>,

    /// Number of simulated sensors (overrides AGRO_NUM_SENSORS)
    #[arg(short = 'n', long)]
    sensors: Option<u32>,

    /// Days of history to generate (overrides AGRO_DAYS_BACK)
    #[arg(short, long)]
    days: Option<u32>,

    /// Output directory (overrides AGRO_OUTPUT_DIR)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Analyze sensor readings from this CSV instead of generating them
    #[arg(short, long)]
    input: Option<PathBuf>,
}

// ---

fn main() -> Result<()> {
    // ---
    dotenv().ok();
    init_tracing();

    let args = Args::parse();

    let mut cfg = config::load_from_env()?;
    if let Some(seed) = args.seed {
        cfg.seed = seed;
    }
    if let Some(sensors) = args.sensors {
        cfg.num_sensors = sensors;
    }
    if let Some(days) = args.days {
        cfg.days_back = days;
    }
    if let Some(dir) = args.output_dir {
        cfg.output_dir = dir;
    }
    cfg.log_config();

    fs::create_dir_all(&cfg.output_dir).map_err(|e| {
        anyhow!(
            "Failed to create output directory '{}': {}",
            cfg.output_dir.display(),
            e
        )
    })?;
    let paths = OutputPaths::new(&cfg.output_dir);

    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let now = Utc::now();

    let (readings, weather, yields) = match &args.input {
        Some(input) => {
            tracing::info!("Loading sensor readings from {}", input.display());
            let readings = export::read_sensor_csv(input)
                .map_err(|e| anyhow!("Failed to load '{}': {}", input.display(), e))?;
            (readings, Vec::new(), Vec::new())
        }
        None => {
            tracing::info!("Generating IoT sensor data...");
            let readings = generate_sensor_data(&mut rng, cfg.num_sensors, cfg.days_back, now);

            tracing::info!("Generating weather data...");
            let weather = generate_weather_data(&mut rng, cfg.days_back, now.date_naive());

            tracing::info!("Generating crop yield data...");
            let yields = generate_crop_yield_data(&mut rng, now.date_naive());

            export::write_csv(&paths.sensor_data, &readings)?;
            export::write_csv(&paths.weather_data, &weather)?;
            export::write_csv(&paths.crop_yield_data, &yields)?;
            (readings, weather, yields)
        }
    };

    validate_readings(&readings).map_err(|e| anyhow!("Invalid sensor input: {}", e))?;

    tracing::info!("Analyzing sensor patterns...");
    let patterns = summarize_patterns(&readings);

    tracing::info!("Detecting anomalies...");
    let anomalies = detect_anomalies(&readings);

    export::write_csv(&paths.anomalies, &anomalies)?;
    export::write_summary_json(&paths.analysis, &patterns)?;
    tracing::info!("Results written to {}", cfg.output_dir.display());

    let summary = DatasetSummary::new(&readings, &weather, &yields, &anomalies);
    summary.log();
    println!("\n{summary}");

    Ok(())
}

// ---

/// Install the stderr subscriber. `RUST_LOG` wins over `AGRO_LOG_LEVEL`
/// (default `info`); `AGRO_SPAN_EVENTS=full|enter_exit|none` controls span
/// timing events; `FORCE_COLOR` overrides TTY detection.
fn init_tracing() {
    // ---
    let span_events = match env::var("AGRO_SPAN_EVENTS").as_deref() {
        Ok("full") => FmtSpan::FULL,
        Ok("enter_exit") => FmtSpan::ENTER | FmtSpan::EXIT,
        Ok("none") => FmtSpan::NONE,
        _ => FmtSpan::CLOSE,
    };

    let use_color = match env::var("FORCE_COLOR").as_deref() {
        Ok("1" | "true" | "yes") => true,
        Ok("0" | "false" | "no") => false,
        _ => std::io::stderr().is_terminal(),
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = env::var("AGRO_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"))
    });

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_span_events(span_events)
        .with_env_filter(env_filter)
        .with_ansi(use_color)
        .compact()
        .init();
}
