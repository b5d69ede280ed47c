//! Configuration loader for the `agro-telemetry` pipeline.
//!
//! This module centralizes all runtime configuration values and their
//! defaults, loading from environment variables (with optional `.env` file
//! support provided by the caller). Command-line flags are applied on top of
//! the loaded snapshot by `main`.
//!
use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Result};

/// Parse an optional environment variable with a default value.
macro_rules! parse_env {
    ($lookup:ident, $var_name:expr, $ty:ty, $default:expr) => {
        $lookup($var_name)
            .map(|v| v.trim().parse::<$ty>())
            .transpose()
            .map_err(|e| anyhow!("Invalid {}: {}", $var_name, e))?
            .unwrap_or($default)
    };
}

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_NUM_SENSORS: u32 = 50;
pub const DEFAULT_DAYS_BACK: u32 = 30;
pub const DEFAULT_OUTPUT_DIR: &str = "data";

/// Strongly typed application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    // ---
    /// Seed for the pseudo-random generator driving all synthetic tables.
    pub seed: u64,

    /// Number of simulated field devices.
    pub num_sensors: u32,

    /// How many days of history to synthesize.
    pub days_back: u32,

    /// Directory receiving the CSV and JSON outputs.
    pub output_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            num_sensors: DEFAULT_NUM_SENSORS,
            days_back: DEFAULT_DAYS_BACK,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
        }
    }
}

/// Load configuration from environment variables with defaults.
///
/// Optional:
/// - `AGRO_SEED` – random seed (default: 42)
/// - `AGRO_NUM_SENSORS` – simulated devices (default: 50)
/// - `AGRO_DAYS_BACK` – days of history (default: 30)
/// - `AGRO_OUTPUT_DIR` – output directory (default: `data`)
///
/// Returns an error if any variable is set but cannot be parsed.
pub fn load_from_env() -> Result<Config> {
    // ---
    load_with(|name| env::var(name).ok())
}

fn load_with<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    // ---
    let seed = parse_env!(lookup, "AGRO_SEED", u64, DEFAULT_SEED);
    let num_sensors = parse_env!(lookup, "AGRO_NUM_SENSORS", u32, DEFAULT_NUM_SENSORS);
    let days_back = parse_env!(lookup, "AGRO_DAYS_BACK", u32, DEFAULT_DAYS_BACK);
    let output_dir = lookup("AGRO_OUTPUT_DIR")
        .filter(|v| !v.trim().is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

    Ok(Config {
        seed,
        num_sensors,
        days_back,
        output_dir,
    })
}

impl Config {
    /// Log the loaded configuration for debugging purposes.
    pub fn log_config(&self) {
        // ---
        tracing::info!("Configuration loaded:");
        tracing::info!("  AGRO_SEED        : {}", self.seed);
        tracing::info!("  AGRO_NUM_SENSORS : {}", self.num_sensors);
        tracing::info!("  AGRO_DAYS_BACK   : {}", self.days_back);
        tracing::info!("  AGRO_OUTPUT_DIR  : {}", self.output_dir.display());
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use std::collections::HashMap;

    fn load_from(vars: &[(&str, &str)]) -> Result<Config> {
        // ---
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        load_with(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        // ---
        let cfg = load_from(&[]).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.num_sensors, 50);
        assert_eq!(cfg.days_back, 30);
        assert_eq!(cfg.output_dir, PathBuf::from("data"));
    }

    #[test]
    fn test_overrides() {
        // ---
        let cfg = load_from(&[
            ("AGRO_SEED", "7"),
            ("AGRO_NUM_SENSORS", " 12 "),
            ("AGRO_DAYS_BACK", "3"),
            ("AGRO_OUTPUT_DIR", "/tmp/agro"),
        ])
        .unwrap();

        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.num_sensors, 12);
        assert_eq!(cfg.days_back, 3);
        assert_eq!(cfg.output_dir, PathBuf::from("/tmp/agro"));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        // ---
        let err = load_from(&[("AGRO_DAYS_BACK", "-1")]).unwrap_err();
        assert!(err.to_string().contains("AGRO_DAYS_BACK"));
    }

    #[test]
    fn test_blank_output_dir_uses_default() {
        // ---
        let cfg = load_from(&[("AGRO_OUTPUT_DIR", "  ")]).unwrap();
        assert_eq!(cfg.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
    }
}
