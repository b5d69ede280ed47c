//! Synthetic agricultural IoT telemetry with pattern and anomaly analysis.
//!
//! The crate is organized along the pipeline's stages:
//! - `generator` fabricates sensor, weather and crop-yield tables from an
//!   injected, seedable random source
//! - `analysis` summarizes readings per sensor category and flags z-score outliers
//! - `export` writes the tables and results as CSV/JSON (and reads readings back)
//! - `report` condenses a run into a dataset summary
//!
//! `models` holds the shared record types and `config` the runtime settings.

pub mod analysis;
pub mod config;
pub mod export;
pub mod generator;
pub mod models;
pub mod report;

pub use analysis::{detect_anomalies, summarize_patterns};
pub use config::Config;
pub use models::{Anomaly, PatternSummary, SensorReading, SensorType, Severity};
