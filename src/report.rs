//! End-of-run dataset summary.

use std::collections::HashSet;
use std::fmt;

use crate::models::{Anomaly, CropYieldRecord, SensorReading, WeatherRecord};

// ---

/// Record counts and catalog coverage of one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    // ---
    pub sensor_readings: usize,
    pub weather_records: usize,
    pub crop_yield_records: usize,
    pub anomalies: usize,
    pub sensor_types: usize,
    pub farm_locations: usize,
    pub crop_types: usize,
}

impl DatasetSummary {
    // ---
    /// Crop types are counted from the yield table when present, otherwise
    /// from the sensor readings (e.g. when readings were loaded from CSV).
    pub fn new(
        readings: &[SensorReading],
        weather: &[WeatherRecord],
        yields: &[CropYieldRecord],
        anomalies: &[Anomaly],
    ) -> Self {
        // ---
        let sensor_types = readings
            .iter()
            .map(|r| r.sensor_type)
            .collect::<HashSet<_>>()
            .len();
        let farm_locations = readings
            .iter()
            .map(|r| r.farm_location.as_str())
            .collect::<HashSet<_>>()
            .len();
        let crop_types = if yields.is_empty() {
            readings
                .iter()
                .map(|r| r.crop_type.as_str())
                .collect::<HashSet<_>>()
                .len()
        } else {
            yields
                .iter()
                .map(|y| y.crop_type.as_str())
                .collect::<HashSet<_>>()
                .len()
        };

        Self {
            sensor_readings: readings.len(),
            weather_records: weather.len(),
            crop_yield_records: yields.len(),
            anomalies: anomalies.len(),
            sensor_types,
            farm_locations,
            crop_types,
        }
    }

    pub fn log(&self) {
        // ---
        tracing::info!(
            sensor_readings = self.sensor_readings,
            weather_records = self.weather_records,
            crop_yield_records = self.crop_yield_records,
            anomalies = self.anomalies,
            sensor_types = self.sensor_types,
            farm_locations = self.farm_locations,
            crop_types = self.crop_types,
            "Dataset summary"
        );
    }
}

impl fmt::Display for DatasetSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Dataset Summary ===")?;
        writeln!(f, "IoT Sensor Readings: {} records", self.sensor_readings)?;
        writeln!(f, "Weather Data: {} records", self.weather_records)?;
        writeln!(f, "Crop Yield Data: {} records", self.crop_yield_records)?;
        writeln!(f, "Anomalies Detected: {} records", self.anomalies)?;
        writeln!(f, "Sensor Types: {}", self.sensor_types)?;
        writeln!(f, "Farm Locations: {}", self.farm_locations)?;
        write!(f, "Crop Types: {}", self.crop_types)
    }
}
