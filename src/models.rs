//! Data models for the agricultural telemetry pipeline.
//!
//! Raw tables (sensor readings, weather, crop yield) are produced by the
//! `generator` module or loaded from CSV; derived records (`PatternSummary`,
//! `Anomaly`) are produced by the `analysis` module.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---

/// Farm locations every generated record is drawn from.
pub const FARM_LOCATIONS: [&str; 8] = [
    "Mato Grosso",
    "Goiás",
    "Minas Gerais",
    "São Paulo",
    "Paraná",
    "Rio Grande do Sul",
    "Bahia",
    "Mato Grosso do Sul",
];

/// Crop catalog.
pub const CROP_TYPES: [&str; 8] = [
    "Soja",
    "Milho",
    "Algodão",
    "Cana-de-açúcar",
    "Café",
    "Trigo",
    "Arroz",
    "Feijão",
];

pub const IRRIGATION_TYPES: [&str; 4] = ["Drip", "Sprinkler", "Flood", "Rain-fed"];

/// Historical yield in kg/ha used as the baseline for yield synthesis.
///
/// Crops outside the catalog fall back to 2000 kg/ha.
pub fn base_yield_kg_ha(crop: &str) -> f64 {
    // ---
    match crop {
        "Soja" => 3200.0,
        "Milho" => 5500.0,
        "Algodão" => 1600.0,
        "Cana-de-açúcar" => 75000.0,
        "Café" => 1200.0,
        "Trigo" => 2800.0,
        "Arroz" => 4200.0,
        "Feijão" => 1800.0,
        _ => 2000.0,
    }
}

// ---

/// Rejections raised when a reading does not satisfy the model's preconditions.
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("unknown sensor type '{0}'")]
    UnknownSensorType(String),

    #[error("reading #{index} has an empty sensor_id")]
    EmptySensorId { index: usize },

    #[error("sensor {sensor_id}: value {value} is not a finite number")]
    NonFiniteValue { sensor_id: String, value: f64 },

    #[error("sensor {sensor_id}: unit '{found}' does not match '{expected}' for its sensor type")]
    UnitMismatch {
        sensor_id: String,
        expected: &'static str,
        found: String,
    },
}

/// The nine measurement categories. Declaration order is the catalog order
/// used for every grouped output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SensorType {
    SoilMoisture,
    SoilTemperature,
    AirTemperature,
    AirHumidity,
    LightIntensity,
    PhLevel,
    NitrogenLevel,
    PhosphorusLevel,
    PotassiumLevel,
}

impl SensorType {
    // ---
    pub const ALL: [SensorType; 9] = [
        SensorType::SoilMoisture,
        SensorType::SoilTemperature,
        SensorType::AirTemperature,
        SensorType::AirHumidity,
        SensorType::LightIntensity,
        SensorType::PhLevel,
        SensorType::NitrogenLevel,
        SensorType::PhosphorusLevel,
        SensorType::PotassiumLevel,
    ];

    pub fn as_str(self) -> &'static str {
        // ---
        match self {
            SensorType::SoilMoisture => "soil_moisture",
            SensorType::SoilTemperature => "soil_temperature",
            SensorType::AirTemperature => "air_temperature",
            SensorType::AirHumidity => "air_humidity",
            SensorType::LightIntensity => "light_intensity",
            SensorType::PhLevel => "ph_level",
            SensorType::NitrogenLevel => "nitrogen_level",
            SensorType::PhosphorusLevel => "phosphorus_level",
            SensorType::PotassiumLevel => "potassium_level",
        }
    }

    /// Unit of measurement reported alongside every value of this type.
    pub fn unit(self) -> &'static str {
        // ---
        match self {
            SensorType::SoilMoisture | SensorType::AirHumidity => "%",
            SensorType::SoilTemperature | SensorType::AirTemperature => "°C",
            SensorType::LightIntensity => "lux",
            SensorType::PhLevel => "pH",
            SensorType::NitrogenLevel
            | SensorType::PhosphorusLevel
            | SensorType::PotassiumLevel => "ppm",
        }
    }
}

impl fmt::Display for SensorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SensorType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // ---
        SensorType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSensorType(s.to_string()))
    }
}

// ---

/// One observation from a (synthetic) field device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    // ---
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub farm_location: String,
    pub crop_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub battery_level: f64,
    pub signal_strength: f64,
}

impl SensorReading {
    // ---
    /// Check the preconditions the analysis pass relies on. `index` is only
    /// used to label the error.
    pub fn validate(&self, index: usize) -> Result<(), ValidationError> {
        // ---
        if self.sensor_id.trim().is_empty() {
            return Err(ValidationError::EmptySensorId { index });
        }
        if !self.value.is_finite() {
            return Err(ValidationError::NonFiniteValue {
                sensor_id: self.sensor_id.clone(),
                value: self.value,
            });
        }
        let expected = self.sensor_type.unit();
        if self.unit != expected {
            return Err(ValidationError::UnitMismatch {
                sensor_id: self.sensor_id.clone(),
                expected,
                found: self.unit.clone(),
            });
        }
        Ok(())
    }
}

/// Fail fast on the first reading that violates a precondition.
pub fn validate_readings(readings: &[SensorReading]) -> Result<(), ValidationError> {
    // ---
    readings
        .iter()
        .enumerate()
        .try_for_each(|(index, reading)| reading.validate(index))
}

/// Sensor row as stored in CSV, before the sensor type is checked.
#[derive(Debug, Deserialize)]
pub struct RawSensorRow {
    // ---
    pub sensor_id: String,
    pub sensor_type: String,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub unit: String,
    pub farm_location: String,
    pub crop_type: String,
    pub latitude: f64,
    pub longitude: f64,
    pub battery_level: f64,
    pub signal_strength: f64,
}

impl RawSensorRow {
    // ---
    pub fn into_reading(self, index: usize) -> Result<SensorReading, ValidationError> {
        // ---
        let reading = SensorReading {
            sensor_type: self.sensor_type.parse()?,
            sensor_id: self.sensor_id,
            timestamp: self.timestamp,
            value: self.value,
            unit: self.unit,
            farm_location: self.farm_location,
            crop_type: self.crop_type,
            latitude: self.latitude,
            longitude: self.longitude,
            battery_level: self.battery_level,
            signal_strength: self.signal_strength,
        };
        reading.validate(index)?;
        Ok(reading)
    }
}

/// Daily weather observation for one farm location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    // ---
    pub date: NaiveDate,
    pub location: String,
    pub temperature_high: f64,
    pub temperature_low: f64,
    pub humidity: f64,
    pub rainfall_mm: f64,
    pub wind_speed_kmh: f64,
    pub uv_index: f64,
}

/// Season record for one crop planted at one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropYieldRecord {
    // ---
    pub location: String,
    pub crop_type: String,
    pub planting_date: NaiveDate,
    pub harvest_date: NaiveDate,
    pub area_hectares: f64,
    pub predicted_yield_kg_ha: f64,
    pub actual_yield_kg_ha: f64,
    pub irrigation_type: String,
    pub fertilizer_usage_kg_ha: f64,
}

// ---

/// Descriptive statistics for one sensor category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSummary {
    // ---
    #[serde(rename = "avg_value")]
    pub mean: f64,
    #[serde(rename = "min_value")]
    pub min: f64,
    #[serde(rename = "max_value")]
    pub max: f64,
    /// Sample standard deviation; `0.0` when the category has one reading.
    #[serde(rename = "std_value")]
    pub std_dev: f64,
    #[serde(rename = "readings_count")]
    pub count: usize,
    /// Number of distinct farm locations reporting this category.
    pub locations: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    Medium,
    High,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Medium => f.write_str("Medium"),
            Severity::High => f.write_str("High"),
        }
    }
}

/// A reading flagged as an outlier within its sensor category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anomaly {
    // ---
    pub sensor_id: String,
    pub sensor_type: SensorType,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    /// `mean - 2σ` to `mean + 2σ`, one decimal place.
    pub expected_range: String,
    pub severity: Severity,
    pub farm_location: String,
    /// Absolute z-score within the category; not exported.
    #[serde(skip)]
    pub z_score: f64,
}

// ---

/// Record types exported as CSV tables.
///
/// `COLUMNS` lists the serialized field names in order, so a table can carry
/// its header even when it has no rows.
pub trait Tabular {
    const COLUMNS: &'static [&'static str];
}

impl Tabular for SensorReading {
    const COLUMNS: &'static [&'static str] = &[
        "sensor_id",
        "sensor_type",
        "timestamp",
        "value",
        "unit",
        "farm_location",
        "crop_type",
        "latitude",
        "longitude",
        "battery_level",
        "signal_strength",
    ];
}

impl Tabular for WeatherRecord {
    const COLUMNS: &'static [&'static str] = &[
        "date",
        "location",
        "temperature_high",
        "temperature_low",
        "humidity",
        "rainfall_mm",
        "wind_speed_kmh",
        "uv_index",
    ];
}

impl Tabular for CropYieldRecord {
    const COLUMNS: &'static [&'static str] = &[
        "location",
        "crop_type",
        "planting_date",
        "harvest_date",
        "area_hectares",
        "predicted_yield_kg_ha",
        "actual_yield_kg_ha",
        "irrigation_type",
        "fertilizer_usage_kg_ha",
    ];
}

impl Tabular for Anomaly {
    const COLUMNS: &'static [&'static str] = &[
        "sensor_id",
        "sensor_type",
        "timestamp",
        "value",
        "expected_range",
        "severity",
        "farm_location",
    ];
}
