//! Synthetic data sources for the pipeline.
//!
//! Every generator takes the random source and the reference clock as
//! arguments, so a seeded [`rand::rngs::StdRng`] plus a fixed timestamp always
//! reproduces the same tables.

use std::f64::consts::PI;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use rand_distr::{Exp1, StandardNormal};

use crate::models::{
    base_yield_kg_ha, CropYieldRecord, SensorReading, SensorType, WeatherRecord, CROP_TYPES,
    FARM_LOCATIONS, IRRIGATION_TYPES,
};

// ---

/// Hours of the day at which every sensor reports.
pub const READING_HOURS: [i64; 6] = [0, 4, 8, 12, 16, 20];

fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    let z: f64 = rng.sample(StandardNormal);
    mean + std_dev * z
}

fn exponential<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    let e: f64 = rng.sample(Exp1);
    scale * e
}

/// Uniform draw from one of the fixed, non-empty catalogs.
fn pick<T: Copy, R: Rng + ?Sized>(rng: &mut R, catalog: &[T]) -> T {
    *catalog.choose(rng).expect("catalogs are non-empty")
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Draw one raw value for `sensor_type` taken at `hour` of the day.
fn sample_value<R: Rng + ?Sized>(rng: &mut R, sensor_type: SensorType, hour: i64) -> f64 {
    // ---
    match sensor_type {
        SensorType::SoilMoisture => normal(rng, 45.0, 15.0).clamp(0.0, 100.0),
        SensorType::SoilTemperature => normal(rng, 22.0, 5.0),
        SensorType::AirTemperature => normal(rng, 25.0, 8.0),
        SensorType::AirHumidity => normal(rng, 60.0, 20.0).clamp(0.0, 100.0),
        SensorType::LightIntensity => {
            let base = if (6..=18).contains(&hour) { 800.0 } else { 50.0 };
            normal(rng, base, 200.0).max(0.0)
        }
        SensorType::PhLevel => normal(rng, 6.5, 0.8).clamp(4.0, 9.0),
        SensorType::NitrogenLevel | SensorType::PhosphorusLevel | SensorType::PotassiumLevel => {
            normal(rng, 50.0, 20.0).max(0.0)
        }
    }
}

/// Yearly modulation applied to every reading taken `day` days ago.
fn seasonal_factor(day: i64) -> f64 {
    1.0 + 0.2 * (2.0 * PI * day as f64 / 365.0).sin()
}

/// Generate readings for `num_sensors` devices over the last `days_back` days.
///
/// Each device is assigned a random sensor type, farm location and crop, then
/// reports six times a day (see [`READING_HOURS`]). Produces
/// `num_sensors * days_back * 6` readings, device by device, newest first.
#[tracing::instrument(skip(rng, now))]
pub fn generate_sensor_data<R: Rng + ?Sized>(
    rng: &mut R,
    num_sensors: u32,
    days_back: u32,
    now: DateTime<Utc>,
) -> Vec<SensorReading> {
    // ---
    let capacity = num_sensors as usize * days_back as usize * READING_HOURS.len();
    let mut readings = Vec::with_capacity(capacity);

    for sensor_id in 1..=num_sensors {
        let sensor_type = pick(rng, &SensorType::ALL);
        let farm_location = pick(rng, &FARM_LOCATIONS);
        let crop_type = pick(rng, &CROP_TYPES);

        for day in 0..i64::from(days_back) {
            for hour in READING_HOURS {
                let timestamp = now - Duration::days(day) - Duration::hours(hour);
                let value = sample_value(rng, sensor_type, hour) * seasonal_factor(day);

                readings.push(SensorReading {
                    sensor_id: format!("SENSOR_{:03}", sensor_id),
                    sensor_type,
                    timestamp,
                    value: round_to(value, 2),
                    unit: sensor_type.unit().to_string(),
                    farm_location: farm_location.to_string(),
                    crop_type: crop_type.to_string(),
                    latitude: -15.0 + rng.gen_range(-10.0..10.0),
                    longitude: -55.0 + rng.gen_range(-10.0..10.0),
                    battery_level: normal(rng, 80.0, 15.0).max(10.0),
                    signal_strength: normal(rng, -60.0, 20.0).max(-100.0),
                });
            }
        }
    }

    tracing::debug!("Generated {} sensor readings", readings.len());
    readings
}

/// Generate one weather record per farm location per day, newest first.
#[tracing::instrument(skip(rng, today))]
pub fn generate_weather_data<R: Rng + ?Sized>(
    rng: &mut R,
    days_back: u32,
    today: NaiveDate,
) -> Vec<WeatherRecord> {
    // ---
    let mut records = Vec::with_capacity(FARM_LOCATIONS.len() * days_back as usize);

    for location in FARM_LOCATIONS {
        for day in 0..i64::from(days_back) {
            let temperature_high = normal(rng, 28.0, 6.0);
            let temperature_low = temperature_high - rng.gen_range(5.0..15.0);
            let humidity = normal(rng, 65.0, 20.0).clamp(0.0, 100.0);
            let rainfall_mm = exponential(rng, 2.0).max(0.0);
            let wind_speed_kmh = normal(rng, 15.0, 8.0).max(0.0);

            records.push(WeatherRecord {
                date: today - Duration::days(day),
                location: location.to_string(),
                temperature_high: round_to(temperature_high, 1),
                temperature_low: round_to(temperature_low, 1),
                humidity: round_to(humidity, 1),
                rainfall_mm: round_to(rainfall_mm, 1),
                wind_speed_kmh: round_to(wind_speed_kmh, 1),
                uv_index: normal(rng, 6.0, 2.0).clamp(0.0, 11.0),
            });
        }
    }

    records
}

/// Generate one yield record for every location and crop pair.
#[tracing::instrument(skip(rng, today))]
pub fn generate_crop_yield_data<R: Rng + ?Sized>(
    rng: &mut R,
    today: NaiveDate,
) -> Vec<CropYieldRecord> {
    // ---
    let mut records = Vec::with_capacity(FARM_LOCATIONS.len() * CROP_TYPES.len());

    for location in FARM_LOCATIONS {
        for crop in CROP_TYPES {
            let location_factor = rng.gen_range(0.8..1.2);
            let year_factor = rng.gen_range(0.9..1.1);
            let predicted = base_yield_kg_ha(crop) * location_factor * year_factor;
            let actual = predicted * rng.gen_range(0.85..1.15);

            records.push(CropYieldRecord {
                location: location.to_string(),
                crop_type: crop.to_string(),
                planting_date: today - Duration::days(rng.gen_range(60..120)),
                harvest_date: today + Duration::days(rng.gen_range(30..90)),
                area_hectares: rng.gen_range(50.0..500.0),
                predicted_yield_kg_ha: predicted.round(),
                actual_yield_kg_ha: actual.round(),
                irrigation_type: pick(rng, &IRRIGATION_TYPES).to_string(),
                fertilizer_usage_kg_ha: rng.gen_range(100.0..400.0),
            });
        }
    }

    records
}
