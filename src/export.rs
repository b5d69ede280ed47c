//! Flat-file export and import.
//!
//! Tables are written as CSV headed by the record type's `Tabular::COLUMNS`. The pattern summary is written as pretty-printed JSON.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::models::{
    PatternSummary, RawSensorRow, SensorReading, SensorType, Tabular, ValidationError,
};

// ---

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid sensor row {row}: {source}")]
    Validation {
        row: usize,
        #[source]
        source: ValidationError,
    },
}

/// File locations for one pipeline run, all inside a single output directory.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    // ---
    pub sensor_data: PathBuf,
    pub weather_data: PathBuf,
    pub crop_yield_data: PathBuf,
    pub anomalies: PathBuf,
    pub analysis: PathBuf,
}

impl OutputPaths {
    // ---
    pub fn new(dir: impl AsRef<Path>) -> Self {
        // ---
        let dir = dir.as_ref();
        Self {
            sensor_data: dir.join("iot_sensor_data.csv"),
            weather_data: dir.join("weather_data.csv"),
            crop_yield_data: dir.join("crop_yield_data.csv"),
            anomalies: dir.join("sensor_anomalies.csv"),
            analysis: dir.join("sensor_analysis.json"),
        }
    }
}

/// Write `records` to `path` as CSV and return the number of rows written.
///
/// The header row is always written, so an empty table still names its
/// columns.
pub fn write_csv<T: Serialize + Tabular>(
    path: impl AsRef<Path>,
    records: &[T],
) -> Result<usize, ExportError> {
    // ---
    let path = path.as_ref();
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(T::COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;

    tracing::debug!("Wrote {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

/// Load sensor readings previously written by [`write_csv`].
///
/// Fails on the first malformed row. `row` in the error is 1-based and does
/// not count the header.
pub fn read_sensor_csv(path: impl AsRef<Path>) -> Result<Vec<SensorReading>, ExportError> {
    // ---
    let mut reader = csv::Reader::from_path(path.as_ref())?;
    let mut readings = Vec::new();

    for (index, result) in reader.deserialize::<RawSensorRow>().enumerate() {
        let raw = result?;
        let reading = raw
            .into_reading(index)
            .map_err(|source| ExportError::Validation {
                row: index + 1,
                source,
            })?;
        readings.push(reading);
    }

    tracing::info!(
        "Loaded {} sensor readings from {}",
        readings.len(),
        path.as_ref().display()
    );
    Ok(readings)
}

/// Write the per-category summary as pretty JSON, keys in catalog order.
pub fn write_summary_json(
    path: impl AsRef<Path>,
    summary: &BTreeMap<SensorType, PatternSummary>,
) -> Result<(), ExportError> {
    // ---
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, summary)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::analysis::{detect_anomalies, summarize_patterns};
    use crate::generator::{
        generate_crop_yield_data, generate_sensor_data, generate_weather_data,
    };
    use crate::models::{Anomaly, CropYieldRecord, Severity, WeatherRecord};
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use tempfile::TempDir;

    fn sample_readings() -> Vec<SensorReading> {
        // ---
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        generate_sensor_data(&mut StdRng::seed_from_u64(42), 6, 3, now)
    }

    #[test]
    fn test_sensor_csv_round_trip() {
        // ---
        let dir = TempDir::new().unwrap();
        let paths = OutputPaths::new(dir.path());
        let readings = sample_readings();

        let written = write_csv(&paths.sensor_data, &readings).unwrap();
        assert_eq!(written, readings.len());

        let loaded = read_sensor_csv(&paths.sensor_data).unwrap();
        assert_eq!(loaded, readings);
    }

    #[test]
    fn test_sensor_csv_header() {
        // ---
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sensors.csv");
        write_csv(&path, &sample_readings()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let header = contents.lines().next().unwrap();
        assert_eq!(
            header,
            "sensor_id,sensor_type,timestamp,value,unit,farm_location,crop_type,\
             latitude,longitude,battery_level,signal_strength"
        );
    }

    #[test]
    fn test_anomaly_columns_exclude_z_score() {
        // ---
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anomalies.csv");

        let mut readings = sample_readings();
        readings.truncate(18);
        for r in readings.iter_mut() {
            r.sensor_type = SensorType::PhLevel;
            r.unit = "pH".to_string();
            r.value = 6.5;
        }
        readings[5].value = 60.0;
        let anomalies = detect_anomalies(&readings);
        assert_eq!(anomalies.len(), 1);

        write_csv(&path, &anomalies).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "sensor_id,sensor_type,timestamp,value,expected_range,severity,farm_location"
        );
        let row = lines.next().unwrap();
        assert!(row.contains(",ph_level,"));
        assert!(row.contains(",High,"));
    }

    #[test]
    fn test_empty_anomaly_table_keeps_header() {
        // ---
        let dir = TempDir::new().unwrap();
        let paths = OutputPaths::new(dir.path());

        let written = write_csv::<Anomaly>(&paths.anomalies, &[]).unwrap();
        assert_eq!(written, 0);

        let contents = std::fs::read_to_string(&paths.anomalies).unwrap();
        assert_eq!(
            contents,
            "sensor_id,sensor_type,timestamp,value,expected_range,severity,farm_location\n"
        );
    }

    /// Header the derived `Serialize` impl would emit for `record`.
    fn serde_header<T: Serialize>(record: &T) -> String {
        // ---
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.serialize(record).unwrap();
        let bytes = writer.into_inner().unwrap();
        String::from_utf8(bytes).unwrap().lines().next().unwrap().to_string()
    }

    #[test]
    fn test_columns_match_serialized_fields() {
        // ---
        let mut rng = StdRng::seed_from_u64(7);
        let today = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap().date_naive();

        let readings = sample_readings();
        assert_eq!(serde_header(&readings[0]), SensorReading::COLUMNS.join(","));

        let weather = generate_weather_data(&mut rng, 1, today);
        assert_eq!(serde_header(&weather[0]), WeatherRecord::COLUMNS.join(","));

        let yields = generate_crop_yield_data(&mut rng, today);
        assert_eq!(serde_header(&yields[0]), CropYieldRecord::COLUMNS.join(","));

        let anomaly = Anomaly {
            sensor_id: "SENSOR_001".to_string(),
            sensor_type: SensorType::PhLevel,
            timestamp: Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap(),
            value: 9.0,
            expected_range: "6.0 - 7.0".to_string(),
            severity: Severity::High,
            farm_location: "Bahia".to_string(),
            z_score: 3.5,
        };
        assert_eq!(serde_header(&anomaly), Anomaly::COLUMNS.join(","));
    }

    #[test]
    fn test_unknown_sensor_type_in_csv() {
        // ---
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "sensor_id,sensor_type,timestamp,value,unit,farm_location,crop_type,\
             latitude,longitude,battery_level,signal_strength\n\
             SENSOR_001,ph_level,2025-06-01T12:00:00Z,6.5,pH,Bahia,Soja,-15,-55,80,-60\n\
             SENSOR_002,leaf_wetness,2025-06-01T12:00:00Z,6.5,%,Bahia,Soja,-15,-55,80,-60\n",
        )
        .unwrap();

        match read_sensor_csv(&path) {
            Err(ExportError::Validation { row, source }) => {
                assert_eq!(row, 2);
                assert_eq!(source, ValidationError::UnknownSensorType("leaf_wetness".into()));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_number_in_csv() {
        // ---
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(
            &path,
            "sensor_id,sensor_type,timestamp,value,unit,farm_location,crop_type,\
             latitude,longitude,battery_level,signal_strength\n\
             SENSOR_001,ph_level,2025-06-01T12:00:00Z,abc,pH,Bahia,Soja,-15,-55,80,-60\n",
        )
        .unwrap();

        assert!(matches!(read_sensor_csv(&path), Err(ExportError::Csv(_))));
    }

    #[test]
    fn test_missing_input_file() {
        // ---
        let dir = TempDir::new().unwrap();
        let result = read_sensor_csv(dir.path().join("missing.csv"));
        assert!(result.is_err());
    }

    #[test]
    fn test_summary_json() {
        // ---
        let dir = TempDir::new().unwrap();
        let paths = OutputPaths::new(dir.path());
        let summary = summarize_patterns(&sample_readings());

        write_summary_json(&paths.analysis, &summary).unwrap();

        let contents = std::fs::read_to_string(&paths.analysis).unwrap();
        let parsed: BTreeMap<SensorType, PatternSummary> =
            serde_json::from_str(&contents).unwrap();
        assert_eq!(parsed.len(), summary.len());
        for (sensor_type, entry) in &parsed {
            assert_eq!(entry.count, summary[sensor_type].count);
            assert!(contents.contains(&format!("\"{}\"", sensor_type)));
        }
        assert!(contents.contains("\"avg_value\""));
    }
}
