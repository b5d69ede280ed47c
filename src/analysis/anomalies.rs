use tracing::{debug, info};

use super::stats::{partition_by_type, GroupStats};
use crate::models::{Anomaly, SensorReading, Severity};

// ---

/// Groups of this size or smaller are never scored.
pub const MIN_GROUP_SIZE: usize = 10;

/// Readings strictly above this |z| are flagged.
pub const ANOMALY_Z_THRESHOLD: f64 = 2.5;

/// Flagged readings strictly above this |z| are `High` severity.
pub const HIGH_SEVERITY_Z_THRESHOLD: f64 = 3.0;

/// Map an absolute z-score to a severity, or `None` when it is not an outlier.
pub fn classify(z_score: f64) -> Option<Severity> {
    // ---
    if z_score > HIGH_SEVERITY_Z_THRESHOLD {
        Some(Severity::High)
    } else if z_score > ANOMALY_Z_THRESHOLD {
        Some(Severity::Medium)
    } else {
        None
    }
}

/// Flag readings whose z-score within their sensor category exceeds 2.5.
///
/// Mean and sample standard deviation are computed once per category.
/// Output is ordered by category (catalog order), then by input order.
/// Zero-variance categories produce nothing.
#[tracing::instrument(skip_all, fields(readings = readings.len()))]
pub fn detect_anomalies(readings: &[SensorReading]) -> Vec<Anomaly> {
    // ---
    let mut anomalies = Vec::new();

    for (sensor_type, group) in partition_by_type(readings) {
        if group.len() <= MIN_GROUP_SIZE {
            debug!(
                "{}: {} readings, below minimum sample size, skipping",
                sensor_type,
                group.len()
            );
            continue;
        }
        let Some(stats) = GroupStats::compute(&group) else {
            continue;
        };
        let expected_range = stats.expected_range();

        let before = anomalies.len();
        for reading in group {
            let z_score = stats.z_score(reading.value);
            let Some(severity) = classify(z_score) else {
                continue;
            };

            anomalies.push(Anomaly {
                sensor_id: reading.sensor_id.clone(),
                sensor_type,
                timestamp: reading.timestamp,
                value: reading.value,
                expected_range: expected_range.clone(),
                severity,
                farm_location: reading.farm_location.clone(),
                z_score,
            });
        }

        debug!(
            "{}: mean={:.2} std={:.2}, {} anomalies",
            sensor_type,
            stats.mean,
            stats.std_dev,
            anomalies.len() - before
        );
    }

    info!("Detected {} anomalies", anomalies.len());
    anomalies
}
