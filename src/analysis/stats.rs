//! Grouping and descriptive statistics shared by the summarizer and the
//! anomaly detector.

use std::collections::BTreeMap;

use crate::models::{SensorReading, SensorType};

// ---

/// Partition readings by sensor type in a single pass.
///
/// Keys iterate in catalog order; each group keeps input order.
pub fn partition_by_type(
    readings: &[SensorReading],
) -> BTreeMap<SensorType, Vec<&SensorReading>> {
    // ---
    let mut groups: BTreeMap<SensorType, Vec<&SensorReading>> = BTreeMap::new();
    for reading in readings {
        groups.entry(reading.sensor_type).or_default().push(reading);
    }
    groups
}

/// Mean, extrema and sample standard deviation of one group's values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupStats {
    // ---
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    /// Divides by `n - 1`. Defined as `0.0` for a single value.
    pub std_dev: f64,
}

impl GroupStats {
    // ---
    /// Returns `None` for an empty group.
    pub fn compute(group: &[&SensorReading]) -> Option<Self> {
        // ---
        if group.is_empty() {
            return None;
        }

        let count = group.len();
        let min = group.iter().map(|r| r.value).fold(f64::INFINITY, f64::min);
        let max = group.iter().map(|r| r.value).fold(f64::NEG_INFINITY, f64::max);
        // Rounding in the sum can land the mean just outside [min, max].
        let mean = (group.iter().map(|r| r.value).sum::<f64>() / count as f64).clamp(min, max);

        let std_dev = if count < 2 {
            0.0
        } else {
            let sum_sq = group
                .iter()
                .map(|r| (r.value - mean).powi(2))
                .sum::<f64>();
            (sum_sq / (count - 1) as f64).sqrt()
        };

        Some(Self {
            count,
            mean,
            min,
            max,
            std_dev,
        })
    }

    /// Absolute z-score of `value`. Zero-variance groups score every value 0.
    pub fn z_score(&self, value: f64) -> f64 {
        // ---
        if self.std_dev == 0.0 {
            return 0.0;
        }
        (value - self.mean).abs() / self.std_dev
    }

    /// Display interval `mean ± 2σ` rounded to one decimal.
    pub fn expected_range(&self) -> String {
        // ---
        let spread = 2.0 * self.std_dev;
        format!("{:.1} - {:.1}", self.mean - spread, self.mean + spread)
    }
}
