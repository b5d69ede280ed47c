use std::collections::{BTreeMap, HashSet};

use tracing::debug;

use super::stats::{partition_by_type, GroupStats};
use crate::models::{PatternSummary, SensorReading, SensorType};

// ---

/// Summarize every sensor category present in `readings`.
///
/// Categories with no readings are omitted rather than reported as zero.
/// The returned map iterates (and serializes) in catalog order.
#[tracing::instrument(skip_all, fields(readings = readings.len()))]
pub fn summarize_patterns(readings: &[SensorReading]) -> BTreeMap<SensorType, PatternSummary> {
    // ---
    partition_by_type(readings)
        .into_iter()
        .filter_map(|(sensor_type, group)| {
            let stats = GroupStats::compute(&group)?;
            let locations = group
                .iter()
                .map(|r| r.farm_location.as_str())
                .collect::<HashSet<_>>()
                .len();

            debug!(
                "{}: n={} mean={:.2} std={:.2} locations={}",
                sensor_type, stats.count, stats.mean, stats.std_dev, locations
            );

            Some((
                sensor_type,
                PatternSummary {
                    mean: stats.mean,
                    min: stats.min,
                    max: stats.max,
                    std_dev: stats.std_dev,
                    count: stats.count,
                    locations,
                },
            ))
        })
        .collect()
}
