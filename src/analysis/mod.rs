//! Statistical analysis over a materialized sensor stream.
//!
//! Both entry points are pure functions of their input: they partition the
//! readings once by [`SensorType`](crate::models::SensorType) and work on each
//! group independently.
//!
//! - [`summarize_patterns`]: descriptive statistics per sensor category
//! - [`detect_anomalies`]: z-score outlier flagging per sensor category

mod anomalies;
mod patterns;
mod stats;

pub use anomalies::{
    classify, detect_anomalies, ANOMALY_Z_THRESHOLD, HIGH_SEVERITY_Z_THRESHOLD, MIN_GROUP_SIZE,
};
pub use patterns::summarize_patterns;
pub use stats::{partition_by_type, GroupStats};
