// Gauge metrics payload
use serde::Serialize;
use std::collections::BTreeMap;

pub const TAS: &str = "tas";
pub const ALTITUDE: &str = "altitude";
pub const VERTICAL_SPEED: &str = "vs";
pub const TORQUE_1: &str = "tq1";
pub const TORQUE_2: &str = "tq2";
pub const HEADING: &str = "heading";
pub const ROLL: &str = "roll";
pub const PITCH: &str = "pitch";

const UNITS: [(&str, &str); 8] = [
    (TAS, "knot"),
    (ALTITUDE, "ft"),
    (VERTICAL_SPEED, "ft/min"),
    (TORQUE_1, "percent"),
    (TORQUE_2, "percent"),
    (HEADING, "degrees"),
    (ROLL, "degrees"),
    (PITCH, "degrees"),
];

/// Payload pushed to the gauge renderer.
///
/// `values` always carries the same keys as `units` and every value is finite.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsPayload {
    pub latest: i64,
    pub units: BTreeMap<&'static str, &'static str>,
    pub values: BTreeMap<&'static str, f64>,
}

impl MetricsPayload {
    /// All needles at rest
    pub fn zero(latest: i64) -> Self {
        Self {
            latest,
            units: UNITS.iter().copied().collect(),
            values: UNITS.iter().map(|(key, _)| (*key, 0.0)).collect(),
        }
    }

    /// Set a channel value; non-finite input reads as 0 and unknown keys are ignored
    pub fn set(&mut self, key: &str, value: f64) {
        if let Some(slot) = self.values.get_mut(key) {
            *slot = if value.is_finite() { value } else { 0.0 };
        }
    }

    pub fn value(&self, key: &str) -> f64 {
        self.values.get(key).copied().unwrap_or(0.0)
    }

    pub fn is_zero(&self) -> bool {
        self.values.values().all(|v| *v == 0.0)
    }
}
