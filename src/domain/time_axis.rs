// Shared time axis
use serde::Serialize;

/// Inclusive `[t_min, t_max]` range of recorded seconds.
///
/// An empty recording collapses both ends to 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeAxis {
    pub t_min: i64,
    pub t_max: i64,
}

impl TimeAxis {
    pub fn new(t_min: i64, t_max: i64) -> Self {
        Self {
            t_min,
            t_max: t_max.max(t_min),
        }
    }

    /// Axis from the first and last keys of an ascending sequence
    pub fn from_sorted_keys(keys: &[i64]) -> Self {
        match (keys.first(), keys.last()) {
            (Some(first), Some(last)) => Self::new(*first, *last),
            _ => Self::default(),
        }
    }

    /// Divisor for proportional positions, never below one second
    pub fn span(&self) -> i64 {
        (self.t_max - self.t_min).max(1)
    }

    pub fn clamp(&self, second: i64) -> i64 {
        second.clamp(self.t_min, self.t_max)
    }

    /// Elapsed proportion of the axis at `second`, in `[0, 1]`
    pub fn fraction(&self, second: f64) -> f64 {
        ((second - self.t_min as f64) / self.span() as f64).clamp(0.0, 1.0)
    }

    /// Second at a proportional position along the axis, rounded to the nearest
    pub fn second_at(&self, fraction: f64) -> i64 {
        self.t_min + (fraction * (self.t_max - self.t_min) as f64).round() as i64
    }
}

/// `HH:MM:SS` label for seconds since local midnight
pub fn clock_label(second: i64) -> String {
    let wrapped = second.rem_euclid(86_400) as u32;
    chrono::NaiveTime::from_num_seconds_from_midnight_opt(wrapped, 0)
        .map(|time| time.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}
