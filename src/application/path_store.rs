// Flight path store with a per-second bearing table
use crate::domain::flight_path::{PathPoint, heading_delta};
use crate::domain::time_axis::TimeAxis;
use std::collections::BTreeMap;

/// Where the aircraft sits on the polyline for a given time fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathFix {
    pub index: usize,
    pub position: PathPoint,
}

/// Ordered polyline. Vertex index is treated as a linear proxy for elapsed
/// time: vertices are assumed evenly spread across the time axis.
#[derive(Debug, Clone, Default)]
pub struct PathStore {
    points: Vec<PathPoint>,
    bearings: Vec<(i64, f64)>,
}

impl PathStore {
    pub fn new(points: Vec<PathPoint>, axis: &TimeAxis) -> Self {
        let bearings = bearing_table(&points, axis);
        Self { points, bearings }
    }

    pub fn points(&self) -> &[PathPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn bearing_entries(&self) -> &[(i64, f64)] {
        &self.bearings
    }

    /// Vertex at `round(fraction * (n - 1))`, position interpolated along the segment
    pub fn fix_at(&self, fraction: f64) -> Option<PathFix> {
        let last = self.points.len().checked_sub(1)?;
        let exact = fraction.clamp(0.0, 1.0) * last as f64;
        let index = (exact.round() as usize).min(last);
        let lower = (exact.floor() as usize).min(last);
        let upper = (lower + 1).min(last);
        let position = self.points[lower].lerp(&self.points[upper], exact - lower as f64);
        Some(PathFix { index, position })
    }

    /// Bearing stored for `second`, else the one at the nearest stored second
    pub fn bearing_at(&self, second: i64) -> Option<f64> {
        if self.bearings.is_empty() {
            return None;
        }
        let idx = self.bearings.partition_point(|(t, _)| *t < second);
        let chosen = if idx == 0 {
            0
        } else if idx == self.bearings.len() {
            idx - 1
        } else {
            let before = second - self.bearings[idx - 1].0;
            let after = self.bearings[idx].0 - second;
            if after < before { idx } else { idx - 1 }
        };
        Some(self.bearings[chosen].1)
    }

    /// Heading change rate in degrees per second, centred on `second`
    pub fn turn_rate_at(&self, second: i64) -> f64 {
        match (self.bearing_at(second - 1), self.bearing_at(second + 1)) {
            (Some(from), Some(to)) => heading_delta(from, to) / 2.0,
            _ => 0.0,
        }
    }
}

/// Assign each segment's initial bearing to the second nearest its starting
/// vertex's proportional position on the axis. Later segments overwrite
/// earlier ones landing on the same second.
fn bearing_table(points: &[PathPoint], axis: &TimeAxis) -> Vec<(i64, f64)> {
    if points.len() < 2 {
        return Vec::new();
    }
    let last = (points.len() - 1) as f64;
    let table: BTreeMap<i64, f64> = points
        .windows(2)
        .enumerate()
        .map(|(i, pair)| (axis.second_at(i as f64 / last), pair[0].bearing_to(&pair[1])))
        .collect();
    table.into_iter().collect()
}
