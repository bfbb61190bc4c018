// Resolver - "what is true at second T" across every source
use crate::application::path_store::PathStore;
use crate::application::record_store::RecordStore;
use crate::application::running_stats::RunningStats;
use crate::application::timeline_store::TimelineStore;
use crate::domain::flight_path::PathPoint;
use crate::domain::telemetry::TelemetryRecord;
use crate::domain::time_axis::TimeAxis;
use crate::domain::timeline::TimelineEvent;
use crate::domain::weather::WeatherObservation;
use std::sync::Arc;

/// Consistent cross-source snapshot for one query second
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedState<'a> {
    pub second: i64,
    pub row: Option<&'a TelemetryRecord>,
    pub event: Option<&'a TimelineEvent>,
    pub path_fraction: f64,
    pub path_index: Option<usize>,
    pub position: Option<PathPoint>,
    pub bearing: Option<f64>,
    pub turn_rate: f64,
}

/// Immutable view over all loaded sources, built once at startup
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    records: RecordStore,
    timeline: TimelineStore,
    path: PathStore,
    axis: TimeAxis,
    running_stats: Arc<RunningStats>,
    weather: Vec<WeatherObservation>,
}

impl Resolver {
    pub fn new(records: RecordStore, timeline: TimelineStore, path_points: Vec<PathPoint>) -> Self {
        let axis = TimeAxis::from_sorted_keys(&records.keys());
        let path = PathStore::new(path_points, &axis);
        let running_stats = Arc::new(RunningStats::new(&records));
        Self {
            records,
            timeline,
            path,
            axis,
            running_stats,
            weather: Vec::new(),
        }
    }

    pub fn axis(&self) -> TimeAxis {
        self.axis
    }

    pub fn records(&self) -> &RecordStore {
        &self.records
    }

    pub fn timeline(&self) -> &TimelineStore {
        &self.timeline
    }

    pub fn path(&self) -> &PathStore {
        &self.path
    }

    /// Attach tower observations; they are not indexed by second
    pub fn with_weather(mut self, weather: Vec<WeatherObservation>) -> Self {
        self.weather = weather;
        self
    }

    pub fn weather(&self) -> &[WeatherObservation] {
        &self.weather
    }

    pub fn running_stats(&self) -> &RunningStats {
        &self.running_stats
    }

    pub fn resolve(&self, second: i64) -> ResolvedState<'_> {
        let path_fraction = self.axis.fraction(second as f64);
        let fix = self.path.fix_at(path_fraction);
        ResolvedState {
            second,
            row: self.records.nearest(second),
            event: self.timeline.latest_at(second),
            path_fraction,
            path_index: fix.map(|f| f.index),
            position: fix.map(|f| f.position),
            bearing: self.path.bearing_at(second),
            turn_rate: self.path.turn_rate_at(second),
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Irregularly sampled recording with a few events and a short path
    pub(crate) fn sample_resolver() -> Resolver {
        let mut rows: Vec<TelemetryRecord> = [100, 101, 102, 105, 110, 111, 130, 140]
            .iter()
            .map(|t| {
                let mut r = TelemetryRecord::new(*t);
                r.airspeed = (*t - 100) as f64;
                r.ground_speed = 80.0;
                r.radar_altitude = 500.0 - (*t - 100) as f64 * 10.0;
                r.vertical_speed = -600.0;
                r.torque1 = 40.0;
                r.torque2 = 38.0;
                r
            })
            .collect();
        rows[3].transcript = Some("ALTITUDE".to_string());
        rows[3].crew = Some("CP".to_string());
        rows[4].ground_speed = f64::NAN;

        let events = vec![
            TimelineEvent::new(110, "b"),
            TimelineEvent::new(100, "a"),
            TimelineEvent::new(130, "c"),
        ];
        let path = vec![
            PathPoint::new(0.0, 0.0),
            PathPoint::new(0.0, 1.0),
            PathPoint::new(1.0, 1.0),
        ];
        Resolver::new(
            RecordStore::from_records(rows),
            TimelineStore::from_events(events),
            path,
        )
    }

    #[test]
    fn test_axis_from_records() {
        let resolver = sample_resolver();
        assert_eq!(resolver.axis(), TimeAxis::new(100, 140));
    }

    #[test]
    fn test_row_is_exact_or_nearest() {
        let resolver = sample_resolver();
        for second in 100..=140 {
            let state = resolver.resolve(second);
            let row = state.row.unwrap();
            let best = resolver
                .records()
                .records()
                .iter()
                .map(|r| (r.t - second).abs())
                .min()
                .unwrap();
            assert_eq!((row.t - second).abs(), best, "second {}", second);
            if resolver.records().get(second).is_some() {
                assert_eq!(row.t, second);
            }
        }
    }

    #[test]
    fn test_event_resolution() {
        let resolver = sample_resolver();
        assert_eq!(resolver.resolve(99).event, None);
        assert_eq!(resolver.resolve(125).event.map(|e| e.text.as_str()), Some("b"));
        assert_eq!(resolver.resolve(140).event.map(|e| e.text.as_str()), Some("c"));
    }

    #[test]
    fn test_path_fraction_and_bearing() {
        let resolver = sample_resolver();
        let start = resolver.resolve(100);
        assert_eq!(start.path_fraction, 0.0);
        assert_eq!(start.path_index, Some(0));
        assert!(start.bearing.unwrap().abs() < 1e-9);

        let end = resolver.resolve(140);
        assert_eq!(end.path_fraction, 1.0);
        assert_eq!(end.path_index, Some(2));
        assert!((end.bearing.unwrap() - 90.0).abs() < 0.1);

        let mid = resolver.resolve(120);
        assert_eq!(mid.path_fraction, 0.5);
        assert_eq!(mid.path_index, Some(1));
    }

    #[test]
    fn test_empty_sources() {
        let resolver = Resolver::default();
        let state = resolver.resolve(12);
        assert!(state.row.is_none());
        assert!(state.event.is_none());
        assert!(state.position.is_none());
        assert_eq!(state.path_fraction, 1.0);
    }
}
