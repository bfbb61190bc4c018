// Telemetry record store - ascending, one record per second
use crate::domain::telemetry::{Channel, TelemetryRecord, TimeSeriesPoint};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<TelemetryRecord>,
}

impl RecordStore {
    /// Build from rows in input order. A later row with the same `t` replaces an earlier one.
    pub fn from_records(records: Vec<TelemetryRecord>) -> Self {
        let by_second: BTreeMap<i64, TelemetryRecord> =
            records.into_iter().map(|r| (r.t, r)).collect();
        Self {
            records: by_second.into_values().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[TelemetryRecord] {
        &self.records
    }

    pub fn keys(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.t).collect()
    }

    pub fn get(&self, second: i64) -> Option<&TelemetryRecord> {
        self.records
            .binary_search_by_key(&second, |r| r.t)
            .ok()
            .map(|idx| &self.records[idx])
    }

    /// Index of the record closest to `second`; on equal distance the earlier record wins
    pub fn nearest_index(&self, second: i64) -> Option<usize> {
        if self.records.is_empty() {
            return None;
        }
        let idx = self.records.partition_point(|r| r.t < second);
        if idx == 0 {
            return Some(0);
        }
        if idx == self.records.len() {
            return Some(idx - 1);
        }
        let before = second - self.records[idx - 1].t;
        let after = self.records[idx].t - second;
        if after < before { Some(idx) } else { Some(idx - 1) }
    }

    /// Exact record at `second`, else the nearest one
    pub fn nearest(&self, second: i64) -> Option<&TelemetryRecord> {
        self.nearest_index(second).map(|idx| &self.records[idx])
    }

    /// Number of records with `t <= second`
    pub fn count_through(&self, second: i64) -> usize {
        self.records.partition_point(|r| r.t <= second)
    }

    /// Records with `lo <= t <= hi`
    pub fn window(&self, lo: i64, hi: i64) -> &[TelemetryRecord] {
        let start = self.records.partition_point(|r| r.t < lo);
        let end = self.records.partition_point(|r| r.t <= hi).max(start);
        &self.records[start..end]
    }

    /// Chart series for one channel over `lo..=hi`, gaps kept as NaN
    pub fn series(&self, channel: Channel, lo: i64, hi: i64) -> Vec<TimeSeriesPoint> {
        self.window(lo, hi)
            .iter()
            .map(|r| TimeSeriesPoint::new(r.t, r.chart_value(channel)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(t: i64, speed: f64) -> TelemetryRecord {
        let mut r = TelemetryRecord::new(t);
        r.ground_speed = speed;
        r
    }

    fn irregular_store() -> RecordStore {
        RecordStore::from_records(vec![
            record(30, 3.0),
            record(10, 1.0),
            record(11, 1.1),
            record(20, 2.0),
            record(45, 4.5),
        ])
    }

    fn brute_force_nearest(store: &RecordStore, second: i64) -> i64 {
        let mut best: Option<&TelemetryRecord> = None;
        for r in store.records() {
            match best {
                Some(b) if (r.t - second).abs() >= (b.t - second).abs() => {}
                _ => best = Some(r),
            }
        }
        best.map(|r| r.t).unwrap()
    }

    #[test]
    fn test_sorted_and_last_write_wins() {
        let store = RecordStore::from_records(vec![record(5, 1.0), record(2, 2.0), record(5, 9.0)]);
        assert_eq!(store.keys(), vec![2, 5]);
        assert_eq!(store.get(5).unwrap().ground_speed, 9.0);
    }

    #[test]
    fn test_nearest_matches_brute_force() {
        let store = irregular_store();
        for second in 0..=60 {
            let expected = brute_force_nearest(&store, second);
            assert_eq!(store.nearest(second).unwrap().t, expected, "second {}", second);
        }
    }

    #[test]
    fn test_nearest_tie_prefers_earlier() {
        let store = irregular_store();
        // 15 is 4 from 11 and 5 from 20; 25 is 5 from both 20 and 30
        assert_eq!(store.nearest(15).unwrap().t, 11);
        assert_eq!(store.nearest(25).unwrap().t, 20);
    }

    #[test]
    fn test_empty_store() {
        let store = RecordStore::default();
        assert!(store.nearest(10).is_none());
        assert!(store.window(0, 100).is_empty());
    }

    #[test]
    fn test_window_and_series() {
        let store = irregular_store();
        let keys: Vec<i64> = store.window(11, 30).iter().map(|r| r.t).collect();
        assert_eq!(keys, vec![11, 20, 30]);
        assert!(store.window(31, 20).is_empty());
        assert_eq!(store.count_through(20), 3);

        let series = store.series(Channel::GroundSpeed, i64::MIN, i64::MAX);
        assert_eq!(series.len(), 5);
        assert!(store.series(Channel::Airspeed, 10, 11)[0].value.is_nan());
        assert_eq!(store.series(Channel::GroundSpeed, 11, 20).len(), 2);
    }
}
