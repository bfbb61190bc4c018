// Timeline event store
use crate::domain::time_axis::TimeAxis;
use crate::domain::timeline::{TimelineEvent, TimelineMarker};

#[derive(Debug, Clone, Default)]
pub struct TimelineStore {
    events: Vec<TimelineEvent>,
}

impl TimelineStore {
    /// Sorts ascending by `t`; events sharing a second keep their input order
    pub fn from_events(mut events: Vec<TimelineEvent>) -> Self {
        events.sort_by_key(|e| e.t);
        Self { events }
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Last event with `t <= second`
    pub fn latest_at(&self, second: i64) -> Option<&TimelineEvent> {
        let idx = self.events.partition_point(|e| e.t <= second);
        idx.checked_sub(1).map(|i| &self.events[i])
    }

    pub fn markers(&self, axis: &TimeAxis) -> Vec<TimelineMarker> {
        self.events
            .iter()
            .map(|e| TimelineMarker {
                t: e.t,
                text: e.text.clone(),
                percent: axis.fraction(e.t as f64) * 100.0,
            })
            .collect()
    }
}
