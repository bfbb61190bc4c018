// Running min/max/mean per channel, prefix tables built once per recording
use crate::application::record_store::RecordStore;
use crate::domain::dashboard::ChannelStats;
use crate::domain::telemetry::Channel;

pub const STAT_CHANNELS: [Channel; 3] =
    [Channel::GroundSpeed, Channel::RadarAltitude, Channel::VerticalSpeed];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Aggregate {
    min: f64,
    max: f64,
    sum: f64,
    samples: usize,
}

impl Aggregate {
    const EMPTY: Aggregate = Aggregate {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
        sum: 0.0,
        samples: 0,
    };

    fn push(self, value: f64) -> Self {
        if !value.is_finite() {
            return self;
        }
        Self {
            min: self.min.min(value),
            max: self.max.max(value),
            sum: self.sum + value,
            samples: self.samples + 1,
        }
    }

    fn to_stats(self, channel: Channel) -> ChannelStats {
        let (min, max, mean) = if self.samples == 0 {
            (0.0, 0.0, 0.0)
        } else {
            (self.min, self.max, self.sum / self.samples as f64)
        };
        ChannelStats {
            name: channel.label().to_string(),
            unit: channel.unit().to_string(),
            min,
            max,
            mean,
            samples: self.samples,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RunningStats {
    // prefixes[c][k] aggregates STAT_CHANNELS[c] over the first k records
    prefixes: Vec<Vec<Aggregate>>,
}

impl RunningStats {
    pub fn new(records: &RecordStore) -> Self {
        let prefixes = STAT_CHANNELS
            .iter()
            .map(|channel| {
                let mut prefix = Vec::with_capacity(records.len() + 1);
                prefix.push(Aggregate::EMPTY);
                for record in records.records() {
                    let last = prefix[prefix.len() - 1];
                    prefix.push(last.push(record.chart_value(*channel)));
                }
                prefix
            })
            .collect();
        Self { prefixes }
    }

    /// Stats over the first `count` records; counts past the end clamp to all
    pub fn over_first(&self, count: usize) -> Vec<ChannelStats> {
        STAT_CHANNELS
            .iter()
            .enumerate()
            .map(|(c, channel)| {
                let aggregate = self
                    .prefixes
                    .get(c)
                    .and_then(|prefix| prefix.get(count).or_else(|| prefix.last()))
                    .copied()
                    .unwrap_or(Aggregate::EMPTY);
                aggregate.to_stats(*channel)
            })
            .collect()
    }
}
