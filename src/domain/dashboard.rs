// Dashboard frame domain model
use super::flight_path::PathPoint;
use super::metrics::MetricsPayload;
use super::playback::PlaybackState;
use super::telemetry::ChartSelection;
use serde::Serialize;

/// Everything the viewer shows for one rendered second
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardFrame {
    pub state: PlaybackState,
    pub has_started: bool,
    pub sinks: Vec<SinkView>,
}

impl DashboardFrame {
    pub fn new(state: PlaybackState, has_started: bool, sinks: Vec<SinkView>) -> Self {
        Self {
            state,
            has_started,
            sinks,
        }
    }

    pub fn gauges(&self) -> Option<&GaugeView> {
        self.sinks.iter().find_map(|s| match s {
            SinkView::Gauges(view) => Some(view),
            _ => None,
        })
    }

    pub fn clock(&self) -> Option<&ClockView> {
        self.sinks.iter().find_map(|s| match s {
            SinkView::Clock(view) => Some(view),
            _ => None,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "sink", rename_all = "camelCase")]
pub enum SinkView {
    Clock(ClockView),
    Gauges(GaugeView),
    Chart(ChartCursorView),
    Map(MapView),
    Transcript(TranscriptView),
    Event(EventView),
    Stats(StatsView),
    Risk(RiskView),
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockView {
    pub second: i64,
    pub label: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GaugeView {
    pub metrics: MetricsPayload,
    /// Needle animation towards `metrics`, absent once interrupted
    pub transition_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartCursorView {
    pub second: i64,
    pub selection: ChartSelection,
    /// Smoothed values under the cursor, `None` inside a gap
    pub left: Option<f64>,
    pub right: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MapView {
    pub fraction: f64,
    pub index: Option<usize>,
    pub position: Option<PathPoint>,
    pub bearing: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptLine {
    pub t: i64,
    pub label: String,
    pub crew: String,
    pub text: String,
    pub now: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TranscriptView {
    pub lines: Vec<TranscriptLine>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct EventView {
    pub t: Option<i64>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStats {
    pub name: String,
    pub unit: String,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub samples: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct StatsView {
    pub channels: Vec<ChannelStats>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RiskKind {
    LowAltitude,
    HighDescent,
    TorqueSplit,
    LowSpeed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBadge {
    pub kind: RiskKind,
    pub active: bool,
    pub value: f64,
    pub threshold: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct RiskView {
    pub badges: Vec<RiskBadge>,
}
