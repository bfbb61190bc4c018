// Concrete sinks - one renderer per dashboard panel
mod chart_cursor;
mod clock;
mod event;
mod gauges;
mod map;
mod risk;
mod stats;
mod transcript;

pub use chart_cursor::ChartCursorSink;
pub use clock::ClockSink;
pub use event::EventSink;
pub use gauges::GaugeSink;
pub use map::MapSink;
pub use risk::RiskSink;
pub use stats::StatsSink;
pub use transcript::TranscriptSink;

use crate::application::resolver::Resolver;
use crate::application::sink::Sink;
use crate::infrastructure::config::{ReplayConfig, RiskThresholds};
use std::sync::Arc;

pub const SINK_NAMES: [&str; 8] = [
    "clock",
    "gauges",
    "chart",
    "map",
    "transcript",
    "event",
    "stats",
    "risk",
];

#[derive(Debug, Clone)]
pub struct SinkSettings {
    pub enabled: Vec<String>,
    pub transition_ms: u64,
    pub transcript_window_secs: i64,
    pub risk: RiskThresholds,
}

impl SinkSettings {
    pub fn from_config(config: &ReplayConfig) -> Self {
        Self {
            enabled: config.sinks.enabled.clone(),
            transition_ms: config.playback.transition_ms,
            transcript_window_secs: config.playback.transcript_window_secs,
            risk: config.risk,
        }
    }
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            enabled: SINK_NAMES.iter().map(|s| s.to_string()).collect(),
            transition_ms: 180,
            transcript_window_secs: 10,
            risk: RiskThresholds::default(),
        }
    }
}

/// Build the enabled sinks in configuration order. Unknown names are skipped
/// and a panel left out of the list simply never renders.
pub fn build_sinks(settings: &SinkSettings, resolver: &Arc<Resolver>) -> Vec<Box<dyn Sink>> {
    let mut sinks: Vec<Box<dyn Sink>> = Vec::with_capacity(settings.enabled.len());
    for name in &settings.enabled {
        let sink: Box<dyn Sink> = match name.as_str() {
            "clock" => Box::new(ClockSink::new()),
            "gauges" => Box::new(GaugeSink::new(settings.transition_ms)),
            "chart" => Box::new(ChartCursorSink::new()),
            "map" => Box::new(MapSink::new()),
            "transcript" => Box::new(TranscriptSink::new(settings.transcript_window_secs)),
            "event" => Box::new(EventSink::new()),
            "stats" => Box::new(StatsSink::new(resolver.running_stats())),
            "risk" => Box::new(RiskSink::new(settings.risk)),
            other => {
                tracing::warn!("Ignoring unknown sink '{}'", other);
                continue;
            }
        };
        if sinks.iter().any(|s| s.name() == sink.name()) {
            tracing::warn!("Sink '{}' listed twice, keeping the first", name);
            continue;
        }
        sinks.push(sink);
    }
    tracing::debug!(
        "Registered sinks: {}",
        sinks.iter().map(|s| s.name()).collect::<Vec<_>>().join(", ")
    );
    sinks
}
