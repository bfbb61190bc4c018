// Replay service - Loads the recording and answers stateless queries
use crate::application::record_store::RecordStore;
use crate::application::resolver::Resolver;
use crate::application::source_repository::SourceRepository;
use crate::application::timeline_store::TimelineStore;
use crate::domain::flight_path::PathPoint;
use crate::domain::metrics::MetricsPayload;
use crate::domain::telemetry::{Channel, TelemetryRecord};
use crate::domain::time_axis::{TimeAxis, clock_label};
use crate::domain::timeline::{TimelineEvent, TimelineMarker};
use crate::domain::weather::WeatherObservation;
use crate::infrastructure::kml::parse_path;
use crate::infrastructure::telemetry_csv::parse_records;
use crate::infrastructure::timeline_markup::parse_timeline;
use crate::infrastructure::weather_table::parse_weather;
use anyhow::Context;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelInfo {
    pub channel: Channel,
    pub name: &'static str,
    pub unit: &'static str,
}

/// Static description of the loaded recording
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overview {
    pub axis: TimeAxis,
    pub record_count: usize,
    pub markers: Vec<TimelineMarker>,
    pub path: Vec<PathPoint>,
    pub gauge_units: BTreeMap<&'static str, &'static str>,
    pub channels: Vec<ChannelInfo>,
    pub speed_options: Vec<f64>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowSnapshot {
    pub t: i64,
    pub values: BTreeMap<Channel, Option<f64>>,
    pub transcript: Option<String>,
    pub crew: Option<String>,
}

impl RowSnapshot {
    fn from_record(record: &TelemetryRecord) -> Self {
        let values = Channel::ALL
            .iter()
            .map(|c| {
                let value = record.chart_value(*c);
                (*c, value.is_finite().then_some(value))
            })
            .collect();
        Self {
            t: record.t,
            values,
            transcript: record.transcript.clone(),
            crew: record.crew.clone(),
        }
    }
}

/// Owned, serializable form of a resolved state
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub second: i64,
    pub clock: String,
    pub row: Option<RowSnapshot>,
    pub event: Option<TimelineEvent>,
    pub path_fraction: f64,
    pub path_index: Option<usize>,
    pub position: Option<PathPoint>,
    pub bearing: Option<f64>,
}

#[derive(Clone)]
pub struct ReplayService {
    resolver: Arc<Resolver>,
    speed_options: Vec<f64>,
}

impl ReplayService {
    pub fn new(resolver: Arc<Resolver>, speed_options: Vec<f64>) -> Self {
        Self {
            resolver,
            speed_options,
        }
    }

    /// Fetch and parse every source. Only missing telemetry is fatal;
    /// a missing timeline, path or weather brief leaves that part empty.
    pub async fn load_dataset(repository: &dyn SourceRepository) -> anyhow::Result<Resolver> {
        let start_time = Instant::now();
        let (records, timeline, path, weather) = tokio::join!(
            repository.fetch_records(),
            repository.fetch_timeline(),
            repository.fetch_path(),
            repository.fetch_weather()
        );

        let records_text = records.context("Telemetry records are required to start the dashboard")?;
        let timeline_text = timeline.unwrap_or_else(|e| {
            tracing::warn!("Timeline unavailable, continuing without events: {}", e);
            String::new()
        });
        let path_text = path.unwrap_or_else(|e| {
            tracing::warn!("Flight path unavailable, continuing without map: {}", e);
            String::new()
        });
        let weather_text = weather.unwrap_or_else(|e| {
            tracing::info!("Weather brief unavailable, continuing without observations: {}", e);
            String::new()
        });

        let records = parse_records(&records_text);
        let events = parse_timeline(&timeline_text);
        let points = parse_path(&path_text);
        let weather = parse_weather(&weather_text);

        if records.skipped > 0 {
            tracing::warn!("Skipped {} malformed telemetry rows", records.skipped);
        }
        if points.skipped > 0 {
            tracing::warn!("Skipped {} malformed path coordinates", points.skipped);
        }
        tracing::debug!("Ignored {} non-event timeline lines", events.skipped);
        if weather.skipped > 0 {
            tracing::warn!("Skipped {} incomplete weather observations", weather.skipped);
        }

        let resolver = Resolver::new(
            RecordStore::from_records(records.items),
            TimelineStore::from_events(events.items),
            points.items,
        )
        .with_weather(weather.items);

        let axis = resolver.axis();
        tracing::info!(
            "Loaded {} records ({} - {}), {} events, {} path points, {} weather observations in {} ms",
            resolver.records().len(),
            clock_label(axis.t_min),
            clock_label(axis.t_max),
            resolver.timeline().len(),
            resolver.path().len(),
            resolver.weather().len(),
            start_time.elapsed().as_millis()
        );
        if resolver.records().is_empty() {
            tracing::warn!("Telemetry source contained no usable rows");
        }

        Ok(resolver)
    }

    pub fn overview(&self) -> Overview {
        let axis = self.resolver.axis();
        Overview {
            axis,
            record_count: self.resolver.records().len(),
            markers: self.resolver.timeline().markers(&axis),
            path: self.resolver.path().points().to_vec(),
            gauge_units: MetricsPayload::zero(axis.t_min).units,
            channels: Channel::ALL
                .iter()
                .map(|c| ChannelInfo {
                    channel: *c,
                    name: c.label(),
                    unit: c.unit(),
                })
                .collect(),
            speed_options: self.speed_options.clone(),
        }
    }

    /// Tower observations in brief order, empty without a brief
    pub fn weather(&self) -> &[WeatherObservation] {
        self.resolver.weather()
    }

    /// Resolve a second without touching any playback session
    pub fn snapshot_at(&self, second: i64) -> Snapshot {
        let second = self.resolver.axis().clamp(second);
        let state = self.resolver.resolve(second);
        Snapshot {
            second,
            clock: clock_label(second),
            row: state.row.map(RowSnapshot::from_record),
            event: state.event.cloned(),
            path_fraction: state.path_fraction,
            path_index: state.path_index,
            position: state.position,
            bearing: state.bearing,
        }
    }
}
