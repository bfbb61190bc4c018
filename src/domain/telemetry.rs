// Telemetry data domain models
use serde::{Deserialize, Serialize};

/// Numeric channels recorded by the flight data recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Channel {
    Airspeed,
    RadarAltitude,
    VerticalSpeed,
    Torque1,
    Torque2,
    GroundSpeed,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Airspeed,
        Channel::RadarAltitude,
        Channel::VerticalSpeed,
        Channel::Torque1,
        Channel::Torque2,
        Channel::GroundSpeed,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Channel::Airspeed => "True Airspeed",
            Channel::RadarAltitude => "Radar Altitude",
            Channel::VerticalSpeed => "Vertical Speed",
            Channel::Torque1 => "Eng 1 Torque",
            Channel::Torque2 => "Eng 2 Torque",
            Channel::GroundSpeed => "Ground Speed",
        }
    }

    pub fn unit(&self) -> &'static str {
        match self {
            Channel::Airspeed | Channel::GroundSpeed => "knot",
            Channel::RadarAltitude => "ft",
            Channel::VerticalSpeed => "ft/min",
            Channel::Torque1 | Channel::Torque2 => "percent",
        }
    }
}

/// One recorder row, keyed by seconds since local midnight.
///
/// Channel values are stored exactly as parsed: a missing or non-numeric
/// field is NaN. Use [`TelemetryRecord::chart_value`] when gaps must stay
/// visible and [`TelemetryRecord::gauge_value`] when a finite number is
/// required.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryRecord {
    pub t: i64,
    pub airspeed: f64,
    pub radar_altitude: f64,
    pub vertical_speed: f64,
    pub torque1: f64,
    pub torque2: f64,
    pub ground_speed: f64,
    pub transcript: Option<String>,
    pub crew: Option<String>,
}

impl TelemetryRecord {
    pub fn new(t: i64) -> Self {
        Self {
            t,
            airspeed: f64::NAN,
            radar_altitude: f64::NAN,
            vertical_speed: f64::NAN,
            torque1: f64::NAN,
            torque2: f64::NAN,
            ground_speed: f64::NAN,
            transcript: None,
            crew: None,
        }
    }

    /// Raw value, NaN preserved so charts render gaps
    pub fn chart_value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Airspeed => self.airspeed,
            Channel::RadarAltitude => self.radar_altitude,
            Channel::VerticalSpeed => self.vertical_speed,
            Channel::Torque1 => self.torque1,
            Channel::Torque2 => self.torque2,
            Channel::GroundSpeed => self.ground_speed,
        }
    }

    /// Finite value for gauges and stats. Radar altitude never reads below ground.
    pub fn gauge_value(&self, channel: Channel) -> f64 {
        let value = finite_or_zero(self.chart_value(channel));
        match channel {
            Channel::RadarAltitude => value.max(0.0),
            _ => value,
        }
    }
}

pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() { value } else { 0.0 }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TimeSeriesPoint {
    pub t: i64,
    pub value: f64,
}

impl TimeSeriesPoint {
    pub fn new(t: i64, value: f64) -> Self {
        Self { t, value }
    }
}

/// Left/right channel pair plus smoothing radius shown on the chart
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSelection {
    pub left: Channel,
    pub right: Channel,
    pub radius: usize,
}

impl Default for ChartSelection {
    fn default() -> Self {
        Self {
            left: Channel::GroundSpeed,
            right: Channel::RadarAltitude,
            radius: 4,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesData {
    pub channel: Channel,
    pub name: String,
    pub unit: String,
    pub raw: Vec<TimeSeriesPoint>,
    pub smoothed: Vec<TimeSeriesPoint>,
    pub y_min: f64,
    pub y_max: f64,
    pub min_marker: Option<TimeSeriesPoint>,
    pub max_marker: Option<TimeSeriesPoint>,
}

impl SeriesData {
    pub fn new(
        channel: Channel,
        raw: Vec<TimeSeriesPoint>,
        smoothed: Vec<TimeSeriesPoint>,
        y_range: (f64, f64),
    ) -> Self {
        let min_marker = extreme(&raw, |a, b| a < b);
        let max_marker = extreme(&raw, |a, b| a > b);
        Self {
            channel,
            name: channel.label().to_string(),
            unit: channel.unit().to_string(),
            raw,
            smoothed,
            y_min: y_range.0,
            y_max: y_range.1,
            min_marker,
            max_marker,
        }
    }
}

fn extreme(points: &[TimeSeriesPoint], better: impl Fn(f64, f64) -> bool) -> Option<TimeSeriesPoint> {
    points
        .iter()
        .filter(|p| p.value.is_finite())
        .fold(None, |best: Option<TimeSeriesPoint>, p| match best {
            Some(b) if !better(p.value, b.value) => Some(b),
            _ => Some(*p),
        })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartData {
    pub radius: usize,
    /// Inclusive time window the series were cut to
    pub from: i64,
    pub to: i64,
    pub left: SeriesData,
    pub right: SeriesData,
}

impl ChartData {
    pub fn new(radius: usize, (from, to): (i64, i64), left: SeriesData, right: SeriesData) -> Self {
        Self {
            radius,
            from,
            to,
            left,
            right,
        }
    }
}
