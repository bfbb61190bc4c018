use crate::domain::telemetry::{Channel, ChartSelection};
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ReplayConfig {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub sources: SourceSettings,
    #[serde(default)]
    pub playback: PlaybackSettings,
    #[serde(default)]
    pub chart: ChartSettings,
    #[serde(default)]
    pub sinks: SinksSettings,
    #[serde(default)]
    pub risk: RiskThresholds,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { bind: default_bind() }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    #[default]
    File,
    Http,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SourceSettings {
    #[serde(default)]
    pub kind: SourceKind,
    /// Directory for `file`, base URL for `http`
    #[serde(default = "default_base")]
    pub base: String,
    #[serde(default = "default_records")]
    pub records: String,
    #[serde(default = "default_timeline")]
    pub timeline: String,
    #[serde(default = "default_path")]
    pub path: String,
    /// Weather brief with the tower observations table; optional
    #[serde(default = "default_weather")]
    pub weather: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            kind: SourceKind::File,
            base: default_base(),
            records: default_records(),
            timeline: default_timeline(),
            path: default_path(),
            weather: default_weather(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct PlaybackSettings {
    #[serde(default = "default_frame_interval_ms")]
    pub frame_interval_ms: u64,
    #[serde(default = "default_speed")]
    pub default_speed: f64,
    #[serde(default = "default_speed_options")]
    pub speed_options: Vec<f64>,
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default = "default_transcript_window_secs")]
    pub transcript_window_secs: i64,
    #[serde(default = "default_session_idle_secs")]
    pub session_idle_secs: u64,
}

impl PlaybackSettings {
    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_interval_ms.max(1))
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs.max(1))
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: default_frame_interval_ms(),
            default_speed: default_speed(),
            speed_options: default_speed_options(),
            transition_ms: default_transition_ms(),
            transcript_window_secs: default_transcript_window_secs(),
            session_idle_secs: default_session_idle_secs(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChartSettings {
    #[serde(default = "default_left")]
    pub left: Channel,
    #[serde(default = "default_right")]
    pub right: Channel,
    #[serde(default = "default_smoothing_radius")]
    pub smoothing_radius: usize,
    #[serde(default = "default_max_radius")]
    pub max_radius: usize,
    #[serde(default = "default_range_padding")]
    pub range_padding: f64,
}

impl ChartSettings {
    pub fn selection(&self) -> ChartSelection {
        ChartSelection {
            left: self.left,
            right: self.right,
            radius: self.smoothing_radius.min(self.max_radius),
        }
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            left: default_left(),
            right: default_right(),
            smoothing_radius: default_smoothing_radius(),
            max_radius: default_max_radius(),
            range_padding: default_range_padding(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct SinksSettings {
    #[serde(default = "default_enabled_sinks")]
    pub enabled: Vec<String>,
}

impl Default for SinksSettings {
    fn default() -> Self {
        Self {
            enabled: default_enabled_sinks(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
pub struct RiskThresholds {
    #[serde(default = "default_low_altitude_ft")]
    pub low_altitude_ft: f64,
    #[serde(default = "default_high_descent_fpm")]
    pub high_descent_fpm: f64,
    #[serde(default = "default_torque_split_pct")]
    pub torque_split_pct: f64,
    #[serde(default = "default_low_speed_kt")]
    pub low_speed_kt: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low_altitude_ft: default_low_altitude_ft(),
            high_descent_fpm: default_high_descent_fpm(),
            torque_split_pct: default_torque_split_pct(),
            low_speed_kt: default_low_speed_kt(),
        }
    }
}

fn default_bind() -> String {
    "0.0.0.0:8080".to_string()
}

fn default_base() -> String {
    "data".to_string()
}

fn default_records() -> String {
    "Data.csv".to_string()
}

fn default_timeline() -> String {
    "Línea de tiempo.md".to_string()
}

fn default_path() -> String {
    "MOJO69 Flight Path.kml".to_string()
}

fn default_weather() -> String {
    "ROI_UH60 (1).md".to_string()
}

fn default_session_idle_secs() -> u64 {
    300
}

fn default_frame_interval_ms() -> u64 {
    16
}

fn default_speed() -> f64 {
    1.0
}

fn default_speed_options() -> Vec<f64> {
    vec![0.5, 1.0, 2.0, 4.0, 8.0]
}

fn default_transition_ms() -> u64 {
    180
}

fn default_transcript_window_secs() -> i64 {
    10
}

fn default_left() -> Channel {
    Channel::GroundSpeed
}

fn default_right() -> Channel {
    Channel::RadarAltitude
}

fn default_smoothing_radius() -> usize {
    4
}

fn default_max_radius() -> usize {
    10
}

fn default_range_padding() -> f64 {
    0.1
}

fn default_enabled_sinks() -> Vec<String> {
    ["clock", "gauges", "chart", "map", "transcript", "event", "stats", "risk"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_low_altitude_ft() -> f64 {
    100.0
}

fn default_high_descent_fpm() -> f64 {
    -1000.0
}

fn default_torque_split_pct() -> f64 {
    10.0
}

fn default_low_speed_kt() -> f64 {
    40.0
}

/// Load `config/replay.toml` (optional) overlaid with `REPLAY__SECTION__KEY`
/// environment variables.
pub fn load_replay_config() -> anyhow::Result<ReplayConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name("config/replay").required(false))
        .add_source(
            config::Environment::with_prefix("REPLAY")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("playback.speed_options")
                .with_list_parse_key("sinks.enabled"),
        )
        .build()?;

    Ok(settings.try_deserialize()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(text: &str) -> ReplayConfig {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.server.bind, "0.0.0.0:8080");
        assert_eq!(config.sources.kind, SourceKind::File);
        assert_eq!(config.sources.timeline, "Línea de tiempo.md");
        assert_eq!(config.playback.frame_interval(), Duration::from_millis(16));
        assert_eq!(config.playback.session_idle_timeout(), Duration::from_secs(300));
        assert_eq!(config.sources.weather, "ROI_UH60 (1).md");
        assert_eq!(config.playback.speed_options, vec![0.5, 1.0, 2.0, 4.0, 8.0]);
        assert_eq!(config.chart.selection(), ChartSelection::default());
        assert_eq!(config.sinks.enabled.len(), 8);
        assert_eq!(config.risk, RiskThresholds::default());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config = from_toml(
            r#"
            [sources]
            kind = "http"
            base = "http://localhost:9000/replay"

            [chart]
            left = "airspeed"
            smoothing_radius = 25
            max_radius = 6

            [sinks]
            enabled = ["clock", "gauges"]

            [risk]
            low_speed_kt = 55
            "#,
        );

        assert_eq!(config.sources.kind, SourceKind::Http);
        assert_eq!(config.sources.records, "Data.csv");
        let selection = config.chart.selection();
        assert_eq!(selection.left, Channel::Airspeed);
        assert_eq!(selection.right, Channel::RadarAltitude);
        assert_eq!(selection.radius, 6);
        assert_eq!(config.sinks.enabled, vec!["clock", "gauges"]);
        assert_eq!(config.risk.low_speed_kt, 55.0);
        assert_eq!(config.risk.low_altitude_ft, 100.0);
    }
}
