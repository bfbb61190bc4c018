// Gauge cluster - airspeed, altitude, vertical speed, torques and attitude
use crate::application::sink::{RenderContext, Sink, SinkGate};
use crate::domain::dashboard::{GaugeView, SinkView};
use crate::domain::metrics::{
    ALTITUDE, HEADING, MetricsPayload, PITCH, ROLL, TAS, TORQUE_1, TORQUE_2, VERTICAL_SPEED,
};
use crate::domain::telemetry::Channel;
use crate::domain::time_axis::TimeAxis;

const KNOTS_TO_FEET_PER_SECOND: f64 = 1.68781;
const KNOTS_TO_METRES_PER_SECOND: f64 = 0.514444;
const STANDARD_GRAVITY: f64 = 9.80665;

/// Flight-path angle in degrees from vertical speed (ft/min) and ground speed (kt)
pub fn pitch_degrees(vertical_speed_fpm: f64, ground_speed_kt: f64) -> f64 {
    let climb = vertical_speed_fpm / 60.0;
    let forward = ground_speed_kt * KNOTS_TO_FEET_PER_SECOND;
    if climb == 0.0 && forward == 0.0 {
        return 0.0;
    }
    climb.atan2(forward).to_degrees()
}

/// Coordinated-turn bank angle in degrees, positive to the right
pub fn bank_degrees(ground_speed_kt: f64, turn_rate_dps: f64) -> f64 {
    let speed = ground_speed_kt * KNOTS_TO_METRES_PER_SECOND;
    (speed * turn_rate_dps.to_radians() / STANDARD_GRAVITY)
        .atan()
        .to_degrees()
}

pub struct GaugeSink {
    metrics: MetricsPayload,
    transition_ms: Option<u64>,
    configured_transition_ms: u64,
}

impl GaugeSink {
    pub fn new(transition_ms: u64) -> Self {
        Self {
            metrics: MetricsPayload::zero(0),
            transition_ms: None,
            configured_transition_ms: transition_ms,
        }
    }
}

impl Sink for GaugeSink {
    fn name(&self) -> &'static str {
        "gauges"
    }

    fn gate(&self) -> SinkGate {
        SinkGate::AfterStart
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        let state = ctx.state;
        let Some(row) = state.row else {
            self.metrics = MetricsPayload::zero(state.second);
            self.transition_ms = None;
            return;
        };

        let ground_speed = row.gauge_value(Channel::GroundSpeed);
        let vertical_speed = row.gauge_value(Channel::VerticalSpeed);

        let mut metrics = MetricsPayload::zero(row.t);
        metrics.set(TAS, row.gauge_value(Channel::Airspeed));
        metrics.set(ALTITUDE, row.gauge_value(Channel::RadarAltitude));
        metrics.set(VERTICAL_SPEED, vertical_speed);
        metrics.set(TORQUE_1, row.gauge_value(Channel::Torque1));
        metrics.set(TORQUE_2, row.gauge_value(Channel::Torque2));
        metrics.set(HEADING, state.bearing.unwrap_or(0.0));
        metrics.set(ROLL, bank_degrees(ground_speed, state.turn_rate));
        // A gap in either input reads level rather than a vertical dive
        let attitude_known = row.chart_value(Channel::GroundSpeed).is_finite()
            && row.chart_value(Channel::VerticalSpeed).is_finite();
        let pitch = if attitude_known {
            pitch_degrees(vertical_speed, ground_speed)
        } else {
            0.0
        };
        metrics.set(PITCH, pitch);

        self.metrics = metrics;
        self.transition_ms = Some(self.configured_transition_ms);
    }

    fn reset(&mut self, axis: &TimeAxis) {
        self.metrics = MetricsPayload::zero(axis.t_min);
        self.transition_ms = None;
    }

    fn interrupt(&mut self) {
        self.transition_ms = None;
    }

    fn view(&self) -> SinkView {
        SinkView::Gauges(GaugeView {
            metrics: self.metrics.clone(),
            transition_ms: self.transition_ms,
        })
    }
}
