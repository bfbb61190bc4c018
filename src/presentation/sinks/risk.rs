// Risk badges - threshold checks on the resolved telemetry row
use crate::application::sink::{RenderContext, Sink, SinkGate};
use crate::domain::dashboard::{RiskBadge, RiskKind, RiskView, SinkView};
use crate::domain::telemetry::{Channel, TelemetryRecord, finite_or_zero};
use crate::domain::time_axis::TimeAxis;
use crate::infrastructure::config::RiskThresholds;

pub struct RiskSink {
    thresholds: RiskThresholds,
    view: RiskView,
}

impl RiskSink {
    pub fn new(thresholds: RiskThresholds) -> Self {
        let view = evaluate(&thresholds, None);
        Self { thresholds, view }
    }
}

/// A badge is only active when the values it checks are present
fn badge(kind: RiskKind, value: f64, threshold: f64, active: impl Fn(f64) -> bool) -> RiskBadge {
    RiskBadge {
        kind,
        active: value.is_finite() && active(value),
        value: finite_or_zero(value),
        threshold,
    }
}

fn evaluate(thresholds: &RiskThresholds, row: Option<&TelemetryRecord>) -> RiskView {
    let value = |channel| row.map_or(f64::NAN, |r| r.chart_value(channel));
    let split = (value(Channel::Torque1) - value(Channel::Torque2)).abs();

    RiskView {
        badges: vec![
            badge(
                RiskKind::LowAltitude,
                value(Channel::RadarAltitude),
                thresholds.low_altitude_ft,
                |v| v < thresholds.low_altitude_ft,
            ),
            badge(
                RiskKind::HighDescent,
                value(Channel::VerticalSpeed),
                thresholds.high_descent_fpm,
                |v| v < thresholds.high_descent_fpm,
            ),
            badge(RiskKind::TorqueSplit, split, thresholds.torque_split_pct, |v| {
                v > thresholds.torque_split_pct
            }),
            badge(
                RiskKind::LowSpeed,
                value(Channel::Airspeed),
                thresholds.low_speed_kt,
                |v| v < thresholds.low_speed_kt,
            ),
        ],
    }
}

impl Sink for RiskSink {
    fn name(&self) -> &'static str {
        "risk"
    }

    fn gate(&self) -> SinkGate {
        SinkGate::AfterStart
    }

    fn render(&mut self, ctx: &RenderContext<'_>) {
        self.view = evaluate(&self.thresholds, ctx.state.row);
    }

    fn reset(&mut self, _axis: &TimeAxis) {
        self.view = evaluate(&self.thresholds, None);
    }

    fn view(&self) -> SinkView {
        SinkView::Risk(self.view.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn active(view: &RiskView) -> Vec<RiskKind> {
        view.badges.iter().filter(|b| b.active).map(|b| b.kind).collect()
    }

    #[test]
    fn test_badges_follow_thresholds() {
        let thresholds = RiskThresholds::default();
        let mut row = TelemetryRecord::new(0);
        row.radar_altitude = 80.0;
        row.vertical_speed = -1500.0;
        row.torque1 = 60.0;
        row.torque2 = 45.0;
        row.airspeed = 90.0;

        let view = evaluate(&thresholds, Some(&row));
        assert_eq!(
            active(&view),
            vec![RiskKind::LowAltitude, RiskKind::HighDescent, RiskKind::TorqueSplit]
        );
        assert_eq!(view.badges[2].value, 15.0);
    }

    #[test]
    fn test_missing_values_never_alarm() {
        let thresholds = RiskThresholds::default();
        let row = TelemetryRecord::new(0);

        let view = evaluate(&thresholds, Some(&row));
        assert!(active(&view).is_empty());
        assert!(view.badges.iter().all(|b| b.value == 0.0));

        let mut sink = RiskSink::new(thresholds);
        sink.reset(&TimeAxis::new(0, 10));
        let SinkView::Risk(view) = sink.view() else {
            panic!("expected risk");
        };
        assert_eq!(view.badges.len(), 4);
        assert!(active(&view).is_empty());
    }
}
